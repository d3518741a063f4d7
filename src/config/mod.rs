use crate::cli::Args;
use crate::core::error::CarltonError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

fn default_true() -> bool {
    true
}

/// The backends known at startup. Registry keys are the lowercase names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    OpenAI,
    OpenRouter,
    DeepSeek,
    Ollama,
    Anthropic,
}

impl Provider {
    pub const ALL: [Provider; 5] = [
        Provider::OpenAI,
        Provider::OpenRouter,
        Provider::DeepSeek,
        Provider::Ollama,
        Provider::Anthropic,
    ];

    /// Exact, case-sensitive match on the registry name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == name)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAI => "openai",
            Provider::OpenRouter => "openrouter",
            Provider::DeepSeek => "deepseek",
            Provider::Ollama => "ollama",
            Provider::Anthropic => "anthropic",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::OpenAI => "OpenAI",
            Provider::OpenRouter => "OpenRouter",
            Provider::DeepSeek => "DeepSeek",
            Provider::Ollama => "Llama",
            Provider::Anthropic => "Anthropic",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::OpenAI => "https://api.openai.com/v1",
            Provider::OpenRouter => "https://openrouter.ai/api/v1",
            Provider::DeepSeek => "https://api.deepseek.com/v1",
            Provider::Ollama => "http://localhost:11434/v1",
            Provider::Anthropic => "https://api.anthropic.com/v1",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAI => "gpt-4o-mini",
            Provider::OpenRouter => "openai/gpt-4o-mini",
            Provider::DeepSeek => "deepseek-chat",
            Provider::Ollama => "llama3.2",
            Provider::Anthropic => "claude-3-5-haiku-latest",
        }
    }

    /// Environment variables consulted, in order, when no key is configured.
    pub fn api_key_env(&self) -> &'static [&'static str] {
        match self {
            Provider::OpenAI => &["OPENAI_API_KEY", "OPENAI_KEY"],
            Provider::OpenRouter => &["OPENROUTER_API_KEY"],
            Provider::DeepSeek => &["DEEPSEEK_API_KEY"],
            Provider::Ollama => &[],
            Provider::Anthropic => &["ANTHROPIC_API_KEY"],
        }
    }

    pub fn requires_api_key(&self) -> bool {
        !matches!(self, Provider::Ollama)
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub active_provider: Option<String>,
    pub request_timeout_secs: Option<u64>,
    #[serde(default = "default_true")]
    pub log_enabled: bool,
    pub log_file: Option<PathBuf>,
    pub disabled_commands: Vec<String>,
    pub providers: HashMap<String, ProviderConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            active_provider: None,
            request_timeout_secs: None,
            log_enabled: true,
            log_file: None,
            disabled_commands: Vec::new(),
            providers: HashMap::new(),
        }
    }
}

impl Config {
    fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".carlton")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    /// Loads `~/.carlton/config.yaml`, falling back to defaults when absent.
    pub fn load() -> Result<Config, CarltonError> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Config, CarltonError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yml::from_str::<Config>(&contents)
            .map_err(|e| CarltonError::Config(format!("Parse {}: {}", path.display(), e)))
    }

    /// Command-line flags take precedence over the file. `--provider` itself
    /// is applied later through backend selection; `--model` targets it.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(model) = &args.model {
            let target = args
                .provider
                .clone()
                .unwrap_or_else(|| self.active_provider_name().to_string());
            self.providers.entry(target).or_default().model = Some(model.clone());
        }
        if let Some(timeout) = args.timeout {
            self.request_timeout_secs = Some(timeout);
        }
        if let Some(log_file) = &args.log_file {
            self.log_file = Some(log_file.clone());
        }
        if args.no_log {
            self.log_enabled = false;
        }
        if args.no_edit && !self.disabled_commands.iter().any(|c| c == "edit") {
            self.disabled_commands.push("edit".to_string());
        }
    }

    pub fn active_provider_name(&self) -> &str {
        self.active_provider
            .as_deref()
            .unwrap_or(Provider::OpenAI.as_str())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Provider settings with defaults filled in and the API key resolved
    /// from the environment when the file does not carry one.
    pub fn provider_config(&self, provider: Provider) -> ProviderConfig {
        let configured = self
            .providers
            .get(provider.as_str())
            .cloned()
            .unwrap_or_default();

        let api_key = configured
            .api_key
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                provider
                    .api_key_env()
                    .iter()
                    .find_map(|var| env::var(var).ok().filter(|v| !v.trim().is_empty()))
            });

        ProviderConfig {
            api_key,
            base_url: Some(
                configured
                    .base_url
                    .unwrap_or_else(|| provider.default_base_url().to_string()),
            ),
            model: Some(
                configured
                    .model
                    .unwrap_or_else(|| provider.default_model().to_string()),
            ),
        }
    }

    /// Startup check: the active backend must have a key if it needs one.
    pub fn ensure_credentials(&self, name: &str) -> Result<(), CarltonError> {
        let Some(provider) = Provider::from_name(name) else {
            return Ok(());
        };
        if provider.requires_api_key() && self.provider_config(provider).api_key.is_none() {
            return Err(CarltonError::Config(format!(
                "No API key for {}: set {} or providers.{}.api_key in {}",
                name,
                provider.api_key_env().join(" / "),
                name,
                Self::config_path().display()
            )));
        }
        Ok(())
    }

    pub fn prompt_log_path(&self) -> Option<PathBuf> {
        if !self.log_enabled {
            return None;
        }
        Some(
            self.log_file
                .clone()
                .unwrap_or_else(|| Self::config_dir().join("logs").join("gen_code.log")),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, yaml: &str) -> PathBuf {
        let path = dir.path().join("config.yaml");
        fs::write(&path, yaml).unwrap();
        path
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("nope.yaml")).unwrap();
        assert_eq!(config.active_provider_name(), "openai");
        assert!(config.log_enabled);
        assert!(config.request_timeout().is_none());
        assert!(!dir.path().join("nope.yaml").exists());
    }

    #[test]
    fn parses_yaml_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "active_provider: ollama\n\
             request_timeout_secs: 30\n\
             disabled_commands: [edit]\n\
             providers:\n  ollama:\n    model: codellama\n",
        );
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.active_provider_name(), "ollama");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.disabled_commands, vec!["edit".to_string()]);

        let ollama = config.provider_config(Provider::Ollama);
        assert_eq!(ollama.model.as_deref(), Some("codellama"));
        assert_eq!(ollama.base_url.as_deref(), Some("http://localhost:11434/v1"));
    }

    #[test]
    fn malformed_yaml_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "providers: [not, a, map");
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, CarltonError::Config(_)));
    }

    #[test]
    fn cli_flags_override_file_values() {
        let mut config = Config {
            active_provider: Some("deepseek".to_string()),
            request_timeout_secs: Some(10),
            ..Config::default()
        };
        let args = Args::try_parse_from([
            "carlton",
            "--provider",
            "openrouter",
            "--model",
            "meta-llama/llama-3-70b",
            "--timeout",
            "90",
            "--no-edit",
            "--no-log",
        ])
        .unwrap();

        config.apply_args(&args);

        assert_eq!(config.active_provider_name(), "deepseek");
        assert_eq!(config.request_timeout_secs, Some(90));
        assert_eq!(
            config.provider_config(Provider::OpenRouter).model.as_deref(),
            Some("meta-llama/llama-3-70b")
        );
        assert_eq!(config.disabled_commands, vec!["edit".to_string()]);
        assert!(config.prompt_log_path().is_none());
    }

    #[test]
    fn configured_key_wins_over_environment() {
        let mut config = Config::default();
        config.providers.insert(
            "anthropic".to_string(),
            ProviderConfig {
                api_key: Some("from-file".to_string()),
                ..ProviderConfig::default()
            },
        );
        let resolved = config.provider_config(Provider::Anthropic);
        assert_eq!(resolved.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn provider_names_are_exact() {
        assert_eq!(Provider::from_name("ollama"), Some(Provider::Ollama));
        assert_eq!(Provider::from_name("Ollama"), None);
    }

    #[test]
    fn ollama_passes_credential_check_without_key() {
        assert!(Config::default().ensure_credentials("ollama").is_ok());
    }

    #[test]
    fn ollama_needs_no_key() {
        assert!(!Provider::Ollama.requires_api_key());
        assert!(Provider::ALL
            .iter()
            .filter(|p| **p != Provider::Ollama)
            .all(|p| p.requires_api_key()));
    }
}

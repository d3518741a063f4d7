use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Installs the diagnostic subscriber. `RUST_LOG` wins over `-v`.
pub fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("carlton={}", default_level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Append-only record of every model call.
#[derive(Debug, Clone, Default)]
pub struct PromptLog {
    path: Option<PathBuf>,
}

impl PromptLog {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    #[cfg(test)]
    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Never fails: a broken sink is reported and otherwise ignored.
    pub fn record(&self, prompt: &str, response: &str) {
        let Some(path) = &self.path else {
            return;
        };
        if let Err(e) = Self::append(path, prompt, response) {
            tracing::warn!(path = %path.display(), error = %e, "failed to write prompt log");
        }
    }

    fn append(path: &Path, prompt: &str, response: &str) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        writeln!(file, "{} - Prompt: {}", now, prompt)?;
        writeln!(file, "{} - Response: {}", now, response)?;
        file.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn records_prompt_and_response_with_timestamp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("gen_code.log");
        let log = PromptLog::new(Some(path.clone()));

        log.record("write fizzbuzz", "def fizzbuzz(): ...");
        log.record("second", "again");

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].ends_with(" - Prompt: write fizzbuzz"));
        assert!(lines[1].ends_with(" - Response: def fizzbuzz(): ..."));
        // "YYYY-MM-DD HH:MM:SS - "
        assert_eq!(lines[0].find(" - "), Some(19));
    }

    #[test]
    fn unwritable_sink_is_swallowed() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be opened for appending.
        let log = PromptLog::new(Some(dir.path().to_path_buf()));
        log.record("prompt", "response");
    }

    #[test]
    fn disabled_log_writes_nothing() {
        let log = PromptLog::disabled();
        assert!(log.path().is_none());
        log.record("prompt", "response");
    }
}

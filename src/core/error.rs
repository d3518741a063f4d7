use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for the carlton assistant
#[derive(Error, Debug)]
pub enum CarltonError {
    /// No backend is registered under this name
    #[error("Unknown AI backend: {name}")]
    UnknownBackend { name: String },

    /// The verb is not part of the enabled command set
    #[error("invalid command: {0}")]
    UnknownCommand(String),

    /// A required argument (or the last response) is missing
    #[error("{0}")]
    MissingArgument(String),

    /// The target of `/edit` or `/review` is missing, not a file, or binary
    #[error("Cannot use {}: {reason}", path.display())]
    InvalidEditTarget { path: PathBuf, reason: String },

    /// A file could not be read as text
    #[error("Could not read {}", path.display())]
    FileRead { path: PathBuf },

    /// Writing a file failed; fatal to the current command only
    #[error("Could not write {}: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The language-model service call failed
    #[error("Service call failed: {0}")]
    ServiceCall(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// User input errors
    #[error("Input error: {0}")]
    Input(String),

    /// IO-related errors
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The pending model call was interrupted
    #[error("Request cancelled")]
    Cancelled,

    /// Interrupt or end-of-file while waiting for console input
    #[error("Input closed")]
    InputClosed,
}

impl CarltonError {
    pub fn invalid_target(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        CarltonError::InvalidEditTarget {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn file_write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CarltonError::FileWrite {
            path: path.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for CarltonError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CarltonError::ServiceCall(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            CarltonError::ServiceCall(format!("Connection failed: {}", err))
        } else if err.is_status() {
            CarltonError::ServiceCall(format!("API returned error status: {}", err))
        } else {
            CarltonError::ServiceCall(format!("Request failed: {}", err))
        }
    }
}

impl From<serde_json::Error> for CarltonError {
    fn from(err: serde_json::Error) -> Self {
        CarltonError::Serialization(format!("JSON error: {}", err))
    }
}

impl From<serde_yml::Error> for CarltonError {
    fn from(err: serde_yml::Error) -> Self {
        CarltonError::Serialization(format!("YAML error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_command_message_says_invalid_command() {
        let err = CarltonError::UnknownCommand("/frobnicate".to_string());
        assert_eq!(err.to_string(), "invalid command: /frobnicate");
    }

    #[test]
    fn invalid_target_names_the_path() {
        let err = CarltonError::invalid_target("src/missing.py", "file does not exist");
        assert_eq!(
            err.to_string(),
            "Cannot use src/missing.py: file does not exist"
        );
    }

    #[test]
    fn messages_are_single_line() {
        let errors = [
            CarltonError::UnknownBackend {
                name: "Llama".to_string(),
            },
            CarltonError::MissingArgument("Usage: /save <name>".to_string()),
            CarltonError::file_write(
                "out.txt",
                io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            ),
            CarltonError::Cancelled,
        ];
        for err in errors {
            assert!(!err.to_string().contains('\n'), "{err}");
        }
    }
}

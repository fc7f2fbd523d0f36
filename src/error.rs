// src/error.rs

//! Error types for the debug console.
//!
//! Only genuinely exceptional outcomes live here. Lossy saturation of the
//! line buffer, argument slots, or escape scratch buffer is documented
//! behaviour and never surfaces as an error.

use std::{io, path::PathBuf};

/// Errors produced by the debug console library.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("command '{0}' is already registered")]
    DuplicateCommand(String),

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ConsoleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_command_display() {
        let e = ConsoleError::DuplicateCommand("reboot".into());
        assert_eq!(format!("{e}"), "command 'reboot' is already registered");
    }

    #[test]
    fn config_read_display_names_path() {
        let e = ConsoleError::ConfigRead {
            path: PathBuf::from("/nope/console.json"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        let text = format!("{e}");
        assert!(text.contains("/nope/console.json"));
        assert!(text.contains("missing"));
    }
}

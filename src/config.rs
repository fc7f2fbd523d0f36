// src/config.rs

//! Console configuration.
//!
//! Every field has a default, so a config file only needs to mention what it
//! changes:
//!
//! ```json
//! { "max_line_length": 120, "prompt": "dbg> ", "local_echo": false }
//! ```

use crate::error::{ConsoleError, Result};
use crate::line::{MIN_ARG_COUNT, MIN_LINE_LENGTH};
use crate::term::Mode;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_MAX_LINE_LENGTH: usize = 80;
pub const DEFAULT_MAX_ARG_COUNT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Capacity of the input line in bytes. Values below 16 are raised to 16.
    pub max_line_length: usize,
    /// Maximum number of tokens captured per line, command name included.
    /// Values below 1 are raised to 1.
    pub max_arg_count: usize,
    pub mode: Mode,
    /// Echo accepted input bytes back to the terminal.
    pub local_echo: bool,
    /// Custom prompt. `None` uses the built-in default.
    pub prompt: Option<String>,
    /// Name to register the built-in command list under, if any.
    pub list_command: Option<String>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            max_arg_count: DEFAULT_MAX_ARG_COUNT,
            mode: Mode::Ansi,
            local_echo: true,
            prompt: None,
            list_command: None,
        }
    }
}

impl ConsoleConfig {
    /// Reads a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConsoleError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text)?;
        debug!("loaded console config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        if config.max_line_length < MIN_LINE_LENGTH {
            warn!(
                "max_line_length {} is below the minimum, using {}",
                config.max_line_length, MIN_LINE_LENGTH
            );
        }
        if config.max_arg_count < MIN_ARG_COUNT {
            warn!(
                "max_arg_count {} is below the minimum, using {}",
                config.max_arg_count, MIN_ARG_COUNT
            );
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_object_yields_defaults() {
        let config = ConsoleConfig::from_json("{}").unwrap();
        assert_eq!(config, ConsoleConfig::default());
        assert!(config.local_echo);
        assert_eq!(config.mode, Mode::Ansi);
    }

    #[test]
    fn partial_config_overrides_only_named_fields() {
        let config =
            ConsoleConfig::from_json(r#"{ "prompt": "dbg> ", "local_echo": false }"#).unwrap();
        assert_eq!(config.prompt.as_deref(), Some("dbg> "));
        assert!(!config.local_echo);
        assert_eq!(config.max_line_length, DEFAULT_MAX_LINE_LENGTH);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = ConsoleConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConsoleError::ConfigParse(_)));
    }

    #[test]
    fn load_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "max_arg_count": 4, "list_command": "ls" }}"#).unwrap();
        let config = ConsoleConfig::load(file.path()).unwrap();
        assert_eq!(config.max_arg_count, 4);
        assert_eq!(config.list_command.as_deref(), Some("ls"));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = ConsoleConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConsoleError::ConfigRead { .. }));
    }
}

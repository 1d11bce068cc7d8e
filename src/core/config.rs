//! Terminal configuration
//!
//! Loaded once at startup (TOML file, then environment, then command-line
//! flags) and read-only afterwards. Every section has defaults, so an empty
//! file is a valid config.

use crate::core::error::{Result, TerminalError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding `nlp.mode`
pub const NLP_MODE_ENV: &str = "NLTERM_NLP_MODE";

/// How input is routed between the intent resolver and literal parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NlpMode {
    /// Literal command syntax only (`nlp <phrase>` still works)
    Off,
    /// Try phrases first, fall back to literal syntax on no match
    #[default]
    Optional,
    /// Every input is a phrase; unmatched input is "not understood"
    Only,
}

impl std::str::FromStr for NlpMode {
    type Err = TerminalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "off" => Ok(NlpMode::Off),
            "optional" | "on" => Ok(NlpMode::Optional),
            "only" => Ok(NlpMode::Only),
            other => Err(TerminalError::Config(format!(
                "unknown nlp mode '{}' (expected off, optional or only)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NlpConfig {
    pub mode: NlpMode,

    /// When the first word is a registered command, skip phrase matching
    ///
    /// Keeps literal lines like `echo show files` or `mkdir new folder`
    /// from being captured by a phrase rule. Only applies in `optional` mode.
    pub literal_command_guard: bool,
}

impl Default for NlpConfig {
    fn default() -> Self {
        Self {
            mode: NlpMode::Optional,
            literal_command_guard: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Process rows shown by `top` when `-n` is not given
    pub top_rows: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { top_rows: 10 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` wins when set
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "nlterm=warn".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    pub nlp: NlpConfig,
    pub display: DisplayConfig,
    pub log: LogConfig,
}

impl TerminalConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TerminalError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::parse_toml(&content)
    }

    /// Parse from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: TerminalConfig =
            toml::from_str(content).map_err(|e| TerminalError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `NLTERM_NLP_MODE` if present
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(mode) = std::env::var(NLP_MODE_ENV) {
            self.nlp.mode = mode.parse()?;
        }
        Ok(())
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.display.top_rows == 0 {
            return Err(TerminalError::Config(
                "display.top_rows must be at least 1".into(),
            ));
        }
        if self.log.filter.trim().is_empty() {
            return Err(TerminalError::Config("log.filter must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = TerminalConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.nlp.mode, NlpMode::Optional);
        assert!(config.nlp.literal_command_guard);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = TerminalConfig::parse_toml(
            r#"
            [nlp]
            mode = "only"

            [display]
            top_rows = 25
            "#,
        )
        .unwrap();
        assert_eq!(config.nlp.mode, NlpMode::Only);
        assert!(config.nlp.literal_command_guard);
        assert_eq!(config.display.top_rows, 25);
        assert_eq!(config.log.filter, "nlterm=warn");
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = TerminalConfig::parse_toml("").unwrap();
        assert_eq!(config, TerminalConfig::default());
    }

    #[test]
    fn test_rejects_zero_top_rows() {
        let result = TerminalConfig::parse_toml("[display]\ntop_rows = 0\n");
        assert!(matches!(result, Err(TerminalError::Config(_))));
    }

    #[test]
    fn test_rejects_unknown_mode() {
        let result = TerminalConfig::parse_toml("[nlp]\nmode = \"sometimes\"\n");
        assert!(result.is_err());
        assert!("sometimes".parse::<NlpMode>().is_err());
        assert_eq!("ONLY".parse::<NlpMode>().unwrap(), NlpMode::Only);
    }
}

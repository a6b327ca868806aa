//! Configuration management for dicon
//!
//! dicon runs with built-in defaults. A project can override them with a
//! `dicon.toml` in the working directory, or with a file passed via `--config`
//! (or `DICON_CONFIG`). Command-line flags take precedence over both.
//!
//! # Configuration Priority
//!
//! 1. Command-line flags (`--out`, `--dist`, `--no-format`)
//! 2. The file named by `--config` / `DICON_CONFIG`
//! 3. `./dicon.toml`
//! 4. Default values
//!
//! # File Format
//!
//! Every key is optional:
//!
//! ```toml
//! # Comment marker identifying the container interface
//! annotation = "+DICON"
//!
//! # Output base names, without the .go extension
//! container_out = "dicon_gen"
//! mock_out = "dicon_mock"
//!
//! # Package the mocks are generated into
//! mock_package = "mock"
//!
//! # Formatters tried in order; an empty list writes raw output
//! formatter = ["goimports", "gofmt"]
//! ```

pub mod parser;

pub use parser::parse_config;

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_ANNOTATION, DEFAULT_CONTAINER_OUT, DEFAULT_FORMATTERS, DEFAULT_MOCK_OUT,
    DEFAULT_MOCK_PACKAGE,
};
use crate::core::DiconError;
use crate::generator::GoFormatter;

/// Project level settings read from `dicon.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Comment prefix that marks the container interface
    pub annotation: String,
    /// Base name of the generated container file
    pub container_out: String,
    /// Base name of the generated mock file
    pub mock_out: String,
    /// Package name (and directory) for generated mocks
    pub mock_package: String,
    /// Formatter executables, tried in order
    pub formatter: Vec<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            annotation: DEFAULT_ANNOTATION.to_string(),
            container_out: DEFAULT_CONTAINER_OUT.to_string(),
            mock_out: DEFAULT_MOCK_OUT.to_string(),
            mock_package: DEFAULT_MOCK_PACKAGE.to_string(),
            formatter: DEFAULT_FORMATTERS.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl ProjectConfig {
    /// Load the project configuration.
    ///
    /// With `explicit`, that file must exist. Without it, `dicon.toml` in `dir` is used
    /// when present, and the defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a value fails
    /// [`ProjectConfig::validate`].
    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        let config = match explicit {
            Some(path) => {
                tracing::debug!("loading config from {}", path.display());
                parse_config::<Self>(path)?
            }
            None => {
                let candidate = dir.join(CONFIG_FILE_NAME);
                if candidate.is_file() {
                    tracing::debug!("loading config from {}", candidate.display());
                    parse_config::<Self>(&candidate)?
                } else {
                    tracing::trace!("no {} in {}, using defaults", CONFIG_FILE_NAME, dir.display());
                    Self::default()
                }
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Check that every value can be used to generate code.
    ///
    /// # Errors
    ///
    /// Returns [`DiconError::ConfigError`] naming the first invalid key.
    pub fn validate(&self) -> Result<(), DiconError> {
        let invalid = |message: String| Err(DiconError::ConfigError {
            message,
        });

        if self.annotation.trim().is_empty() {
            return invalid("annotation must not be empty".to_string());
        }
        for (key, value) in [("container_out", &self.container_out), ("mock_out", &self.mock_out)] {
            if let Err(reason) = validate_file_stem(value) {
                return invalid(format!("{key} {reason}"));
            }
        }
        if !is_go_identifier(&self.mock_package) {
            return invalid(format!("mock_package '{}' is not a valid Go package name", self.mock_package));
        }
        Ok(())
    }

    /// The formatter configured by `formatter`.
    #[must_use]
    pub fn go_formatter(&self) -> GoFormatter {
        GoFormatter::new(self.formatter.clone())
    }
}

/// Check an output base name.
///
/// # Errors
///
/// Returns a reason when `stem` is empty, contains a path separator, or already
/// ends in `.go`.
pub fn validate_file_stem(stem: &str) -> Result<(), String> {
    if stem.is_empty() {
        return Err("must not be empty".to_string());
    }
    if stem.contains('/') || stem.contains('\\') {
        return Err(format!("'{stem}' must be a file name, not a path"));
    }
    if stem.ends_with(".go") {
        return Err(format!("'{stem}' must not include the .go extension"));
    }
    Ok(())
}

/// Whether `name` is usable as a Go package name.
#[must_use]
pub fn is_go_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c == '_' || c.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_file() {
        let temp = tempdir().unwrap();
        let config = ProjectConfig::load(None, temp.path()).unwrap();
        assert_eq!(config, ProjectConfig::default());
        assert_eq!(config.annotation, "+DICON");
        assert_eq!(config.formatter, vec!["goimports", "gofmt"]);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp = tempdir().unwrap();
        std::fs::write(
            temp.path().join("dicon.toml"),
            "annotation = \"+WIRE\"\nformatter = []\n",
        )
        .unwrap();

        let config = ProjectConfig::load(None, temp.path()).unwrap();
        assert_eq!(config.annotation, "+WIRE");
        assert!(config.formatter.is_empty());
        assert!(!config.go_formatter().is_enabled());
        assert_eq!(config.container_out, "dicon_gen");
        assert_eq!(config.mock_package, "mock");
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("custom.toml");
        assert!(ProjectConfig::load(Some(&missing), temp.path()).is_err());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("custom.toml");
        std::fs::write(&path, "anotation = \"+DICON\"\n").unwrap();
        assert!(ProjectConfig::load(Some(&path), temp.path()).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = ProjectConfig {
            mock_package: "my-mocks".into(),
            ..ProjectConfig::default()
        };
        assert!(config.validate().unwrap_err().to_string().contains("mock_package"));

        let config = ProjectConfig {
            container_out: "gen/out".into(),
            ..ProjectConfig::default()
        };
        assert!(config.validate().unwrap_err().to_string().contains("container_out"));

        let config = ProjectConfig {
            annotation: "  ".into(),
            ..ProjectConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_is_go_identifier() {
        assert!(is_go_identifier("mock"));
        assert!(is_go_identifier("_internal2"));
        assert!(!is_go_identifier("2mock"));
        assert!(!is_go_identifier(""));
        assert!(!is_go_identifier("my.mock"));
    }
}

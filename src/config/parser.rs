//! TOML configuration parsing.
//!
//! Reads a TOML file and deserializes it into any [`serde::de::DeserializeOwned`]
//! type, attaching the file path to read and parse failures:
//!
//! ```text
//! Failed to parse config file: /path/to/dicon.toml
//! Caused by:
//!     unknown field `anotation`, expected one of ...
//! ```

use anyhow::{Context, Result};
use std::path::Path;

/// Parse a TOML configuration file into the specified type.
///
/// # Examples
///
/// ```rust,no_run
/// use dicon::config::{ProjectConfig, parse_config};
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// let config: ProjectConfig = parse_config(Path::new("dicon.toml"))?;
/// println!("annotation marker: {}", config.annotation);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid TOML, or does not
/// match the shape of `T`.
pub fn parse_config<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: T = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        use tempfile::tempdir;

        let temp = tempdir().unwrap();
        let config_path = temp.path().join("test.toml");

        #[derive(serde::Deserialize)]
        struct TestConfig {
            name: String,
            value: i32,
        }

        std::fs::write(&config_path, "name = \"test\"\nvalue = 42\n").unwrap();

        let config: TestConfig = parse_config(&config_path).unwrap();
        assert_eq!(config.name, "test");
        assert_eq!(config.value, 42);
    }

    #[test]
    fn test_parse_config_error_names_file() {
        use tempfile::tempdir;

        let temp = tempdir().unwrap();
        let config_path = temp.path().join("invalid.toml");
        std::fs::write(&config_path, "invalid = toml {").unwrap();

        #[derive(Debug, serde::Deserialize)]
        struct TestConfig {
            #[allow(dead_code)]
            name: String,
        }

        let err = parse_config::<TestConfig>(&config_path).unwrap_err();
        assert!(err.to_string().contains("invalid.toml"));
    }

    #[test]
    fn test_parse_config_missing_file() {
        let result: Result<toml::Table> = parse_config(Path::new("/nonexistent/dicon.toml"));
        assert!(result.unwrap_err().to_string().contains("Failed to read config file"));
    }
}

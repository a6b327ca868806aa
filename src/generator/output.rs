//! Formatting pass for generated Go source.
//!
//! Generated text is piped through the first available formatter on `PATH`
//! (`goimports` by default, then `gofmt`). `goimports` also drops imports the
//! generated file does not use and adds the ones it can resolve.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;

use crate::constants::FORMATTER_TIMEOUT;
use crate::core::DiconError;

/// Runs an external Go formatter over generated source.
#[derive(Debug, Clone)]
pub struct GoFormatter {
    /// Candidate executables, tried in order
    commands: Vec<String>,
    timeout: Duration,
}

impl GoFormatter {
    /// Create a formatter that tries `commands` in order.
    ///
    /// An empty list disables formatting.
    #[must_use]
    pub fn new(commands: Vec<String>) -> Self {
        Self {
            commands,
            timeout: FORMATTER_TIMEOUT,
        }
    }

    /// A formatter that returns its input unchanged.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(Vec::new())
    }

    /// Whether any formatter is configured.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.commands.is_empty()
    }

    /// The first configured formatter found on `PATH`.
    #[must_use]
    pub fn resolve(&self) -> Option<(String, PathBuf)> {
        self.commands
            .iter()
            .find_map(|name| which::which(name).ok().map(|path| (name.clone(), path)))
    }

    /// Format `source`, which will be written to `target`.
    ///
    /// Returns the input unchanged when formatting is disabled or when none of the
    /// configured formatters is installed.
    ///
    /// # Errors
    ///
    /// Returns [`DiconError::FormatterFailed`] if the formatter exits unsuccessfully
    /// or times out, and [`DiconError::IoError`] if it cannot be spawned.
    pub async fn format(&self, source: &str, target: &Path) -> Result<String, DiconError> {
        if !self.is_enabled() {
            return Ok(source.to_string());
        }

        let Some((name, path)) = self.resolve() else {
            tracing::warn!(
                "none of [{}] found on PATH, output is left unformatted",
                self.commands.join(", ")
            );
            return Ok(source.to_string());
        };

        let mut cmd = Command::new(&path);
        if name == "goimports" {
            if let Some(dir) = target.parent().filter(|d| !d.as_os_str().is_empty()) {
                cmd.arg("-srcdir").arg(dir);
            }
        }
        cmd.stdin(Stdio::piped()).stdout(Stdio::piped()).stderr(Stdio::piped()).kill_on_drop(true);

        tracing::debug!("formatting {} with {}", target.display(), path.display());

        let mut child = cmd.spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(source.as_bytes()).await {
                // the exit status explains why it stopped reading
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(e.into());
                }
            }
            // close stdin so the formatter sees EOF
            drop(stdin);
        }

        let output = match timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(DiconError::FormatterFailed {
                    command: name,
                    stderr: format!("timed out after {} seconds", self.timeout.as_secs()),
                });
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::debug!("{} exited with {:?}", name, output.status.code());
            return Err(DiconError::FormatterFailed {
                command: name,
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for GoFormatter {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_FORMATTERS.iter().map(|s| (*s).to_string()).collect())
    }
}

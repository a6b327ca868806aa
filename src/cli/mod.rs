//! Command-line interface for dicon.
//!
//! Two subcommands share one pipeline: the Go packages named by `--pkg` are read and
//! analyzed, the annotated container interface is located, and a Go file is emitted.
//!
//! - `generate` (alias `g`) - emit the DI container implementation next to the
//!   annotated interface
//! - `generate-mock` (alias `m`) - emit mocks for every component interface into a
//!   separate package
//!
//! # Global Options
//!
//! - `--verbose` - debug logging on stderr
//! - `--quiet` - errors only, no status lines
//! - `--config` - explicit `dicon.toml` (also `DICON_CONFIG`)
//! - `--no-format` - write the generated source without running a formatter
//!
//! # Example
//!
//! ```bash
//! dicon generate --pkg sample,sample2
//! dicon m -p sample -d mock --dry-run
//! ```

pub mod common;
mod generate;
mod generate_mock;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub use common::CommandContext;

/// Runtime options derived from the global flags.
///
/// Kept separate from [`Cli`] so tests and library callers can run a command with
/// explicit settings instead of parsed arguments.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter directive; `None` defers to `RUST_LOG`
    pub log_level: Option<String>,
    /// Explicit configuration file
    pub config_path: Option<PathBuf>,
    /// Skip the formatter
    pub no_format: bool,
    /// Suppress status lines on success
    pub quiet: bool,
}

impl CliConfig {
    /// Configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the global tracing subscriber writing to stderr.
    ///
    /// Later calls are no-ops, so running several commands in one process is fine.
    pub fn init_logging(&self) {
        let filter = match &self.log_level {
            Some(level) => EnvFilter::new(level),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Main CLI structure for dicon.
#[derive(Parser)]
#[command(
    name = "dicon",
    about = "DICONtainer Generator - DI container and mock generator for Go",
    version,
    author,
    long_about = "dicon reads Go packages, finds the interface annotated with +DICON and generates a \
                  lazily wiring DI container for it, or mocks for its components."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output on stderr.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only report errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to a dicon.toml to use instead of ./dicon.toml.
    #[arg(short, long, global = true, env = "DICON_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write generated source as is, without goimports/gofmt.
    #[arg(long, global = true)]
    no_format: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the DI container for the annotated interface.
    ///
    /// See [`generate::GenerateCommand`].
    #[command(visible_alias = "g")]
    Generate(generate::GenerateCommand),

    /// Generate mocks for the components of the annotated interface.
    ///
    /// See [`generate_mock::GenerateMockCommand`].
    #[command(visible_alias = "m")]
    GenerateMock(generate_mock::GenerateMockCommand),
}

impl Cli {
    /// Execute the parsed command line.
    ///
    /// # Errors
    ///
    /// Returns the first error of the run; nothing is written in that case.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Translate the global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            None
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
            no_format: self.no_format,
            quiet: self.quiet,
        }
    }

    /// Execute with explicit runtime options.
    ///
    /// # Errors
    ///
    /// Returns configuration, discovery, resolution, formatting and write errors.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();

        let ctx = CommandContext::load(&config)?;
        match self.command {
            Commands::Generate(cmd) => cmd.execute(&ctx).await,
            Commands::GenerateMock(cmd) => cmd.execute(&ctx).await,
        }
    }
}

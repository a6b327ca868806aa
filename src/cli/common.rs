//! Common utilities for CLI commands

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::CliConfig;
use crate::config::ProjectConfig;
use crate::generator::{GENERATED_HEADER, GoFormatter};
use crate::pipeline::GeneratedFile;
use crate::syntax::{GoAnalyzer, SourceAnalyzer, SourcePackage};

/// Settings shared by every command of one invocation.
#[derive(Debug)]
pub struct CommandContext {
    /// Effective project configuration
    pub config: ProjectConfig,
    /// Formatter applied to generated files
    pub formatter: GoFormatter,
    /// Directory `--pkg` entries are resolved against
    pub project_dir: PathBuf,
    /// Suppress status lines
    pub quiet: bool,
}

impl CommandContext {
    /// Build the context for the current working directory.
    ///
    /// # Errors
    /// Returns an error if the working directory is unavailable or the configuration
    /// file cannot be loaded.
    pub fn load(cli: &CliConfig) -> Result<Self> {
        let project_dir = std::env::current_dir().context("Failed to determine current directory")?;
        Self::for_dir(cli, project_dir)
    }

    /// Build the context for `project_dir`.
    ///
    /// # Errors
    /// Returns an error if the configuration file cannot be loaded.
    pub fn for_dir(cli: &CliConfig, project_dir: PathBuf) -> Result<Self> {
        let config = ProjectConfig::load(cli.config_path.as_deref(), &project_dir)?;
        let formatter = if cli.no_format {
            GoFormatter::disabled()
        } else {
            config.go_formatter()
        };

        Ok(Self {
            config,
            formatter,
            project_dir,
            quiet: cli.quiet,
        })
    }

    /// Read and analyze every package named in `pkg`.
    ///
    /// # Errors
    /// See [`load_packages`].
    pub async fn packages(&self, pkg: &str) -> Result<Vec<SourcePackage>> {
        let dirs = split_packages(pkg);
        if dirs.is_empty() {
            return Err(anyhow::anyhow!("--pkg must name at least one package directory"));
        }
        load_packages(&self.project_dir, &dirs).await
    }

    /// Format `file` and either print it (`dry_run`) or write it below the project
    /// directory.
    ///
    /// # Errors
    /// Returns formatter and file system errors.
    pub async fn emit(&self, file: GeneratedFile, dry_run: bool) -> Result<()> {
        let target = self.project_dir.join(&file.path);
        let source = self.formatter.format(&file.source, &target).await?;

        if dry_run {
            print!("{source}");
            return Ok(());
        }

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        tokio::fs::write(&target, source)
            .await
            .with_context(|| format!("Failed to write file: {}", target.display()))?;
        info!("wrote {}", target.display());

        if !self.quiet {
            println!("{} {} (package {})", "✓ Generated".green(), file.path.display(), file.package.cyan());
        }
        Ok(())
    }
}

/// Split a comma separated `--pkg` value, dropping blank entries.
#[must_use]
pub fn split_packages(pkg: &str) -> Vec<String> {
    pkg.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect()
}

/// Read the Go files of every directory in `dirs`, relative to `root`.
///
/// Files ending in `_test.go` and files previously generated by dicon are skipped.
/// Files are analyzed in name order so results do not depend on directory listing
/// order.
///
/// # Errors
/// Returns an error if a directory or file cannot be read, or a file fails to parse.
pub async fn load_packages(root: &Path, dirs: &[String]) -> Result<Vec<SourcePackage>> {
    let analyzer = GoAnalyzer::new();
    let mut packages = Vec::with_capacity(dirs.len());

    for dir in dirs {
        let relative = PathBuf::from(dir);
        let path = root.join(&relative);
        let mut entries = tokio::fs::read_dir(&path)
            .await
            .with_context(|| format!("Failed to read package directory: {}", path.display()))?;

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_go_source(&name) && entry.file_type().await?.is_file() {
                names.push(name);
            }
        }
        names.sort();

        let mut files = Vec::with_capacity(names.len());
        for name in names {
            let source = tokio::fs::read_to_string(path.join(&name))
                .await
                .with_context(|| format!("Failed to read file: {}", path.join(&name).display()))?;
            if source.starts_with(GENERATED_HEADER) {
                debug!("skipping generated file {}", relative.join(&name).display());
                continue;
            }
            files.push(analyzer.analyze(&relative.join(&name), &source)?);
        }

        if files.is_empty() {
            warn!("no Go sources in {}", path.display());
        }
        debug!("analyzed {} files in {}", files.len(), relative.display());
        packages.push(SourcePackage {
            dir: relative,
            files,
        });
    }

    Ok(packages)
}

fn is_go_source(name: &str) -> bool {
    name.ends_with(".go") && !name.ends_with("_test.go")
}

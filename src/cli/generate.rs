//! Generate the DI container for the annotated interface.
//!
//! # Examples
//!
//! ```bash
//! # Container for the interface in ./di, constructors spread over two packages
//! dicon generate --pkg di,infra
//!
//! # Print instead of writing di/dicon_gen.go
//! dicon g -p di --dry-run
//! ```

use anyhow::Result;
use clap::Args;
use tracing::debug;

use super::common::CommandContext;
use crate::config::validate_file_stem;
use crate::core::DiconError;
use crate::pipeline::generate_container;

/// Command to generate the DI container.
#[derive(Args)]
pub struct GenerateCommand {
    /// Comma separated package directories to scan.
    ///
    /// The annotated interface and every `New<Component>` constructor must be
    /// declared in one of these packages.
    #[arg(short, long, value_name = "DIRS")]
    pkg: String,

    /// Output file name without `.go`, written next to the annotated interface.
    #[arg(short, long, value_name = "NAME")]
    out: Option<String>,

    /// Print the generated source instead of writing it.
    #[arg(long)]
    dry_run: bool,
}

impl GenerateCommand {
    /// Execute the generate command.
    ///
    /// # Errors
    /// Returns an error if the packages cannot be read, the container cannot be wired,
    /// or the output cannot be formatted or written.
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let out = self.out.unwrap_or_else(|| ctx.config.container_out.clone());
        validate_file_stem(&out).map_err(|reason| DiconError::ConfigError {
            message: format!("--out {reason}"),
        })?;

        let packages = ctx.packages(&self.pkg).await?;
        debug!("scanning {} packages for {}", packages.len(), ctx.config.annotation);

        let file = generate_container(&packages, &ctx.config.annotation, &out)?;
        ctx.emit(file, self.dry_run).await
    }
}

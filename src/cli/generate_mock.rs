//! Generate mocks for the components of the annotated interface.
//!
//! Every container method `X() (X, error)` names a component; the interface `X`
//! declared in the scanned packages gets an `XMock` with one function field per
//! method.
//!
//! ```bash
//! dicon generate-mock --pkg di --dist mock
//! dicon m -p di -d internal/fakes -o fakes_gen
//! ```

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::common::CommandContext;
use crate::config::validate_file_stem;
use crate::core::DiconError;
use crate::pipeline::generate_mocks;

/// Command to generate component mocks.
#[derive(Args)]
pub struct GenerateMockCommand {
    /// Comma separated package directories to scan.
    #[arg(short, long, value_name = "DIRS")]
    pkg: String,

    /// Output file name without `.go`.
    #[arg(short, long, value_name = "NAME")]
    out: Option<String>,

    /// Destination directory; its last component is the package name.
    #[arg(short, long, value_name = "DIR")]
    dist: Option<PathBuf>,

    /// Print the generated source instead of writing it.
    #[arg(long)]
    dry_run: bool,
}

impl GenerateMockCommand {
    /// Execute the generate-mock command.
    ///
    /// # Errors
    /// Returns an error if the packages cannot be read, a component signature cannot
    /// be rendered, or the output cannot be formatted or written.
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let out = self.out.unwrap_or_else(|| ctx.config.mock_out.clone());
        validate_file_stem(&out).map_err(|reason| DiconError::ConfigError {
            message: format!("--out {reason}"),
        })?;
        let dist = self.dist.unwrap_or_else(|| PathBuf::from(&ctx.config.mock_package));

        let packages = ctx.packages(&self.pkg).await?;
        let file = generate_mocks(&packages, &ctx.config.annotation, &dist, &out)?;
        ctx.emit(file, self.dry_run).await
    }
}

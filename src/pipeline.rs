//! Generation runs.
//!
//! Each run works on freshly analyzed packages and is purely computational:
//!
//! - container: find the annotated interface, match constructors, check that every
//!   argument names a component, reject cycles, emit
//! - mocks: find the annotated interface, collect the interfaces named after its
//!   components, emit into the destination package
//!
//! Reading sources and writing the result are left to the caller.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::is_go_identifier;
use crate::core::DiconError;
use crate::generator::{ContainerGenerator, MockGenerator};
use crate::resolver::{check_arguments, detect_cycles};
use crate::scanner::{MatchReport, find_annotated, find_dependency_interfaces, match_constructors};
use crate::syntax::SourcePackage;

/// A generated Go file, not yet formatted or written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Package clause of the generated source
    pub package: String,
    /// Destination path
    pub path: PathBuf,
    /// Unformatted source text
    pub source: String,
}

/// Generate the DI container for the interface annotated with `annotation`.
///
/// The file is placed next to the annotated interface as `<out>.go`.
///
/// # Errors
///
/// Any discovery, resolution or rendering error; see [`DiconError`].
pub fn generate_container(
    packages: &[SourcePackage],
    annotation: &str,
    out: &str,
) -> Result<GeneratedFile, DiconError> {
    let container = find_annotated(packages, annotation)?;
    info!("generating container for {}.{}", container.package, container.name);

    let report = match_constructors(packages, &container);
    ensure_complete(&report)?;
    check_arguments(&report.constructors)?;
    detect_cycles(&report.constructors)?;

    let source = ContainerGenerator::new().generate(&container, &report.constructors)?;
    let dir = container.file.parent().unwrap_or_else(|| Path::new("."));

    Ok(GeneratedFile {
        package: container.package.clone(),
        path: dir.join(format!("{out}.go")),
        source,
    })
}

/// Generate mocks for every component interface of the annotated container.
///
/// The file is placed at `<dist>/<out>.go` and declares the package named by the
/// last component of `dist`.
///
/// # Errors
///
/// [`DiconError::ConfigError`] if `dist` does not end in a valid package name, and
/// any discovery or rendering error; see [`DiconError`].
pub fn generate_mocks(
    packages: &[SourcePackage],
    annotation: &str,
    dist: &Path,
    out: &str,
) -> Result<GeneratedFile, DiconError> {
    let package = dist
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| is_go_identifier(name))
        .ok_or_else(|| DiconError::ConfigError {
            message: format!("'{}' does not end in a valid Go package name", dist.display()),
        })?;

    let container = find_annotated(packages, annotation)?;
    let components = container.method_names();

    let targets = find_dependency_interfaces(packages, &components);
    info!("generating {} mocks into package {}", targets.len(), package);
    for missing in components.iter().filter(|c| !targets.iter().any(|t| t.name == **c)) {
        debug!("no interface named {} in the scanned packages, not mocked", missing);
    }

    let source = MockGenerator::new(package).generate(&targets)?;

    Ok(GeneratedFile {
        package: package.to_string(),
        path: dist.join(format!("{out}.go")),
        source,
    })
}

fn ensure_complete(report: &MatchReport) -> Result<(), DiconError> {
    if report.is_complete() {
        return Ok(());
    }
    let component = &report.unresolved[0];

    let wanted = format!("New{component}");
    let rejected = report.rejected.iter().find(|err| {
        matches!(err, DiconError::InvalidConstructorShape { constructor, .. } if *constructor == wanted)
    });
    let reason = match rejected {
        Some(err) => format!("{wanted} was skipped: {err}"),
        None => format!("no constructor {wanted} returning {component} found"),
    };

    Err(DiconError::UnresolvedDependency {
        component: component.clone(),
        reason,
    })
}

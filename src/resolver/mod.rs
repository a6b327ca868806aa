//! Dependency resolution for matched constructors.
//!
//! The container resolves components lazily and recursively at runtime, so the only
//! thing checked at generation time is that the wiring terminates: every argument
//! must name a component, and the induced graph must be acyclic.

pub mod dependency_graph;

pub use dependency_graph::DependencyGraph;

use crate::core::DiconError;
use crate::model::FuncType;
use std::collections::HashSet;
use tracing::debug;

/// Check that every constructor argument names a wired component.
///
/// # Errors
///
/// Returns [`DiconError::UnresolvedDependency`] for the first argument that is not a
/// named type or whose name has no constructor.
pub fn check_arguments(constructors: &[FuncType]) -> Result<(), DiconError> {
    let components: HashSet<&str> = constructors.iter().filter_map(FuncType::component_name).collect();

    for constructor in constructors {
        let component = constructor.component_name().unwrap_or(constructor.name.as_str());
        for argument in &constructor.argument_types {
            match argument.simple_name() {
                Some(name) if components.contains(name) => {}
                Some(name) => {
                    return Err(DiconError::UnresolvedDependency {
                        component: component.to_string(),
                        reason: format!(
                            "{} takes '{}' but no container method provides {}",
                            constructor.name, argument, name
                        ),
                    });
                }
                None => {
                    return Err(DiconError::UnresolvedDependency {
                        component: component.to_string(),
                        reason: format!(
                            "{} takes '{}', which is not a component interface",
                            constructor.name, argument
                        ),
                    });
                }
            }
        }
    }
    Ok(())
}

/// Verify that the constructors do not depend on each other in a loop.
///
/// # Errors
///
/// Returns [`DiconError::CyclicDependency`] with the offending path.
pub fn detect_cycles(constructors: &[FuncType]) -> Result<(), DiconError> {
    let graph = DependencyGraph::from_constructors(constructors);
    graph.detect_cycles()?;
    debug!("{} components wired without cycles", constructors.len());
    Ok(())
}

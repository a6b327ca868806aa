//! DI container emitter.
//!
//! The generated container keeps every constructed component in a
//! `map[string]interface{}` keyed by component name. Each accessor returns the cached
//! instance if there is one, otherwise resolves the constructor's arguments through
//! the other accessors, builds the component and caches it. Resolution is lazy and
//! recursive, so accessors are emitted in container method order.

use super::{SourceBuffer, import, import_groups, used_imports};
use crate::core::DiconError;
use crate::model::{FuncType, InterfaceType};
use std::collections::BTreeSet;
use tracing::debug;

/// Import path of the error wrapping package used by generated accessors.
pub const ERRORS_PACKAGE: &str = "github.com/pkg/errors";

/// Name of the generated container struct.
const CONTAINER_STRUCT: &str = "dicontainer";

/// Emits the container implementation for an annotated interface.
#[derive(Debug, Default)]
pub struct ContainerGenerator {
    buf: SourceBuffer,
}

impl ContainerGenerator {
    /// Create a generator with an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate the container source for `container`, wiring `constructors`.
    ///
    /// The output lives in the container interface's package.
    ///
    /// # Errors
    ///
    /// - [`DiconError::InvalidMethodSignature`] if a container method is not
    ///   `Name() (T, error)`
    /// - [`DiconError::UnresolvedDependency`] if a constructor has no matching method
    ///   or takes an argument that is not a named type
    /// - [`DiconError::UnsupportedTypeExpression`] if a return type cannot be rendered
    pub fn generate(
        mut self,
        container: &InterfaceType,
        constructors: &[FuncType],
    ) -> Result<String, DiconError> {
        for method in &container.methods {
            validate_method(container, method)?;
        }

        let package = container.package.as_str();
        self.buf.header(package);

        let mut qualifiers = BTreeSet::new();
        for method in &container.methods {
            method.return_types[0].qualifiers(package, &mut qualifiers);
        }
        for constructor in constructors.iter().filter(|c| c.package != package) {
            qualifiers.insert(constructor.package.as_str());
        }
        let mut imports = used_imports(&container.imports, &qualifiers);
        imports.extend([import("fmt"), import(ERRORS_PACKAGE)]);
        self.buf.imports(&import_groups(imports));

        self.struct_defs(container);
        for constructor in constructors {
            self.accessor(container, constructor)?;
        }

        debug!("generated {} accessors for {}", constructors.len(), container.name);
        Ok(self.buf.into_string())
    }

    fn struct_defs(&mut self, container: &InterfaceType) {
        let buf = &mut self.buf;
        buf.open(format!("type {CONTAINER_STRUCT} struct {{"));
        buf.line("store map[string]interface{}");
        buf.close("}");
        buf.blank();
        buf.open(format!("func NewDIContainer() {} {{", container.name));
        buf.open(format!("return &{CONTAINER_STRUCT}{{"));
        buf.line("store: map[string]interface{}{},");
        buf.close("}");
        buf.close("}");
    }

    fn accessor(&mut self, container: &InterfaceType, constructor: &FuncType) -> Result<(), DiconError> {
        let package = container.package.as_str();
        let component = constructor.component_name().unwrap_or(constructor.name.as_str());
        let method = container.methods.iter().find(|m| m.name == component).ok_or_else(|| {
            DiconError::UnresolvedDependency {
                component: component.to_string(),
                reason: format!("{} is not a method of {}", component, container.name),
            }
        })?;
        let return_type = method.return_types[0].render(package)?;

        let buf = &mut self.buf;
        buf.blank();
        buf.open(format!("func (d *{CONTAINER_STRUCT}) {component}() ({return_type}, error) {{"));

        buf.open(format!("if i, ok := d.store[\"{component}\"]; ok {{"));
        buf.line(format!("instance, ok := i.({return_type})"));
        buf.open("if !ok {");
        buf.line("return nil, fmt.Errorf(\"invalid instance is cached %v\", instance)");
        buf.close("}");
        buf.line("return instance, nil");
        buf.close("}");

        let mut deps = Vec::with_capacity(constructor.argument_types.len());
        for (i, argument) in constructor.argument_types.iter().enumerate() {
            let dependency = argument.simple_name().ok_or_else(|| DiconError::UnresolvedDependency {
                component: component.to_string(),
                reason: format!("{} takes '{}', which is not a component interface", constructor.name, argument),
            })?;
            buf.line(format!("dep{i}, err := d.{dependency}()"));
            buf.open("if err != nil {");
            buf.line(format!("return nil, errors.Wrap(err, \"resolve {dependency} failed at DICON\")"));
            buf.close("}");
            deps.push(format!("dep{i}"));
        }

        let qualifier =
            if constructor.package == package { String::new() } else { format!("{}.", constructor.package) };
        let call = format!("{qualifier}{}({})", constructor.name, deps.join(", "));
        if constructor.returns_error() {
            buf.line(format!("instance, err := {call}"));
            buf.open("if err != nil {");
            buf.line(format!("return nil, errors.Wrap(err, \"creation {component} failed at DICON\")"));
            buf.close("}");
        } else {
            buf.line(format!("instance := {call}"));
        }
        buf.line(format!("d.store[\"{component}\"] = instance"));
        buf.line("return instance, nil");
        buf.close("}");

        Ok(())
    }
}

fn validate_method(container: &InterfaceType, method: &FuncType) -> Result<(), DiconError> {
    let invalid = |reason: String| DiconError::InvalidMethodSignature {
        interface: container.name.clone(),
        method: method.name.clone(),
        reason,
    };

    if !method.argument_types.is_empty() {
        return Err(invalid(format!("must not take arguments, found {}", method.argument_types.len())));
    }
    if !method.returns_error() {
        let found: Vec<String> = method.return_types.iter().map(ToString::to_string).collect();
        return Err(invalid(format!("must return (instance, error) but returns ({})", found.join(", "))));
    }
    Ok(())
}

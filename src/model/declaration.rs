//! Declarations discovered in the scanned packages.

use super::TypeExpr;
use crate::syntax::{ImportSpec, MethodSpec};
use std::path::PathBuf;

/// An import declared by a scanned file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Package {
    /// Explicit import name, if any
    pub name: Option<String>,
    /// Unquoted import path
    pub path: String,
}

impl Package {
    /// The import spec as written inside an `import ( ... )` block.
    #[must_use]
    pub fn import_line(&self) -> String {
        match &self.name {
            Some(name) => format!("{name} \"{}\"", self.path),
            None => format!("\"{}\"", self.path),
        }
    }

    /// The identifier source files use to refer to this import.
    ///
    /// Without an explicit name this is the last path element, skipping a trailing
    /// major version (`example.com/x/v2`) and dropping a `.vN` suffix (`gopkg.in/yaml.v3`).
    #[must_use]
    pub fn selector(&self) -> &str {
        if let Some(name) = &self.name {
            return name;
        }
        let mut elements = self.path.rsplit('/');
        let mut last = elements.next().unwrap_or(&self.path);
        if is_major_version(last) {
            last = elements.next().unwrap_or(last);
        }
        match last.rsplit_once('.') {
            Some((stem, version)) if is_major_version(version) => stem,
            _ => last,
        }
    }

    /// Whether this is the standard library: no dot in the first path element.
    #[must_use]
    pub fn is_standard(&self) -> bool {
        !self.path.split('/').next().unwrap_or_default().contains('.')
    }
}

fn is_major_version(element: &str) -> bool {
    element
        .strip_prefix('v')
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

impl From<&ImportSpec> for Package {
    fn from(spec: &ImportSpec) -> Self {
        Self {
            name: spec.alias.clone(),
            path: spec.path.clone(),
        }
    }
}

/// A function signature: an interface method or a `New<Name>` constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncType {
    /// Function or method name
    pub name: String,
    /// Package the signature is declared in
    pub package: String,
    /// One entry per parameter value, variadic last parameter as [`TypeExpr::Variadic`]
    pub argument_types: Vec<TypeExpr>,
    /// One entry per result value
    pub return_types: Vec<TypeExpr>,
}

impl FuncType {
    /// Build from an interface method element.
    #[must_use]
    pub fn from_method(package: &str, method: &MethodSpec) -> Self {
        Self {
            name: method.name.clone(),
            package: package.to_string(),
            argument_types: TypeExpr::flatten(package, &method.params),
            return_types: TypeExpr::flatten(package, &method.results),
        }
    }

    /// Name of the component this signature produces: the simple name of its first result.
    #[must_use]
    pub fn component_name(&self) -> Option<&str> {
        self.return_types.first().and_then(TypeExpr::simple_name)
    }

    /// Whether the signature is `(T, error)`.
    #[must_use]
    pub fn returns_error(&self) -> bool {
        self.return_types.len() == 2 && self.return_types[1].is_error()
    }
}

/// An interface type declaration together with the imports of its file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceType {
    /// Package the interface is declared in
    pub package: String,
    /// Interface name
    pub name: String,
    /// Leading comment lines
    pub comments: Vec<String>,
    /// Methods in declaration order
    pub methods: Vec<FuncType>,
    /// Imports of the declaring file
    pub imports: Vec<Package>,
    /// File the interface is declared in
    pub file: PathBuf,
}

impl InterfaceType {
    /// Method names in declaration order.
    #[must_use]
    pub fn method_names(&self) -> Vec<&str> {
        self.methods.iter().map(|m| m.name.as_str()).collect()
    }
}

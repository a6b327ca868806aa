//! Syntax trees handed from the Go source analyzer to the generator.
//!
//! The generator never looks at raw Go text. A [`SourceAnalyzer`] turns each file into
//! a [`SourceFile`] that exposes only what dicon consumes:
//! - the package clause and import declarations
//! - top-level type declarations with their leading comment group, and the method
//!   lists of interface types
//! - top-level function declarations with their parameter and result lists
//!
//! Type references stay purely syntactic here ([`TypeNode`]); they are tagged with
//! their declaring package when lifted into the model (see
//! [`crate::model::TypeExpr::capture`]).

pub mod go;

pub use go::GoAnalyzer;

use crate::core::DiconError;
use std::path::{Path, PathBuf};

/// Direction of a Go channel type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChanDir {
    /// `chan T`
    Both,
    /// `chan<- T`
    Send,
    /// `<-chan T`
    Recv,
}

/// A type reference as written in source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeNode {
    /// `Name`
    Name(String),
    /// `pkg.Name`
    Qualified {
        /// Selector before the dot
        package: String,
        /// Type name after the dot
        name: String,
    },
    /// `*T`
    Pointer(Box<TypeNode>),
    /// `[]T`
    Slice(Box<TypeNode>),
    /// `map[K]V`
    Map {
        /// Key type
        key: Box<TypeNode>,
        /// Value type
        value: Box<TypeNode>,
    },
    /// `chan T`, `chan<- T`, `<-chan T`
    Channel {
        /// Channel direction
        dir: ChanDir,
        /// Element type
        value: Box<TypeNode>,
    },
    /// `func(params) results`
    Function {
        /// Parameter fields
        params: Vec<Field>,
        /// Result fields
        results: Vec<Field>,
    },
    /// `interface{}`
    EmptyInterface,
    /// `struct{}`
    EmptyStruct,
    /// Anything else, kept verbatim (arrays, generics, non-empty literals, ...)
    Other(String),
}

/// One entry of a parameter or result list.
///
/// `a, b int` is a single field with two names; `int` alone has none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Names bound by this entry
    pub names: Vec<String>,
    /// Declared type
    pub ty: TypeNode,
    /// Whether this is a `...T` parameter
    pub variadic: bool,
}

impl Field {
    /// Number of values this field contributes to a flattened signature.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.names.len().max(1)
    }
}

/// An `import` spec.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImportSpec {
    /// Explicit import name (`alias`, `_` or `.`), if any
    pub alias: Option<String>,
    /// Import path without quotes
    pub path: String,
}

/// A method element inside an interface type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSpec {
    /// Method name
    pub name: String,
    /// Parameter list
    pub params: Vec<Field>,
    /// Result list
    pub results: Vec<Field>,
}

/// The right-hand side of a type spec, as far as dicon cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSpecKind {
    /// An interface type with its methods (embedded elements are dropped)
    Interface(Vec<MethodSpec>),
    /// Any other type definition
    Other,
}

/// One `Name <type>` spec of a type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    /// Declared type name
    pub name: String,
    /// Definition
    pub kind: TypeSpecKind,
}

/// A top-level `type` declaration, possibly grouped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    /// Lines of the leading comment group, comment markers stripped
    pub doc: Vec<String>,
    /// Specs in declaration order
    pub specs: Vec<TypeSpec>,
}

/// A top-level function declaration (methods with receivers are not included).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    /// Function name
    pub name: String,
    /// Parameter list
    pub params: Vec<Field>,
    /// Result list
    pub results: Vec<Field>,
}

/// One analyzed Go file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path the file was read from
    pub path: PathBuf,
    /// Name from the package clause
    pub package: String,
    /// Import specs in source order
    pub imports: Vec<ImportSpec>,
    /// Type declarations in source order
    pub type_decls: Vec<TypeDecl>,
    /// Function declarations in source order
    pub func_decls: Vec<FuncDecl>,
}

/// The files of one package directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePackage {
    /// Directory the package was read from
    pub dir: PathBuf,
    /// Analyzed files, sorted by path
    pub files: Vec<SourceFile>,
}

/// Turns Go source text into a [`SourceFile`].
pub trait SourceAnalyzer {
    /// Analyze `source`, which was read from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DiconError::AnalyzeError`] when the source has syntax errors.
    fn analyze(&self, path: &Path, source: &str) -> Result<SourceFile, DiconError>;
}

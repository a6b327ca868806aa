//! Package-aware type expressions.
//!
//! A [`TypeExpr`] is a Go type reference lifted out of the syntax tree and tagged with
//! the package it was written in. Rendering it into another package decides, for every
//! named leaf, whether a qualifier is needed and which one:
//!
//! | declared in | selector  | rendered into | output        |
//! |-------------|-----------|---------------|---------------|
//! | `pack`      | none      | `pack`        | `Sample`      |
//! | `pack`      | none      | `test`        | `pack.Sample` |
//! | `pack`      | `other`   | `test`        | `other.Sample`|
//! | any         | `test`    | `test`        | `Sample`      |
//! | any         | any       | any           | `string` (lowercase names are built-ins) |

use crate::core::DiconError;
use crate::syntax::{ChanDir, Field, TypeNode};
use std::collections::BTreeSet;
use std::fmt;

/// A type reference tagged with its declaring package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// A named type, optionally written with a package selector.
    Named {
        /// Package whose source contains this reference
        declared: String,
        /// `pkg` in `pkg.Name`, if written
        selector: Option<String>,
        /// Type name
        name: String,
    },
    /// `*T`
    Pointer(Box<TypeExpr>),
    /// `[]T`
    Slice(Box<TypeExpr>),
    /// `map[K]V`
    Map {
        /// Key type
        key: Box<TypeExpr>,
        /// Value type
        value: Box<TypeExpr>,
    },
    /// `chan T`, `chan<- T`, `<-chan T`
    Channel {
        /// Channel direction
        dir: ChanDir,
        /// Element type
        value: Box<TypeExpr>,
    },
    /// `func(...) ...`
    Function {
        /// Parameter positions
        params: Vec<Param>,
        /// Result types, one per returned value
        results: Vec<TypeExpr>,
    },
    /// `...T`, only valid as the last parameter
    Variadic(Box<TypeExpr>),
    /// `interface{}`
    Interface,
    /// `struct{}`
    Struct,
    /// A shape that cannot be rendered, kept as written
    Unsupported(String),
}

/// One parameter position of a function type.
///
/// `func(a, b int)` has a single position binding two names, rendered as
/// `a00 int, a01 int`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Number of names bound at this position (at least 1)
    pub arity: usize,
    /// Parameter type
    pub ty: TypeExpr,
}

impl TypeExpr {
    /// Lift a syntactic type written in `package`.
    #[must_use]
    pub fn capture(package: &str, node: &TypeNode) -> Self {
        let boxed = |inner: &TypeNode| Box::new(Self::capture(package, inner));

        match node {
            TypeNode::Name(name) => Self::Named {
                declared: package.to_string(),
                selector: None,
                name: name.clone(),
            },
            TypeNode::Qualified {
                package: selector,
                name,
            } => Self::Named {
                declared: package.to_string(),
                selector: Some(selector.clone()),
                name: name.clone(),
            },
            TypeNode::Pointer(inner) => Self::Pointer(boxed(inner)),
            TypeNode::Slice(inner) => Self::Slice(boxed(inner)),
            TypeNode::Map {
                key,
                value,
            } => Self::Map {
                key: boxed(key),
                value: boxed(value),
            },
            TypeNode::Channel {
                dir,
                value,
            } => Self::Channel {
                dir: *dir,
                value: boxed(value),
            },
            TypeNode::Function {
                params,
                results,
            } => Self::Function {
                params: params
                    .iter()
                    .map(|field| Param {
                        arity: field.arity(),
                        ty: Self::capture_field(package, field),
                    })
                    .collect(),
                results: Self::flatten(package, results),
            },
            TypeNode::EmptyInterface => Self::Interface,
            TypeNode::EmptyStruct => Self::Struct,
            TypeNode::Other(text) => Self::Unsupported(text.clone()),
        }
    }

    /// Lift the type of a parameter field, wrapping variadic fields in [`TypeExpr::Variadic`].
    #[must_use]
    pub fn capture_field(package: &str, field: &Field) -> Self {
        let ty = Self::capture(package, &field.ty);
        if field.variadic { Self::Variadic(Box::new(ty)) } else { ty }
    }

    /// Lift a parameter or result list into one type per bound value.
    ///
    /// `(a, b int, c string)` becomes `[int, int, string]`.
    #[must_use]
    pub fn flatten(package: &str, fields: &[Field]) -> Vec<Self> {
        fields
            .iter()
            .flat_map(|field| {
                let ty = Self::capture_field(package, field);
                std::iter::repeat_n(ty, field.arity())
            })
            .collect()
    }

    /// Render this expression as it must be written inside package `into`.
    ///
    /// # Errors
    ///
    /// Returns [`DiconError::UnsupportedTypeExpression`] if the expression contains a
    /// shape the renderer does not support (arrays, generic instantiations, non-empty
    /// interface or struct literals).
    pub fn render(&self, into: &str) -> Result<String, DiconError> {
        let mut out = String::new();
        self.write(Some(into), &mut out).map_err(|expr| DiconError::UnsupportedTypeExpression {
            expr,
        })?;
        Ok(out)
    }

    /// The bare type name of a named expression (`pkg.Name` and `Name` both give `Name`).
    #[must_use]
    pub fn simple_name(&self) -> Option<&str> {
        match self {
            Self::Named {
                name,
                ..
            } => Some(name),
            _ => None,
        }
    }

    /// Whether this is the built-in `error` type.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Named { selector: None, name, .. } if name == "error")
    }

    /// Whether this is a `...T` parameter.
    #[must_use]
    pub const fn is_variadic(&self) -> bool {
        matches!(self, Self::Variadic(_))
    }

    /// Record every package qualifier this expression needs when written inside `into`.
    pub fn qualifiers<'a>(&'a self, into: &str, out: &mut BTreeSet<&'a str>) {
        match self {
            Self::Named {
                declared,
                selector,
                name,
            } => {
                if is_primitive(name) {
                    return;
                }
                if let Some(qualifier) = relative_selector(declared, into, selector.as_deref()) {
                    out.insert(qualifier);
                }
            }
            Self::Pointer(inner) | Self::Slice(inner) | Self::Variadic(inner) => inner.qualifiers(into, out),
            Self::Map {
                key,
                value,
            } => {
                key.qualifiers(into, out);
                value.qualifiers(into, out);
            }
            Self::Channel {
                value,
                ..
            } => value.qualifiers(into, out),
            Self::Function {
                params,
                results,
            } => {
                for param in params {
                    param.ty.qualifiers(into, out);
                }
                for result in results {
                    result.qualifiers(into, out);
                }
            }
            Self::Interface | Self::Struct | Self::Unsupported(_) => {}
        }
    }

    /// `into == None` writes the expression as it appeared in source.
    fn write(&self, into: Option<&str>, out: &mut String) -> Result<(), String> {
        match self {
            Self::Named {
                declared,
                selector,
                name,
            } => {
                let qualifier = match into {
                    _ if is_primitive(name) => None,
                    Some(into) => relative_selector(declared, into, selector.as_deref()),
                    None => selector.as_deref(),
                };
                if let Some(qualifier) = qualifier {
                    out.push_str(qualifier);
                    out.push('.');
                }
                out.push_str(name);
            }
            Self::Pointer(inner) => {
                out.push('*');
                inner.write(into, out)?;
            }
            Self::Slice(inner) => {
                out.push_str("[]");
                inner.write(into, out)?;
            }
            Self::Map {
                key,
                value,
            } => {
                out.push_str("map[");
                key.write(into, out)?;
                out.push(']');
                value.write(into, out)?;
            }
            Self::Channel {
                dir,
                value,
            } => {
                out.push_str(match dir {
                    ChanDir::Both => "chan ",
                    ChanDir::Send => "chan<- ",
                    ChanDir::Recv => "<-chan ",
                });
                // `chan <-chan T` would read as `chan<- (chan T)`
                let grouped = *dir == ChanDir::Both
                    && matches!(**value, Self::Channel { dir: ChanDir::Recv, .. });
                if grouped {
                    out.push('(');
                }
                value.write(into, out)?;
                if grouped {
                    out.push(')');
                }
            }
            Self::Function {
                params,
                results,
            } => {
                out.push_str("func(");
                let mut first = true;
                for (i, param) in params.iter().enumerate() {
                    let mut ty = String::new();
                    param.ty.write(into, &mut ty)?;
                    for j in 0..param.arity {
                        if !first {
                            out.push_str(", ");
                        }
                        first = false;
                        if param.arity == 1 {
                            out.push_str(&format!("a{i} {ty}"));
                        } else {
                            out.push_str(&format!("a{i}{j} {ty}"));
                        }
                    }
                }
                out.push_str(") ");

                let rendered = results
                    .iter()
                    .map(|r| {
                        let mut s = String::new();
                        r.write(into, &mut s).map(|()| s)
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                if rendered.len() == 1 {
                    out.push_str(&rendered[0]);
                } else {
                    out.push('(');
                    out.push_str(&rendered.join(", "));
                    out.push(')');
                }
            }
            Self::Variadic(inner) => {
                out.push_str("...");
                inner.write(into, out)?;
            }
            Self::Interface => out.push_str("interface{}"),
            Self::Struct => out.push_str("struct{}"),
            Self::Unsupported(text) => {
                if into.is_some() {
                    return Err(text.clone());
                }
                out.push_str(text);
            }
        }
        Ok(())
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        // source form never fails
        let _ = self.write(None, &mut out);
        f.write_str(&out)
    }
}

/// Built-in Go types are the only lowercase type names dicon expects to see.
#[must_use]
pub fn is_primitive(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_lowercase())
}

/// Pick the qualifier for a named type declared in `declared` and rendered into `current`.
#[must_use]
pub fn relative_selector<'a>(
    declared: &'a str,
    current: &str,
    selector: Option<&'a str>,
) -> Option<&'a str> {
    match selector {
        Some(s) if s == current => None,
        _ if declared == current => selector,
        Some(s) => Some(s),
        None => Some(declared),
    }
}

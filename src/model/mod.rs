//! In-memory model of the declarations a generation run works on.
//!
//! Everything here is built once from freshly analyzed sources and dropped when the
//! run finishes. [`TypeExpr`] carries the package a reference was written in so it can
//! be re-rendered into the container or mock package.

pub mod declaration;
pub mod type_expr;

pub use declaration::{FuncType, InterfaceType, Package};
pub use type_expr::{Param, TypeExpr};

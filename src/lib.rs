//! dicon - DICONtainer Generator
//!
//! Generates a lazily wiring dependency injection container for Go, and function-field
//! mocks for the components it provides.
//!
//! # Architecture Overview
//!
//! A Go interface annotated with a `// +DICON` comment declares the container:
//!
//! ```go
//! // +DICON
//! type DIContainer interface {
//!     UserService() (UserService, error)
//!     UserRepository() (UserRepository, error)
//! }
//!
//! func NewUserService(repo UserRepository) (UserService, error) { ... }
//! func NewUserRepository() (UserRepository, error) { ... }
//! ```
//!
//! Every method names a component. Its constructor is the function `New<Component>`
//! found in the scanned packages, and each constructor argument is itself a component.
//! The generated container builds a component on first use, resolving its arguments
//! through the other accessors, and caches the result.
//!
//! # Modules
//!
//! - [`syntax`] - tree-sitter based Go analyzer producing declaration trees
//! - [`model`] - package-tagged type expressions and declarations
//! - [`scanner`] - locate the annotated interface, constructors and component interfaces
//! - [`resolver`] - argument checks and cycle detection over the component graph
//! - [`generator`] - container and mock emitters, and the formatter pass
//! - [`pipeline`] - one generation run from analyzed packages to a file
//! - [`config`] - `dicon.toml` loading
//! - [`cli`] - the `dicon` command line
//! - [`core`] - errors and their user-facing rendering
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Generate sample/dicon_gen.go
//! dicon generate --pkg sample
//!
//! # Generate mock/dicon_mock.go
//! dicon generate-mock --pkg sample --dist mock
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod generator;
pub mod model;
pub mod pipeline;
pub mod resolver;
pub mod scanner;
pub mod syntax;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

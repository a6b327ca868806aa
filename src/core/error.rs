//! Error handling for dicon
//!
//! Errors are split the same way the generator pipeline is:
//! - [`DiconError`] enumerates every failure a generation run can hit, from reading
//!   package directories to detecting a dependency cycle
//! - [`ErrorContext`] wraps an error with a suggestion and details for the CLI
//!
//! Generation-time errors abort the run before anything is written. The errors that
//! the *generated* Go code reports at runtime (cache corruption, wrapped construction
//! failures) are emitted as source text and never show up here.
//!
//! # Examples
//!
//! ```rust,no_run
//! use dicon::core::{DiconError, ErrorContext, user_friendly_error};
//!
//! let err = DiconError::AnnotationNotFound {
//!     marker: "+DICON".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(err));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for dicon operations.
///
/// # Error Categories
///
/// ## Declaration discovery
/// - [`AnnotationNotFound`] - no annotated container interface in the scanned packages
/// - [`MultipleAnnotations`] - more than one annotated container interface
///
/// ## Dependency wiring
/// - [`UnresolvedDependency`] - a component has no constructor to build it with
/// - [`InvalidConstructorShape`] - `New<X>` returns something other than `error` second
/// - [`InvalidMethodSignature`] - a container method is not `X() (X, error)`
/// - [`CyclicDependency`] - constructors depend on each other in a loop
///
/// ## Rendering
/// - [`UnsupportedTypeExpression`] - a type shape the renderer refuses to approximate
///
/// ## Environment
/// - [`AnalyzeError`], [`ConfigError`], [`FormatterFailed`], [`FileSystemError`],
///   [`IoError`], [`TomlError`]
///
/// [`AnnotationNotFound`]: DiconError::AnnotationNotFound
/// [`MultipleAnnotations`]: DiconError::MultipleAnnotations
/// [`UnresolvedDependency`]: DiconError::UnresolvedDependency
/// [`InvalidConstructorShape`]: DiconError::InvalidConstructorShape
/// [`InvalidMethodSignature`]: DiconError::InvalidMethodSignature
/// [`CyclicDependency`]: DiconError::CyclicDependency
/// [`UnsupportedTypeExpression`]: DiconError::UnsupportedTypeExpression
/// [`AnalyzeError`]: DiconError::AnalyzeError
/// [`ConfigError`]: DiconError::ConfigError
/// [`FormatterFailed`]: DiconError::FormatterFailed
/// [`FileSystemError`]: DiconError::FileSystemError
/// [`IoError`]: DiconError::IoError
/// [`TomlError`]: DiconError::TomlError
#[derive(Error, Debug)]
pub enum DiconError {
    /// No type declaration carries the annotation marker.
    #[error("{marker} not found")]
    AnnotationNotFound {
        /// The marker that was searched for (e.g. `+DICON`)
        marker: String,
    },

    /// More than one type declaration carries the annotation marker.
    ///
    /// Only a single container interface may exist per scanned package set,
    /// whether the duplicates live in one file or across several.
    #[error("{marker} interface must be single, but found {count}: {locations}")]
    MultipleAnnotations {
        /// The marker that was searched for
        marker: String,
        /// Number of annotated declarations found
        count: usize,
        /// Comma separated `file:Interface` list of the declarations
        locations: String,
    },

    /// A component cannot be wired.
    ///
    /// Raised when a container method has no matching `New<Name>` constructor, or
    /// when a constructor takes an argument that does not name a component.
    #[error("Cannot resolve component '{component}': {reason}")]
    UnresolvedDependency {
        /// The component (container method) that cannot be wired
        component: String,
        /// What is missing
        reason: String,
    },

    /// A `New<Name>` constructor whose second result is not the built-in `error`.
    ///
    /// The candidate is skipped; this is reported but does not abort the run on
    /// its own.
    #[error("Constructor {package}.{constructor} must return (instance, error) but second result is '{found}'")]
    InvalidConstructorShape {
        /// Constructor function name
        constructor: String,
        /// Package declaring the constructor
        package: String,
        /// The second result type as written in source
        found: String,
    },

    /// A container method whose signature is not `Name() (T, error)`.
    #[error("Container method {interface}.{method} {reason}")]
    InvalidMethodSignature {
        /// Container interface name
        interface: String,
        /// Method name
        method: String,
        /// What is wrong with the signature
        reason: String,
    },

    /// The constructors form a dependency cycle.
    ///
    /// `path` starts and ends with the same component, e.g. `A -> B -> C -> A`.
    #[error("detect cyclic dependency {}", format_cycle(.path))]
    CyclicDependency {
        /// Component names along the cycle, first element repeated at the end
        path: Vec<String>,
    },

    /// A type expression the renderer does not recognize.
    #[error("Unsupported type expression: {expr}")]
    UnsupportedTypeExpression {
        /// The expression as written in source
        expr: String,
    },

    /// A Go source file could not be analyzed.
    #[error("Failed to analyze {file}: {reason}")]
    AnalyzeError {
        /// Path of the file
        file: String,
        /// Parser diagnostic
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// The external Go formatter rejected the generated source.
    #[error("Formatter '{command}' failed")]
    FormatterFailed {
        /// Formatter executable
        command: String,
        /// Its stderr output
        stderr: String,
    },

    /// File system error
    #[error("File system error: {operation}")]
    FileSystemError {
        /// The file system operation that failed
        operation: String,
        /// Path where the file system error occurred
        path: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

fn format_cycle(path: &[String]) -> String {
    let quoted: Vec<String> = path.iter().map(|name| format!("'{name}'")).collect();
    quoted.join(" -> ")
}

impl Clone for DiconError {
    fn clone(&self) -> Self {
        match self {
            Self::AnnotationNotFound {
                marker,
            } => Self::AnnotationNotFound {
                marker: marker.clone(),
            },
            Self::MultipleAnnotations {
                marker,
                count,
                locations,
            } => Self::MultipleAnnotations {
                marker: marker.clone(),
                count: *count,
                locations: locations.clone(),
            },
            Self::UnresolvedDependency {
                component,
                reason,
            } => Self::UnresolvedDependency {
                component: component.clone(),
                reason: reason.clone(),
            },
            Self::InvalidConstructorShape {
                constructor,
                package,
                found,
            } => Self::InvalidConstructorShape {
                constructor: constructor.clone(),
                package: package.clone(),
                found: found.clone(),
            },
            Self::InvalidMethodSignature {
                interface,
                method,
                reason,
            } => Self::InvalidMethodSignature {
                interface: interface.clone(),
                method: method.clone(),
                reason: reason.clone(),
            },
            Self::CyclicDependency {
                path,
            } => Self::CyclicDependency {
                path: path.clone(),
            },
            Self::UnsupportedTypeExpression {
                expr,
            } => Self::UnsupportedTypeExpression {
                expr: expr.clone(),
            },
            Self::AnalyzeError {
                file,
                reason,
            } => Self::AnalyzeError {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            Self::FormatterFailed {
                command,
                stderr,
            } => Self::FormatterFailed {
                command: command.clone(),
                stderr: stderr.clone(),
            },
            Self::FileSystemError {
                operation,
                path,
            } => Self::FileSystemError {
                operation: operation.clone(),
                path: path.clone(),
            },
            // For errors that don't implement Clone, convert to Other
            Self::IoError(e) => Self::Other {
                message: format!("IO error: {e}"),
            },
            Self::TomlError(e) => Self::Other {
                message: format!("TOML parsing error: {e}"),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error context wrapper that provides user-friendly error information.
///
/// When displayed, errors show:
/// 1. **Error**: the main error message in red
/// 2. **Details**: additional context in yellow (optional)
/// 3. **Suggestion**: actionable steps in green (optional)
///
/// ```rust,no_run
/// use dicon::core::{DiconError, ErrorContext};
///
/// let context = ErrorContext::new(DiconError::AnnotationNotFound {
///     marker: "+DICON".to_string(),
/// })
/// .with_suggestion("Add a '// +DICON' comment above the container interface");
///
/// println!("{}", context);
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying dicon error
    pub error: DiconError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: DiconError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with suggestions where dicon knows better.
///
/// Errors that are (or wrap) a [`DiconError`] get tailored suggestions; anything else
/// is reported with its full cause chain.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(dicon_error) = error.downcast_ref::<DiconError>() {
        return create_error_context(dicon_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(DiconError::FileSystemError {
                    operation: error.to_string(),
                    path: "unknown".to_string(),
                })
                .with_suggestion(
                    "Check that every --pkg entry is a directory relative to the current directory",
                );
            }
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(DiconError::FileSystemError {
                    operation: error.to_string(),
                    path: "unknown".to_string(),
                })
                .with_suggestion("Check the permissions of the package directory and output file");
            }
            _ => {}
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(DiconError::ConfigError {
            message: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax in your dicon.toml file");
    }

    // Generic error - include the full error chain for better diagnostics
    let mut message = error.to_string();

    let chain: Vec<String> = error
        .chain()
        .skip(1) // Skip the root cause which is already in to_string()
        .map(std::string::ToString::to_string)
        .collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(DiconError::Other {
        message,
    })
}

fn create_error_context(error: DiconError) -> ErrorContext {
    match &error {
        DiconError::AnnotationNotFound {
            marker,
        } => {
            let suggestion = format!(
                "Add a '// {marker}' comment directly above the container interface declaration"
            );
            ErrorContext::new(error)
                .with_suggestion(suggestion)
                .with_details("Only the packages listed with --pkg are scanned")
        }
        DiconError::MultipleAnnotations {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Keep the annotation on exactly one interface across all --pkg packages"),
        DiconError::UnresolvedDependency {
            component,
            ..
        } => {
            let suggestion = format!(
                "Declare 'func New{component}(...) ({component}, error)' in one of the --pkg packages"
            );
            ErrorContext::new(error).with_suggestion(suggestion).with_details(
                "Every container method needs a constructor, and every constructor argument must be a component",
            )
        }
        DiconError::InvalidConstructorShape {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Return the component alone or as (component, error)"),
        DiconError::InvalidMethodSignature {
            method,
            ..
        } => {
            let suggestion = format!("Declare it as '{method}() ({method}, error)'");
            ErrorContext::new(error).with_suggestion(suggestion)
        }
        DiconError::CyclicDependency {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Break the cycle by removing one constructor argument along the path")
            .with_details("A component cannot (transitively) require itself to be constructed"),
        DiconError::UnsupportedTypeExpression {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Declare a named type for this expression and use the name instead"),
        DiconError::AnalyzeError {
            ..
        } => ErrorContext::new(error).with_suggestion("Make sure the package compiles with 'go build'"),
        DiconError::FormatterFailed {
            stderr,
            ..
        } => {
            let details = stderr.clone();
            ErrorContext::new(error)
                .with_details(details)
                .with_suggestion("Re-run with --no-format --dry-run to inspect the raw output")
        }
        _ => ErrorContext::new(error),
    }
}

//! Core types shared by every stage of the generator.
//!
//! - [`DiconError`] - enumerated failures of a generation run
//! - [`ErrorContext`] - user-facing wrapper with suggestions and details
//! - [`user_friendly_error`] - convert any [`anyhow::Error`] for CLI display

pub mod error;

pub use error::{DiconError, ErrorContext, user_friendly_error};

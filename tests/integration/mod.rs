//! Integration test suite for dicon
//!
//! Runs the `dicon` binary against Go packages laid out in temporary projects.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! - **generate**: container generation and its failure modes
//! - **generate_mock**: mock generation
//! - **config**: `dicon.toml` and global flags

#[path = "../common/mod.rs"]
mod common;

mod config;
mod generate;
mod generate_mock;

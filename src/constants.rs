//! Global constants used throughout the dicon codebase.
//!
//! Defaults for every configurable value live here so the CLI, the config layer and
//! the tests agree on them.

use std::time::Duration;

/// Comment marker that identifies the container interface.
pub const DEFAULT_ANNOTATION: &str = "+DICON";

/// Base file name (without `.go`) of the generated container.
pub const DEFAULT_CONTAINER_OUT: &str = "dicon_gen";

/// Base file name (without `.go`) of the generated mocks.
pub const DEFAULT_MOCK_OUT: &str = "dicon_mock";

/// Package (and directory) the mocks are generated into.
pub const DEFAULT_MOCK_PACKAGE: &str = "mock";

/// Formatters tried in order on the generated source.
pub const DEFAULT_FORMATTERS: &[&str] = &["goimports", "gofmt"];

/// Name of the optional project configuration file.
pub const CONFIG_FILE_NAME: &str = "dicon.toml";

/// Timeout for a single formatter run (60 seconds).
///
/// `goimports` may scan the module cache to resolve imports, which is slow on a
/// cold cache.
pub const FORMATTER_TIMEOUT: Duration = Duration::from_secs(60);

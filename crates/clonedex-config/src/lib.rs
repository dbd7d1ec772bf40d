//! Settings for clonedex: file selection, the symbol extractor backend,
//! worker count, version selection and output locations.
//!
//! Values come from the defaults, optionally replaced by a `.toml`, `.yml`,
//! `.yaml` or `.json` file and finally overridden by `CLONEDEX_<SECTION>_<FIELD>`
//! environment variables.
//!
//! ```no_run
//! use clonedex_config::Config;
//!
//! let config = Config::load()?;
//! let clusters = config.versions.clusters;
//! # Ok::<(), clonedex_config::ConfigError>(())
//! ```

pub mod env;
pub mod error;
pub mod format;
pub mod loader;
pub mod report;
pub mod types;
pub mod validation;

pub use error::{ConfigError, Result};
pub use format::ConfigFormat;
pub use loader::ConfigBuilder;
pub use report::ErrorFormatter;
pub use types::*;
pub use validation::Validate;

//! Configuration type definitions
//!
//! Each section is self-contained with validation and defaults.

pub mod core;
pub mod extractor;
pub mod indexer;
pub mod output;
pub mod versions;

pub use self::core::CoreConfig;
pub use extractor::{ExtractorBackend, ExtractorConfig};
pub use indexer::IndexerConfig;
pub use output::OutputConfig;
pub use versions::VersionsConfig;

use serde::{Deserialize, Serialize};

/// Main configuration struct aggregating all settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// File selection (extensions, exclusions)
    #[serde(default)]
    pub core: CoreConfig,

    /// Symbol extractor backend and record layout
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Tree walking and worker pool
    #[serde(default)]
    pub indexer: IndexerConfig,

    /// Version selection and history queries
    #[serde(default)]
    pub versions: VersionsConfig,

    /// Where index files are written
    #[serde(default)]
    pub output: OutputConfig,
}

impl crate::validation::Validate for Config {
    fn validate(&self) -> crate::error::Result<()> {
        self.core.validate()?;
        self.extractor.validate()?;
        self.indexer.validate()?;
        self.versions.validate()?;
        self.output.validate()?;
        Ok(())
    }
}

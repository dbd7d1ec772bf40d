//! Output locations

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving `<repo>/fuzzy_<tag>.hidx` files
    #[serde(default = "default_index_dir")]
    pub index_dir: PathBuf,

    /// Directory receiving the per-repository tag → timestamp files
    #[serde(default = "default_dates_dir")]
    pub dates_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            index_dir: default_index_dir(),
            dates_dir: default_dates_dir(),
        }
    }
}

impl crate::validation::Validate for OutputConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;

        if self.index_dir.as_os_str().is_empty() {
            return Err(ConfigError::invalid("output.index_dir", "Cannot be empty"));
        }
        if self.dates_dir.as_os_str().is_empty() {
            return Err(ConfigError::invalid("output.dates_dir", "Cannot be empty"));
        }
        Ok(())
    }
}

fn default_index_dir() -> PathBuf {
    PathBuf::from("repo_functions")
}

fn default_dates_dir() -> PathBuf {
    PathBuf::from("repo_date")
}

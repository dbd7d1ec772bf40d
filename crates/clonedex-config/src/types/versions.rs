//! Version selection configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionsConfig {
    /// Number of time clusters (and therefore indexed versions) per repository
    #[serde(default = "default_clusters")]
    pub clusters: usize,

    /// Attempts per git command before the repository is abandoned
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,

    /// Delay between attempts, in seconds
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
}

impl Default for VersionsConfig {
    fn default() -> Self {
        Self {
            clusters: default_clusters(),
            max_attempts: default_max_attempts(),
            retry_delay_secs: default_retry_delay_secs(),
        }
    }
}

impl crate::validation::Validate for VersionsConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::validation::require_nonzero;

        require_nonzero("versions.clusters", self.clusters)?;
        require_nonzero("versions.max_attempts", self.max_attempts)?;
        Ok(())
    }
}

fn default_clusters() -> usize {
    5
}

fn default_max_attempts() -> usize {
    3
}

fn default_retry_delay_secs() -> u64 {
    5
}

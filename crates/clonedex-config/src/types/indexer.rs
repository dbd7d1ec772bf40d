//! Indexer configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexerConfig {
    /// Worker threads used for per-file extraction
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
        }
    }
}

impl crate::validation::Validate for IndexerConfig {
    fn validate(&self) -> crate::error::Result<()> {
        crate::validation::require_nonzero("indexer.workers", self.workers)
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;

    #[test]
    fn test_default_has_workers() {
        assert!(IndexerConfig::default().workers >= 1);
    }

    #[test]
    fn test_zero_workers_invalid() {
        assert!(IndexerConfig { workers: 0 }.validate().is_err());
    }
}

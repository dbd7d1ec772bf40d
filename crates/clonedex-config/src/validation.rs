//! Validation of loaded settings.

use crate::error::{ConfigError, Result};

/// Checks a config section for values that would make a run meaningless.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Reject zero counts.
pub fn require_nonzero(field: &str, value: usize) -> Result<()> {
    if value == 0 {
        Err(ConfigError::invalid(field, "must be at least 1"))
    } else {
        Ok(())
    }
}

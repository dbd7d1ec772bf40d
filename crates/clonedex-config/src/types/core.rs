//! Core configuration (which files are eligible for indexing)

use serde::{Deserialize, Serialize};

/// Core configuration for file selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Source file extensions, without the leading dot
    ///
    /// A file is eligible when its name ends with `.` followed by one of these.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Glob patterns (relative to the scanned root) for paths to skip
    ///
    /// Examples: `["third_party/**", "**/test/**"]`
    #[serde(default)]
    pub exclude_paths: Vec<String>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            exclude_paths: vec![],
        }
    }
}

impl crate::validation::Validate for CoreConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;

        if self.extensions.is_empty() {
            return Err(ConfigError::invalid(
                "core.extensions",
                "Must list at least one source extension",
            ));
        }

        for ext in &self.extensions {
            if ext.is_empty() {
                return Err(ConfigError::invalid(
                    "core.extensions",
                    "Extensions cannot be empty strings",
                ));
            }
            if ext.starts_with('.') {
                return Err(ConfigError::invalid(
                    "core.extensions",
                    format!("Write '{}' without the leading dot", ext),
                ));
            }
        }

        for pattern in &self.exclude_paths {
            if pattern.is_empty() {
                return Err(ConfigError::invalid(
                    "core.exclude_paths",
                    "Exclude patterns cannot be empty strings",
                ));
            }
        }

        Ok(())
    }
}

fn default_extensions() -> Vec<String> {
    vec!["c".to_string(), "cc".to_string(), "cpp".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;

    #[test]
    fn test_default_config_is_valid() {
        let config = CoreConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.extensions, vec!["c", "cc", "cpp"]);
    }

    #[test]
    fn test_empty_extensions_invalid() {
        let config = CoreConfig {
            extensions: vec![],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_dotted_extension_invalid() {
        let config = CoreConfig {
            extensions: vec![".c".to_string()],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serialize_deserialize() {
        let config = CoreConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let deserialized: CoreConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config, deserialized);
    }
}

//! Symbol extractor configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which tool locates function boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractorBackend {
    /// Universal-ctags subprocess, one invocation per file
    #[default]
    Ctags,
    /// In-process tree-sitter C/C++ grammars
    TreeSitter,
}

impl ExtractorBackend {
    pub const OPTIONS: &'static [&'static str] = &["ctags", "tree-sitter"];
}

impl FromStr for ExtractorBackend {
    type Err = crate::error::ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ctags" => Ok(Self::Ctags),
            "tree-sitter" | "treesitter" => Ok(Self::TreeSitter),
            _ => Err(crate::error::ConfigError::unknown_choice(
                "extractor.backend",
                s,
                Self::OPTIONS,
            )),
        }
    }
}

impl fmt::Display for ExtractorBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ctags => write!(f, "ctags"),
            Self::TreeSitter => write!(f, "tree-sitter"),
        }
    }
}

/// Extractor settings
///
/// The `*_field` values are zero-based positions inside one tab-delimited
/// ctags record after whitespace runs have been collapsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    #[serde(default)]
    pub backend: ExtractorBackend,

    /// Path to the ctags binary
    #[serde(default = "default_ctags_path")]
    pub ctags_path: String,

    #[serde(default = "default_kind_field")]
    pub kind_field: usize,

    #[serde(default = "default_start_field")]
    pub start_field: usize,

    #[serde(default = "default_end_field")]
    pub end_field: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            backend: ExtractorBackend::default(),
            ctags_path: default_ctags_path(),
            kind_field: default_kind_field(),
            start_field: default_start_field(),
            end_field: default_end_field(),
        }
    }
}

impl crate::validation::Validate for ExtractorConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;

        if self.backend == ExtractorBackend::Ctags && self.ctags_path.trim().is_empty() {
            return Err(ConfigError::invalid(
                "extractor.ctags_path",
                "ctags backend requires a binary path",
            ));
        }

        let fields = [self.kind_field, self.start_field, self.end_field];
        if fields[0] == fields[1] || fields[0] == fields[2] || fields[1] == fields[2] {
            return Err(ConfigError::invalid(
                "extractor",
                format!(
                    "kind/start/end fields must be distinct, got {}/{}/{}",
                    fields[0], fields[1], fields[2]
                ),
            ));
        }

        Ok(())
    }
}

fn default_ctags_path() -> String {
    "ctags".to_string()
}

fn default_kind_field() -> usize {
    3
}

fn default_start_field() -> usize {
    4
}

fn default_end_field() -> usize {
    7
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;

    #[test]
    fn test_default_layout() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(
            (config.kind_field, config.start_field, config.end_field),
            (3, 4, 7)
        );
    }

    #[test]
    fn test_overlapping_fields_invalid() {
        let config = ExtractorConfig {
            start_field: 3,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!(
            "tree-sitter".parse::<ExtractorBackend>().unwrap(),
            ExtractorBackend::TreeSitter
        );
        assert!("clang".parse::<ExtractorBackend>().is_err());
    }

    #[test]
    fn test_backend_serde_name() {
        let yaml = serde_yaml::to_string(&ExtractorBackend::TreeSitter).unwrap();
        assert_eq!(yaml.trim(), "tree-sitter");
    }
}

//! Config file formats.

use crate::error::{ConfigError, Result};
use crate::Config;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Format implied by the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("yml" | "yaml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Deserialize `content`; `origin` names the source in errors.
    pub fn parse(self, content: &str, origin: Option<&str>) -> Result<Config> {
        match self {
            Self::Toml => toml::from_str(content).map_err(|e| {
                let line = e
                    .span()
                    .map(|span| line_of_offset(content, span.start));
                ConfigError::parse(self, origin, content, line, e.message())
            }),
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| {
                let line = e.location().map(|loc| loc.line());
                ConfigError::parse(self, origin, content, line, e.to_string())
            }),
            Self::Json => serde_json::from_str(content).map_err(|e| {
                let line = Some(e.line()).filter(|l| *l > 0);
                ConfigError::parse(self, origin, content, line, e.to_string())
            }),
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Toml => "TOML",
            Self::Yaml => "YAML",
            Self::Json => "JSON",
        })
    }
}

fn line_of_offset(content: &str, offset: usize) -> usize {
    let end = offset.min(content.len());
    content.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExtractorBackend, IndexerConfig};
    use std::path::PathBuf;

    #[test]
    fn detects_by_extension() {
        for (name, format) in [
            ("a.toml", ConfigFormat::Toml),
            ("a.yml", ConfigFormat::Yaml),
            ("a.yaml", ConfigFormat::Yaml),
            ("a.json", ConfigFormat::Json),
        ] {
            assert_eq!(ConfigFormat::from_path(&PathBuf::from(name)).unwrap(), format);
        }
        assert!(ConfigFormat::from_path(Path::new("a.ini")).is_err());
        assert!(ConfigFormat::from_path(Path::new(".clonedex")).is_err());
    }

    #[test]
    fn toml_sections() {
        let config = ConfigFormat::Toml
            .parse(
                "[versions]\nclusters = 3\n\n[extractor]\nbackend = \"tree-sitter\"\n",
                None,
            )
            .unwrap();
        assert_eq!(config.versions.clusters, 3);
        assert_eq!(config.extractor.backend, ExtractorBackend::TreeSitter);
        assert_eq!(config.indexer, IndexerConfig::default());
    }

    #[test]
    fn yaml_sections() {
        let config = ConfigFormat::Yaml
            .parse("core:\n  extensions: [c, h]\nindexer:\n  workers: 2\n", None)
            .unwrap();
        assert_eq!(config.core.extensions, vec!["c", "h"]);
        assert_eq!(config.indexer.workers, 2);
    }

    #[test]
    fn json_sections() {
        let config = ConfigFormat::Json
            .parse(r#"{"output": {"index_dir": "out/functions"}}"#, None)
            .unwrap();
        assert_eq!(config.output.index_dir, PathBuf::from("out/functions"));
        assert_eq!(config.output.dates_dir, PathBuf::from("repo_date"));
    }

    #[test]
    fn type_error_reports_line() {
        let err = ConfigFormat::Toml
            .parse("[versions]\nclusters = \"many\"\n", Some("c.toml"))
            .unwrap_err();
        match err {
            ConfigError::Parse {
                format,
                origin,
                line,
                ..
            } => {
                assert_eq!(format, ConfigFormat::Toml);
                assert_eq!(origin, "c.toml");
                if let Some(line) = line {
                    assert_eq!(line, 2);
                }
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

//! Layered loading: defaults, then one file, then `CLONEDEX_*` variables.

use crate::error::{ConfigError, Result};
use crate::format::ConfigFormat;
use crate::validation::Validate;
use crate::{env, Config};
use std::fs;
use std::path::{Path, PathBuf};

/// File names probed in the working directory, first hit wins.
pub const DEFAULT_FILES: &[&str] = &[
    ".clonedex.toml",
    ".clonedex.yml",
    ".clonedex.yaml",
    ".clonedex.json",
];

/// ```no_run
/// use clonedex_config::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .with_file(".clonedex.toml")
///     .with_env()
///     .build()?;
/// # Ok::<(), clonedex_config::ConfigError>(())
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    file: Option<PathBuf>,
    env: bool,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the defaults with this file. Missing sections keep defaults.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_env(mut self) -> Self {
        self.env = true;
        self
    }

    pub fn build(self) -> Result<Config> {
        self.build_with_vars(std::env::vars())
    }

    /// Like [`build`](Self::build) with an explicit variable set.
    pub fn build_with_vars<I>(self, vars: I) -> Result<Config>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut config = match &self.file {
            Some(path) => read_file(path)?,
            None => Config::default(),
        };
        if self.env {
            env::apply_env(&mut config, vars)?;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Parse one config file without validating it.
pub fn read_file(path: &Path) -> Result<Config> {
    let format = ConfigFormat::from_path(path)?;
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    format.parse(&content, Some(&path.display().to_string()))
}

impl Config {
    /// First of [`DEFAULT_FILES`] found in the working directory (or the
    /// defaults), with environment overrides applied.
    pub fn load() -> Result<Self> {
        let mut builder = ConfigBuilder::new().with_env();
        if let Some(found) = DEFAULT_FILES.iter().map(Path::new).find(|p| p.is_file()) {
            builder = builder.with_file(found);
        }
        builder.build()
    }

    /// `path` plus environment overrides. The file must exist.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        ConfigBuilder::new().with_file(path).with_env().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn no_vars() -> Vec<(String, String)> {
        vec![]
    }

    #[test]
    fn defaults_without_sources() {
        let config = ConfigBuilder::new().build_with_vars(no_vars()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.yml");
        fs::write(&path, "versions:\n  clusters: 3\nindexer:\n  workers: 2\n").unwrap();

        let config = ConfigBuilder::new()
            .with_file(&path)
            .with_env()
            .build_with_vars(vec![(
                "CLONEDEX_VERSIONS_CLUSTERS".to_string(),
                "7".to_string(),
            )])
            .unwrap();
        assert_eq!(config.versions.clusters, 7);
        assert_eq!(config.indexer.workers, 2);
    }

    #[test]
    fn invalid_file_values_fail_the_build() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[versions]\nclusters = 0\n").unwrap();

        assert!(read_file(&path).is_ok());
        let err = ConfigBuilder::new()
            .with_file(&path)
            .build_with_vars(no_vars())
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn missing_file() {
        let err = Config::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }
}

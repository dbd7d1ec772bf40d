//! `CLONEDEX_<SECTION>_<FIELD>` overrides, e.g. `CLONEDEX_INDEXER_WORKERS=4`
//! or `CLONEDEX_CORE_EXTENSIONS=c,cc,cpp,cxx`. Lists are comma-separated.

use crate::error::{ConfigError, Result};
use crate::types::ExtractorBackend;
use crate::Config;
use std::path::PathBuf;
use std::str::FromStr;

pub const ENV_PREFIX: &str = "CLONEDEX_";

/// Apply every `CLONEDEX_*` pair in `vars` to `config`.
///
/// Names that match no setting are reported on stderr and skipped; values
/// that do not parse are errors.
pub fn apply_env<I>(config: &mut Config, vars: I) -> Result<()>
where
    I: IntoIterator<Item = (String, String)>,
{
    for (name, value) in vars {
        let Some(key) = name.strip_prefix(ENV_PREFIX) else {
            continue;
        };
        if !set(config, &key.to_lowercase(), &name, &value)? {
            eprintln!("warning: {} does not name a clonedex setting", name);
        }
    }
    Ok(())
}

/// `Ok(false)` when `key` is not a known `<section>_<field>`.
fn set(config: &mut Config, key: &str, var: &str, value: &str) -> Result<bool> {
    match key {
        "core_extensions" => config.core.extensions = list(value),
        "core_exclude_paths" => config.core.exclude_paths = list(value),
        "extractor_backend" => config.extractor.backend = ExtractorBackend::from_str(value)?,
        "extractor_ctags_path" => config.extractor.ctags_path = value.to_string(),
        "extractor_kind_field" => config.extractor.kind_field = number(var, value)?,
        "extractor_start_field" => config.extractor.start_field = number(var, value)?,
        "extractor_end_field" => config.extractor.end_field = number(var, value)?,
        "indexer_workers" => config.indexer.workers = number(var, value)?,
        "versions_clusters" => config.versions.clusters = number(var, value)?,
        "versions_max_attempts" => config.versions.max_attempts = number(var, value)?,
        "versions_retry_delay_secs" => config.versions.retry_delay_secs = number(var, value)?,
        "output_index_dir" => config.output.index_dir = PathBuf::from(value),
        "output_dates_dir" => config.output.dates_dir = PathBuf::from(value),
        _ => return Ok(false),
    }
    Ok(true)
}

fn number<T: FromStr>(var: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| ConfigError::Env {
        var: var.to_string(),
        message: format!("expected a non-negative integer, got {:?}", value),
    })
}

fn list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn known_settings_apply() {
        let mut config = Config::default();
        apply_env(
            &mut config,
            vars(&[
                ("CLONEDEX_INDEXER_WORKERS", "3"),
                ("CLONEDEX_CORE_EXTENSIONS", "c, cxx"),
                ("CLONEDEX_EXTRACTOR_BACKEND", "tree-sitter"),
                ("CLONEDEX_VERSIONS_RETRY_DELAY_SECS", "0"),
                ("CLONEDEX_OUTPUT_DATES_DIR", "/tmp/dates"),
                ("PATH", "/usr/bin"),
            ]),
        )
        .unwrap();
        assert_eq!(config.indexer.workers, 3);
        assert_eq!(config.core.extensions, vec!["c", "cxx"]);
        assert_eq!(config.extractor.backend, ExtractorBackend::TreeSitter);
        assert_eq!(config.versions.retry_delay_secs, 0);
        assert_eq!(config.output.dates_dir, PathBuf::from("/tmp/dates"));
    }

    #[test]
    fn unknown_names_are_skipped() {
        let mut config = Config::default();
        apply_env(
            &mut config,
            vars(&[("CLONEDEX_VERSIONS_COLOR", "blue"), ("CLONEDEX_", "x")]),
        )
        .unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn unparseable_values_fail() {
        let mut config = Config::default();
        let err = apply_env(&mut config, vars(&[("CLONEDEX_VERSIONS_CLUSTERS", "five")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Env { .. }));

        let err = apply_env(&mut config, vars(&[("CLONEDEX_EXTRACTOR_BACKEND", "clang")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownChoice { .. }));
    }
}

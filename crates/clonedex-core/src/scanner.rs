// File scanner for tree indexing
use clonedex_config::CoreConfig;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{trace, warn};

/// Every eligible source file under `root`, in a stable order.
///
/// Hidden and git-ignored files are included; only the `.git` directory and
/// paths matching `config.exclude_paths` are skipped.
pub fn scan_sources(root: &Path, config: &CoreConfig) -> Vec<PathBuf> {
    let exclude_set = build_globset(&config.exclude_paths);

    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .filter_entry(|entry| entry.file_name() != ".git")
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut files = Vec::new();
    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Error scanning path: {}", err);
                continue;
            }
        };
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();
        let name = entry.file_name().to_string_lossy();
        if !is_eligible(&name, &config.extensions) {
            continue;
        }

        if let Some(set) = &exclude_set {
            let rel = path.strip_prefix(root).unwrap_or(path);
            if set.is_match(rel) {
                trace!("excluded {}", rel.display());
                continue;
            }
        }

        files.push(path.to_path_buf());
    }

    files
}

/// `true` when `file_name` ends with `.` plus one of `extensions`.
pub fn is_eligible(file_name: &str, extensions: &[String]) -> bool {
    extensions.iter().any(|ext| {
        file_name
            .strip_suffix(ext.as_str())
            .is_some_and(|stem| stem.ends_with('.'))
    })
}

pub fn build_globset(patterns: &[String]) -> Option<GlobSet> {
    if patterns.is_empty() {
        return None;
    }
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        match Glob::new(pat) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(err) => warn!("Ignoring invalid glob pattern {}: {}", pat, err),
        }
    }
    match builder.build() {
        Ok(set) => Some(set),
        Err(err) => {
            warn!("Failed to build globset: {}", err);
            None
        }
    }
}

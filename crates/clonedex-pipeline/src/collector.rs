//! Per-repository orchestration: pick versions, check each out, index it.

use crate::history::{collect_tag_times, GitHistory, HistoryProvider};
use crate::indexer::RepositoryIndexer;
use crate::versions::{TagTime, VersionSelector};
use crate::writer::{index_path, write_index, write_tag_dates};
use anyhow::{Context, Result};
use clonedex_config::Config;
use clonedex_core::{Fingerprinter, RepoSummary, SymbolExtractor};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Outcome of one indexed version.
#[derive(Debug, Clone)]
pub struct VersionReport {
    pub tag: TagTime,
    pub summary: RepoSummary,
    /// `None` when the index was empty and nothing was written
    pub index_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct RepoReport {
    pub repo_name: String,
    pub selected: Vec<TagTime>,
    pub versions: Vec<VersionReport>,
    pub dates_file: PathBuf,
}

pub struct Collector<'a> {
    config: &'a Config,
    indexer: RepositoryIndexer<'a>,
    selector: VersionSelector,
}

impl<'a> Collector<'a> {
    pub fn new(
        config: &'a Config,
        symbols: &'a dyn SymbolExtractor,
        fingerprinter: &'a dyn Fingerprinter,
    ) -> Self {
        Self {
            config,
            indexer: RepositoryIndexer::new(symbols, fingerprinter, config),
            selector: VersionSelector::from_config(&config.versions),
        }
    }

    /// Process every child directory of `root` as a git repository.
    ///
    /// A failing repository is logged and skipped.
    pub fn collect_all(&self, root: &Path) -> Result<Vec<RepoReport>> {
        let repos = list_repositories(root)?;
        info!("Found {} repositories under {}", repos.len(), root.display());

        let mut reports = Vec::new();
        for (i, repo) in repos.iter().enumerate() {
            info!("[{}/{}] Processing {}", i + 1, repos.len(), repo.display());
            let history = GitHistory::from_config(repo, &self.config.versions);
            match self.collect_repository(repo, &history) {
                Ok(report) => reports.push(report),
                Err(err) => error!("Abandoning {}: {:#}", repo.display(), err),
            }
        }
        Ok(reports)
    }

    /// Select, check out and index the versions of one repository.
    ///
    /// A checkout that still fails after retries aborts the repository before
    /// its dates file is written; indexes of earlier tags stay on disk.
    pub fn collect_repository(
        &self,
        repo: &Path,
        history: &dyn HistoryProvider,
    ) -> Result<RepoReport> {
        let repo_name = repo_name(repo)?;
        let candidates = collect_tag_times(history)
            .with_context(|| format!("Failed to read history of {}", repo_name))?;
        let selected = self.selector.select(&candidates);
        info!(
            "{}: {} of {} versions selected",
            repo_name,
            selected.len(),
            candidates.len()
        );

        let mut versions = Vec::new();
        for (i, tag) in selected.iter().enumerate() {
            info!(
                "{}: handling {} ({}) {}/{}",
                repo_name,
                tag.tag,
                tag.timestamp,
                i + 1,
                selected.len()
            );
            if tag.tag.is_empty() {
                continue;
            }
            history
                .checkout(&tag.tag)
                .with_context(|| format!("Failed to check out {} of {}", tag.tag, repo_name))?;

            let tree = self.indexer.index_tree(repo, &repo_name)?;
            let path = index_path(&self.config.output.index_dir, &repo_name, &tag.tag);
            let written = write_index(&path, &tree.summary, &tree.index)?;
            versions.push(VersionReport {
                tag: tag.clone(),
                summary: tree.summary,
                index_file: written.then_some(path),
            });
        }

        let dates_file = self.config.output.dates_dir.join(&repo_name);
        write_tag_dates(&dates_file, &selected)?;

        Ok(RepoReport {
            repo_name,
            selected,
            versions,
            dates_file,
        })
    }
}

/// Child directories of `root`, sorted by name.
pub fn list_repositories(root: &Path) -> Result<Vec<PathBuf>> {
    let mut repos = Vec::new();
    for entry in
        fs::read_dir(root).with_context(|| format!("Failed to list {}", root.display()))?
    {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            repos.push(entry.path());
        }
    }
    repos.sort();
    Ok(repos)
}

/// Final path component, used as the repository name.
pub fn repo_name(repo: &Path) -> Result<String> {
    let absolute;
    let path = if repo.file_name().is_none() {
        absolute = repo
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", repo.display()))?;
        absolute.as_path()
    } else {
        repo
    };
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("No directory name in {}", repo.display()))
}

use anyhow::{Context, Result};
use clonedex_config::{Config, CoreConfig};
use clonedex_core::extract::{ExtractedFile, FunctionExtractor};
use clonedex_core::scanner::scan_sources;
use clonedex_core::{Digest, Fingerprinter, RepoSummary, SymbolExtractor};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Digest → root-relative paths of the files holding a function with that
/// digest. Paths keep insertion order and may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashIndex {
    buckets: BTreeMap<Digest, Vec<String>>,
}

impl HashIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, digest: Digest, path: impl Into<String>) {
        self.buckets.entry(digest).or_default().push(path.into());
    }

    /// Append every path list of `other` after the matching list in `self`.
    pub fn merge(&mut self, other: HashIndex) {
        for (digest, paths) in other.buckets {
            self.buckets.entry(digest).or_default().extend(paths);
        }
    }

    pub fn get(&self, digest: &str) -> Option<&[String]> {
        self.buckets.get(digest).map(Vec::as_slice)
    }

    /// Buckets in digest order.
    pub fn iter(&self) -> impl Iterator<Item = (&Digest, &[String])> {
        self.buckets.iter().map(|(d, p)| (d, p.as_slice()))
    }

    /// Number of distinct digests.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total number of path entries across buckets.
    pub fn path_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

/// Output of indexing one tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedTree {
    pub index: HashIndex,
    pub summary: RepoSummary,
}

/// Walks a source tree and builds its [`HashIndex`].
pub struct RepositoryIndexer<'a> {
    symbols: &'a dyn SymbolExtractor,
    fingerprinter: &'a dyn Fingerprinter,
    core: CoreConfig,
    workers: usize,
}

impl<'a> RepositoryIndexer<'a> {
    pub fn new(
        symbols: &'a dyn SymbolExtractor,
        fingerprinter: &'a dyn Fingerprinter,
        config: &Config,
    ) -> Self {
        Self {
            symbols,
            fingerprinter,
            core: config.core.clone(),
            workers: config.indexer.workers.max(1),
        }
    }

    /// Index every eligible file under `root`.
    ///
    /// Files the extractor cannot handle are logged and left out of both the
    /// index and the counters. `line_count` adds a file's lines once for each
    /// of its hashed functions, so files without functions add nothing.
    pub fn index_tree(&self, root: &Path, repo_name: &str) -> Result<IndexedTree> {
        let files = scan_sources(root, &self.core);
        info!(
            "Indexing {} ({} candidate files, {} workers)",
            repo_name,
            files.len(),
            self.workers
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .context("Failed to build indexer thread pool")?;

        let extractor = FunctionExtractor::new(self.symbols, self.fingerprinter);
        let partial = pool.install(|| {
            files
                .par_iter()
                .fold(Partial::default, |mut acc, path| {
                    if let Some(file) = extract_one(&extractor, root, path) {
                        acc.absorb(file);
                    }
                    acc
                })
                .reduce(Partial::default, Partial::combine)
        });

        let summary = RepoSummary {
            repo_name: repo_name.to_string(),
            file_count: partial.file_count,
            func_count: partial.func_count,
            line_count: partial.line_count,
        };
        info!(
            "Indexed {}: {} files, {} functions, {} lines, {} digests",
            repo_name,
            summary.file_count,
            summary.func_count,
            summary.line_count,
            partial.index.len()
        );

        Ok(IndexedTree {
            index: partial.index,
            summary,
        })
    }
}

fn extract_one(
    extractor: &FunctionExtractor<'_>,
    root: &Path,
    path: &Path,
) -> Option<ExtractedFile> {
    match extractor.extract_file(root, path) {
        Ok(file) => {
            debug!(
                "{}: {} lines, {} digests",
                file.relative_path,
                file.line_count,
                file.digests.len()
            );
            Some(file)
        }
        Err(err) => {
            warn!("Skipping {}: {}", path.display(), err);
            None
        }
    }
}

/// Per-worker accumulator.
#[derive(Default)]
struct Partial {
    index: HashIndex,
    file_count: usize,
    func_count: usize,
    line_count: usize,
}

impl Partial {
    fn absorb(&mut self, file: ExtractedFile) {
        self.file_count += 1;
        // A file's lines count once per hashed function.
        self.line_count += file.line_count * file.digests.len();
        self.func_count += file.digests.len();
        for digest in file.digests {
            self.index.add(digest, file.relative_path.clone());
        }
    }

    fn combine(mut self, other: Partial) -> Partial {
        self.index.merge(other.index);
        self.file_count += other.file_count;
        self.func_count += other.func_count;
        self.line_count += other.line_count;
        self
    }
}

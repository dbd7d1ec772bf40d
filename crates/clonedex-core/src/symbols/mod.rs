//! Symbol extraction: locating function boundaries inside one file.

pub mod ctags;
pub mod treesitter;

use crate::models::SymbolRecord;
use clonedex_config::{ExtractorBackend, ExtractorConfig};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use self::ctags::{CtagsExtractor, RecordLayout};
pub use self::treesitter::TreeSitterExtractor;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to launch {tool} for {path}: {source}")]
    Spawn {
        tool: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status} for {path}: {stderr}")]
    Failed {
        tool: String,
        path: PathBuf,
        status: String,
        stderr: String,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load {0} grammar")]
    Grammar(&'static str),

    #[error("parser produced no tree for {0}")]
    Parse(PathBuf),
}

/// Produces the symbol records of one source file.
///
/// `source` is the file's decoded content; backends that shell out may
/// ignore it and read `path` themselves.
pub trait SymbolExtractor: Send + Sync {
    fn extract(&self, path: &Path, source: &str) -> Result<Vec<SymbolRecord>, ExtractError>;
}

/// Build the extractor selected in config.
pub fn from_config(config: &ExtractorConfig) -> Box<dyn SymbolExtractor> {
    match config.backend {
        ExtractorBackend::Ctags => Box::new(CtagsExtractor::from_config(config)),
        ExtractorBackend::TreeSitter => Box::new(TreeSitterExtractor),
    }
}

//! Per-file function extraction: symbol records in, digests out.

use crate::canonical::canonicalize;
use crate::fingerprint::{digest_of, Digest, Fingerprinter};
use crate::models::SymbolRecord;
use crate::symbols::{ExtractError, SymbolExtractor};
use std::path::{Component, Path};
use tracing::trace;

/// Body used when a symbol's lines hold no `{ ... }` pair.
pub const PLACEHOLDER_BODY: &str = " ";

/// Result of extracting one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFile {
    /// Path relative to the indexing root, `/`-separated
    pub relative_path: String,
    pub line_count: usize,
    /// One digest per hashed function, in record order
    pub digests: Vec<Digest>,
}

/// Turns one source file into function digests.
pub struct FunctionExtractor<'a> {
    symbols: &'a dyn SymbolExtractor,
    fingerprinter: &'a dyn Fingerprinter,
}

impl<'a> FunctionExtractor<'a> {
    pub fn new(symbols: &'a dyn SymbolExtractor, fingerprinter: &'a dyn Fingerprinter) -> Self {
        Self {
            symbols,
            fingerprinter,
        }
    }

    /// Read `path`, locate its functions and fingerprint each body.
    ///
    /// Read and extractor failures are returned so the caller can skip the
    /// file. Malformed records and sentinel digests are dropped silently.
    pub fn extract_file(&self, root: &Path, path: &Path) -> Result<ExtractedFile, ExtractError> {
        let bytes = std::fs::read(path).map_err(|source| ExtractError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let source = String::from_utf8_lossy(&bytes);
        let records = self.symbols.extract(path, &source)?;
        let lines = split_lines(&source);

        Ok(ExtractedFile {
            relative_path: relative_path(root, path),
            line_count: lines.len(),
            digests: self.digest_records(&lines, &records),
        })
    }

    /// Fingerprint every usable function record against `lines`.
    pub fn digest_records(&self, lines: &[&str], records: &[SymbolRecord]) -> Vec<Digest> {
        records
            .iter()
            .filter(|r| r.is_function())
            .filter_map(|record| {
                let Some(body) = function_body(lines, record) else {
                    trace!(
                        "record {}-{} outside {} lines",
                        record.start_line,
                        record.end_line,
                        lines.len()
                    );
                    return None;
                };
                digest_of(self.fingerprinter, &canonicalize(&body))
            })
            .collect()
    }
}

/// Split into lines, keeping each line's terminator.
pub fn split_lines(source: &str) -> Vec<&str> {
    source.split_inclusive('\n').collect()
}

/// Text between the first `{` and the last `}` of the record's lines.
///
/// Returns [`PLACEHOLDER_BODY`] when no such pair exists and `None` when the
/// record does not fit inside `lines`.
pub fn function_body(lines: &[&str], record: &SymbolRecord) -> Option<String> {
    if !record.fits(lines.len()) {
        return None;
    }
    let text = lines[record.start_line - 1..record.end_line].concat();

    match (text.find('{'), text.rfind('}')) {
        (Some(open), Some(close)) if open < close => Some(text[open + 1..close].to_string()),
        _ => Some(PLACEHOLDER_BODY.to_string()),
    }
}

/// `path` relative to `root`, joined with `/`.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

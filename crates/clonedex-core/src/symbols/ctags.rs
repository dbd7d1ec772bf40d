//! Universal-ctags backend.
//!
//! Runs `ctags -f - --kinds-C=* --fields=neKSt <file>` and reads one
//! tab-delimited record per line. Before splitting, every run of two or more
//! whitespace characters is deleted outright, so the configured field
//! positions refer to the collapsed record.

use super::{ExtractError, SymbolExtractor};
use crate::models::SymbolRecord;
use clonedex_config::ExtractorConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::trace;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").expect("valid regex"));
static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").expect("valid regex"));

const CTAGS_ARGS: &[&str] = &["-f", "-", "--kinds-C=*", "--fields=neKSt"];

/// Zero-based positions of the fields of interest inside one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLayout {
    pub kind_field: usize,
    pub start_field: usize,
    pub end_field: usize,
}

impl Default for RecordLayout {
    fn default() -> Self {
        Self {
            kind_field: 3,
            start_field: 4,
            end_field: 7,
        }
    }
}

impl RecordLayout {
    fn min_fields(&self) -> usize {
        self.kind_field.max(self.start_field).max(self.end_field) + 1
    }
}

#[derive(Debug, Clone)]
pub struct CtagsExtractor {
    binary: PathBuf,
    layout: RecordLayout,
}

impl CtagsExtractor {
    pub fn new(binary: impl Into<PathBuf>, layout: RecordLayout) -> Self {
        Self {
            binary: binary.into(),
            layout,
        }
    }

    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self::new(
            &config.ctags_path,
            RecordLayout {
                kind_field: config.kind_field,
                start_field: config.start_field,
                end_field: config.end_field,
            },
        )
    }

    fn tool_name(&self) -> String {
        self.binary.display().to_string()
    }
}

impl SymbolExtractor for CtagsExtractor {
    fn extract(&self, path: &Path, _source: &str) -> Result<Vec<SymbolRecord>, ExtractError> {
        let output = Command::new(&self.binary)
            .args(CTAGS_ARGS)
            .arg(path)
            .output()
            .map_err(|source| ExtractError::Spawn {
                tool: self.tool_name(),
                path: path.to_path_buf(),
                source,
            })?;

        if !output.status.success() {
            return Err(ExtractError::Failed {
                tool: self.tool_name(),
                path: path.to_path_buf(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_output(&stdout, &self.layout))
    }
}

/// Parse a whole ctags listing, dropping lines that are not usable records.
pub fn parse_output(output: &str, layout: &RecordLayout) -> Vec<SymbolRecord> {
    output
        .split('\n')
        .filter_map(|line| {
            let record = parse_record(line, layout);
            if record.is_none() && !line.is_empty() {
                trace!("skipping ctags line: {}", line);
            }
            record
        })
        .collect()
}

/// Parse one record line.
///
/// Returns `None` when the line has too few fields or a line-number field
/// holds no digits.
pub fn parse_record(line: &str, layout: &RecordLayout) -> Option<SymbolRecord> {
    if line.is_empty() {
        return None;
    }
    let collapsed = WHITESPACE_RUN.replace_all(line, "");
    let fields: Vec<&str> = collapsed.split('\t').collect();
    if fields.len() < layout.min_fields() {
        return None;
    }

    let start_line = first_number(fields[layout.start_field])?;
    let end_line = first_number(fields[layout.end_field])?;
    Some(SymbolRecord::new(
        fields[layout.kind_field],
        start_line,
        end_line,
    ))
}

fn first_number(field: &str) -> Option<usize> {
    DIGITS.find(field)?.as_str().parse().ok()
}

//! Index files (`fuzzy_<tag>.hidx`) and the per-repository tag date file.
//!
//! An index file starts with a title line `repo\tfiles\tfunctions\tlines`,
//! followed by one `digest\tpath1\t...\tpathK` line per bucket in digest
//! order.

use crate::indexer::HashIndex;
use crate::versions::TagTime;
use anyhow::{bail, Context, Result};
use clonedex_core::{Digest, RepoSummary};
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const INDEX_PREFIX: &str = "fuzzy_";
pub const INDEX_EXTENSION: &str = "hidx";

/// Replacement for `/` in tag names used as file names.
pub const TAG_SLASH_REPLACEMENT: &str = "@@";

/// Bucket keys that are never written.
const SKIPPED_KEYS: &[&str] = &["", " "];

/// `fuzzy_<tag>.hidx`, with `/` in the tag replaced.
pub fn index_file_name(tag: &str) -> String {
    format!(
        "{}{}.{}",
        INDEX_PREFIX,
        tag.replace('/', TAG_SLASH_REPLACEMENT),
        INDEX_EXTENSION
    )
}

/// `<index_dir>/<repo>/fuzzy_<tag>.hidx`
pub fn index_path(index_dir: &Path, repo_name: &str, tag: &str) -> PathBuf {
    index_dir.join(repo_name).join(index_file_name(tag))
}

/// Serialize `index` with its title line.
pub fn render_index(summary: &RepoSummary, index: &HashIndex) -> String {
    let mut out = format!(
        "{}\t{}\t{}\t{}\n",
        summary.repo_name, summary.file_count, summary.func_count, summary.line_count
    );
    for (digest, paths) in index.iter() {
        if SKIPPED_KEYS.contains(&digest.as_str()) {
            continue;
        }
        out.push_str(digest.as_str());
        for path in paths {
            out.push('\t');
            out.push_str(path);
        }
        out.push('\n');
    }
    out
}

/// Write `index` to `path`, creating parent directories.
///
/// Returns `false` without touching the filesystem when the index is empty.
pub fn write_index(path: &Path, summary: &RepoSummary, index: &HashIndex) -> Result<bool> {
    if index.is_empty() {
        debug!("Empty index for {}, nothing written", summary.repo_name);
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file = fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(render_index(summary, index).as_bytes())?;
    writer.flush()?;
    Ok(true)
}

/// Parse an index file back into its summary and buckets.
pub fn read_index(path: &Path) -> Result<(RepoSummary, HashIndex)> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_index(&text).with_context(|| format!("Malformed index {}", path.display()))
}

pub fn parse_index(text: &str) -> Result<(RepoSummary, HashIndex)> {
    let mut lines = text.lines();
    let title = lines.next().context("missing title line")?;
    let fields: Vec<&str> = title.split('\t').collect();
    if fields.len() != 4 {
        bail!("title line has {} fields, expected 4", fields.len());
    }
    let count = |i: usize, name: &str| -> Result<usize> {
        fields[i]
            .parse()
            .with_context(|| format!("invalid {} {:?}", name, fields[i]))
    };
    let summary = RepoSummary {
        repo_name: fields[0].to_string(),
        file_count: count(1, "file count")?,
        func_count: count(2, "function count")?,
        line_count: count(3, "line count")?,
    };

    let mut index = HashIndex::new();
    for (n, line) in lines.enumerate() {
        if line.is_empty() {
            continue;
        }
        let mut parts = line.split('\t');
        let raw = parts.next().unwrap_or_default();
        let digest = Digest::from_raw(raw)
            .with_context(|| format!("line {}: invalid digest {:?}", n + 2, raw))?;
        for path in parts {
            index.add(digest.clone(), path);
        }
    }
    Ok((summary, index))
}

/// Write the selected tag → timestamp map as compact, key-ordered JSON
/// (`{"v1":"2020-01-01 00:00:00"}`).
pub fn write_tag_dates(path: &Path, selected: &[TagTime]) -> Result<()> {
    let map: BTreeMap<&str, &str> = selected
        .iter()
        .map(|t| (t.tag.as_str(), t.timestamp.as_str()))
        .collect();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string(&map)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

pub fn read_tag_dates(path: &Path) -> Result<BTreeMap<String, String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digest(c: char) -> Digest {
        Digest::from_raw(&c.to_string().repeat(70)).unwrap()
    }

    #[test]
    fn file_names_escape_slashes() {
        assert_eq!(index_file_name("v1.0"), "fuzzy_v1.0.hidx");
        assert_eq!(index_file_name("release/2.0"), "fuzzy_release@@2.0.hidx");
        assert_eq!(
            index_path(Path::new("out"), "zlib", "v1.3"),
            PathBuf::from("out/zlib/fuzzy_v1.3.hidx")
        );
    }

    #[test]
    fn renders_title_and_buckets() {
        let mut index = HashIndex::new();
        index.add(digest('b'), "src/b.c");
        index.add(digest('a'), "src/a.c");
        index.add(digest('a'), "lib/a.c");
        let summary = RepoSummary {
            repo_name: "demo".to_string(),
            file_count: 3,
            func_count: 3,
            line_count: 42,
        };

        let text = render_index(&summary, &index);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "demo\t3\t3\t42");
        assert_eq!(lines[1], format!("{}\tsrc/a.c\tlib/a.c", "a".repeat(70)));
        assert_eq!(lines[2], format!("{}\tsrc/b.c", "b".repeat(70)));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn blank_key_is_never_written() {
        let mut index = HashIndex::new();
        index.add(Digest::from_raw(" ").unwrap(), "a.c");
        index.add(digest('c'), "c.c");
        let text = render_index(&RepoSummary::new("r"), &index);
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().all(|l| !l.starts_with(' ')));
    }

    #[test]
    fn empty_index_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("r/fuzzy_v1.hidx");
        assert!(!write_index(&path, &RepoSummary::new("r"), &HashIndex::new()).unwrap());
        assert!(!path.exists());
        assert!(!dir.path().join("r").exists());
    }

    #[test]
    fn written_index_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = index_path(dir.path(), "demo", "release/1.0");
        let mut index = HashIndex::new();
        index.add(digest('d'), "x.c");
        index.add(digest('d'), "x.c");
        let summary = RepoSummary {
            repo_name: "demo".to_string(),
            file_count: 1,
            func_count: 2,
            line_count: 10,
        };

        assert!(write_index(&path, &summary, &index).unwrap());
        let (read_summary, read) = read_index(&path).unwrap();
        assert_eq!(read_summary, summary);
        assert_eq!(read, index);
    }

    #[test]
    fn malformed_title_is_rejected() {
        assert!(parse_index("demo\t1\t2\n").is_err());
        assert!(parse_index("demo\tx\t2\t3\n").is_err());
        assert!(parse_index("").is_err());
    }

    #[test]
    fn tag_dates_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dates/zlib");
        write_tag_dates(
            &path,
            &[
                TagTime::new("v1.2", "2020-01-01 00:00:00"),
                TagTime::new("master", "2023-05-06 07:08:09"),
            ],
        )
        .unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            r#"{"master":"2023-05-06 07:08:09","v1.2":"2020-01-01 00:00:00"}"#
        );
        assert_eq!(read_tag_dates(&path).unwrap().len(), 2);
    }
}

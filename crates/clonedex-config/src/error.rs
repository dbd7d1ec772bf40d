//! Configuration errors.

use crate::format::ConfigFormat;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("cannot tell the format of {} (use .toml, .yml, .yaml or .json)", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {format} in {origin}: {message}{excerpt}")]
    Parse {
        format: ConfigFormat,
        origin: String,
        /// 1-based line of the error, when the parser reports one
        line: Option<usize>,
        message: String,
        excerpt: String,
    },

    #[error("'{value}' is not a valid {field} (one of: {})", .options.join(", "))]
    UnknownChoice {
        field: String,
        value: String,
        options: &'static [&'static str],
        suggestion: Option<&'static str>,
    },

    #[error("{var}: {message}")]
    Env { var: String, message: String },

    #[error("{field}: {message}")]
    Invalid { field: String, message: String },
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }

    /// `value` is none of `options`; suggests the nearest one when it is a
    /// likely typo.
    pub fn unknown_choice(
        field: impl Into<String>,
        value: impl Into<String>,
        options: &'static [&'static str],
    ) -> Self {
        let value = value.into();
        let suggestion = nearest(&value, options);
        Self::UnknownChoice {
            field: field.into(),
            value,
            options,
            suggestion,
        }
    }

    pub(crate) fn parse(
        format: ConfigFormat,
        origin: Option<&str>,
        content: &str,
        line: Option<usize>,
        message: impl Into<String>,
    ) -> Self {
        let excerpt = line
            .map(|l| excerpt(content, l))
            .filter(|e| !e.is_empty())
            .map(|e| format!("\n{}", e))
            .unwrap_or_default();
        Self::Parse {
            format,
            origin: origin.unwrap_or("<inline>").to_string(),
            line,
            message: message.into(),
            excerpt,
        }
    }
}

/// Closest option within an edit distance of 2, compared case-insensitively.
fn nearest(value: &str, options: &'static [&'static str]) -> Option<&'static str> {
    let value = value.to_lowercase();
    options
        .iter()
        .map(|opt| (edit_distance(&value, &opt.to_lowercase()), *opt))
        .filter(|(d, _)| *d <= 2)
        .min_by_key(|(d, _)| *d)
        .map(|(_, opt)| opt)
}

fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut diag = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == *cb {
                diag
            } else {
                1 + diag.min(above).min(row[j])
            };
            diag = above;
        }
    }
    row[b.len()]
}

/// The offending line and the one before it, numbered.
fn excerpt(content: &str, line: usize) -> String {
    if line == 0 {
        return String::new();
    }
    content
        .lines()
        .enumerate()
        .skip(line.saturating_sub(2))
        .take_while(|(i, _)| *i < line)
        .map(|(i, text)| {
            let marker = if i + 1 == line { '>' } else { ' ' };
            format!("{} {:>4} | {}", marker, i + 1, text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

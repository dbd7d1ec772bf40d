//! Repository history: tags, their commit times, and checkout.

use crate::versions::TagTime;
use clonedex_config::VersionsConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

static TIME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})").expect("valid regex")
});
static TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"tag: ([^,)]+)").expect("valid regex"));

const DECORATED_LOG: &[&str] = &["log", "--simplify-by-decoration", "--pretty=format:%ai %d"];
const DECORATED_TAG_LOG: &[&str] = &[
    "log",
    "--tags",
    "--simplify-by-decoration",
    "--pretty=format:%ai %d",
];

/// Branch name assumed when git reports none.
pub const FALLBACK_BRANCH: &str = "master";

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("git {args} failed in {repo} after {attempts} attempt(s): {message}")]
    Command {
        repo: PathBuf,
        args: String,
        attempts: usize,
        message: String,
    },
}

/// Version history of one repository.
pub trait HistoryProvider {
    /// Every tag name.
    fn tags(&self) -> Result<Vec<String>, HistoryError>;

    fn default_branch(&self) -> Result<String, HistoryError>;

    /// Commit time of the newest decorated commit, if any.
    fn head_time(&self) -> Result<Option<String>, HistoryError>;

    /// Commit time of every tagged commit.
    fn tag_times(&self) -> Result<Vec<TagTime>, HistoryError>;

    /// Force the working tree to `tag`.
    fn checkout(&self, tag: &str) -> Result<(), HistoryError>;
}

/// Build the tag → timestamp candidates of a repository.
///
/// The default branch is keyed by the head time; tag times follow and
/// overwrite an entry of the same name.
pub fn collect_tag_times(
    provider: &dyn HistoryProvider,
) -> Result<BTreeMap<String, String>, HistoryError> {
    let mut times = BTreeMap::new();

    let branch = provider.default_branch()?;
    match provider.head_time()? {
        Some(ts) => {
            times.insert(branch, ts);
        }
        None => warn!("No head commit time for branch {}", branch),
    }

    if !provider.tags()?.is_empty() {
        for entry in provider.tag_times()? {
            times.insert(entry.tag, entry.timestamp);
        }
    }

    debug!("{} candidate versions", times.len());
    Ok(times)
}

/// [`HistoryProvider`] over the `git` binary.
#[derive(Debug, Clone)]
pub struct GitHistory {
    repo: PathBuf,
    max_attempts: usize,
    retry_delay: Duration,
}

impl GitHistory {
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self::from_config(repo, &VersionsConfig::default())
    }

    pub fn from_config(repo: impl Into<PathBuf>, config: &VersionsConfig) -> Self {
        Self {
            repo: repo.into(),
            max_attempts: config.max_attempts.max(1),
            retry_delay: Duration::from_secs(config.retry_delay_secs),
        }
    }

    pub fn repo(&self) -> &Path {
        &self.repo
    }

    /// Run git with retries and return its stdout.
    fn run(&self, args: &[&str]) -> Result<String, HistoryError> {
        let mut message = String::new();
        for attempt in 1..=self.max_attempts {
            match self.run_once(args) {
                Ok(out) => return Ok(out),
                Err(err) => {
                    warn!(
                        "git {} failed in {} (attempt {}/{}): {}",
                        args.join(" "),
                        self.repo.display(),
                        attempt,
                        self.max_attempts,
                        err
                    );
                    message = err;
                }
            }
            if attempt < self.max_attempts {
                thread::sleep(self.retry_delay);
            }
        }
        Err(HistoryError::Command {
            repo: self.repo.clone(),
            args: args.join(" "),
            attempts: self.max_attempts,
            message,
        })
    }

    fn run_once(&self, args: &[&str]) -> Result<String, String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo)
            .output()
            .map_err(|e| e.to_string())?;
        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(format!(
                "{}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ))
        }
    }
}

impl HistoryProvider for GitHistory {
    fn tags(&self) -> Result<Vec<String>, HistoryError> {
        let out = self.run(&["tag"])?;
        Ok(out
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }

    fn default_branch(&self) -> Result<String, HistoryError> {
        // Detached heads report "HEAD"; fall back to the branch listing.
        if let Ok(out) = self.run_once(&["rev-parse", "--abbrev-ref", "HEAD"]) {
            let name = out.trim();
            if !name.is_empty() && name != "HEAD" {
                return Ok(name.to_string());
            }
        }
        let listing = self.run(&["branch"])?;
        Ok(last_branch_token(&listing).unwrap_or(FALLBACK_BRANCH).to_string())
    }

    fn head_time(&self) -> Result<Option<String>, HistoryError> {
        let out = self.run(DECORATED_LOG)?;
        Ok(out.lines().next().and_then(find_timestamp))
    }

    fn tag_times(&self) -> Result<Vec<TagTime>, HistoryError> {
        Ok(parse_tag_log(&self.run(DECORATED_TAG_LOG)?))
    }

    fn checkout(&self, tag: &str) -> Result<(), HistoryError> {
        self.run(&["checkout", "-f", tag]).map(|_| ())
    }
}

/// Last whitespace-separated token of `git branch` output.
pub fn last_branch_token(listing: &str) -> Option<&str> {
    listing.split_whitespace().last()
}

pub fn find_timestamp(line: &str) -> Option<String> {
    TIME_PATTERN
        .captures(line)
        .map(|caps| caps[1].to_string())
}

/// Parse `git log --tags --simplify-by-decoration` output.
///
/// Lines without a timestamp or a tag are skipped; when a commit carries
/// several tags only the first one is kept.
pub fn parse_tag_log(log: &str) -> Vec<TagTime> {
    log.lines()
        .filter_map(|line| {
            let timestamp = find_timestamp(line)?;
            let tag = TAG_PATTERN.captures(line)?[1].to_string();
            Some(TagTime { tag, timestamp })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAG_LOG: &str = "2023-10-22 21:22:57 +0800  (tag: v2.1, tag: v2.1-final)\n\
2023-01-05 10:00:00 +0000  (tag: release/2.0)\n\
2022-06-30 08:15:42 -0700  (origin/old)\n\
garbage line\n\
2021-03-01 00:00:00 +0000  (HEAD -> main, tag: v1.0, origin/main)";

    #[test]
    fn parses_tag_log() {
        assert_eq!(
            parse_tag_log(TAG_LOG),
            vec![
                TagTime::new("v2.1", "2023-10-22 21:22:57"),
                TagTime::new("release/2.0", "2023-01-05 10:00:00"),
                TagTime::new("v1.0", "2021-03-01 00:00:00"),
            ]
        );
    }

    #[test]
    fn branch_listing() {
        assert_eq!(last_branch_token("* main\n"), Some("main"));
        assert_eq!(
            last_branch_token("* (HEAD detached at v1.0)\n  master\n"),
            Some("master")
        );
        assert_eq!(last_branch_token(""), None);
    }

    struct FakeHistory {
        tags: Vec<TagTime>,
        head: Option<&'static str>,
    }

    impl HistoryProvider for FakeHistory {
        fn tags(&self) -> Result<Vec<String>, HistoryError> {
            Ok(self.tags.iter().map(|t| t.tag.clone()).collect())
        }
        fn default_branch(&self) -> Result<String, HistoryError> {
            Ok("main".to_string())
        }
        fn head_time(&self) -> Result<Option<String>, HistoryError> {
            Ok(self.head.map(String::from))
        }
        fn tag_times(&self) -> Result<Vec<TagTime>, HistoryError> {
            Ok(self.tags.clone())
        }
        fn checkout(&self, _tag: &str) -> Result<(), HistoryError> {
            Ok(())
        }
    }

    #[test]
    fn collects_branch_and_tags() {
        let history = FakeHistory {
            tags: vec![
                TagTime::new("v1", "2020-01-01 00:00:00"),
                TagTime::new("v2", "2021-01-01 00:00:00"),
            ],
            head: Some("2022-01-01 00:00:00"),
        };
        let times = collect_tag_times(&history).unwrap();
        assert_eq!(times.len(), 3);
        assert_eq!(times["main"], "2022-01-01 00:00:00");
        assert_eq!(times["v2"], "2021-01-01 00:00:00");
    }

    #[test]
    fn untagged_repo_has_only_branch() {
        let history = FakeHistory {
            tags: vec![],
            head: Some("2022-01-01 00:00:00"),
        };
        let times = collect_tag_times(&history).unwrap();
        assert_eq!(times.keys().collect::<Vec<_>>(), vec!["main"]);
    }

    #[test]
    fn missing_repo_fails_after_retries() {
        let dir = tempfile::tempdir().unwrap();
        let config = VersionsConfig {
            max_attempts: 2,
            retry_delay_secs: 0,
            ..Default::default()
        };
        let history = GitHistory::from_config(dir.path().join("absent"), &config);
        match history.tags() {
            Err(HistoryError::Command { attempts, .. }) => assert_eq!(attempts, 2),
            other => panic!("expected command error, got {:?}", other),
        }
    }
}

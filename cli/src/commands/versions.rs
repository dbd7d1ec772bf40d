use anyhow::{Context, Result};
use clonedex_pipeline::{collect_tag_times, GitHistory, VersionSelector};
use std::path::Path;

use super::load_config;

pub fn handle_versions(repo: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let history = GitHistory::from_config(repo, &config.versions);
    let candidates = collect_tag_times(&history)
        .with_context(|| format!("Failed to read history of {}", repo.display()))?;
    let selected = VersionSelector::from_config(&config.versions).select(&candidates);

    println!(
        "{} candidate versions, {} selected (clusters = {})",
        candidates.len(),
        selected.len(),
        config.versions.clusters
    );
    for tag in &selected {
        println!(" - {}\t{}", tag.timestamp, tag.tag);
    }
    Ok(())
}

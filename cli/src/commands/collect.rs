use anyhow::Result;
use clonedex_core::symbols;
use clonedex_core::Tlsh;
use clonedex_pipeline::{Collector, GitHistory, RepoReport};
use std::path::Path;
use std::time::Instant;

use super::load_config;

pub fn handle_collect(root: &Path, single: bool, config_path: Option<&Path>) -> Result<()> {
    let started = Instant::now();
    let config = load_config(config_path)?;
    let extractor = symbols::from_config(&config.extractor);
    let collector = Collector::new(&config, extractor.as_ref(), &Tlsh);

    let reports = if single {
        let history = GitHistory::from_config(root, &config.versions);
        vec![collector.collect_repository(root, &history)?]
    } else {
        collector.collect_all(root)?
    };

    for report in &reports {
        print_report(report);
    }
    println!(
        "{} repositories indexed in {:.1}s",
        reports.len(),
        started.elapsed().as_secs_f64()
    );
    Ok(())
}

fn print_report(report: &RepoReport) {
    let written = report
        .versions
        .iter()
        .filter(|v| v.index_file.is_some())
        .count();
    println!(
        "[+] {}: {} versions selected, {} indexed, {} index files",
        report.repo_name,
        report.selected.len(),
        report.versions.len(),
        written
    );
    for version in &report.versions {
        println!(
            "    {} ({}): {} files, {} functions, {} lines",
            version.tag.tag,
            version.tag.timestamp,
            version.summary.file_count,
            version.summary.func_count,
            version.summary.line_count
        );
    }
}

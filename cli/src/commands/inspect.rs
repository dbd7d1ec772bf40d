use anyhow::Result;
use clonedex_pipeline::writer::read_index;
use std::path::Path;

const TOP_BUCKETS: usize = 5;

pub fn handle_inspect(file: &Path) -> Result<()> {
    let (summary, index) = read_index(file)?;

    println!("Repository: {}", summary.repo_name);
    println!(
        "Files: {}  Functions: {}  Lines: {}",
        summary.file_count, summary.func_count, summary.line_count
    );
    println!("Digests: {}", index.len());
    println!("Path entries: {}", index.path_count());

    let mut shared: Vec<(&str, usize)> = index
        .iter()
        .filter(|(_, paths)| paths.len() > 1)
        .map(|(digest, paths)| (digest.as_str(), paths.len()))
        .collect();
    println!("Digests seen more than once: {}", shared.len());

    shared.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    if !shared.is_empty() {
        println!("Largest buckets:");
        for (digest, count) in shared.iter().take(TOP_BUCKETS) {
            println!(" - {} x{}", digest, count);
            if let Some(paths) = index.get(digest) {
                for path in paths.iter().take(3) {
                    println!("     {}", path);
                }
            }
        }
    }
    Ok(())
}

use anyhow::Result;
use clonedex_core::symbols;
use clonedex_core::Tlsh;
use clonedex_pipeline::collector::repo_name;
use clonedex_pipeline::writer::{index_path, write_index};
use clonedex_pipeline::RepositoryIndexer;
use std::path::Path;
use tracing::info;

use super::load_config;

pub fn handle_index(
    path: &Path,
    name: Option<&str>,
    out: Option<&Path>,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let name = match name {
        Some(n) => n.to_string(),
        None => repo_name(path)?,
    };
    let out = match out {
        Some(p) => p.to_path_buf(),
        None => index_path(&config.output.index_dir, &name, &name),
    };

    let extractor = symbols::from_config(&config.extractor);
    info!("Indexing {} with the {} extractor", path.display(), config.extractor.backend);
    let tree = RepositoryIndexer::new(extractor.as_ref(), &Tlsh, &config).index_tree(path, &name)?;

    println!(
        "{}: {} files, {} functions, {} lines, {} digests",
        name,
        tree.summary.file_count,
        tree.summary.func_count,
        tree.summary.line_count,
        tree.index.len()
    );
    if write_index(&out, &tree.summary, &tree.index)? {
        println!("Wrote {}", out.display());
    } else {
        println!("No functions hashed; nothing written");
    }
    Ok(())
}

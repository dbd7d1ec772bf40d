pub mod collect;
pub mod index;
pub mod inspect;
pub mod versions;

pub use collect::handle_collect;
pub use index::handle_index;
pub use inspect::handle_inspect;
pub use versions::handle_versions;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use clonedex_config::{Config, ErrorFormatter};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "clonedex")]
#[command(about = "Function-level fuzzy hash indexes of C/C++ repositories and their versions")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Index selected versions of every repository under ROOT
    Collect {
        /// Directory holding one git checkout per child directory
        root: PathBuf,

        /// Treat ROOT itself as the only repository
        #[arg(long)]
        single: bool,
    },
    /// Index a source tree as it is on disk
    Index {
        path: PathBuf,

        /// Repository name written in the title line (defaults to the directory name)
        #[arg(long)]
        name: Option<String>,

        /// Output file (defaults to <index_dir>/<name>/fuzzy_<name>.hidx)
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Show the versions that would be indexed for a repository
    Versions { repo: PathBuf },
    /// Summarize an index file
    Inspect { file: PathBuf },
}

/// Explicit file if given, otherwise the default locations plus environment.
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let loaded = match config_path {
        Some(p) => Config::from_file(p),
        None => Config::load(),
    };
    loaded.map_err(|e| anyhow!("{}", ErrorFormatter::new(e)))
}

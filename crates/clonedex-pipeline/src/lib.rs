pub mod collector;
pub mod history;
pub mod indexer;
pub mod versions;
pub mod writer;

pub use collector::{Collector, RepoReport, VersionReport};
pub use history::{collect_tag_times, GitHistory, HistoryError, HistoryProvider};
pub use indexer::{HashIndex, IndexedTree, RepositoryIndexer};
pub use versions::{KMeans1d, Partitioner, TagTime, VersionSelector};

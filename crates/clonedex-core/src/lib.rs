pub mod canonical;
pub mod extract;
pub mod fingerprint;
pub mod models;
pub mod scanner;
pub mod symbols;

pub use extract::{ExtractedFile, FunctionExtractor};
pub use fingerprint::{Digest, Fingerprinter, Tlsh};
pub use models::{RepoSummary, SymbolRecord};
pub use symbols::{ExtractError, SymbolExtractor};

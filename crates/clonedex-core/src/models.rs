use serde::{Deserialize, Serialize};

/// Kind string marking a function definition in extractor output.
pub const FUNCTION_KIND: &str = "function";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Language {
    C,
    Cpp,
    Unknown,
}

impl Language {
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "c" => Language::C,
            "cpp" | "cc" | "cxx" | "c++" | "h" | "hh" | "hpp" | "hxx" => Language::Cpp,
            _ => Language::Unknown,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// One symbol located by a symbol extractor.
///
/// Lines are 1-based and inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRecord {
    pub kind: String,
    pub start_line: usize,
    pub end_line: usize,
}

impl SymbolRecord {
    pub fn new(kind: impl Into<String>, start_line: usize, end_line: usize) -> Self {
        Self {
            kind: kind.into(),
            start_line,
            end_line,
        }
    }

    pub fn function(start_line: usize, end_line: usize) -> Self {
        Self::new(FUNCTION_KIND, start_line, end_line)
    }

    pub fn is_function(&self) -> bool {
        self.kind == FUNCTION_KIND
    }

    /// `1 <= start_line <= end_line <= line_count`
    pub fn fits(&self, line_count: usize) -> bool {
        self.start_line >= 1 && self.start_line <= self.end_line && self.end_line <= line_count
    }
}

/// Counters accumulated while indexing one tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSummary {
    pub repo_name: String,
    pub file_count: usize,
    pub func_count: usize,
    pub line_count: usize,
}

impl RepoSummary {
    pub fn new(repo_name: impl Into<String>) -> Self {
        Self {
            repo_name: repo_name.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_bounds() {
        assert!(SymbolRecord::function(1, 3).fits(3));
        assert!(SymbolRecord::function(2, 2).fits(2));
        assert!(!SymbolRecord::function(0, 2).fits(5));
        assert!(!SymbolRecord::function(4, 3).fits(5));
        assert!(!SymbolRecord::function(2, 6).fits(5));
    }

    #[test]
    fn only_function_kind_counts() {
        assert!(SymbolRecord::function(1, 1).is_function());
        assert!(!SymbolRecord::new("prototype", 1, 1).is_function());
    }

    #[test]
    fn language_from_extension() {
        assert_eq!(Language::from_extension("c"), Language::C);
        assert_eq!(Language::from_extension("cc"), Language::Cpp);
        assert_eq!(Language::from_extension("rs"), Language::Unknown);
    }
}

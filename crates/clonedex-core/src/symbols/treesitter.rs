use super::{ExtractError, SymbolExtractor};
use crate::models::{Language, SymbolRecord};
use std::path::Path;

/// In-process extractor built on the tree-sitter C and C++ grammars.
///
/// `.c` files use the C grammar, everything else the C++ one. Each
/// `function_definition` node becomes a function record spanning the node.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeSitterExtractor;

impl SymbolExtractor for TreeSitterExtractor {
    fn extract(&self, path: &Path, source: &str) -> Result<Vec<SymbolRecord>, ExtractError> {
        let language = path
            .extension()
            .and_then(|e| e.to_str())
            .map(Language::from_extension)
            .unwrap_or(Language::Unknown);

        // Parsers are not Send, so each call builds its own.
        let mut parser = tree_sitter::Parser::new();
        match language {
            Language::C => parser
                .set_language(&tree_sitter_c::LANGUAGE.into())
                .map_err(|_| ExtractError::Grammar("C"))?,
            _ => parser
                .set_language(&tree_sitter_cpp::LANGUAGE.into())
                .map_err(|_| ExtractError::Grammar("C++"))?,
        }

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| ExtractError::Parse(path.to_path_buf()))?;

        let mut records = Vec::new();
        let mut stack = vec![tree.root_node()];
        while let Some(node) = stack.pop() {
            for child in node.children(&mut node.walk()) {
                stack.push(child);
            }
            if node.kind() == "function_definition" {
                records.push(SymbolRecord::function(
                    node.start_position().row + 1,
                    node.end_position().row + 1,
                ));
            }
        }

        records.sort_by_key(|r| (r.start_line, r.end_line));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_c_functions() {
        let src = "#include <stdio.h>\n\nint add(int a, int b)\n{\n    return a + b;\n}\n\nint zero(void) { return 0; }\n";
        let records = TreeSitterExtractor
            .extract(Path::new("math.c"), src)
            .unwrap();
        assert_eq!(
            records,
            vec![SymbolRecord::function(3, 6), SymbolRecord::function(8, 8)]
        );
    }

    #[test]
    fn finds_cpp_methods() {
        let src = "class A {\npublic:\n  int get() const {\n    return v;\n  }\n  int v;\n};\n";
        let records = TreeSitterExtractor
            .extract(Path::new("a.cpp"), src)
            .unwrap();
        assert_eq!(records, vec![SymbolRecord::function(3, 5)]);
    }

    #[test]
    fn prototypes_are_not_functions() {
        let records = TreeSitterExtractor
            .extract(Path::new("decl.c"), "int f(void);\n")
            .unwrap();
        assert!(records.is_empty());
    }
}

use clonedex_core::extract::FunctionExtractor;
use clonedex_core::symbols::TreeSitterExtractor;
use clonedex_core::Tlsh;
use pretty_assertions::assert_eq;
use std::fs;

const PARSER: &str = r#"/* option parser */
static int parse_option(const char *arg, struct options *opts)
{
    // long form first
    if (strncmp(arg, "--level=", 8) == 0) {
        opts->level = atoi(arg + 8);
        return 0;
    }
    if (strcmp(arg, "--verbose") == 0) {
        opts->verbose = 1;
        return 0;
    }
    fprintf(stderr, "unknown option: %s\n", arg);
    return -1;
}

int tiny(void) { return 1; }
"#;

#[test]
fn tree_sitter_and_tlsh_over_a_real_file() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(root.join("src/opts.c"), PARSER).unwrap();

    let extractor = FunctionExtractor::new(&TreeSitterExtractor, &Tlsh);
    let file = extractor
        .extract_file(root, &root.join("src/opts.c"))
        .unwrap();

    assert_eq!(file.relative_path, "src/opts.c");
    assert_eq!(file.line_count, 17);
    // `tiny` is below the fingerprint's minimum size.
    assert_eq!(file.digests.len(), 1);
    let digest = file.digests[0].as_str();
    assert_eq!(digest.len(), 70);
    assert!(digest
        .chars()
        .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
}

#[test]
fn reformatted_copy_shares_digest() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    let reformatted = PARSER
        .replace("    ", "\t")
        .replace("// long form first", "/* long form first */");
    fs::write(root.join("a.c"), PARSER).unwrap();
    fs::write(root.join("b.c"), reformatted).unwrap();

    let extractor = FunctionExtractor::new(&TreeSitterExtractor, &Tlsh);
    let a = extractor.extract_file(root, &root.join("a.c")).unwrap();
    let b = extractor.extract_file(root, &root.join("b.c")).unwrap();
    assert_eq!(a.digests, b.digests);
}

#[test]
fn unreadable_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let extractor = FunctionExtractor::new(&TreeSitterExtractor, &Tlsh);
    assert!(extractor
        .extract_file(dir.path(), &dir.path().join("missing.c"))
        .is_err());
}

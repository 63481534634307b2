//! Small pure helpers for the Rust extractor: doc comments, test-file
//! naming, and the builtin blocklist for call resolution.

use crate::adapter::SyntaxNode;

/// Whether `path` names a Rust test file per the self-hosting pattern in
/// the test-file table: suffix `_test.rs`.
pub fn is_test_file(path: &str) -> bool {
    path.strip_suffix(".rs").map(|stem| stem.ends_with("_test")).unwrap_or(false)
}

/// Whether `name` carries one of the test-routine prefixes reserved for
/// test files (`Test`, `Benchmark`, `Example`, `Fuzz`).
pub fn test_routine_prefix(name: &str) -> Option<&'static str> {
    for (prefix, tag) in [("Test", "test"), ("Benchmark", "benchmark"), ("Example", "example"), ("Fuzz", "fuzz")] {
        if name.starts_with(prefix) && name.len() > prefix.len() {
            return Some(tag);
        }
    }
    None
}

/// Calls the resolver never treats as user routines: language builtins and
/// common macro-like forms that would otherwise pollute the call graph.
pub fn is_builtin(name: &str) -> bool {
    matches!(
        name,
        "println" | "print" | "eprintln" | "eprint" | "format" | "vec" | "panic" | "assert" | "assert_eq" | "assert_ne" | "matches" | "todo" | "unimplemented" | "unreachable" | "write" | "writeln" | "dbg"
    )
}

/// Collects the contiguous block of `///` line comments immediately
/// preceding `node` (its doc comment), stripping the `///` marker and
/// surrounding whitespace from each line.
pub fn preceding_doc_comment<'t, N: SyntaxNode<'t>>(node: N, source: &[u8]) -> Option<String> {
    let parent = node.parent()?;
    let mut siblings = Vec::new();
    let mut i = 0;
    while let Some(child) = parent.child(i) {
        siblings.push(child);
        i += 1;
    }
    let idx = siblings.iter().position(|s| nodes_equal(*s, node))?;
    let mut lines = Vec::new();
    let mut cursor = idx;
    while cursor > 0 {
        cursor -= 1;
        let candidate = siblings[cursor];
        if candidate.kind() != "line_comment" {
            break;
        }
        let text = candidate.text(source);
        if !text.trim_start().starts_with("///") {
            break;
        }
        lines.push(text.trim_start().trim_start_matches('/').trim().to_string());
    }
    if lines.is_empty() {
        None
    } else {
        lines.reverse();
        Some(lines.join("\n"))
    }
}

fn nodes_equal<'t, N: SyntaxNode<'t>>(a: N, b: N) -> bool {
    a.start_line() == b.start_line() && a.end_line() == b.end_line() && a.kind() == b.kind()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_suffix() {
        assert!(is_test_file("src/parser_test.rs"));
        assert!(!is_test_file("src/parser.rs"));
    }

    #[test]
    fn routine_prefixes() {
        assert_eq!(test_routine_prefix("TestParse"), Some("test"));
        assert_eq!(test_routine_prefix("BenchmarkParse"), Some("benchmark"));
        assert_eq!(test_routine_prefix("Test"), None);
        assert_eq!(test_routine_prefix("parse"), None);
    }

    #[test]
    fn builtin_blocklist() {
        assert!(is_builtin("println"));
        assert!(!is_builtin("parse_file"));
    }
}

//! Thin wrapper around `tree_sitter::Parser` that turns source bytes into a
//! parsed `Tree` for a given [`Language`]. Extractors walk the resulting tree
//! through the [`crate::adapter::SyntaxNode`] trait; this module's only job
//! is selecting the grammar and producing the tree.

use codegraph_core::error::ExtractError;
use codegraph_core::model::Language;
use tree_sitter::{Parser, Tree};

fn grammar_for(language: Language) -> Option<tree_sitter::Language> {
    match language {
        Language::Rust => Some(tree_sitter_rust::LANGUAGE.into()),
        // `.ts`/`.js` use the plain grammar; `.tsx`/`.jsx` need the JSX
        // variant — see `parse_typescript` for the extension-driven choice.
        Language::TypeScript => Some(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()),
        Language::JavaScript => Some(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()),
        Language::Python => Some(tree_sitter_python::LANGUAGE.into()),
        Language::Java => Some(tree_sitter_java::LANGUAGE.into()),
        Language::Ruby => Some(tree_sitter_ruby::LANGUAGE.into()),
        // Makefile has no tree-sitter grammar in this workspace; its
        // extractor reads lines directly instead of going through this path.
        Language::Make => None,
    }
}

fn run_parser(grammar: tree_sitter::Language, language_tag: &str, path: &str, source: &[u8]) -> Result<Tree, ExtractError> {
    let mut parser = Parser::new();
    parser.set_language(&grammar).map_err(|e| ExtractError::Syntax {
        file: path.to_string(),
        message: format!("failed to load {language_tag} grammar: {e}"),
    })?;
    parser.parse(source, None).ok_or_else(|| ExtractError::Syntax {
        file: path.to_string(),
        message: "tree-sitter returned no tree".to_string(),
    })
}

/// Parses `source` as `language`, returning the tree-sitter tree the caller
/// then walks via `tree.root_node()` and the `SyntaxNode` adapter.
pub fn parse(language: Language, path: &str, source: &[u8]) -> Result<Tree, ExtractError> {
    let grammar = grammar_for(language).ok_or_else(|| ExtractError::UnsupportedLanguage(language.to_string()))?;
    run_parser(grammar, &language.to_string(), path, source)
}

/// Parses TypeScript/JavaScript source, selecting the JSX-aware grammar
/// variant when `jsx` is set (i.e. the file extension is `.tsx`/`.jsx`).
/// Kept separate from [`parse`] because the JSX choice depends on the file
/// extension, not on the `Language` tag alone (a `.jsx` file is tagged
/// `Language::JavaScript`, same as a plain `.js` file).
pub fn parse_typescript(path: &str, source: &[u8], jsx: bool) -> Result<Tree, ExtractError> {
    let grammar: tree_sitter::Language = if jsx {
        tree_sitter_typescript::LANGUAGE_TSX.into()
    } else {
        tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()
    };
    run_parser(grammar, "typescript", path, source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rust_source() {
        let tree = parse(Language::Rust, "a.rs", b"fn main() {}").unwrap();
        assert_eq!(tree.root_node().kind(), "source_file");
    }

    #[test]
    fn parses_python_source() {
        let tree = parse(Language::Python, "a.py", b"def f():\n    pass\n").unwrap();
        assert_eq!(tree.root_node().kind(), "module");
    }

    #[test]
    fn make_has_no_grammar() {
        assert!(matches!(
            parse(Language::Make, "Makefile", b"all:\n"),
            Err(ExtractError::UnsupportedLanguage(_))
        ));
    }
}

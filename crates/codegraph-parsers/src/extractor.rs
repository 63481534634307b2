//! The per-language extractor contract (spec §4.2 / §6).

use codegraph_core::error::ExtractError;
use codegraph_core::model::{Edge, Language, Node};

/// Output of a single `parse_file` call: a self-contained slice of the graph.
#[derive(Debug, Clone, Default)]
pub struct ExtractionResult {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl ExtractionResult {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A language-specific front end. Every extractor is stateless across calls:
/// all intermediate state for a single file lives in a value created on
/// entry to `parse_file` and dropped on exit (spec §5).
pub trait LanguageExtractor: Send + Sync {
    /// Canonical language tag, e.g. `"python"`.
    fn language(&self) -> Language;

    /// File extensions this extractor owns, each beginning with `.`.
    fn extensions(&self) -> &'static [&'static str];

    /// Exact file-name matches consulted only when extension lookup misses
    /// (e.g. `Makefile`). Empty for extension-matched languages.
    fn filenames(&self) -> &'static [&'static str] {
        &[]
    }

    /// Parses one file and emits its self-contained slice of the graph.
    ///
    /// Returns `Err` only on a hard syntax failure the adapter cannot
    /// recover from; a tree it can parse but doesn't fully understand is
    /// handled by skipping the unrecognized construct, not by failing.
    fn parse_file(&self, path: &str, bytes: &[u8]) -> Result<ExtractionResult, ExtractError>;
}

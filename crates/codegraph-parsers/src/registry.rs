//! Parser registry (spec §4.4): maps a file extension or exact filename to
//! the extractor responsible for it.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use codegraph_core::model::Language;

use crate::extractor::LanguageExtractor;

/// Thread-safe, insertion-ordered map from [`Language`] to extractor, plus
/// auxiliary extension/filename indexes.
///
/// Intended usage is register-at-init, lookup-at-work: build the registry
/// once on startup, then share it (it only grows behind `&self`, never
/// mutates after construction is done) across as many parallel `parse_file`
/// callers as the outer scheduler wants.
pub struct ParserRegistry {
    order: Vec<Language>,
    by_language: HashMap<Language, Arc<dyn LanguageExtractor>>,
    by_extension: HashMap<String, Language>,
    by_filename: HashMap<String, Language>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        ParserRegistry {
            order: Vec::new(),
            by_language: HashMap::new(),
            by_extension: HashMap::new(),
            by_filename: HashMap::new(),
        }
    }

    /// Registers `extractor`, indexing it by language, extension, and
    /// filename. Re-registering the same language replaces the prior
    /// extractor but keeps its original position in `order`.
    pub fn register(&mut self, extractor: Arc<dyn LanguageExtractor>) {
        let lang = extractor.language();
        if !self.by_language.contains_key(&lang) {
            self.order.push(lang);
        }
        for ext in extractor.extensions() {
            self.by_extension.insert(ext.trim_start_matches('.').to_string(), lang);
        }
        for name in extractor.filenames() {
            self.by_filename.insert((*name).to_string(), lang);
        }
        self.by_language.insert(lang, extractor);
    }

    /// Resolves the extractor for `path`: extension first, exact filename
    /// fallback. Returns `None` when neither matches (spec §7: "unknown
    /// file" is the caller's concern, not an error of the core).
    pub fn parser_for_file(&self, path: &Path) -> Option<Arc<dyn LanguageExtractor>> {
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            if let Some(lang) = self.by_extension.get(ext) {
                return self.by_language.get(lang).cloned();
            }
        }
        let file_name = path.file_name()?.to_str()?;
        let lang = self.by_filename.get(file_name)?;
        self.by_language.get(lang).cloned()
    }

    pub fn supported_extensions(&self) -> Vec<String> {
        let mut exts: Vec<String> = self.by_extension.keys().cloned().collect();
        exts.sort();
        exts
    }

    pub fn supported_filenames(&self) -> Vec<String> {
        let mut names: Vec<String> = self.by_filename.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn languages(&self) -> &[Language] {
        &self.order
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codegraph_core::error::ExtractError;
    use crate::extractor::ExtractionResult;

    struct FakeExtractor;
    impl LanguageExtractor for FakeExtractor {
        fn language(&self) -> Language {
            Language::Make
        }
        fn extensions(&self) -> &'static [&'static str] {
            &[]
        }
        fn filenames(&self) -> &'static [&'static str] {
            &["Makefile", "GNUmakefile"]
        }
        fn parse_file(&self, _path: &str, _bytes: &[u8]) -> Result<ExtractionResult, ExtractError> {
            Ok(ExtractionResult::new())
        }
    }

    struct FakeRust;
    impl LanguageExtractor for FakeRust {
        fn language(&self) -> Language {
            Language::Rust
        }
        fn extensions(&self) -> &'static [&'static str] {
            &[".rs"]
        }
        fn parse_file(&self, _path: &str, _bytes: &[u8]) -> Result<ExtractionResult, ExtractError> {
            Ok(ExtractionResult::new())
        }
    }

    #[test]
    fn resolves_by_extension() {
        let mut reg = ParserRegistry::new();
        reg.register(Arc::new(FakeRust));
        let p = reg.parser_for_file(Path::new("src/main.rs"));
        assert!(p.is_some());
        assert_eq!(p.unwrap().language(), Language::Rust);
    }

    #[test]
    fn falls_back_to_filename() {
        let mut reg = ParserRegistry::new();
        reg.register(Arc::new(FakeExtractor));
        let p = reg.parser_for_file(Path::new("project/Makefile"));
        assert!(p.is_some());
        assert_eq!(p.unwrap().language(), Language::Make);
    }

    #[test]
    fn unmatched_file_returns_none() {
        let reg = ParserRegistry::new();
        assert!(reg.parser_for_file(Path::new("a.unknownext")).is_none());
    }

    #[test]
    fn extension_checked_before_filename() {
        let mut reg = ParserRegistry::new();
        reg.register(Arc::new(FakeRust));
        reg.register(Arc::new(FakeExtractor));
        // a file named "Makefile.rs" has an extension match, so it's Rust.
        let p = reg.parser_for_file(Path::new("Makefile.rs"));
        assert_eq!(p.unwrap().language(), Language::Rust);
    }
}

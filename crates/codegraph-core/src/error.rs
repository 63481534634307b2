/// Hard-failure taxonomy for the extraction pipeline (spec §7).
///
/// Only a syntax error that the adapter cannot recover from reaches this
/// type. "Unknown file" is a registry miss (`Option::None`, not an `Err`) and
/// "structural surprise" / "resolution miss" are silently absorbed inside
/// `parse_file` — see the per-language extractors.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("failed to parse {file}: {message}")]
    Syntax { file: String, message: String },

    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),
}

//! Shared HTTP route/client detection helpers (spec §4.2.3), reused by every
//! extractor that recognizes a framework-specific call pattern. Nothing here
//! executes code: detection is purely structural, pattern-matching call
//! shapes and string literals.

use crate::adapter::SyntaxNode;

/// Maps an HTTP-verb method name (`get`, `post`, …) to its upper-case form,
/// the way Express/Gin/Rails route binders spell it. Returns `None` for
/// names that aren't a recognized verb, so callers can cheaply reject
/// unrelated method calls.
pub fn http_method_from_name(name: &str) -> Option<&'static str> {
    match name.to_ascii_lowercase().as_str() {
        "get" => Some("GET"),
        "post" => Some("POST"),
        "put" => Some("PUT"),
        "patch" => Some("PATCH"),
        "delete" => Some("DELETE"),
        "all" => Some("ALL"),
        _ => None,
    }
}

/// Whether `name`, lower-cased, reads like an HTTP client object
/// (`httpClient`, `apiClient`, `axiosInstance`, a bare `client`…) per the
/// generic `<obj>.<method>(<url>)` signal in §4.2.3.
pub fn looks_like_http_client_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.contains("http") || lower.contains("client") || lower.contains("api") || lower.contains("axios")
}

/// Node kinds a language's grammar uses for plain/template/concatenated
/// string expressions, so [`extract_url_literal`] can stay language-generic.
pub struct UrlLiteralKinds {
    /// Plain quoted string literal node kinds.
    pub string_kinds: &'static [&'static str],
    /// Template / interpolated string node kinds (backtick strings, f-strings).
    pub template_kinds: &'static [&'static str],
    /// Binary concatenation expression node kinds (e.g. `a + b`).
    pub concat_kinds: &'static [&'static str],
}

/// Extracts a best-effort path string from a URL argument expression,
/// per the three rules in §4.2.3:
///
/// - a plain string literal is used as-is (quotes stripped);
/// - a template/interpolated string keeps its literal segments and replaces
///   every substitution with `*`;
/// - a concatenation descends the left operand for the literal part and
///   appends `*` for every non-literal part, returning an empty string (not
///   `None`) when no literal segment exists anywhere in the chain.
///
/// Returns `None` when `node` isn't one of the three recognized shapes at
/// all (e.g. a bare identifier passed as the URL).
pub fn extract_url_literal<'t, N: SyntaxNode<'t>>(node: N, source: &[u8], kinds: &UrlLiteralKinds) -> Option<String> {
    let kind = node.kind();
    if kinds.string_kinds.contains(&kind) {
        Some(strip_quotes(node.text(source)))
    } else if kinds.template_kinds.contains(&kind) {
        Some(extract_template(node, source, kinds))
    } else if kinds.concat_kinds.contains(&kind) {
        let mut found_literal = false;
        let joined = concat_walk(node, source, kinds, &mut found_literal);
        Some(if found_literal { joined } else { String::new() })
    } else {
        None
    }
}

fn concat_walk<'t, N: SyntaxNode<'t>>(node: N, source: &[u8], kinds: &UrlLiteralKinds, found_literal: &mut bool) -> String {
    let kind = node.kind();
    if kinds.string_kinds.contains(&kind) {
        *found_literal = true;
        strip_quotes(node.text(source))
    } else if kinds.template_kinds.contains(&kind) {
        *found_literal = true;
        extract_template(node, source, kinds)
    } else if kinds.concat_kinds.contains(&kind) {
        let mut out = String::new();
        if let Some(left) = node.child_by_field("left") {
            out.push_str(&concat_walk(left, source, kinds, found_literal));
        }
        if let Some(right) = node.child_by_field("right") {
            out.push_str(&concat_walk(right, source, kinds, found_literal));
        }
        out
    } else {
        "*".to_string()
    }
}

/// Walks a template/interpolated string's children: quoted literal text
/// passes through, anything else (a `${...}` substitution, an f-string
/// `{...}` interpolation) collapses to a single `*`.
fn extract_template<'t, N: SyntaxNode<'t>>(node: N, source: &[u8], kinds: &UrlLiteralKinds) -> String {
    let mut out = String::new();
    let mut i = 0;
    while let Some(child) = node.child(i) {
        let kind = child.kind();
        if kind == "`" || kind == "\"" || kind == "'" {
            // delimiter punctuation, skip
        } else if kinds.string_kinds.contains(&kind) || is_plain_text_kind(kind) {
            out.push_str(child.text(source));
        } else {
            out.push('*');
        }
        i += 1;
    }
    out
}

fn is_plain_text_kind(kind: &str) -> bool {
    matches!(
        kind,
        "template_chars" | "string_fragment" | "string_content" | "interpolation_string_content"
    )
}

fn strip_quotes(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.len() >= 2 {
        let first = trimmed.as_bytes()[0];
        let last = trimmed.as_bytes()[trimmed.len() - 1];
        if (first == b'"' || first == b'\'' || first == b'`') && first == last {
            return trimmed[1..trimmed.len() - 1].to_string();
        }
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_method_names_are_uppercased() {
        assert_eq!(http_method_from_name("get"), Some("GET"));
        assert_eq!(http_method_from_name("DELETE"), Some("DELETE"));
        assert_eq!(http_method_from_name("all"), Some("ALL"));
        assert_eq!(http_method_from_name("list"), None);
    }

    #[test]
    fn client_name_heuristic() {
        assert!(looks_like_http_client_name("apiClient"));
        assert!(looks_like_http_client_name("httpClient"));
        assert!(!looks_like_http_client_name("repo"));
    }

    #[test]
    fn strip_quotes_handles_all_quote_styles() {
        assert_eq!(strip_quotes("\"/users\""), "/users");
        assert_eq!(strip_quotes("'/users'"), "/users");
        assert_eq!(strip_quotes("`/users`"), "/users");
    }
}

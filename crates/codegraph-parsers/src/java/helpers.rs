//! Small pure helpers for the Java extractor.

use crate::adapter::SyntaxNode;

/// Whether `path` names a Java test file: per the test-file pattern table,
/// the path contains a `test` directory segment.
pub fn is_test_file(path: &str) -> bool {
    path.split('/').any(|segment| segment.eq_ignore_ascii_case("test") || segment.eq_ignore_ascii_case("tests"))
}

/// Strips generic type arguments from a type reference, e.g. `List<User>` ->
/// `List`.
pub fn strip_generics(name: &str) -> String {
    name.split('<').next().unwrap_or(name).trim().to_string()
}

/// Collects annotation names and modifier keywords from a Java `modifiers`
/// node (the optional first child of a declaration). Annotation names are
/// taken from `marker_annotation`/`annotation` nodes' `name` field;
/// modifier keywords are every other direct child's literal text.
pub fn read_modifiers<'t, N: SyntaxNode<'t>>(modifiers: N, source: &[u8]) -> (Vec<String>, Vec<String>) {
    let mut annotations = Vec::new();
    let mut keywords = Vec::new();
    let mut i = 0;
    while let Some(child) = modifiers.child(i) {
        i += 1;
        match child.kind() {
            "marker_annotation" | "annotation" => {
                if let Some(name) = child.child_by_field("name") {
                    annotations.push(name.text(source).to_string());
                }
            }
            _ => {
                let text = child.text(source).trim().to_string();
                if !text.is_empty() {
                    keywords.push(text);
                }
            }
        }
    }
    (annotations, keywords)
}

/// Finds the `modifiers` node among `item`'s positional children, if any
/// (Java grammar places it as an optional first child, not a named field).
pub fn find_modifiers<'t, N: SyntaxNode<'t>>(item: N) -> Option<N> {
    let mut i = 0;
    while let Some(child) = item.child(i) {
        i += 1;
        if child.kind() == "modifiers" {
            return Some(child);
        }
    }
    None
}

/// Whether any captured annotation name equals `wanted` (case-sensitive,
/// ignoring a leading `@` that should already be stripped by the caller).
pub fn has_annotation(annotations: &[String], wanted: &str) -> bool {
    annotations.iter().any(|a| a == wanted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_detected_by_directory_segment() {
        assert!(is_test_file("src/test/java/com/example/UserTest.java"));
        assert!(!is_test_file("src/main/java/com/example/User.java"));
    }

    #[test]
    fn strip_generics_drops_type_parameters() {
        assert_eq!(strip_generics("List<User>"), "List");
        assert_eq!(strip_generics("Plain"), "Plain");
    }
}

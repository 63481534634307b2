//! Small pure helpers for the Ruby extractor.

/// Whether `path` names a Ruby test file: `*_spec.rb` (RSpec) or `*_test.rb`
/// (Minitest), per the test-file pattern table.
pub fn is_test_file(path: &str) -> bool {
    path.strip_suffix(".rb").map(|stem| stem.ends_with("_spec") || stem.ends_with("_test")).unwrap_or(false)
}

/// Whether `name` carries the `test_` prefix Minitest reserves for test
/// methods.
pub fn is_test_routine_name(name: &str) -> bool {
    name.starts_with("test_")
}

/// The HTTP-verb route methods Rails' router DSL and Sinatra both expose at
/// the top level.
pub fn http_verb_method(name: &str) -> Option<&'static str> {
    match name {
        "get" => Some("GET"),
        "post" => Some("POST"),
        "put" => Some("PUT"),
        "patch" => Some("PATCH"),
        "delete" => Some("DELETE"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_suffixes() {
        assert!(is_test_file("spec/models/user_spec.rb"));
        assert!(is_test_file("test/models/user_test.rb"));
        assert!(!is_test_file("app/models/user.rb"));
    }

    #[test]
    fn test_routine_prefix() {
        assert!(is_test_routine_name("test_creates_user"));
        assert!(!is_test_routine_name("creates_user"));
    }

    #[test]
    fn http_verb_methods() {
        assert_eq!(http_verb_method("get"), Some("GET"));
        assert_eq!(http_verb_method("list"), None);
    }
}

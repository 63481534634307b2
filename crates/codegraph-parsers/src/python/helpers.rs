//! Small pure helpers for the Python extractor.

/// Whether `path` names a test file: `test_*.py` or `*_test.py`.
pub fn is_test_file(path: &str) -> bool {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    file_name.starts_with("test_") || file_name.ends_with("_test.py")
}

/// Whether `name` reads as a test routine by pytest/unittest convention.
pub fn is_test_routine_name(name: &str) -> bool {
    name.starts_with("test_") || name.starts_with("test")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_test_file_conventions() {
        assert!(is_test_file("tests/test_models.py"));
        assert!(is_test_file("app/models_test.py"));
        assert!(!is_test_file("app/models.py"));
    }

    #[test]
    fn recognizes_test_routine_prefix() {
        assert!(is_test_routine_name("test_create_user"));
        assert!(!is_test_routine_name("create_user"));
    }
}

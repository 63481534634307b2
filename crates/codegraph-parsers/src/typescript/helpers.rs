//! Small pure helpers for the TypeScript/JavaScript extractor.

/// Whether `path` names a JS/TS test file: suffix `.test.{js,jsx,ts,tsx}` or
/// `.spec.{js,jsx,ts,tsx}`.
pub fn is_test_file(path: &str) -> bool {
    const SUFFIXES: &[&str] = &[
        ".test.js", ".test.jsx", ".test.ts", ".test.tsx", ".spec.js", ".spec.jsx", ".spec.ts", ".spec.tsx",
    ];
    SUFFIXES.iter().any(|s| path.ends_with(s))
}

/// Strips generic parameters from an `implements`/`extends` type reference,
/// e.g. `Foo<Bar>` -> `Foo`.
pub fn strip_generics(name: &str) -> String {
    name.split('<').next().unwrap_or(name).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_test_and_spec_suffixes() {
        assert!(is_test_file("src/app.test.ts"));
        assert!(is_test_file("src/app.spec.tsx"));
        assert!(!is_test_file("src/app.ts"));
    }

    #[test]
    fn strip_generics_drops_type_parameters() {
        assert_eq!(strip_generics("Repository<User>"), "Repository");
        assert_eq!(strip_generics("Plain"), "Plain");
    }
}

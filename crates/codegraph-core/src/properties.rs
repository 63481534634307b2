//! Shared helpers for the comma-joined / space-joined property strings every
//! extractor writes and the classifier re-parses (spec §9 "structured
//! evidence in property strings").

/// Splits a comma-joined property value, trims each piece, and drops empty
/// entries. Used for `annotations`, `decorators`, `bases`, `extends`,
/// `implements`, `methods`, `fields`, `constants`.
pub fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Joins pieces into the comma-joined form `split_csv` parses back out.
pub fn join_csv<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Splits a space-joined property value (used for `modifiers`).
pub fn split_ws(value: &str) -> Vec<String> {
    value
        .split_whitespace()
        .map(|s| s.to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_trims_and_drops_empty() {
        assert_eq!(
            split_csv(" Foo, Bar ,, Baz"),
            vec!["Foo".to_string(), "Bar".to_string(), "Baz".to_string()]
        );
    }

    #[test]
    fn split_csv_empty_string_is_empty_vec() {
        assert!(split_csv("").is_empty());
    }

    #[test]
    fn join_then_split_round_trips() {
        let items = vec!["Entity", "Table"];
        let joined = join_csv(items.clone());
        assert_eq!(split_csv(&joined), items);
    }
}

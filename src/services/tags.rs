use std::collections::HashSet;

/// Splits a comma-delimited tag string into a set of lowercase, trimmed,
/// non-empty tokens. Absent or blank input yields an empty set.
pub fn tokenize(raw: Option<&str>) -> HashSet<String> {
    match raw {
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_lowercase)
            .collect(),
        None => HashSet::new(),
    }
}

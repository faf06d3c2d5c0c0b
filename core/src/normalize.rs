/// Lowercase and trim an ingredient or query term.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Normalize query terms, dropping any that end up empty.
pub fn normalize_terms<S: AsRef<str>>(terms: &[S]) -> Vec<String> {
    terms
        .iter()
        .map(|t| normalize(t.as_ref()))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Split user input like `"Chicken, mushroom ,garlic"` into raw terms.
pub fn split_ingredients(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{N}]+").expect("word pattern is valid"));

/// Distinct lowercase tokens of an indexed field.
pub fn tokenize_text(text: &str) -> HashSet<String> {
    tokenize_query(text).into_iter().collect()
}

/// Lowercase tokens of a query, in order, duplicates kept.
pub fn tokenize_query(query: &str) -> Vec<String> {
    WORD.find_iter(&query.to_lowercase())
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Edit distance tolerated for a query token, by its length:
/// up to 2 chars exact, 3 to 5 chars one edit, longer two edits.
pub fn allowed_edits(token: &str) -> usize {
    match token.chars().count() {
        0..=2 => 0,
        3..=5 => 1,
        _ => 2,
    }
}

/// True when `candidate` is within the allowed edit distance of `token`.
pub fn fuzzy_eq(token: &str, candidate: &str) -> bool {
    let edits = allowed_edits(token);
    if edits == 0 {
        return token == candidate;
    }
    let len_gap = token.chars().count().abs_diff(candidate.chars().count());
    len_gap <= edits && strsim::levenshtein(token, candidate) <= edits
}

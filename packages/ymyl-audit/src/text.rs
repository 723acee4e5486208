//! Text normalization helpers used across extraction and matching.

/// Collapse runs of whitespace (including control characters) into single
/// spaces and trim the ends.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// True if the string contains any non-whitespace character.
pub fn has_any_text(s: &str) -> bool {
    s.chars().any(|c| !c.is_whitespace())
}

/// Strip non-newline control characters that commonly corrupt LLM JSON
/// output (tabs become spaces, carriage returns vanish).
pub fn strip_control_chars(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            '\t' => Some(' '),
            '\r' => None,
            c if c.is_control() && c != '\n' => None,
            c => Some(c),
        })
        .collect()
}

/// Maximum length of a normalized match key.
///
/// Bounded so that two long texts differing only in a trailing clause still
/// collide onto the same key after the merge agent trims one of them.
const MATCH_KEY_MAX_LEN: usize = 120;

/// Normalize text into a fuzzy lookup key: casefolded, alphanumerics only,
/// truncated. Used to re-associate records whose wording was lightly edited
/// (trailing punctuation, capitalization) by the filter agent.
pub fn normalized_match_key(text: &str) -> String {
    let mut key: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect();
    key.truncate(MATCH_KEY_MAX_LEN);
    key
}

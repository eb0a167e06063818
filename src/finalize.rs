//! Response finalizer

/// Characters accepted as the end of a finished answer
const TERMINAL_PUNCTUATION: [char; 3] = ['.', '!', '?'];

/// Normalize a finished answer: trim surrounding whitespace and make sure a
/// non-empty answer ends with terminal punctuation.
pub fn normalize(answer: &str) -> String {
    let trimmed = answer.trim();
    let mut out = trimmed.to_string();
    if let Some(last) = trimmed.chars().last() {
        if !TERMINAL_PUNCTUATION.contains(&last) {
            out.push('.');
        }
    }
    out
}

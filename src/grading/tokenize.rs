//! Text normalisation into lowercase word tokens.
//!
//! Both the expected script line and the ASR transcript go through
//! [`tokenize`] before alignment, so the two sides are always compared in the
//! same normal form.

use std::sync::OnceLock;

use regex::Regex;

/// Everything that is not a letter, number, underscore, whitespace or an
/// apostrophe.  Combining marks count as punctuation.
fn punctuation() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\p{L}\p{N}_\s']").expect("punctuation pattern is valid"))
}

/// Split `text` into lowercase word tokens.
///
/// Punctuation is replaced by a space (apostrophes survive, so `"it's"` stays
/// one token), then the text is split on Unicode whitespace.  No stemming is
/// performed.  Empty or whitespace-only input yields an empty vector.
///
/// ```
/// use speech_coach::grading::tokenize;
///
/// assert_eq!(tokenize("I like coffee!"), vec!["i", "like", "coffee"]);
/// assert!(tokenize("   ").is_empty());
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    punctuation()
        .replace_all(&lowered, " ")
        .split_whitespace()
        .map(str::to_owned)
        .collect()
}

//! Filler-word detection over the transcript tokens.

/// Single-token fillers.
pub const FILLER_WORDS: [&str; 7] = ["um", "uh", "uhm", "umm", "erm", "hmm", "like"];

/// Two-token filler phrases, each counted once.
pub const FILLER_PHRASES: [(&str, &str); 1] = [("you", "know")];

/// Result of [`count_fillers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FillerCount {
    /// Number of filler words and phrases found.
    pub fillers: usize,
    /// Number of tokens scanned.
    pub total_tokens: usize,
}

impl FillerCount {
    /// `fillers / max(1, total_tokens)`; `0.0` for an empty transcript.
    pub fn ratio(&self) -> f64 {
        self.fillers as f64 / self.total_tokens.max(1) as f64
    }
}

/// Scan `tokens` left to right for fillers.
///
/// Every position is consumed by the first rule that matches: a single filler
/// word advances one token, a filler phrase advances two, anything else
/// advances one.  Overlapping matches are therefore never double counted.
pub fn count_fillers(tokens: &[String]) -> FillerCount {
    let mut fillers = 0;
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        if FILLER_WORDS.contains(&token) {
            fillers += 1;
            i += 1;
            continue;
        }
        let phrase = tokens
            .get(i + 1)
            .map(|next| (token, next.as_str()))
            .filter(|pair| FILLER_PHRASES.contains(pair));
        if phrase.is_some() {
            fillers += 1;
            i += 2;
            continue;
        }
        i += 1;
    }

    FillerCount {
        fillers,
        total_tokens: tokens.len(),
    }
}

//! Script turns, their grading state, and the update payload the grader emits.

use serde::{Deserialize, Serialize};

use crate::analysis::TurnSpeechAnalysis;
use crate::grading::TurnScore;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Who speaks a turn.  Only user turns are graded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Ai,
    User,
}

// ---------------------------------------------------------------------------
// TurnState
// ---------------------------------------------------------------------------

/// Grading state of a turn.
///
/// ```text
/// Pending ──grade──▶ Scored
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnState {
    /// No score recorded yet.
    #[default]
    Pending,
    /// A score has been written.
    Scored,
}

impl TurnState {
    /// A short human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            TurnState::Pending => "Pending",
            TurnState::Scored => "Scored",
        }
    }
}

// ---------------------------------------------------------------------------
// Turn
// ---------------------------------------------------------------------------

/// One line of a practice script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turn {
    pub index: usize,
    pub role: Role,
    /// The line the learner is expected to say (for user turns).
    pub text: String,
    #[serde(default)]
    pub score: Option<TurnScore>,
    #[serde(default)]
    pub mispronounced_words: Option<Vec<String>>,
    /// Reference pronunciation audio.
    #[serde(default)]
    pub model_audio_url: Option<String>,
    /// The learner's recording.
    #[serde(default)]
    pub user_audio_url: Option<String>,
    #[serde(default)]
    pub speech_analysis: Option<TurnSpeechAnalysis>,
}

impl Turn {
    pub fn new(index: usize, role: Role, text: impl Into<String>) -> Self {
        Self {
            index,
            role,
            text: text.into(),
            score: None,
            mispronounced_words: None,
            model_audio_url: None,
            user_audio_url: None,
            speech_analysis: None,
        }
    }

    pub fn state(&self) -> TurnState {
        if self.score.is_some() {
            TurnState::Scored
        } else {
            TurnState::Pending
        }
    }

    /// Overwrite every field the update carries a value for.
    pub fn apply(&mut self, update: TurnUpdate) {
        if let Some(score) = update.score {
            self.score = Some(score);
        }
        if update.mispronounced_words.is_some() {
            self.mispronounced_words = update.mispronounced_words;
        }
        if update.user_audio_url.is_some() {
            self.user_audio_url = update.user_audio_url;
        }
        if update.speech_analysis.is_some() {
            self.speech_analysis = update.speech_analysis;
        }
    }
}

// ---------------------------------------------------------------------------
// TurnUpdate
// ---------------------------------------------------------------------------

/// Result of grading one turn, ready to be persisted by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnUpdate {
    /// Which turn in the script to update.
    pub index: usize,
    pub score: Option<TurnScore>,
    /// `None` rather than an empty list when nothing was mispronounced.
    pub mispronounced_words: Option<Vec<String>>,
    pub user_audio_url: Option<String>,
    pub speech_analysis: Option<TurnSpeechAnalysis>,
}

// ---------------------------------------------------------------------------
// Script
// ---------------------------------------------------------------------------

/// The ordered turns of a practice session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    pub turns: Vec<Turn>,
}

impl Script {
    pub fn new(turns: Vec<Turn>) -> Self {
        Self { turns }
    }

    pub fn turn(&self, index: usize) -> Option<&Turn> {
        self.turns.get(index)
    }

    /// Apply `update` to the turn at `update.index`.  Returns `false` when
    /// the index is out of range.
    pub fn apply_update(&mut self, update: TurnUpdate) -> bool {
        match self.turns.get_mut(update.index) {
            Some(turn) => {
                turn.apply(update);
                true
            }
            None => false,
        }
    }

    /// Mean over scored turns of each turn's mean score; `None` when no turn
    /// has been scored.
    pub fn average_score(&self) -> Option<f64> {
        let per_turn: Vec<f64> = self
            .turns
            .iter()
            .filter_map(|t| t.score.as_ref().map(TurnScore::mean))
            .collect();
        if per_turn.is_empty() {
            return None;
        }
        Some(per_turn.iter().sum::<f64>() / per_turn.len() as f64)
    }

    /// `true` when every user turn has a score.
    pub fn is_completed(&self) -> bool {
        !self.turns.is_empty()
            && self
                .turns
                .iter()
                .filter(|t| t.role == Role::User)
                .all(|t| t.state() == TurnState::Scored)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn score(c: u8, f: u8, h: u8) -> TurnScore {
        TurnScore {
            confidence: c,
            fluency: f,
            hesitation: h,
        }
    }

    fn script() -> Script {
        Script::new(vec![
            Turn::new(0, Role::Ai, "Hi, what can I get you?"),
            Turn::new(1, Role::User, "I like coffee"),
            Turn::new(2, Role::Ai, "Anything else?"),
            Turn::new(3, Role::User, "No, thank you"),
        ])
    }

    #[test]
    fn new_turn_is_pending() {
        let turn = Turn::new(0, Role::User, "hello");
        assert_eq!(turn.state(), TurnState::Pending);
        assert_eq!(turn.state().label(), "Pending");
    }

    #[test]
    fn applying_a_score_moves_to_scored() {
        let mut s = script();
        let applied = s.apply_update(TurnUpdate {
            index: 1,
            score: Some(score(80, 70, 90)),
            mispronounced_words: Some(vec!["coffee".into()]),
            user_audio_url: Some("https://cdn/turn-1.mp3".into()),
            speech_analysis: None,
        });
        assert!(applied);
        let turn = s.turn(1).unwrap();
        assert_eq!(turn.state(), TurnState::Scored);
        assert_eq!(turn.mispronounced_words.as_deref(), Some(&["coffee".to_string()][..]));
        assert_eq!(turn.user_audio_url.as_deref(), Some("https://cdn/turn-1.mp3"));
    }

    #[test]
    fn update_out_of_range_is_rejected() {
        let mut s = script();
        let applied = s.apply_update(TurnUpdate {
            index: 9,
            score: Some(score(1, 1, 1)),
            mispronounced_words: None,
            user_audio_url: None,
            speech_analysis: None,
        });
        assert!(!applied);
    }

    #[test]
    fn average_score_over_scored_turns() {
        let mut s = script();
        assert_eq!(s.average_score(), None);

        s.turns[1].score = Some(score(90, 60, 30)); // mean 60
        s.turns[3].score = Some(score(100, 100, 100)); // mean 100
        let avg = s.average_score().unwrap();
        assert!((avg - 80.0).abs() < 1e-9);
    }

    #[test]
    fn completed_when_every_user_turn_is_scored() {
        let mut s = script();
        assert!(!s.is_completed());
        s.turns[1].score = Some(score(50, 50, 50));
        assert!(!s.is_completed());
        s.turns[3].score = Some(score(50, 50, 50));
        assert!(s.is_completed());
        assert!(!Script::default().is_completed());
    }

    #[test]
    fn turn_json_uses_camel_case_and_lowercase_role() {
        let mut turn = Turn::new(1, Role::User, "I like coffee");
        turn.model_audio_url = Some("https://cdn/model.mp3".into());
        let value = serde_json::to_value(&turn).unwrap();
        assert_eq!(value["role"], "user");
        assert_eq!(value["modelAudioUrl"], "https://cdn/model.mp3");
        assert!(value["score"].is_null());

        let minimal: Turn =
            serde_json::from_str(r#"{"index": 0, "role": "ai", "text": "Hello"}"#).unwrap();
        assert_eq!(minimal.role, Role::Ai);
        assert_eq!(minimal.state(), TurnState::Pending);
    }
}

//! Builds a [`TurnSpeechAnalysis`] from an alignment.
//!
//! Every aligned pair is classified exactly once:
//!
//! | Pair                           | `op`         | Outcome                                  |
//! |--------------------------------|--------------|------------------------------------------|
//! | both sides, equal              | `match`      | ignored, `exact_match`                   |
//! | expected only                  | `delete`     | ignored, `deletion`                      |
//! | actual only                    | `insert`     | ignored, `insertion`                     |
//! | both sides, distance ≤ cutoff  | `substitute` | mispronounced (first time), else `deduped` |
//! | both sides, distance > cutoff  | `substitute` | ignored, `too_far_from_expected`         |

use std::collections::{HashMap, HashSet};

use crate::analysis::types::{
    AlignedPair, AlignmentMeta, AlignmentSummary, AsrMeta, Extra, IgnoredDifference,
    IgnoredReason, MispronouncedLogicMeta, MispronouncedReason, MispronouncedWord, PairOp, Token,
    TokenizationMeta, TurnSpeechAnalysis,
};
use crate::grading::{
    edit_distance, normalized_edit_distance, word_error_rate, AlignmentResult, WordPair,
};

/// Inputs to [`build_speech_analysis`].
#[derive(Debug, Clone)]
pub struct AnalysisInput<'a> {
    pub expected_text: &'a str,
    pub asr_text: &'a str,
    pub expected_tokens: &'a [String],
    pub actual_tokens: &'a [String],
    pub alignment: &'a AlignmentResult,
    /// Output of [`select_mispronounced`](crate::grading::select_mispronounced);
    /// the report's mispronounced words follow this order.
    pub mispronounced_words: &'a [String],
    pub threshold: f64,
    pub asr_model: Option<&'a str>,
    pub asr_parameters: Extra,
}

fn classify(pair: &WordPair) -> PairOp {
    match (&pair.expected, &pair.actual) {
        (Some(expected), Some(actual)) if expected != actual => PairOp::Substitute,
        (Some(_), None) => PairOp::Delete,
        (None, Some(_)) => PairOp::Insert,
        _ => PairOp::Match,
    }
}

/// Walk `input.alignment` and assemble the full report.
pub fn build_speech_analysis(input: AnalysisInput<'_>) -> TurnSpeechAnalysis {
    let AnalysisInput {
        expected_text,
        asr_text,
        expected_tokens,
        actual_tokens,
        alignment,
        mispronounced_words: reference_order,
        threshold,
        asr_model,
        asr_parameters,
    } = input;

    let mut aligned_pairs = Vec::with_capacity(alignment.aligned_pairs.len());
    let mut ignored_differences = Vec::new();
    let mut mispronounced_words: Vec<MispronouncedWord> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    let mut next_expected = 0usize;
    let mut next_actual = 0usize;

    for pair in &alignment.aligned_pairs {
        let expected_idx = pair.expected.as_ref().map(|_| {
            next_expected += 1;
            next_expected - 1
        });
        let actual_idx = pair.actual.as_ref().map(|_| {
            next_actual += 1;
            next_actual - 1
        });

        let expected = pair.expected_str();
        let actual = pair.actual_str();
        let op = classify(pair);

        let aligned = AlignedPair {
            op,
            expected_idx,
            actual_idx,
            expected: expected.to_owned(),
            actual: actual.to_owned(),
            edit_distance: edit_distance(expected, actual),
            normalized_edit_distance: normalized_edit_distance(expected, actual),
        };

        let ignored_because = match op {
            PairOp::Insert => Some(IgnoredReason::Insertion),
            PairOp::Delete => Some(IgnoredReason::Deletion),
            PairOp::Match => Some(IgnoredReason::ExactMatch),
            PairOp::Substitute if aligned.normalized_edit_distance > threshold => {
                Some(IgnoredReason::TooFarFromExpected)
            }
            PairOp::Substitute if !seen.insert(expected) => Some(IgnoredReason::Deduped),
            PairOp::Substitute => None,
        };

        match ignored_because {
            Some(reason) => {
                ignored_differences.push(IgnoredDifference::from_pair(&aligned, reason));
            }
            None => mispronounced_words.push(MispronouncedWord {
                expected: aligned.expected.clone(),
                actual: aligned.actual.clone(),
                expected_idx,
                actual_idx,
                normalized_edit_distance: aligned.normalized_edit_distance,
                reason: MispronouncedReason::NearMiss,
                timing: None,
                deduped: false,
            }),
        }

        aligned_pairs.push(aligned);
    }

    // The selector's list is authoritative for ordering; anything it does not
    // know about sorts by its expected index.
    let order: HashMap<&str, usize> = reference_order
        .iter()
        .enumerate()
        .map(|(i, word)| (word.as_str(), i))
        .collect();
    mispronounced_words.sort_by_key(|word| {
        order
            .get(word.expected.as_str())
            .copied()
            .unwrap_or(word.expected_idx.unwrap_or(0))
    });

    let alignment_summary = AlignmentSummary {
        substitutions: alignment.substitutions,
        insertions: alignment.insertions,
        deletions: alignment.deletions,
        correct: expected_tokens
            .len()
            .saturating_sub(alignment.substitutions + alignment.deletions),
        wer: word_error_rate(alignment, expected_tokens.len()),
    };

    TurnSpeechAnalysis {
        expected_text: expected_text.to_owned(),
        asr_text: asr_text.to_owned(),
        asr_meta: AsrMeta {
            model: asr_model.map(str::to_owned),
            parameters: asr_parameters,
            raw_response: None,
        },
        tokenization_meta: TokenizationMeta::default(),
        alignment_meta: AlignmentMeta::with_threshold(threshold),
        mispronounced_logic_meta: MispronouncedLogicMeta::with_threshold(threshold),
        expected_tokens: to_tokens(expected_tokens),
        actual_tokens: to_tokens(actual_tokens),
        aligned_pairs,
        alignment_summary,
        mispronounced_words,
        ignored_differences,
        extra: Extra::new(),
    }
}

fn to_tokens(tokens: &[String]) -> Vec<Token> {
    tokens
        .iter()
        .enumerate()
        .map(|(idx, text)| Token::new(idx, text.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::{
        align_words, select_mispronounced, tokenize, DEFAULT_MISPRONOUNCED_THRESHOLD,
    };

    fn analyse(expected_text: &str, asr_text: &str) -> (TurnSpeechAnalysis, Vec<String>) {
        let expected_tokens = tokenize(expected_text);
        let actual_tokens = tokenize(asr_text);
        let alignment = align_words(&expected_tokens, &actual_tokens);
        let selected = select_mispronounced(&alignment, DEFAULT_MISPRONOUNCED_THRESHOLD);
        let analysis = build_speech_analysis(AnalysisInput {
            expected_text,
            asr_text,
            expected_tokens: &expected_tokens,
            actual_tokens: &actual_tokens,
            alignment: &alignment,
            mispronounced_words: &selected,
            threshold: DEFAULT_MISPRONOUNCED_THRESHOLD,
            asr_model: Some("test-model"),
            asr_parameters: Extra::new(),
        });
        (analysis, selected)
    }

    fn reasons(analysis: &TurnSpeechAnalysis) -> Vec<IgnoredReason> {
        analysis
            .ignored_differences
            .iter()
            .map(|d| d.ignored_because)
            .collect()
    }

    #[test]
    fn near_miss_is_reported() {
        let (analysis, _) = analyse("I like coffee", "i like cofee");

        assert_eq!(analysis.mispronounced_words.len(), 1);
        let word = &analysis.mispronounced_words[0];
        assert_eq!(word.expected, "coffee");
        assert_eq!(word.actual, "cofee");
        assert_eq!(word.reason, MispronouncedReason::NearMiss);
        assert_eq!(word.expected_idx, Some(2));
        assert_eq!(word.actual_idx, Some(2));
        assert!(!word.deduped);
        assert!(word.normalized_edit_distance <= DEFAULT_MISPRONOUNCED_THRESHOLD);

        let summary = analysis.alignment_summary;
        assert_eq!(summary.substitutions, 1);
        assert_eq!(summary.insertions, 0);
        assert_eq!(summary.deletions, 0);
        assert_eq!(summary.correct, 2);
        assert!((summary.wer - 1.0 / 3.0).abs() < 1e-9);

        assert_eq!(reasons(&analysis), vec![IgnoredReason::ExactMatch; 2]);
        let matched: Vec<&str> = analysis
            .ignored_differences
            .iter()
            .map(|d| d.expected.as_str())
            .collect();
        assert_eq!(matched, vec!["i", "like"]);
    }

    #[test]
    fn every_pair_lands_in_exactly_one_list() {
        let (analysis, _) = analyse(
            "please pass the salt and the pepper",
            "um please pas the salad pepper",
        );
        assert_eq!(
            analysis.aligned_pairs.len(),
            analysis.mispronounced_words.len() + analysis.ignored_differences.len()
        );
    }

    #[test]
    fn insertions_and_deletions_are_ignored_with_reason() {
        let (analysis, _) = analyse("see you tomorrow", "uh see you");
        let ops: Vec<PairOp> = analysis.aligned_pairs.iter().map(|p| p.op).collect();
        assert_eq!(
            ops,
            vec![PairOp::Insert, PairOp::Match, PairOp::Match, PairOp::Delete]
        );
        assert_eq!(
            reasons(&analysis),
            vec![
                IgnoredReason::Insertion,
                IgnoredReason::ExactMatch,
                IgnoredReason::ExactMatch,
                IgnoredReason::Deletion,
            ]
        );
        assert!(analysis.mispronounced_words.is_empty());
    }

    #[test]
    fn cursors_only_advance_on_present_sides() {
        let (analysis, _) = analyse("see you tomorrow", "uh see you");
        let idx: Vec<(Option<usize>, Option<usize>)> = analysis
            .aligned_pairs
            .iter()
            .map(|p| (p.expected_idx, p.actual_idx))
            .collect();
        assert_eq!(
            idx,
            vec![
                (None, Some(0)),
                (Some(0), Some(1)),
                (Some(1), Some(2)),
                (Some(2), None),
            ]
        );
        let deleted = &analysis.aligned_pairs[3];
        assert_eq!(deleted.actual, "");
        assert_eq!(deleted.edit_distance, "tomorrow".len());
        assert_eq!(deleted.normalized_edit_distance, 1.0);
    }

    #[test]
    fn distant_substitution_is_too_far() {
        let (analysis, selected) = analyse("I like coffee", "i like tea");
        assert!(selected.is_empty());
        assert!(analysis.mispronounced_words.is_empty());
        let last = analysis.ignored_differences.last().unwrap();
        assert_eq!(last.op, PairOp::Substitute);
        assert_eq!(last.ignored_because, IgnoredReason::TooFarFromExpected);
    }

    #[test]
    fn repeated_near_miss_is_deduped() {
        let (analysis, selected) = analyse("water and water", "watter and wader");
        assert_eq!(selected, vec!["water"]);
        assert_eq!(analysis.mispronounced_words.len(), 1);
        assert_eq!(analysis.mispronounced_words[0].actual, "watter");

        let deduped: Vec<&IgnoredDifference> = analysis
            .ignored_differences
            .iter()
            .filter(|d| d.ignored_because == IgnoredReason::Deduped)
            .collect();
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].actual, "wader");
        assert_eq!(deduped[0].expected_idx, Some(2));
    }

    #[test]
    fn follows_the_reference_order() {
        let expected_tokens = tokenize("alpha beta");
        let actual_tokens = tokenize("alpho betta");
        let alignment = align_words(&expected_tokens, &actual_tokens);
        let reversed = vec!["beta".to_string(), "alpha".to_string()];

        let analysis = build_speech_analysis(AnalysisInput {
            expected_text: "alpha beta",
            asr_text: "alpho betta",
            expected_tokens: &expected_tokens,
            actual_tokens: &actual_tokens,
            alignment: &alignment,
            mispronounced_words: &reversed,
            threshold: DEFAULT_MISPRONOUNCED_THRESHOLD,
            asr_model: None,
            asr_parameters: Extra::new(),
        });

        let order: Vec<&str> = analysis
            .mispronounced_words
            .iter()
            .map(|w| w.expected.as_str())
            .collect();
        assert_eq!(order, vec!["beta", "alpha"]);
    }

    fn order_with_reference(expected: &str, actual: &str, reference: &[&str]) -> Vec<String> {
        let expected_tokens = tokenize(expected);
        let actual_tokens = tokenize(actual);
        let alignment = align_words(&expected_tokens, &actual_tokens);
        let reference: Vec<String> = reference.iter().map(|w| w.to_string()).collect();

        build_speech_analysis(AnalysisInput {
            expected_text: expected,
            asr_text: actual,
            expected_tokens: &expected_tokens,
            actual_tokens: &actual_tokens,
            alignment: &alignment,
            mispronounced_words: &reference,
            threshold: DEFAULT_MISPRONOUNCED_THRESHOLD,
            asr_model: None,
            asr_parameters: Extra::new(),
        })
        .mispronounced_words
        .into_iter()
        .map(|w| w.expected)
        .collect()
    }

    #[test]
    fn words_missing_from_the_reference_sort_by_expected_index() {
        // alpha falls back to key 0 and ties with beta at rank 0; the sort is stable.
        assert_eq!(
            order_with_reference("alpha beta", "alpho betta", &["beta"]),
            vec!["alpha", "beta"]
        );
        // alpha → 0, beta → 1 (fallback), gamma → 0 (rank).
        assert_eq!(
            order_with_reference("alpha beta gamma", "alpho betta gama", &["gamma"]),
            vec!["alpha", "gamma", "beta"]
        );
        assert_eq!(
            order_with_reference("alpha beta", "alpho betta", &[]),
            vec!["alpha", "beta"]
        );
    }

    #[test]
    fn agrees_with_the_selector() {
        let (analysis, selected) = analyse(
            "the cat sat on the mat with the hat",
            "the kat sat on da mat wit the hat",
        );
        let reported: Vec<String> = analysis
            .mispronounced_words
            .iter()
            .map(|w| w.expected.clone())
            .collect();
        assert_eq!(reported, selected);
    }

    #[test]
    fn empty_transcript_is_all_deletions() {
        let (analysis, _) = analyse("good morning", "");
        assert!(analysis.actual_tokens.is_empty());
        assert_eq!(analysis.alignment_summary.deletions, 2);
        assert_eq!(analysis.alignment_summary.correct, 0);
        assert_eq!(analysis.alignment_summary.wer, 1.0);
        assert_eq!(reasons(&analysis), vec![IgnoredReason::Deletion; 2]);
    }

    #[test]
    fn metadata_is_echoed() {
        let mut parameters = Extra::new();
        parameters.insert("estimated_tokens".into(), 200.into());

        let expected_tokens = tokenize("hello");
        let alignment = align_words(&expected_tokens, &expected_tokens);
        let analysis = build_speech_analysis(AnalysisInput {
            expected_text: "Hello!",
            asr_text: "hello",
            expected_tokens: &expected_tokens,
            actual_tokens: &expected_tokens,
            alignment: &alignment,
            mispronounced_words: &[],
            threshold: 0.25,
            asr_model: Some("whisper-1"),
            asr_parameters: parameters,
        });

        assert_eq!(analysis.expected_text, "Hello!");
        assert_eq!(analysis.asr_meta.model.as_deref(), Some("whisper-1"));
        assert_eq!(analysis.asr_meta.parameters["estimated_tokens"], 200);
        assert_eq!(analysis.alignment_meta.threshold, 0.25);
        assert_eq!(analysis.mispronounced_logic_meta.threshold, 0.25);
        assert_eq!(analysis.expected_tokens, vec![Token::new(0, "hello")]);
    }

    #[test]
    fn serialises_with_camel_case_keys() {
        let (analysis, _) = analyse("I like coffee", "i like cofee");
        let value = serde_json::to_value(&analysis).unwrap();
        for key in [
            "expectedText",
            "asrText",
            "asrMeta",
            "tokenizationMeta",
            "alignmentMeta",
            "mispronouncedLogicMeta",
            "expectedTokens",
            "actualTokens",
            "alignedPairs",
            "alignmentSummary",
            "mispronouncedWords",
            "ignoredDifferences",
        ] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(value["alignmentSummary"]["correct"], 2);
        assert_eq!(value["mispronouncedWords"][0]["reason"], "near_miss");
        assert_eq!(value["alignedPairs"][2]["op"], "substitute");
        assert_eq!(value["tokenizationMeta"]["stripPunctuation"], true);

        let back: TurnSpeechAnalysis = serde_json::from_value(value).unwrap();
        assert_eq!(back, analysis);
    }
}

//! Pure composition of the grading core: text in, scores and report out.

use crate::analysis::{build_speech_analysis, AnalysisInput, TurnSpeechAnalysis};
use crate::asr::Transcript;
use crate::config::ScoringConfig;
use crate::grading::{tokenize, ScoreCalculator, ScoreReport};

/// Everything computed for one turn from its expected text and transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnEvaluation {
    pub report: ScoreReport,
    pub analysis: TurnSpeechAnalysis,
}

/// Tokenize both texts, score the transcript and build the speech analysis.
///
/// No I/O; the same inputs always produce the same evaluation.
pub fn evaluate_turn(
    expected_text: &str,
    transcript: &Transcript,
    config: &ScoringConfig,
    leniency: f64,
) -> TurnEvaluation {
    let expected_tokens = tokenize(expected_text);
    let actual_tokens = tokenize(&transcript.text);

    let report =
        ScoreCalculator::new(config.clone()).score(&expected_tokens, &actual_tokens, leniency);

    let analysis = build_speech_analysis(AnalysisInput {
        expected_text,
        asr_text: &transcript.text,
        expected_tokens: &expected_tokens,
        actual_tokens: &actual_tokens,
        alignment: &report.alignment,
        mispronounced_words: &report.mispronounced_words,
        threshold: config.mispronounced_threshold,
        asr_model: transcript.model.as_deref(),
        asr_parameters: transcript.parameters.clone(),
    });

    TurnEvaluation { report, analysis }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::IgnoredReason;
    use crate::grading::TurnScore;

    #[test]
    fn coffee_scenario_end_to_end() {
        let evaluation = evaluate_turn(
            "I like coffee",
            &Transcript::new("i like cofee"),
            &ScoringConfig::default(),
            1.0,
        );

        let analysis = &evaluation.analysis;
        assert_eq!(
            analysis.expected_tokens.iter().map(|t| t.text.as_str()).collect::<Vec<_>>(),
            vec!["i", "like", "coffee"]
        );
        assert_eq!(
            analysis.actual_tokens.iter().map(|t| t.text.as_str()).collect::<Vec<_>>(),
            vec!["i", "like", "cofee"]
        );
        assert_eq!(analysis.alignment_summary.correct, 2);
        assert_eq!(analysis.mispronounced_words[0].expected, "coffee");
        assert!(analysis
            .ignored_differences
            .iter()
            .all(|d| d.ignored_because == IgnoredReason::ExactMatch));

        assert_eq!(evaluation.report.mispronounced_words, vec!["coffee"]);
        assert_eq!(
            evaluation.report.score,
            TurnScore {
                confidence: 63,
                fluency: 20,
                hesitation: 53
            }
        );
    }

    #[test]
    fn report_and_analysis_agree() {
        let evaluation = evaluate_turn(
            "She sells sea shells by the sea shore",
            &Transcript::new("um she sell see shells by the the shore"),
            &ScoringConfig::default(),
            1.0,
        );
        let reported: Vec<&str> = evaluation
            .analysis
            .mispronounced_words
            .iter()
            .map(|w| w.expected.as_str())
            .collect();
        assert_eq!(reported, evaluation.report.mispronounced_words);
        assert_eq!(evaluation.analysis.alignment_summary.wer, evaluation.report.wer);
    }

    #[test]
    fn threshold_flows_into_metadata() {
        let config = ScoringConfig {
            mispronounced_threshold: 0.2,
            ..ScoringConfig::default()
        };
        let evaluation = evaluate_turn("hello", &Transcript::new("hello"), &config, 1.0);
        assert_eq!(evaluation.analysis.alignment_meta.threshold, 0.2);
        assert_eq!(evaluation.analysis.mispronounced_logic_meta.threshold, 0.2);
    }
}

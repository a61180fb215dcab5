//! Command-line entry point for speech-coach.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Parse the command line.
//! 3. Load [`AppConfig`] from disk (returns default on first run).
//! 4. Run the subcommand; only `grade` needs the [`tokio`] runtime.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::json;

use speech_coach::{
    asr::{self, Transcript},
    config::{AppConfig, AppPaths},
    pipeline::{evaluate_turn, GradeRequest, TurnGrader},
    session::{Role, Script, Turn},
    storage,
};

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(author, version, about = "Grade spoken repetitions of a script line")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score a transcript against the expected text (no network I/O).
    Score {
        /// The line the learner was asked to say.
        #[arg(long)]
        expected: String,

        /// What the learner actually said.
        #[arg(long)]
        actual: String,

        /// Grading leniency, clamped to [0.5, 1.5]. Defaults to the configured value.
        #[arg(long)]
        leniency: Option<f64>,

        /// Print single-line JSON.
        #[arg(long)]
        compact: bool,
    },

    /// Transcribe a recording, score it and upload the audio.
    Grade {
        /// The line the learner was asked to say.
        #[arg(long)]
        expected: String,

        /// Path to the learner's MP3 recording.
        #[arg(long)]
        audio: PathBuf,

        #[arg(long)]
        user: String,

        #[arg(long)]
        session: String,

        #[arg(long)]
        leniency: Option<f64>,
    },

    /// Print the effective configuration as TOML.
    Config {
        /// Also write it to settings.toml.
        #[arg(long)]
        write: bool,
    },
}

// ---------------------------------------------------------------------------
// Subcommands
// ---------------------------------------------------------------------------

fn run_score(
    config: &AppConfig,
    expected: &str,
    actual: &str,
    leniency: Option<f64>,
    compact: bool,
) -> anyhow::Result<()> {
    let leniency = leniency.unwrap_or(config.scoring.default_leniency);
    let evaluation = evaluate_turn(expected, &Transcript::new(actual), &config.scoring, leniency);
    let report = &evaluation.report;

    let value = json!({
        "score": report.score,
        "wer": report.wer,
        "fillerCount": report.filler_count,
        "totalTokens": report.total_tokens,
        "mispronouncedWords": report.mispronounced_words,
        "speechAnalysis": evaluation.analysis,
    });

    let out = if compact {
        serde_json::to_string(&value)?
    } else {
        serde_json::to_string_pretty(&value)?
    };
    println!("{out}");
    Ok(())
}

async fn run_grade(
    config: &AppConfig,
    expected: String,
    audio_path: &std::path::Path,
    user: &str,
    session: &str,
    leniency: Option<f64>,
) -> anyhow::Result<()> {
    let audio = tokio::fs::read(audio_path)
        .await
        .with_context(|| format!("reading {}", audio_path.display()))?;

    let grader = TurnGrader::new(
        asr::from_config(&config.asr),
        storage::from_config(&config.storage),
        config.scoring.clone(),
    )
    .with_key_prefix(config.storage.key_prefix.clone());

    let mut script = Script::new(vec![Turn::new(0, Role::User, expected)]);
    let outcome = grader
        .grade(
            &script,
            GradeRequest {
                user_id: user,
                session_id: session,
                turn_index: 0,
                audio: &audio,
                leniency,
            },
        )
        .await?;

    log::info!(
        "graded: expected={:?} transcript={:?} wer={:.3} fillers={}/{}",
        outcome.expected_text,
        outcome.transcript_text,
        outcome.wer,
        outcome.filler_count,
        outcome.total_tokens
    );

    println!("{}", serde_json::to_string_pretty(&outcome.update)?);
    script.apply_update(outcome.update);
    if let Some(avg) = script.average_score() {
        log::info!("session average score: {avg:.1}");
    }
    Ok(())
}

fn run_config(config: &AppConfig, write: bool) -> anyhow::Result<()> {
    print!("{}", toml::to_string_pretty(config)?);
    if write {
        config.save()?;
        log::info!("wrote {}", AppPaths::new().settings_file.display());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 2. Command line
    let cli = Cli::parse();

    // 3. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 4. Dispatch
    match cli.command {
        Command::Score {
            expected,
            actual,
            leniency,
            compact,
        } => run_score(&config, &expected, &actual, leniency, compact),

        Command::Grade {
            expected,
            audio,
            user,
            session,
            leniency,
        } => {
            let rt = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(2)
                .enable_all()
                .build()
                .context("failed to create tokio runtime")?;
            rt.block_on(run_grade(&config, expected, &audio, &user, &session, leniency))
        }

        Command::Config { write } => run_config(&config, write),
    }
}

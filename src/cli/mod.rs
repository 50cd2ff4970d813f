//! Command-line interface for transcription-eval.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **evaluate**: Score an estimated transcription against a reference
//! - **match**: List the matched `(reference, estimate)` note pairs
//!
//! ## Usage
//!
//! ```text
//! # Standard report (with and without offsets)
//! transcription-eval evaluate ref.txt est.txt
//!
//! # JSON output, also saved to a file
//! transcription-eval --format json evaluate ref.txt est.txt -o scores.json
//!
//! # Show which notes matched, ignoring offsets
//! transcription-eval match ref.txt est.txt --no-offset
//! ```

use clap::{Parser, Subcommand};

use crate::matching::engine::{
    MatchingConfig, DEFAULT_OFFSET_MIN_TOLERANCE, DEFAULT_OFFSET_RATIO, DEFAULT_ONSET_TOLERANCE,
    DEFAULT_PITCH_TOLERANCE,
};

pub mod evaluate;
pub mod matches;

#[derive(Parser)]
#[command(name = "transcription-eval")]
#[command(version)]
#[command(about = "Evaluate note-level music transcription against a reference")]
#[command(
    long_about = "transcription-eval compares an estimated note transcription with a reference annotation.\n\nBoth files list one note per line as `onset offset pitch` (seconds, seconds, Hz). Notes are paired by a maximum matching under onset, pitch and offset tolerances and scored with precision, recall and F-measure."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute precision, recall and F-measure with and without offsets
    Evaluate(evaluate::EvaluateArgs),

    /// Print the matched note pairs
    Match(matches::MatchArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Matching tolerances shared by all commands
#[derive(clap::Args, Debug, Clone)]
pub struct ToleranceArgs {
    /// Maximum onset deviation in seconds
    #[arg(long, default_value_t = DEFAULT_ONSET_TOLERANCE)]
    pub onset_tolerance: f64,

    /// Maximum pitch deviation in cents
    #[arg(long, default_value_t = DEFAULT_PITCH_TOLERANCE)]
    pub pitch_tolerance: f64,

    /// Offset tolerance as a fraction of the reference note duration
    #[arg(long, default_value_t = DEFAULT_OFFSET_RATIO)]
    pub offset_ratio: f64,

    /// Minimum offset tolerance in seconds
    #[arg(long, default_value_t = DEFAULT_OFFSET_MIN_TOLERANCE)]
    pub offset_min_tolerance: f64,

    /// Exclude matches that sit exactly on a tolerance boundary
    #[arg(long)]
    pub strict: bool,
}

impl ToleranceArgs {
    #[must_use]
    pub fn to_config(&self) -> MatchingConfig {
        MatchingConfig {
            onset_tolerance: self.onset_tolerance,
            pitch_tolerance: self.pitch_tolerance,
            offset_ratio: Some(self.offset_ratio),
            offset_min_tolerance: self.offset_min_tolerance,
            strict: self.strict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tolerances_match_library_defaults() {
        let cli = Cli::parse_from(["transcription-eval", "evaluate", "ref.txt", "est.txt"]);
        let Commands::Evaluate(args) = cli.command else {
            panic!("expected evaluate command");
        };
        assert_eq!(args.tolerances.to_config(), MatchingConfig::default());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "transcription-eval",
            "match",
            "ref.txt",
            "est.txt",
            "--strict",
            "--format",
            "json",
            "-v",
        ]);
        assert!(cli.verbose);
        assert!(matches!(cli.format, OutputFormat::Json));
        let Commands::Match(args) = cli.command else {
            panic!("expected match command");
        };
        assert!(args.tolerances.strict);
    }
}

//! Evaluate command - score an estimated transcription against a reference.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;

use crate::cli::{OutputFormat, ToleranceArgs};
use crate::core::note::NoteSet;
use crate::matching::scoring::{evaluate_with, ScoreReport};
use crate::parsing::notes::parse_notes_file;

/// Arguments for the evaluate command
#[derive(Args)]
pub struct EvaluateArgs {
    /// Reference annotation (one `onset offset pitch` row per note)
    #[arg(required = true)]
    pub reference: PathBuf,

    /// Estimated transcription (same format as the reference)
    #[arg(required = true)]
    pub estimate: PathBuf,

    /// Also save the report as JSON to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub tolerances: ToleranceArgs,
}

/// Execute the evaluate command
///
/// # Errors
///
/// Returns an error if inputs cannot be parsed, are malformed, or the report
/// cannot be written.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: EvaluateArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = args.tolerances.to_config();

    let reference = load(&args.reference, "reference")?;
    let estimate = load(&args.estimate, "estimate")?;

    if verbose {
        eprintln!(
            "Reference: {} notes, estimate: {} notes",
            reference.len(),
            estimate.len()
        );
        eprintln!(
            "Tolerances: onset {}s, pitch {} cents, offset ratio {}, offset min {}s{}",
            config.onset_tolerance,
            config.pitch_tolerance,
            args.tolerances.offset_ratio,
            config.offset_min_tolerance,
            if config.strict { " (strict)" } else { "" },
        );
    }

    let report = evaluate_with(
        &reference.intervals,
        &reference.pitches,
        &estimate.intervals,
        &estimate.pitches,
        &config,
    )?
    .into_value();

    match format {
        OutputFormat::Text => print_text_report(&args.estimate, &report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Tsv => print_tsv_report(&args.reference, &args.estimate, &report),
    }

    if let Some(output) = &args.output {
        save_report(&report, output)?;
        if verbose {
            eprintln!("Saved results to {}", output.display());
        }
    }

    Ok(())
}

pub(crate) fn load(path: &Path, what: &str) -> anyhow::Result<NoteSet> {
    parse_notes_file(path)
        .with_context(|| format!("Failed to load {what} notes from {}", path.display()))
}

fn save_report(report: &ScoreReport, output: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(output, json)
        .with_context(|| format!("Failed to write report to {}", output.display()))
}

fn print_text_report(estimate: &Path, report: &ScoreReport) {
    let name = estimate
        .file_name()
        .map_or_else(|| estimate.display().to_string(), |n| n.to_string_lossy().into_owned());

    println!("{name}");
    for (key, value) in report.entries() {
        println!("\t{key:>23}:\t{value:.6}");
    }
}

fn print_tsv_report(reference: &Path, estimate: &Path, report: &ScoreReport) {
    println!("reference\testimate\t{}", ScoreReport::KEYS.join("\t"));

    let values: Vec<String> = report
        .entries()
        .iter()
        .map(|(_, value)| format!("{value:.6}"))
        .collect();
    println!(
        "{}\t{}\t{}",
        reference.display(),
        estimate.display(),
        values.join("\t")
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_notes_file(notes: &[(f64, f64, f64)]) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".txt").unwrap();
        for (onset, offset, pitch) in notes {
            writeln!(file, "{onset:.3}\t{offset:.3}\t{pitch:.3}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_reports_path_on_error() {
        let err = load(Path::new("/nonexistent/ref.txt"), "reference").unwrap_err();
        assert!(err.to_string().contains("reference notes"));
        assert!(err.to_string().contains("/nonexistent/ref.txt"));
    }

    #[test]
    fn test_save_report_writes_json() {
        let reference = create_temp_notes_file(&[(0.1, 0.3, 220.0), (0.3, 0.4, 246.942)]);
        let estimate = create_temp_notes_file(&[(0.12, 0.29, 225.0)]);
        let output = NamedTempFile::with_suffix(".json").unwrap();

        let args = EvaluateArgs {
            reference: reference.path().to_path_buf(),
            estimate: estimate.path().to_path_buf(),
            output: Some(output.path().to_path_buf()),
            tolerances: ToleranceArgs {
                onset_tolerance: 0.05,
                pitch_tolerance: 50.0,
                offset_ratio: 0.2,
                offset_min_tolerance: 0.05,
                strict: false,
            },
        };
        run(args, OutputFormat::Tsv, false).unwrap();

        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(output.path()).unwrap()).unwrap();
        assert_eq!(saved["Precision"], 1.0);
        assert_eq!(saved["Recall"], 0.5);
    }

    #[test]
    fn test_invalid_pitch_is_an_error() {
        let reference = create_temp_notes_file(&[(0.1, 0.3, -220.0)]);
        let estimate = create_temp_notes_file(&[(0.1, 0.3, 220.0)]);

        let args = EvaluateArgs {
            reference: reference.path().to_path_buf(),
            estimate: estimate.path().to_path_buf(),
            output: None,
            tolerances: ToleranceArgs {
                onset_tolerance: 0.05,
                pitch_tolerance: 50.0,
                offset_ratio: 0.2,
                offset_min_tolerance: 0.05,
                strict: false,
            },
        };
        let err = run(args, OutputFormat::Text, false).unwrap_err();
        assert!(err.to_string().contains("strictly positive"));
    }
}

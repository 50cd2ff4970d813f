use std::path::PathBuf;

use clap::Args;

use crate::cli::evaluate::load;
use crate::cli::{OutputFormat, ToleranceArgs};
use crate::core::note::NoteSet;
use crate::matching::engine::match_notes;
use crate::utils::validation::validate;

#[derive(Args)]
pub struct MatchArgs {
    /// Reference annotation (one `onset offset pitch` row per note)
    #[arg(required = true)]
    pub reference: PathBuf,

    /// Estimated transcription (same format as the reference)
    #[arg(required = true)]
    pub estimate: PathBuf,

    /// Ignore note offsets when matching
    #[arg(long)]
    pub no_offset: bool,

    #[command(flatten)]
    pub tolerances: ToleranceArgs,
}

#[allow(clippy::needless_pass_by_value)]
pub fn run(args: MatchArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let mut config = args.tolerances.to_config();
    if args.no_offset {
        config = config.without_offset();
    }

    let reference = load(&args.reference, "reference")?;
    let estimate = load(&args.estimate, "estimate")?;

    // Empty-side warnings are logged by the validator
    validate(
        &reference.intervals,
        &reference.pitches,
        &estimate.intervals,
        &estimate.pitches,
    )?;

    let matching = match_notes(
        &reference.intervals,
        &reference.pitches,
        &estimate.intervals,
        &estimate.pitches,
        &config,
    )?;

    if verbose {
        eprintln!(
            "Matched {} of {} reference notes and {} estimated notes",
            matching.len(),
            reference.len(),
            estimate.len()
        );
    }

    match format {
        OutputFormat::Text => print_text_matching(&matching, &reference, &estimate),
        OutputFormat::Json => {
            let pairs: Vec<serde_json::Value> = matching
                .iter()
                .map(|&(r, e)| serde_json::json!({ "reference": r, "estimate": e }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&pairs)?);
        }
        OutputFormat::Tsv => {
            println!("reference\testimate");
            for (r, e) in &matching {
                println!("{r}\t{e}");
            }
        }
    }

    Ok(())
}

fn print_text_matching(matching: &[(usize, usize)], reference: &NoteSet, estimate: &NoteSet) {
    println!("{} matched notes", matching.len());

    for &(r, e) in matching {
        let (Some(ref_note), Some(est_note)) = (reference.get(r), estimate.get(e)) else {
            continue;
        };
        println!(
            "   ref {r:>4} [{:.3}, {:.3}] {:>9.3} Hz  <->  est {e:>4} [{:.3}, {:.3}] {:>9.3} Hz",
            ref_note.onset,
            ref_note.offset,
            ref_note.pitch,
            est_note.onset,
            est_note.offset,
            est_note.pitch,
        );
    }
}

//! # transcription-eval
//!
//! A library for evaluating note-level automatic music transcription.
//!
//! A transcription system turns audio into a list of notes, each with an
//! onset, an offset and a pitch. To benchmark it, its output (the
//! *estimate*) is compared against a hand-made annotation (the *reference*).
//!
//! `transcription-eval` pairs reference and estimated notes with a
//! maximum-cardinality matching under configurable tolerances and reports
//! precision, recall and F-measure.
//!
//! ## Features
//!
//! - **Tolerance-based matching**: onset (seconds), pitch (cents) and optional offset criteria
//! - **Deterministic results**: the same input always produces the same pairs
//! - **Standard report**: scores with and without the offset criterion
//! - **Structured diagnostics**: empty inputs are reported as warnings alongside results
//! - **Supplementary metrics**: onset-only, offset-only and average overlap ratio
//!
//! ## Example
//!
//! ```rust
//! use transcription_eval::evaluate;
//!
//! let ref_intervals = [[0.100, 0.300], [0.300, 0.400], [0.500, 0.600], [0.550, 0.650]];
//! let ref_pitches = [220.000, 246.942, 277.183, 293.665];
//! let est_intervals = [[0.120, 0.290], [0.300, 0.340], [0.500, 0.600], [0.550, 0.600], [0.560, 0.650]];
//! let est_pitches = [225.000, 246.942, 500.000, 293.665, 293.665];
//!
//! let report = evaluate(&ref_intervals, &ref_pitches, &est_intervals, &est_pitches).unwrap();
//! assert!((report.value.precision - 0.4).abs() < 1e-12);
//! assert!((report.value.recall_no_offset - 0.75).abs() < 1e-12);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Note and note-set types, diagnostics
//! - [`matching`]: Matching engine and scoring
//! - [`parsing`]: Loader for `onset offset pitch` annotation files
//! - [`utils`]: Input validation
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use core::note::{Note, NoteSet};
pub use core::types::*;
pub use matching::engine::{match_notes, Matching, MatchingConfig};
pub use matching::scoring::{evaluate, precision_recall_f1, PrecisionRecallF1, ScoreReport};
pub use utils::validation::{validate, InvalidInput};

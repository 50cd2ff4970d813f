//! Note matching engine and scoring.
//!
//! This module provides the core evaluation functionality:
//!
//! - [`match_notes`]: Maximum-cardinality matching between reference and estimated notes
//! - [`precision_recall_f1`]: Rates derived from one matching
//! - [`evaluate`]: The standard report, with and without the offset criterion
//!
//! ## Matching Algorithm
//!
//! A reference note and an estimated note are compatible when all enabled
//! criteria hold:
//!
//! 1. **Onset**: onsets differ by at most `onset_tolerance` seconds
//! 2. **Pitch**: pitches differ by at most `pitch_tolerance` cents
//! 3. **Offset** (optional): offsets differ by at most
//!    `max(offset_min_tolerance, offset_ratio * reference duration)` seconds
//!
//! The compatible pairs form a bipartite graph. Reference notes are visited
//! in ascending index order and each one searches for an augmenting path,
//! trying estimated notes in ascending index order. The result is a maximum
//! matching, and always the same one for the same input.
//!
//! ## Scoring
//!
//! - **Precision**: matched pairs / estimated notes
//! - **Recall**: matched pairs / reference notes
//! - **F-measure**: harmonic mean of the two
//!
//! All three are 0 when either note set is empty.
//!
//! ## Example
//!
//! ```rust
//! use transcription_eval::matching::{evaluate, match_notes, MatchingConfig};
//!
//! let ref_intervals = [[0.10, 0.30], [0.30, 0.40]];
//! let ref_pitches = [220.0, 246.942];
//! let est_intervals = [[0.12, 0.29], [0.30, 0.34]];
//! let est_pitches = [225.0, 246.942];
//!
//! let matching = match_notes(
//!     &ref_intervals,
//!     &ref_pitches,
//!     &est_intervals,
//!     &est_pitches,
//!     &MatchingConfig::default(),
//! )
//! .unwrap();
//! assert_eq!(matching, vec![(0, 0)]);
//!
//! let report = evaluate(&ref_intervals, &ref_pitches, &est_intervals, &est_pitches).unwrap();
//! for (name, value) in report.value.entries() {
//!     println!("{name}: {value:.3}");
//! }
//! ```

pub mod engine;
pub mod scoring;

pub use engine::{
    match_note_offsets, match_note_onsets, match_notes, CompatibilityGraph, Matching,
    MatchingConfig,
};
pub use scoring::{
    average_overlap_ratio, evaluate, evaluate_with, offset_precision_recall_f1,
    onset_precision_recall_f1, precision_recall_f1, precision_recall_f1_overlap, OverlapScores,
    PrecisionRecallF1, ScoreReport,
};

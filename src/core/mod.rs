//! Core data types for note-level transcription evaluation.
//!
//! - [`Note`]: A single note with onset, offset (seconds) and pitch (Hz)
//! - [`NoteSet`]: An ordered set of notes stored as parallel interval and pitch vectors
//! - [`Side`]: Whether something belongs to the reference or the estimate
//! - [`EmptyInputWarning`], [`Evaluated`]: Non-fatal diagnostics carried with results
//!
//! ## Note identity
//!
//! A note is identified by its position in its set. Matchings report
//! `(reference index, estimate index)` pairs, and ties between equally good
//! matchings are broken by these indices.

pub mod note;
pub mod types;

pub use note::{Note, NoteSet};
pub use types::{EmptyInputWarning, Evaluated, Side};

//! Loader for note annotation files.
//!
//! Each non-comment line describes one note as three numbers:
//!
//! | Column | Description | Unit |
//! |--------|-------------|------|
//! | 1 | Onset | seconds |
//! | 2 | Offset | seconds |
//! | 3 | Pitch | Hz |
//!
//! Columns may be separated by tabs, commas or spaces. Row order is kept and
//! defines the note indices used in matchings.
//!
//! ## Example
//!
//! ```rust
//! use transcription_eval::parsing::notes::parse_notes_text;
//!
//! let notes = parse_notes_text("0.100\t0.300\t220.000\n0.300\t0.400\t246.942\n").unwrap();
//! assert_eq!(notes.len(), 2);
//! ```

pub mod notes;

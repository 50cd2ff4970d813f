use std::path::Path;

use thiserror::Error;

use crate::core::note::{Note, NoteSet};
use crate::utils::validation::MAX_NOTES;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid note annotation: {0}")]
    InvalidFormat(String),

    #[error("Too many notes: line {0} exceeds the maximum of {MAX_NOTES} notes")]
    TooManyNotes(usize),
}

/// Parse a note annotation file with one `onset offset pitch` row per note
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or other parse errors
/// if the content is invalid.
pub fn parse_notes_file(path: &Path) -> Result<NoteSet, ParseError> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_notes_text(&content)?.with_source(path.display().to_string()))
}

/// Parse note annotation text.
///
/// Fields may be separated by tabs, commas or spaces. Blank lines and lines
/// starting with `#` are skipped. An input without any rows yields an empty
/// set.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if a row does not have exactly three
/// numeric fields, or `ParseError::TooManyNotes` if the limit is exceeded.
pub fn parse_notes_text(text: &str) -> Result<NoteSet, ParseError> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .enumerate()
        .map(|(count, (line_num, line))| {
            // DOS protection
            if count >= MAX_NOTES {
                return Err(ParseError::TooManyNotes(line_num));
            }
            parse_note_line(line_num, line)
        })
        .collect()
}

/// Parse one `onset offset pitch` row; `line_num` is 1-based
fn parse_note_line(line_num: usize, line: &str) -> Result<Note, ParseError> {
    let fields: Vec<&str> = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|field| !field.is_empty())
        .collect();

    let [onset, offset, pitch] = fields[..] else {
        return Err(ParseError::InvalidFormat(format!(
            "Line {line_num} has {} fields, expected 3 (onset, offset, pitch)",
            fields.len()
        )));
    };

    let value = |field: &str, name: &str| {
        field.parse::<f64>().map_err(|_| {
            ParseError::InvalidFormat(format!("Invalid {name} on line {line_num}: '{field}'"))
        })
    };

    Ok(Note::new(
        value(onset, "onset")?,
        value(offset, "offset")?,
        value(pitch, "pitch")?,
    ))
}

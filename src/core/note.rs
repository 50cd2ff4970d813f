use serde::{Deserialize, Serialize};

/// A single transcribed or annotated note
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Start time in seconds
    pub onset: f64,
    /// End time in seconds
    pub offset: f64,
    /// Fundamental frequency in Hz
    pub pitch: f64,
}

impl Note {
    #[must_use]
    pub fn new(onset: f64, offset: f64, pitch: f64) -> Self {
        Self {
            onset,
            offset,
            pitch,
        }
    }

    #[must_use]
    pub fn interval(&self) -> [f64; 2] {
        [self.onset, self.offset]
    }
}

/// An ordered set of notes, stored as parallel interval and pitch vectors.
///
/// The position of a note in the set is its index, which is the identity used
/// in matchings and drives tie-breaking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteSet {
    /// Source file path (if known)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// `[onset, offset]` pairs in seconds
    pub intervals: Vec<[f64; 2]>,

    /// Pitches in Hz, one per interval
    pub pitches: Vec<f64>,
}

impl NoteSet {
    #[must_use]
    pub fn new(intervals: Vec<[f64; 2]>, pitches: Vec<f64>) -> Self {
        Self {
            source: None,
            intervals,
            pitches,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn push(&mut self, note: Note) {
        self.intervals.push(note.interval());
        self.pitches.push(note.pitch);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Note at `index`, if both the interval and the pitch exist
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Note> {
        let [onset, offset] = *self.intervals.get(index)?;
        let pitch = *self.pitches.get(index)?;
        Some(Note::new(onset, offset, pitch))
    }
}

impl FromIterator<Note> for NoteSet {
    fn from_iter<I: IntoIterator<Item = Note>>(iter: I) -> Self {
        let mut set = Self::default();
        for note in iter {
            set.push(note);
        }
        set
    }
}

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::types::Side;
use crate::utils::validation::{check_lengths, InvalidInput};

/// Default onset tolerance in seconds
pub const DEFAULT_ONSET_TOLERANCE: f64 = 0.05;

/// Default pitch tolerance in cents
pub const DEFAULT_PITCH_TOLERANCE: f64 = 50.0;

/// Default offset tolerance as a fraction of the reference note duration
pub const DEFAULT_OFFSET_RATIO: f64 = 0.2;

/// Default lower bound of the offset tolerance window in seconds
pub const DEFAULT_OFFSET_MIN_TOLERANCE: f64 = 0.05;

/// Time distances are rounded to this many decimals before comparison, so a
/// distance that is exactly on a tolerance boundary is not pushed over it by
/// floating-point error.
const TIME_DECIMALS: i32 = 4;

/// Pitch distances in cents are rounded the same way
const CENTS_DECIMALS: i32 = 6;

/// Pairs of `(reference index, estimate index)`, ascending by reference index
pub type Matching = Vec<(usize, usize)>;

/// Tolerances used to decide whether a reference and an estimated note match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Maximum onset deviation in seconds
    pub onset_tolerance: f64,
    /// Maximum pitch deviation in cents
    pub pitch_tolerance: f64,
    /// Offset tolerance as a fraction of the reference duration; `None` ignores offsets
    pub offset_ratio: Option<f64>,
    /// Minimum offset tolerance in seconds
    pub offset_min_tolerance: f64,
    /// Use `<` instead of `<=` for every tolerance check
    pub strict: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            onset_tolerance: DEFAULT_ONSET_TOLERANCE,
            pitch_tolerance: DEFAULT_PITCH_TOLERANCE,
            offset_ratio: Some(DEFAULT_OFFSET_RATIO),
            offset_min_tolerance: DEFAULT_OFFSET_MIN_TOLERANCE,
            strict: false,
        }
    }
}

impl MatchingConfig {
    /// Same tolerances with the offset criterion disabled
    #[must_use]
    pub fn without_offset(&self) -> Self {
        Self {
            offset_ratio: None,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    fn criteria(&self) -> Criteria {
        Criteria {
            onset: Some(self.onset_tolerance),
            pitch: Some(self.pitch_tolerance),
            offset: self.offset_ratio.map(|ratio| OffsetWindow {
                ratio,
                min_tolerance: self.offset_min_tolerance,
            }),
            strict: self.strict,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct OffsetWindow {
    ratio: f64,
    min_tolerance: f64,
}

impl OffsetWindow {
    fn tolerance(&self, [onset, offset]: [f64; 2]) -> f64 {
        (self.ratio * (offset - onset)).max(self.min_tolerance)
    }
}

/// The set of enabled compatibility checks for one matching run
#[derive(Debug, Clone, Copy)]
struct Criteria {
    onset: Option<f64>,
    pitch: Option<f64>,
    offset: Option<OffsetWindow>,
    strict: bool,
}

impl Criteria {
    fn within(&self, distance: f64, tolerance: f64) -> bool {
        if self.strict {
            distance < tolerance
        } else {
            distance <= tolerance
        }
    }

    fn compatible(&self, reference: NoteRef, estimate: NoteRef) -> bool {
        if let Some(tolerance) = self.onset {
            let distance = round_to(estimate.interval[0] - reference.interval[0], TIME_DECIMALS);
            if !self.within(distance, tolerance) {
                return false;
            }
        }

        if let Some(tolerance) = self.pitch {
            let (Some(ref_pitch), Some(est_pitch)) = (reference.pitch, estimate.pitch) else {
                return false;
            };
            let cents = round_to(1200.0 * (est_pitch / ref_pitch).log2(), CENTS_DECIMALS);
            if !self.within(cents, tolerance) {
                return false;
            }
        }

        if let Some(window) = self.offset {
            let distance = round_to(estimate.interval[1] - reference.interval[1], TIME_DECIMALS);
            if !self.within(distance, window.tolerance(reference.interval)) {
                return false;
            }
        }

        true
    }
}

#[derive(Debug, Clone, Copy)]
struct NoteRef {
    interval: [f64; 2],
    pitch: Option<f64>,
}

fn round_to(delta: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (delta.abs() * scale).round() / scale
}

/// Match reference notes to estimated notes by onset, pitch and (optionally) offset.
///
/// The result is a maximum-cardinality matching: no other valid pairing of the
/// two note sets contains more pairs. When several maximum matchings exist,
/// the one produced by augmenting reference notes in ascending index order,
/// trying estimates in ascending index order, is returned. Repeated calls on
/// the same input always give the same pairs.
///
/// # Errors
///
/// Returns `InvalidInput::LengthMismatch` if either side has a different
/// number of intervals and pitches.
///
/// # Example
///
/// ```
/// use transcription_eval::matching::engine::{match_notes, MatchingConfig};
///
/// let ref_intervals = [[0.10, 0.30], [0.30, 0.40]];
/// let est_intervals = [[0.12, 0.29], [0.30, 0.34]];
/// let pitches = [220.0, 246.942];
///
/// let config = MatchingConfig::default();
/// let matching = match_notes(&ref_intervals, &pitches, &est_intervals, &pitches, &config).unwrap();
/// assert_eq!(matching, vec![(0, 0)]);
///
/// let matching =
///     match_notes(&ref_intervals, &pitches, &est_intervals, &pitches, &config.without_offset())
///         .unwrap();
/// assert_eq!(matching, vec![(0, 0), (1, 1)]);
/// ```
pub fn match_notes(
    ref_intervals: &[[f64; 2]],
    ref_pitches: &[f64],
    est_intervals: &[[f64; 2]],
    est_pitches: &[f64],
    config: &MatchingConfig,
) -> Result<Matching, InvalidInput> {
    check_lengths(Side::Reference, ref_intervals, ref_pitches)?;
    check_lengths(Side::Estimate, est_intervals, est_pitches)?;

    Ok(run(
        ref_intervals,
        Some(ref_pitches),
        est_intervals,
        Some(est_pitches),
        config.criteria(),
    ))
}

/// Match notes using onsets only, ignoring pitch and offset.
#[must_use]
pub fn match_note_onsets(
    ref_intervals: &[[f64; 2]],
    est_intervals: &[[f64; 2]],
    onset_tolerance: f64,
    strict: bool,
) -> Matching {
    let criteria = Criteria {
        onset: Some(onset_tolerance),
        pitch: None,
        offset: None,
        strict,
    };
    run(ref_intervals, None, est_intervals, None, criteria)
}

/// Match notes using offsets only, ignoring onset and pitch.
///
/// The tolerance for each reference note is
/// `max(offset_min_tolerance, offset_ratio * duration)`.
#[must_use]
pub fn match_note_offsets(
    ref_intervals: &[[f64; 2]],
    est_intervals: &[[f64; 2]],
    offset_ratio: f64,
    offset_min_tolerance: f64,
    strict: bool,
) -> Matching {
    let criteria = Criteria {
        onset: None,
        pitch: None,
        offset: Some(OffsetWindow {
            ratio: offset_ratio,
            min_tolerance: offset_min_tolerance,
        }),
        strict,
    };
    run(ref_intervals, None, est_intervals, None, criteria)
}

fn run(
    ref_intervals: &[[f64; 2]],
    ref_pitches: Option<&[f64]>,
    est_intervals: &[[f64; 2]],
    est_pitches: Option<&[f64]>,
    criteria: Criteria,
) -> Matching {
    let note = |intervals: &[[f64; 2]], pitches: Option<&[f64]>, i: usize| NoteRef {
        interval: intervals[i],
        pitch: pitches.map(|p| p[i]),
    };

    let adjacency: Vec<Vec<usize>> = (0..ref_intervals.len())
        .map(|r| {
            let reference = note(ref_intervals, ref_pitches, r);
            (0..est_intervals.len())
                .filter(|&e| criteria.compatible(reference, note(est_intervals, est_pitches, e)))
                .collect()
        })
        .collect();

    let graph = CompatibilityGraph::new(adjacency, est_intervals.len());
    let matching = graph.maximum_matching();

    debug!(
        "Matched {} pairs ({} reference notes, {} estimated notes, {} compatible pairs)",
        matching.len(),
        ref_intervals.len(),
        est_intervals.len(),
        graph.edge_count()
    );

    matching
}

/// Bipartite graph between reference notes (left) and estimated notes (right)
#[derive(Debug, Clone)]
pub struct CompatibilityGraph {
    /// Compatible estimate indices per reference note, ascending
    adjacency: Vec<Vec<usize>>,
    num_estimates: usize,
}

impl CompatibilityGraph {
    /// Build a graph from per-reference adjacency lists.
    ///
    /// Neighbour lists are sorted and deduplicated so that the search order
    /// is always ascending estimate index.
    #[must_use]
    pub fn new(mut adjacency: Vec<Vec<usize>>, num_estimates: usize) -> Self {
        for neighbours in &mut adjacency {
            neighbours.retain(|&e| e < num_estimates);
            neighbours.sort_unstable();
            neighbours.dedup();
        }
        Self {
            adjacency,
            num_estimates,
        }
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub fn neighbours(&self, reference: usize) -> &[usize] {
        self.adjacency
            .get(reference)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Maximum-cardinality matching by repeated augmenting-path search
    #[must_use]
    pub fn maximum_matching(&self) -> Matching {
        let mut state = AugmentState {
            ref_match: vec![None; self.adjacency.len()],
            est_match: vec![None; self.num_estimates],
            visited: vec![false; self.num_estimates],
        };

        for reference in 0..self.adjacency.len() {
            if !self.adjacency[reference].is_empty() {
                self.augment(reference, &mut state);
            }
        }

        state
            .ref_match
            .iter()
            .enumerate()
            .filter_map(|(r, e)| e.map(|e| (r, e)))
            .collect()
    }

    /// Depth-first search for an augmenting path starting at an unmatched
    /// reference note, using an explicit stack.
    ///
    /// `stack[d]` holds the reference note at depth `d` and the position of
    /// the next neighbour to try; `via[d]` is the estimate taken from
    /// `stack[d]` to reach `stack[d + 1]`. Returns true if the matching grew.
    fn augment(&self, root: usize, state: &mut AugmentState) -> bool {
        state.visited.fill(false);

        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        let mut via: Vec<usize> = Vec::new();

        while let Some(&(reference, cursor)) = stack.last() {
            let Some(&estimate) = self.neighbours(reference).get(cursor) else {
                // Dead end: backtrack to the note that led here
                stack.pop();
                via.pop();
                continue;
            };

            if let Some(top) = stack.last_mut() {
                top.1 += 1;
            }

            if state.visited[estimate] {
                continue;
            }
            state.visited[estimate] = true;
            via.push(estimate);

            match state.est_match[estimate] {
                Some(owner) => stack.push((owner, 0)),
                None => {
                    // Flip every edge along the path
                    for (&(r, _), &e) in stack.iter().zip(&via) {
                        state.ref_match[r] = Some(e);
                        state.est_match[e] = Some(r);
                    }
                    return true;
                }
            }
        }

        false
    }
}

struct AugmentState {
    ref_match: Vec<Option<usize>>,
    est_match: Vec<Option<usize>>,
    visited: Vec<bool>,
}

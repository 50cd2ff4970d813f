//! Input validation for reference and estimated note sets.

use tracing::warn;

use crate::core::types::{EmptyInputWarning, Side};

/// Maximum number of notes accepted from a single annotation file (DOS protection)
pub const MAX_NOTES: usize = 1_000_000;

/// Malformed note input. Fatal: no partial result is produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidInput {
    #[error("{side} intervals and pitches have different lengths ({intervals} intervals, {pitches} pitches)")]
    LengthMismatch {
        side: Side,
        intervals: usize,
        pitches: usize,
    },

    #[error("{side} pitch at index {index} must be strictly positive, got {pitch}")]
    NonPositivePitch { side: Side, index: usize, pitch: f64 },

    #[error("{side} interval at index {index} is malformed: [{onset}, {offset}] ({reason})")]
    MalformedInterval {
        side: Side,
        index: usize,
        onset: f64,
        offset: f64,
        reason: &'static str,
    },
}

/// Check both note sets and report which of them, if any, are empty.
///
/// Reference checks run before estimate checks, and the first problem found
/// is returned. Empty sets are not an error: a warning is returned for each
/// empty side (and logged) so callers can decide what to do with it.
///
/// # Errors
///
/// Returns `InvalidInput::LengthMismatch` if a side has a different number of
/// intervals and pitches, `InvalidInput::NonPositivePitch` if a pitch is not
/// strictly positive, or `InvalidInput::MalformedInterval` if an interval has
/// a non-finite or negative bound or ends before it starts.
pub fn validate(
    ref_intervals: &[[f64; 2]],
    ref_pitches: &[f64],
    est_intervals: &[[f64; 2]],
    est_pitches: &[f64],
) -> Result<Vec<EmptyInputWarning>, InvalidInput> {
    let mut warnings = Vec::new();

    for (side, intervals, pitches) in [
        (Side::Reference, ref_intervals, ref_pitches),
        (Side::Estimate, est_intervals, est_pitches),
    ] {
        validate_note_set(side, intervals, pitches)?;
        warnings.extend(empty_warning(side, intervals.len()));
    }

    Ok(warnings)
}

/// Like [`validate`], for metrics that only look at note timing
///
/// # Errors
///
/// Returns `InvalidInput::MalformedInterval` for the first bad interval.
pub fn validate_interval_sets(
    ref_intervals: &[[f64; 2]],
    est_intervals: &[[f64; 2]],
) -> Result<Vec<EmptyInputWarning>, InvalidInput> {
    let mut warnings = Vec::new();

    for (side, intervals) in [
        (Side::Reference, ref_intervals),
        (Side::Estimate, est_intervals),
    ] {
        validate_intervals(side, intervals)?;
        warnings.extend(empty_warning(side, intervals.len()));
    }

    Ok(warnings)
}

fn empty_warning(side: Side, len: usize) -> Option<EmptyInputWarning> {
    if len > 0 {
        return None;
    }
    let warning = EmptyInputWarning::new(side);
    warn!("{warning}");
    Some(warning)
}

/// Validate a single side's intervals and pitches
///
/// # Errors
///
/// See [`validate`].
pub fn validate_note_set(
    side: Side,
    intervals: &[[f64; 2]],
    pitches: &[f64],
) -> Result<(), InvalidInput> {
    check_lengths(side, intervals, pitches)?;
    validate_intervals(side, intervals)?;

    // NaN fails `> 0.0` too
    if let Some((index, &pitch)) = pitches.iter().enumerate().find(|&(_, &p)| !(p > 0.0)) {
        return Err(InvalidInput::NonPositivePitch { side, index, pitch });
    }

    Ok(())
}

/// Check that a side has exactly one pitch per interval
///
/// # Errors
///
/// Returns `InvalidInput::LengthMismatch` if the counts differ.
pub fn check_lengths(
    side: Side,
    intervals: &[[f64; 2]],
    pitches: &[f64],
) -> Result<(), InvalidInput> {
    if intervals.len() == pitches.len() {
        Ok(())
    } else {
        Err(InvalidInput::LengthMismatch {
            side,
            intervals: intervals.len(),
            pitches: pitches.len(),
        })
    }
}

/// Check that every interval is finite, non-negative and ordered
///
/// # Errors
///
/// Returns `InvalidInput::MalformedInterval` for the first bad interval.
pub fn validate_intervals(side: Side, intervals: &[[f64; 2]]) -> Result<(), InvalidInput> {
    for (index, &[onset, offset]) in intervals.iter().enumerate() {
        let reason = if !onset.is_finite() || !offset.is_finite() {
            Some("bounds must be finite")
        } else if onset < 0.0 {
            Some("onset must be non-negative")
        } else if offset < onset {
            Some("offset must not precede onset")
        } else {
            None
        };

        if let Some(reason) = reason {
            return Err(InvalidInput::MalformedInterval {
                side,
                index,
                onset,
                offset,
                reason,
            });
        }
    }
    Ok(())
}

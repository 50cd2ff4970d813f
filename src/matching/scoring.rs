use serde::{Deserialize, Serialize};

use crate::core::types::Evaluated;
use crate::matching::engine::{match_note_offsets, match_note_onsets, match_notes, MatchingConfig};
use crate::utils::validation::{validate, validate_interval_sets, InvalidInput};

/// Safely convert usize to f64 for rate calculations
#[inline]
fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Precision, recall and F-measure of one matching
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PrecisionRecallF1 {
    /// Matched pairs / estimated notes
    pub precision: f64,
    /// Matched pairs / reference notes
    pub recall: f64,
    /// Harmonic mean of precision and recall
    pub f_measure: f64,
}

impl PrecisionRecallF1 {
    /// Rates from a match count and the size of each note set.
    ///
    /// Every rate is exactly 0 when either set is empty, or when nothing
    /// matched; no rate is ever NaN.
    #[must_use]
    pub fn from_counts(matched: usize, num_reference: usize, num_estimate: usize) -> Self {
        if num_reference == 0 || num_estimate == 0 {
            return Self::default();
        }

        let precision = count_to_f64(matched) / count_to_f64(num_estimate);
        let recall = count_to_f64(matched) / count_to_f64(num_reference);
        let f_measure = f_measure(precision, recall);

        Self {
            precision,
            recall,
            f_measure,
        }
    }

    #[must_use]
    pub fn as_tuple(&self) -> (f64, f64, f64) {
        (self.precision, self.recall, self.f_measure)
    }
}

/// Harmonic mean of precision and recall, 0 when both are 0
#[must_use]
pub fn f_measure(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

/// Rates plus the mean overlap ratio of the matched notes
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OverlapScores {
    #[serde(flatten)]
    pub rates: PrecisionRecallF1,
    pub average_overlap_ratio: f64,
}

/// The standard note-level transcription report.
///
/// Field order is the report order; JSON output keeps it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreReport {
    #[serde(rename = "Precision")]
    pub precision: f64,
    #[serde(rename = "Recall")]
    pub recall: f64,
    #[serde(rename = "F-measure")]
    pub f_measure: f64,
    #[serde(rename = "Precision_no_offset")]
    pub precision_no_offset: f64,
    #[serde(rename = "Recall_no_offset")]
    pub recall_no_offset: f64,
    #[serde(rename = "F-measure_no_offset")]
    pub f_measure_no_offset: f64,
}

impl ScoreReport {
    /// Metric names in report order
    pub const KEYS: [&'static str; 6] = [
        "Precision",
        "Recall",
        "F-measure",
        "Precision_no_offset",
        "Recall_no_offset",
        "F-measure_no_offset",
    ];

    #[must_use]
    pub fn new(with_offset: PrecisionRecallF1, no_offset: PrecisionRecallF1) -> Self {
        Self {
            precision: with_offset.precision,
            recall: with_offset.recall,
            f_measure: with_offset.f_measure,
            precision_no_offset: no_offset.precision,
            recall_no_offset: no_offset.recall,
            f_measure_no_offset: no_offset.f_measure,
        }
    }

    /// `(name, value)` pairs in report order
    #[must_use]
    pub fn entries(&self) -> [(&'static str, f64); 6] {
        let values = [
            self.precision,
            self.recall,
            self.f_measure,
            self.precision_no_offset,
            self.recall_no_offset,
            self.f_measure_no_offset,
        ];
        std::array::from_fn(|i| (Self::KEYS[i], values[i]))
    }

    /// Look up a metric by its report name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries()
            .into_iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }
}

/// Compute precision, recall and F-measure of the note matching under `config`.
///
/// # Errors
///
/// Returns `InvalidInput` if either note set is malformed (see
/// [`validate`](crate::utils::validation::validate)).
pub fn precision_recall_f1(
    ref_intervals: &[[f64; 2]],
    ref_pitches: &[f64],
    est_intervals: &[[f64; 2]],
    est_pitches: &[f64],
    config: &MatchingConfig,
) -> Result<Evaluated<PrecisionRecallF1>, InvalidInput> {
    let warnings = validate(ref_intervals, ref_pitches, est_intervals, est_pitches)?;
    let matching = match_notes(ref_intervals, ref_pitches, est_intervals, est_pitches, config)?;

    let rates = PrecisionRecallF1::from_counts(
        matching.len(),
        ref_intervals.len(),
        est_intervals.len(),
    );
    Ok(Evaluated::new(rates, warnings))
}

/// Like [`precision_recall_f1`], also reporting the average overlap ratio of
/// the matched notes.
///
/// # Errors
///
/// Returns `InvalidInput` if either note set is malformed.
pub fn precision_recall_f1_overlap(
    ref_intervals: &[[f64; 2]],
    ref_pitches: &[f64],
    est_intervals: &[[f64; 2]],
    est_pitches: &[f64],
    config: &MatchingConfig,
) -> Result<Evaluated<OverlapScores>, InvalidInput> {
    let warnings = validate(ref_intervals, ref_pitches, est_intervals, est_pitches)?;
    let matching = match_notes(ref_intervals, ref_pitches, est_intervals, est_pitches, config)?;

    let scores = OverlapScores {
        rates: PrecisionRecallF1::from_counts(
            matching.len(),
            ref_intervals.len(),
            est_intervals.len(),
        ),
        average_overlap_ratio: average_overlap_ratio(ref_intervals, est_intervals, &matching),
    };
    Ok(Evaluated::new(scores, warnings))
}

/// Mean over matched pairs of the intersection length divided by the union
/// length of the two intervals. 0 for an empty matching.
///
/// Two identical zero-length intervals count as a full overlap. Pairs that
/// refer to an index outside either interval slice are skipped.
#[must_use]
pub fn average_overlap_ratio(
    ref_intervals: &[[f64; 2]],
    est_intervals: &[[f64; 2]],
    matching: &[(usize, usize)],
) -> f64 {
    let ratios: Vec<f64> = matching
        .iter()
        .filter_map(|&(r, e)| {
            let [ref_on, ref_off] = *ref_intervals.get(r)?;
            let [est_on, est_off] = *est_intervals.get(e)?;
            let union = ref_off.max(est_off) - ref_on.min(est_on);
            if union == 0.0 {
                Some(1.0)
            } else {
                Some((ref_off.min(est_off) - ref_on.max(est_on)) / union)
            }
        })
        .collect();

    if ratios.is_empty() {
        return 0.0;
    }

    ratios.iter().sum::<f64>() / count_to_f64(ratios.len())
}

/// Precision, recall and F-measure when only onsets have to agree.
///
/// # Errors
///
/// Returns `InvalidInput::MalformedInterval` if an interval is malformed.
pub fn onset_precision_recall_f1(
    ref_intervals: &[[f64; 2]],
    est_intervals: &[[f64; 2]],
    onset_tolerance: f64,
    strict: bool,
) -> Result<Evaluated<PrecisionRecallF1>, InvalidInput> {
    let warnings = validate_interval_sets(ref_intervals, est_intervals)?;
    let matching = match_note_onsets(ref_intervals, est_intervals, onset_tolerance, strict);

    let rates = PrecisionRecallF1::from_counts(
        matching.len(),
        ref_intervals.len(),
        est_intervals.len(),
    );
    Ok(Evaluated::new(rates, warnings))
}

/// Precision, recall and F-measure when only offsets have to agree.
///
/// # Errors
///
/// Returns `InvalidInput::MalformedInterval` if an interval is malformed.
pub fn offset_precision_recall_f1(
    ref_intervals: &[[f64; 2]],
    est_intervals: &[[f64; 2]],
    offset_ratio: f64,
    offset_min_tolerance: f64,
    strict: bool,
) -> Result<Evaluated<PrecisionRecallF1>, InvalidInput> {
    let warnings = validate_interval_sets(ref_intervals, est_intervals)?;
    let matching = match_note_offsets(
        ref_intervals,
        est_intervals,
        offset_ratio,
        offset_min_tolerance,
        strict,
    );

    let rates = PrecisionRecallF1::from_counts(
        matching.len(),
        ref_intervals.len(),
        est_intervals.len(),
    );
    Ok(Evaluated::new(rates, warnings))
}

/// Compute the standard report with default tolerances: once with the offset
/// criterion and once without it.
///
/// # Errors
///
/// Returns `InvalidInput` if either note set is malformed.
///
/// # Example
///
/// ```
/// use transcription_eval::matching::scoring::evaluate;
///
/// let intervals = [[0.0, 1.0], [1.0, 2.0]];
/// let pitches = [440.0, 220.0];
///
/// let report = evaluate(&intervals, &pitches, &intervals[..1], &pitches[..1]).unwrap();
/// assert_eq!(report.value.precision, 1.0);
/// assert_eq!(report.value.recall_no_offset, 0.5);
/// assert!(report.warnings.is_empty());
/// ```
pub fn evaluate(
    ref_intervals: &[[f64; 2]],
    ref_pitches: &[f64],
    est_intervals: &[[f64; 2]],
    est_pitches: &[f64],
) -> Result<Evaluated<ScoreReport>, InvalidInput> {
    evaluate_with(
        ref_intervals,
        ref_pitches,
        est_intervals,
        est_pitches,
        &MatchingConfig::default(),
    )
}

/// [`evaluate`] with caller-supplied tolerances. The second pass uses the
/// same tolerances with the offset criterion turned off.
///
/// # Errors
///
/// Returns `InvalidInput` if either note set is malformed.
pub fn evaluate_with(
    ref_intervals: &[[f64; 2]],
    ref_pitches: &[f64],
    est_intervals: &[[f64; 2]],
    est_pitches: &[f64],
    config: &MatchingConfig,
) -> Result<Evaluated<ScoreReport>, InvalidInput> {
    let warnings = validate(ref_intervals, ref_pitches, est_intervals, est_pitches)?;

    let rates = |config: &MatchingConfig| -> Result<PrecisionRecallF1, InvalidInput> {
        let matching = match_notes(ref_intervals, ref_pitches, est_intervals, est_pitches, config)?;
        Ok(PrecisionRecallF1::from_counts(
            matching.len(),
            ref_intervals.len(),
            est_intervals.len(),
        ))
    };

    let report = ScoreReport::new(rates(config)?, rates(&config.without_offset())?);
    Ok(Evaluated::new(report, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_counts() {
        let rates = PrecisionRecallF1::from_counts(2, 4, 5);
        assert!((rates.precision - 0.4).abs() < 1e-12);
        assert!((rates.recall - 0.5).abs() < 1e-12);
        assert!((rates.f_measure - 4.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_counts_empty_sides() {
        assert_eq!(
            PrecisionRecallF1::from_counts(0, 0, 3).as_tuple(),
            (0.0, 0.0, 0.0)
        );
        assert_eq!(
            PrecisionRecallF1::from_counts(0, 3, 0).as_tuple(),
            (0.0, 0.0, 0.0)
        );
        assert_eq!(
            PrecisionRecallF1::from_counts(0, 3, 3).as_tuple(),
            (0.0, 0.0, 0.0)
        );
    }

    #[test]
    fn test_f_measure_zero_denominator() {
        assert_eq!(f_measure(0.0, 0.0), 0.0);
        assert!((f_measure(1.0, 1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_report_key_order() {
        let report = ScoreReport::new(
            PrecisionRecallF1::from_counts(2, 4, 5),
            PrecisionRecallF1::from_counts(3, 4, 5),
        );
        let keys: Vec<&str> = report.entries().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, ScoreReport::KEYS);

        let json = serde_json::to_string(&report).unwrap();
        let positions: Vec<usize> = ScoreReport::KEYS
            .iter()
            .map(|key| json.find(&format!("\"{key}\"")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_report_get() {
        let report = ScoreReport::new(
            PrecisionRecallF1::from_counts(2, 4, 5),
            PrecisionRecallF1::from_counts(3, 4, 5),
        );
        assert_eq!(report.get("Recall"), Some(0.5));
        assert_eq!(report.get("Recall_no_offset"), Some(0.75));
        assert_eq!(report.get("Accuracy"), None);
    }

    #[test]
    fn test_average_overlap_ratio() {
        let ref_int = [[0.1, 0.3], [0.55, 0.65]];
        let est_int = [[0.12, 0.29], [0.55, 0.60]];
        let ratio = average_overlap_ratio(&ref_int, &est_int, &[(0, 0), (1, 1)]);
        // (0.17 / 0.2 + 0.05 / 0.1) / 2
        assert!((ratio - 0.675).abs() < 1e-9);

        assert_eq!(average_overlap_ratio(&ref_int, &est_int, &[]), 0.0);
        assert!((average_overlap_ratio(&ref_int, &ref_int, &[(0, 0)]) - 1.0).abs() < 1e-12);
        assert_eq!(
            average_overlap_ratio(&[[1.0, 1.0]], &[[1.0, 1.0]], &[(0, 0)]),
            1.0
        );
    }

    #[test]
    fn test_average_overlap_ratio_skips_out_of_range_pairs() {
        let ref_int = [[0.0, 1.0]];
        let est_int = [[0.0, 0.5]];

        let ratio = average_overlap_ratio(&ref_int, &est_int, &[(0, 0), (3, 0), (0, 9)]);
        assert!((ratio - 0.5).abs() < 1e-12);
        assert_eq!(average_overlap_ratio(&ref_int, &est_int, &[(1, 1)]), 0.0);
    }

    #[test]
    fn test_evaluate_reports_each_warning_once() {
        let result = evaluate(&[], &[], &[[0.0, 1.0]], &[100.0]).unwrap();
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.value, ScoreReport::default());
    }

    #[test]
    fn test_onset_and_offset_scores() {
        let ref_int = [[0.0, 1.0], [2.0, 3.0]];
        let est_int = [[0.02, 1.5], [2.5, 3.0]];

        let onset = onset_precision_recall_f1(&ref_int, &est_int, 0.05, false).unwrap();
        assert_eq!(onset.value.as_tuple(), (0.5, 0.5, 0.5));

        let offset = offset_precision_recall_f1(&ref_int, &est_int, 0.2, 0.05, false).unwrap();
        assert_eq!(offset.value.as_tuple(), (0.5, 0.5, 0.5));
    }
}

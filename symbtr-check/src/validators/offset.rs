//! Measure boundary validation
//!
//! Score offsets are cumulative positions measured in measures, so a new
//! measure starts wherever the offset crosses an integer. For every integer
//! up to the last offset the first offset reaching it is taken as the
//! measure start; every measure start must itself lie on an integer, otherwise
//! the offsets skip over a measure boundary.

use symbtr_common::config::ValidationConfig;

use crate::diagnostics::{Diagnostic, DiagnosticCategory, ValidationReport};

/// Tolerance for treating a floating point offset as an integer
pub const INTEGER_OFFSET_TOLERANCE: f64 = 0.001;

/// Upper bound on the number of measures searched in one sequence
pub const MAX_MEASURE_COUNT: u64 = 100_000;

/// Locates and validates measure starts in offset sequences
#[derive(Debug, Clone)]
pub struct OffsetValidator {
    print_warnings: bool,
}

impl Default for OffsetValidator {
    fn default() -> Self {
        Self::new(true)
    }
}

impl OffsetValidator {
    pub fn new(print_warnings: bool) -> Self {
        Self { print_warnings }
    }

    pub fn from_config(config: &ValidationConfig) -> Self {
        Self::new(config.print_warnings)
    }

    /// Index of the first offset reaching each integer `0..=floor(max offset)`
    ///
    /// The report is invalid when any measure start is not an integer offset;
    /// a single diagnostic lists all such offsets. Offsets spanning more than
    /// [`MAX_MEASURE_COUNT`] measures are searched only up to that bound and
    /// the report is invalid. Whether diagnostics are logged depends on
    /// `print_warnings`, the verdict does not.
    pub fn find_measure_start_idx(&self, offsets: &[f64]) -> (Vec<usize>, ValidationReport) {
        let (measure_start_idx, measure_count) = measure_start_indices(offsets);
        let mut report = validate_measure_starts(&measure_start_idx, offsets);

        if measure_count > MAX_MEASURE_COUNT {
            report.push(
                Diagnostic::warning(
                    DiagnosticCategory::MeasureStart,
                    "",
                    "offsets",
                    "The offsets span more measures than can be searched",
                )
                .observed(measure_count.to_string())
                .expected(format!("at most {}", MAX_MEASURE_COUNT)),
            );
        }

        if self.print_warnings {
            report.emit();
        }

        (measure_start_idx, report)
    }

    /// Whether an offset is an integer within [`INTEGER_OFFSET_TOLERANCE`]
    pub fn is_integer_offset(offset: f64) -> bool {
        (offset - offset.round()).abs() * 1000.0 < 1.0
    }

    /// Measure start index whose offset is closest to `measure_offset`
    ///
    /// Ties resolve to the earliest entry of `measure_start_idx`. Returns
    /// `None` when there is no measure start to choose from.
    pub fn get_measure_offset_id(
        measure_offset: f64,
        offsets: &[f64],
        measure_start_idx: &[usize],
    ) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;

        for &idx in measure_start_idx {
            let Some(&offset) = offsets.get(idx) else {
                continue;
            };
            let dist = (offset - measure_offset).abs();
            if best.map_or(true, |(_, best_dist)| dist < best_dist) {
                best = Some((idx, dist));
            }
        }

        best.map(|(idx, _)| idx)
    }
}

/// Measure start indices and the number of measures the offsets span
fn measure_start_indices(offsets: &[f64]) -> (Vec<usize>, u64) {
    let max_offset = offsets
        .iter()
        .copied()
        .filter(|o| o.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);

    if max_offset < 0.0 {
        return (Vec::new(), 0);
    }

    // saturating float-to-int cast; the count is clamped before iterating
    let measure_count = (max_offset.floor() as u64).saturating_add(1);
    let searched = measure_count.min(MAX_MEASURE_COUNT);

    let mut indices = Vec::new();
    for measure in 0..searched {
        let threshold = measure as f64 - INTEGER_OFFSET_TOLERANCE;
        if let Some(idx) = offsets.iter().position(|&o| o > threshold) {
            indices.push(idx);
        }
    }

    (indices, measure_count)
}

fn validate_measure_starts(measure_start_idx: &[usize], offsets: &[f64]) -> ValidationReport {
    let mut report = ValidationReport::new();

    let non_integer: Vec<f64> = measure_start_idx
        .iter()
        .filter_map(|&i| offsets.get(i).copied())
        .filter(|&o| !OffsetValidator::is_integer_offset(o))
        .collect();

    if !non_integer.is_empty() {
        let listed = non_integer
            .iter()
            .map(|o| o.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        report.push(
            Diagnostic::warning(
                DiagnosticCategory::MeasureStart,
                "",
                "offsets",
                "Some measures are skipped by the offsets",
            )
            .observed(listed),
        );
    }

    report
}

//! Numerical validation of recorded time series.
//!
//! Two flavours of checks are provided:
//!
//! - comparison of a simulation table against a reference table sampled on
//!   the same time grid (`validate_against_reference`);
//! - checks of a single table against an implicit zero reference, used for
//!   constraint residuals (`validate_internal`) and energy drift
//!   (`validate_energy`).
//!
//! Every check yields one norm per non-time column. Shape or I/O problems are
//! returned as [`ValidationError`] so that a missing reference file is never
//! mistaken for a physics failure.

use crate::error::ValidationError;
use crate::norm::NormKind;
use crate::table::{format_scientific, DataTable};
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Per-column norms of one validation and the resulting verdict.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ValidationResult {
    /// Column names, taken from the simulation table.
    pub columns: Vec<String>,
    /// One norm per compared column.
    pub norms: Vec<f64>,
    pub passed: bool,
}

impl ValidationResult {
    /// Largest norm, or zero when there are no columns. NaN if any norm is
    /// NaN.
    pub fn max_norm(&self) -> f64 {
        self.norms.iter().copied().fold(0.0, |acc: f64, n| {
            if acc.is_nan() || n.is_nan() {
                f64::NAN
            } else {
                acc.max(n)
            }
        })
    }

    pub fn last_norm(&self) -> Option<f64> {
        self.norms.last().copied()
    }
}

/// Compare a simulation table with a reference table.
///
/// Both tables must have the same number of columns and rows and identical
/// sample times. Passes iff every column norm is within `tolerance`.
pub fn compare_tables(
    sim: &DataTable,
    reference: &DataTable,
    norm: NormKind,
    tolerance: f64,
) -> Result<ValidationResult, ValidationError> {
    ensure_samples(sim)?;
    ensure_samples(reference)?;

    if sim.num_columns() != reference.num_columns() {
        return Err(ValidationError::ColumnMismatch {
            sim: sim.num_columns(),
            reference: reference.num_columns(),
        });
    }
    if sim.num_rows() != reference.num_rows() {
        return Err(ValidationError::RowMismatch {
            sim: sim.num_rows(),
            reference: reference.num_rows(),
        });
    }
    if let Some((row, (&ts, &tr))) = sim
        .time()
        .iter()
        .zip(reference.time())
        .enumerate()
        .find(|(_, (ts, tr))| ts != tr)
    {
        return Err(ValidationError::TimeMismatch {
            row,
            sim: ts,
            reference: tr,
        });
    }

    let norms: Vec<f64> = sim
        .columns()
        .zip(reference.columns())
        .map(|(s, r)| norm.distance(s, r))
        .collect();
    let passed = norms.iter().all(|n| *n <= tolerance);

    Ok(ValidationResult {
        columns: sim.column_names().to_vec(),
        norms,
        passed,
    })
}

/// Check every column of `sim` against zero. Passes iff every column norm is
/// within `tolerance`.
pub fn check_table(
    sim: &DataTable,
    norm: NormKind,
    tolerance: f64,
) -> Result<ValidationResult, ValidationError> {
    let norms = column_magnitudes(sim, norm)?;
    let passed = norms.iter().all(|n| *n <= tolerance);
    Ok(ValidationResult {
        columns: sim.column_names().to_vec(),
        norms,
        passed,
    })
}

/// Check an energy table whose last column is the total energy drift
/// `E(t) - E(0)`.
///
/// All columns are reported but only the norm of the last one is gated.
pub fn check_energy_table(
    sim: &DataTable,
    norm: NormKind,
    tolerance: f64,
) -> Result<ValidationResult, ValidationError> {
    let norms = column_magnitudes(sim, norm)?;
    let passed = norms.last().is_some_and(|n| *n <= tolerance);
    Ok(ValidationResult {
        columns: sim.column_names().to_vec(),
        norms,
        passed,
    })
}

/// Load `sim` and `reference` and compare them, see [`compare_tables`].
pub fn validate_against_reference(
    sim: impl AsRef<Path>,
    reference: impl AsRef<Path>,
    norm: NormKind,
    tolerance: f64,
) -> Result<ValidationResult, ValidationError> {
    let sim = DataTable::load(sim)?;
    let reference = DataTable::load(reference)?;
    compare_tables(&sim, &reference, norm, tolerance)
}

/// Load `sim` and check its columns against zero, see [`check_table`].
pub fn validate_internal(
    sim: impl AsRef<Path>,
    norm: NormKind,
    tolerance: f64,
) -> Result<ValidationResult, ValidationError> {
    check_table(&DataTable::load(sim)?, norm, tolerance)
}

/// Load an energy table and gate its drift column, see
/// [`check_energy_table`].
pub fn validate_energy(
    sim: impl AsRef<Path>,
    norm: NormKind,
    tolerance: f64,
) -> Result<ValidationResult, ValidationError> {
    check_energy_table(&DataTable::load(sim)?, norm, tolerance)
}

fn ensure_samples(table: &DataTable) -> Result<(), ValidationError> {
    if table.is_empty() {
        return Err(ValidationError::Empty(table.origin().to_path_buf()));
    }
    if table.num_columns() == 0 {
        return Err(ValidationError::NoColumns(table.origin().to_path_buf()));
    }
    Ok(())
}

fn column_magnitudes(table: &DataTable, norm: NormKind) -> Result<Vec<f64>, ValidationError> {
    ensure_samples(table)?;
    Ok(table.columns().map(|c| norm.magnitude(c)).collect())
}

/// Outcome of validating one named quantity, e.g. `Pos` or `Energy`.
#[derive(Debug)]
pub struct QuantityCheck {
    pub quantity: String,
    pub outcome: Result<ValidationResult, ValidationError>,
}

impl QuantityCheck {
    pub fn new(
        quantity: impl Into<String>,
        outcome: Result<ValidationResult, ValidationError>,
    ) -> Self {
        Self {
            quantity: quantity.into(),
            outcome,
        }
    }

    /// True only when the validation ran and every gated norm was within
    /// tolerance.
    pub fn passed(&self) -> bool {
        matches!(&self.outcome, Ok(r) if r.passed)
    }

    /// True when the check could not produce norms at all.
    pub fn is_error(&self) -> bool {
        self.outcome.is_err()
    }

    pub fn result(&self) -> Option<&ValidationResult> {
        self.outcome.as_ref().ok()
    }
}

impl fmt::Display for QuantityCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Ok(result) => {
                let verdict = if result.passed { "Passed" } else { "Failed" };
                write!(f, "validate {}: {verdict}  [  ", self.quantity)?;
                for n in &result.norms {
                    write!(f, "{}  ", format_scientific(*n))?;
                }
                write!(f, "]")
            }
            Err(err) => write!(f, "validate {}: Error ({err})", self.quantity),
        }
    }
}

//! Result recording and numerical validation for multibody joint regression
//! tests.
//!
//! - `table`: column-oriented data files written by the engine-side
//!   producers and read back for validation
//! - `validator`: RMS (and L2/max) norm comparisons against reference
//!   curves, constraint residuals and energy drift
//! - `recorder`: per-test metrics and the JSON report artifact
//! - `energy`: energy terms of a rigid body, logged as a drift table

pub mod energy;
pub mod error;
pub mod norm;
pub mod recorder;
pub mod table;
pub mod validator;

pub use error::{RecorderError, TableError, ValidationError};
pub use norm::NormKind;
pub use recorder::{MetricValue, Metrics, TestCase, TestRecorder, TestReport};
pub use table::{DataTable, TableWriter};
pub use validator::{
    check_energy_table, check_table, compare_tables, validate_against_reference, validate_energy,
    validate_internal, QuantityCheck, ValidationResult,
};

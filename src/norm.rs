//! Error norms over sampled differences.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How per-sample differences of one column are reduced to a scalar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormKind {
    /// `sqrt(sum(d^2) / n)`
    #[default]
    Rms,
    /// `sqrt(sum(d^2))`
    L2,
    /// `max |d|`
    Inf,
}

impl NormKind {
    /// Reduce a sequence of differences. An empty sequence has norm zero.
    pub fn reduce(self, diffs: impl IntoIterator<Item = f64>) -> f64 {
        match self {
            Self::Rms => {
                let (sum, n) = diffs
                    .into_iter()
                    .fold((0.0, 0usize), |(sum, n), d| (sum + d * d, n + 1));
                if n == 0 {
                    0.0
                } else {
                    (sum / n as f64).sqrt()
                }
            }
            Self::L2 => diffs.into_iter().map(|d| d * d).sum::<f64>().sqrt(),
            // `f64::max` drops NaN operands; a NaN sample must poison the norm.
            Self::Inf => diffs.into_iter().fold(0.0, |acc: f64, d| {
                if acc.is_nan() || d.is_nan() {
                    f64::NAN
                } else {
                    acc.max(d.abs())
                }
            }),
        }
    }

    /// Norm of the pointwise difference `a - b` over equal-length slices.
    pub fn distance(self, a: &[f64], b: &[f64]) -> f64 {
        debug_assert_eq!(a.len(), b.len());
        self.reduce(a.iter().zip(b).map(|(x, y)| x - y))
    }

    /// Norm of a column measured against zero.
    pub fn magnitude(self, a: &[f64]) -> f64 {
        self.reduce(a.iter().copied())
    }
}

impl fmt::Display for NormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rms => write!(f, "rms"),
            Self::L2 => write!(f, "l2"),
            Self::Inf => write!(f, "inf"),
        }
    }
}

impl FromStr for NormKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rms" => Ok(Self::Rms),
            "l2" => Ok(Self::L2),
            "inf" | "max" => Ok(Self::Inf),
            other => Err(format!("unknown norm kind {other:?} (expected rms, l2 or inf)")),
        }
    }
}

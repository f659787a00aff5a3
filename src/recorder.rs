//! Uniform pass/fail and metrics accounting for one test run.
//!
//! A [`TestRecorder`] owns the identity of a run and the metrics collected
//! during it. [`TestRecorder::run`] drives a [`TestCase`], stores its verdict
//! and writes a single JSON report to `<results_dir>/<name>.json`:
//!
//! ```json
//! {"name":"Case01","project_name":"demo","passed":true,"execution_time":1.25,
//!  "metrics":{"iterations":42,"residual":0.0003}}
//! ```

use crate::error::RecorderError;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};

/// A single metric value.
///
/// Integers are tried before floats when reading a report back, so the
/// variant order matters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Int(i64),
    UInt(u64),
    Double(f64),
    Text(String),
    Vector(Vec<f64>),
}

impl From<f64> for MetricValue {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<i32> for MetricValue {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<i64> for MetricValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for MetricValue {
    fn from(v: u32) -> Self {
        Self::UInt(v.into())
    }
}

impl From<u64> for MetricValue {
    fn from(v: u64) -> Self {
        Self::UInt(v)
    }
}

impl From<usize> for MetricValue {
    fn from(v: usize) -> Self {
        Self::UInt(v as u64)
    }
}

impl From<&str> for MetricValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for MetricValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<f64>> for MetricValue {
    fn from(v: Vec<f64>) -> Self {
        Self::Vector(v)
    }
}

impl From<&[f64]> for MetricValue {
    fn from(v: &[f64]) -> Self {
        Self::Vector(v.to_vec())
    }
}

/// Metrics in insertion order.
///
/// Adding a key that is already present replaces its value and keeps the
/// position of the first insertion.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Metrics {
    entries: Vec<(String, MetricValue)>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: impl Into<String>, value: impl Into<MetricValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => {
                tracing::debug!(key = %key, "replacing existing metric");
                entry.1 = value;
            }
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&MetricValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetricValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Serialize for Metrics {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Metrics {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MetricsVisitor;

        impl<'de> Visitor<'de> for MetricsVisitor {
            type Value = Metrics;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of metric values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Metrics, A::Error> {
                let mut metrics = Metrics::new();
                while let Some((k, v)) = access.next_entry::<String, MetricValue>()? {
                    metrics.add(k, v);
                }
                Ok(metrics)
            }
        }

        deserializer.deserialize_map(MetricsVisitor)
    }
}

/// The persisted outcome of one test run. Field order is the serialized
/// order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestReport {
    pub name: String,
    pub project_name: String,
    pub passed: bool,
    pub execution_time: f64,
    pub metrics: Metrics,
}

impl TestReport {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Load a report written by [`TestRecorder::run`].
    pub fn load_json(path: &Path) -> Result<Self, RecorderError> {
        let json = std::fs::read_to_string(path).map_err(|source| RecorderError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| RecorderError::Deserialize {
            path: path.to_path_buf(),
            source,
        })
    }

    fn export_json(&self, path: &Path) -> Result<(), RecorderError> {
        let json = self.to_json().map_err(|source| RecorderError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;
        let io_err = |source| RecorderError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(io_err)?;
        }
        std::fs::write(path, json).map_err(io_err)
    }
}

/// A concrete test scenario driven by a [`TestRecorder`].
pub trait TestCase {
    /// Run the test, recording any metrics, and return whether it passed.
    fn execute(&mut self, metrics: &mut Metrics) -> bool;

    /// Duration of the last `execute` call, in seconds.
    fn execution_time(&self) -> f64;
}

/// Identity, verdict and metrics of one named test run.
#[derive(Debug)]
pub struct TestRecorder {
    name: String,
    project_name: String,
    results_dir: PathBuf,
    passed: bool,
    finalized: bool,
    metrics: Metrics,
}

impl TestRecorder {
    pub fn new(
        name: impl Into<String>,
        project_name: impl Into<String>,
        results_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            project_name: project_name.into(),
            results_dir: results_dir.into(),
            passed: false,
            finalized: false,
            metrics: Metrics::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Where [`run`](Self::run) writes the report.
    pub fn report_path(&self) -> PathBuf {
        self.results_dir.join(format!("{}.json", self.name))
    }

    pub fn add_metric(&mut self, key: impl Into<String>, value: impl Into<MetricValue>) {
        self.metrics.add(key, value);
    }

    /// Execute `case`, store its verdict and write the report.
    ///
    /// Returns the verdict. A report that cannot be written is returned as
    /// an error; the verdict is still available through [`passed`](Self::passed).
    pub fn run<T: TestCase + ?Sized>(&mut self, case: &mut T) -> Result<bool, RecorderError> {
        if self.finalized {
            return Err(RecorderError::AlreadyRun(self.name.clone()));
        }

        tracing::info!(test = %self.name, project = %self.project_name, "running test");
        self.passed = case.execute(&mut self.metrics);
        self.finalized = true;

        let report = self.report(case.execution_time());
        let path = self.report_path();
        if let Err(e) = report.export_json(&path) {
            tracing::error!(test = %self.name, "{e}");
            return Err(e);
        }
        tracing::info!(test = %self.name, passed = self.passed, path = %path.display(), "report written");
        Ok(self.passed)
    }

    /// Snapshot of the current state as a report.
    pub fn report(&self, execution_time: f64) -> TestReport {
        TestReport {
            name: self.name.clone(),
            project_name: self.project_name.clone(),
            passed: self.passed,
            execution_time,
            metrics: self.metrics.clone(),
        }
    }
}

impl fmt::Display for TestRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Test Information:")?;
        writeln!(f, "Test Name = {}", self.name)?;
        write!(f, "Project Name = {}", self.project_name)
    }
}

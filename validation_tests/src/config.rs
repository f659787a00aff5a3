//! Suite configuration: data directories, producer tags and the norm used by
//! every check. Loaded from an optional JSON file, then overridden by CLI
//! flags.

use mbdval::NormKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("`{0}` must not be empty")]
    EmptyField(&'static str),

    #[error("unknown scenario `{0}`")]
    UnknownScenario(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Project name written into every report.
    pub project_name: String,
    /// Root of the engine output, one subdirectory per scenario.
    pub sim_dir: PathBuf,
    /// Root of the reference data, one subdirectory per scenario.
    pub ref_dir: PathBuf,
    /// Where the JSON reports (and charts) go.
    pub results_dir: PathBuf,
    /// Tag of the simulation files, e.g. `Case01_CHRONO_Pos.txt`.
    pub producer: String,
    /// Tag of the reference files, e.g. `Case01_ADAMS_Pos.txt`.
    pub reference_producer: String,
    pub norm: NormKind,
    pub charts: bool,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            project_name: "joint_validation".to_string(),
            sim_dir: PathBuf::from("RESULTS"),
            ref_dir: PathBuf::from("validation_data"),
            results_dir: PathBuf::from("validation_results"),
            producer: "CHRONO".to_string(),
            reference_producer: "ADAMS".to_string(),
            norm: NormKind::Rms,
            charts: false,
        }
    }
}

impl SuiteConfig {
    /// Read a JSON config. Missing fields take their default value.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded suite config");
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would produce unusable file names or reports.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("project_name", self.project_name.is_empty()),
            ("producer", self.producer.is_empty()),
            ("reference_producer", self.reference_producer.is_empty()),
            ("sim_dir", self.sim_dir.as_os_str().is_empty()),
            ("ref_dir", self.ref_dir.as_os_str().is_empty()),
            ("results_dir", self.results_dir.as_os_str().is_empty()),
        ];
        match fields.into_iter().find(|(_, empty)| *empty) {
            Some((name, _)) => Err(ConfigError::EmptyField(name)),
            None => Ok(()),
        }
    }
}

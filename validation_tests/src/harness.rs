//! Validation harness for recorded joint simulations.
//!
//! The engine-side drivers write one channel table per quantity and case.
//! This module locates those tables, validates them against the reference
//! tables and the conservation checks, and wraps everything in a
//! [`TestRecorder`] so each scenario leaves one JSON report behind.

use crate::config::SuiteConfig;
use mbdval::{
    validate_energy, validate_internal, DataTable, Metrics, NormKind, QuantityCheck, TestCase,
    TestRecorder, ValidationError, ValidationResult,
};
use nalgebra::{vector, Point3, UnitQuaternion, Vector3};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Physical setup shared by the pendulum scenarios.
#[derive(Clone, Debug)]
pub struct PendulumParams {
    /// Pendulum mass (kg)
    pub mass: f64,
    /// Pendulum length (m)
    pub length: f64,
    /// Principal moments of inertia about the CG (kg m^2)
    pub inertia_xx: Vector3<f64>,
    /// Gravity magnitude along -Z (m/s^2)
    pub gravity: f64,
}

impl Default for PendulumParams {
    fn default() -> Self {
        Self {
            mass: 1.0,
            length: 4.0,
            inertia_xx: vector![0.04, 0.1, 0.1],
            gravity: 9.80665,
        }
    }
}

impl PendulumParams {
    /// CG of a pendulum hanging off a joint, half its length along the
    /// joint's X axis.
    pub fn cg_from_joint(
        &self,
        location: &Point3<f64>,
        orientation: &UnitQuaternion<f64>,
    ) -> Point3<f64> {
        location + orientation * vector![self.length / 2.0, 0.0, 0.0]
    }

    /// Potential energy of the CG relative to the joint height.
    pub fn potential_energy(&self, cg: &Point3<f64>, joint: &Point3<f64>) -> f64 {
        self.mass * self.gravity * (cg.z - joint.z)
    }
}

/// Per-quantity tolerances of one case.
#[derive(Clone, Debug)]
pub struct Tolerances {
    /// Quantities compared against reference data, e.g. `("Pos", 1e-3)`.
    pub reference: Vec<(String, f64)>,
    /// Tolerance on the total energy drift.
    pub energy: f64,
    /// Tolerance on every constraint residual column.
    pub constraints: f64,
}

impl Tolerances {
    pub fn new(reference: &[(&str, f64)], energy: f64, constraints: f64) -> Self {
        Self {
            reference: reference
                .iter()
                .map(|(what, tol)| (what.to_string(), *tol))
                .collect(),
            energy,
            constraints,
        }
    }
}

/// One configuration of a joint scenario.
#[derive(Clone, Debug)]
pub struct JointCase {
    pub name: String,
    pub joint_location: Point3<f64>,
    pub joint_orientation: UnitQuaternion<f64>,
    /// Initial CG of the moving body.
    pub body_position: Point3<f64>,
    pub tolerances: Tolerances,
}

/// A joint scenario: the pendulum setup, its cases, and where its data lives.
#[derive(Clone, Debug)]
pub struct ScenarioConfig {
    pub name: String,
    /// Subdirectory of the simulation output directory.
    pub sim_subdir: String,
    /// Subdirectory of the reference data directory.
    pub ref_subdir: String,
    pub pendulum: PendulumParams,
    pub sim_step: f64,
    pub out_step: f64,
    pub duration: f64,
    pub cases: Vec<JointCase>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            sim_subdir: "default".to_string(),
            ref_subdir: "default".to_string(),
            pendulum: PendulumParams::default(),
            sim_step: 5e-4,
            out_step: 1e-2,
            duration: 5.0,
            cases: vec![],
        }
    }
}

impl ScenarioConfig {
    /// Number of rows a complete output table has.
    pub fn expected_samples(&self) -> usize {
        (self.duration / self.out_step).round() as usize + 1
    }
}

/// Resolves data file names: `<dir>/<subdir>/<case>_<producer>_<what>.txt`.
#[derive(Clone, Debug)]
pub struct DataLayout {
    pub sim_dir: PathBuf,
    pub ref_dir: PathBuf,
    pub producer: String,
    pub reference_producer: String,
}

impl DataLayout {
    pub fn from_config(config: &SuiteConfig) -> Self {
        Self {
            sim_dir: config.sim_dir.clone(),
            ref_dir: config.ref_dir.clone(),
            producer: config.producer.clone(),
            reference_producer: config.reference_producer.clone(),
        }
    }

    pub fn sim_file(&self, scenario: &ScenarioConfig, case: &str, what: &str) -> PathBuf {
        self.sim_dir
            .join(&scenario.sim_subdir)
            .join(format!("{case}_{}_{what}.txt", self.producer))
    }

    pub fn ref_file(&self, scenario: &ScenarioConfig, case: &str, what: &str) -> PathBuf {
        self.ref_dir
            .join(&scenario.ref_subdir)
            .join(format!("{case}_{}_{what}.txt", self.reference_producer))
    }
}

/// All checks performed for one case.
#[derive(Debug)]
pub struct CaseOutcome {
    pub case: String,
    pub checks: Vec<QuantityCheck>,
}

impl CaseOutcome {
    pub fn passed(&self) -> bool {
        self.checks.iter().all(QuantityCheck::passed)
    }
}

/// Validates the recorded output of every case of a scenario.
pub struct JointTest {
    scenario: ScenarioConfig,
    layout: DataLayout,
    norm: NormKind,
    charts_dir: Option<PathBuf>,
    outcomes: Vec<CaseOutcome>,
    execution_time: f64,
}

impl JointTest {
    pub fn new(scenario: ScenarioConfig, layout: DataLayout, norm: NormKind) -> Self {
        Self {
            scenario,
            layout,
            norm,
            charts_dir: None,
            outcomes: Vec::new(),
            execution_time: 0.0,
        }
    }

    /// Also draw a comparison chart per reference quantity into `dir`.
    pub fn with_charts(mut self, dir: impl Into<PathBuf>) -> Self {
        self.charts_dir = Some(dir.into());
        self
    }

    pub fn charts_dir(&self) -> Option<&Path> {
        self.charts_dir.as_deref()
    }

    pub fn scenario(&self) -> &ScenarioConfig {
        &self.scenario
    }

    pub fn outcomes(&self) -> &[CaseOutcome] {
        &self.outcomes
    }

    /// Run every check of `case`: reference comparisons first, then energy
    /// and constraints.
    pub fn validate_case(&self, case: &JointCase) -> Vec<QuantityCheck> {
        let mut checks = Vec::with_capacity(case.tolerances.reference.len() + 2);

        for (what, tolerance) in &case.tolerances.reference {
            let outcome = self.compare_with_reference(case, what, *tolerance);
            checks.push(QuantityCheck::new(what.as_str(), outcome));
        }

        let energy = self.layout.sim_file(&self.scenario, &case.name, "Energy");
        checks.push(QuantityCheck::new(
            "Energy",
            validate_energy(energy, self.norm, case.tolerances.energy),
        ));

        let constraints = self.layout.sim_file(&self.scenario, &case.name, "Constraints");
        checks.push(QuantityCheck::new(
            "Constraints",
            validate_internal(constraints, self.norm, case.tolerances.constraints),
        ));

        checks
    }

    fn compare_with_reference(
        &self,
        case: &JointCase,
        what: &str,
        tolerance: f64,
    ) -> Result<ValidationResult, ValidationError> {
        let sim = DataTable::load(self.layout.sim_file(&self.scenario, &case.name, what))?;
        let reference = DataTable::load(self.layout.ref_file(&self.scenario, &case.name, what))?;
        let result = mbdval::compare_tables(&sim, &reference, self.norm, tolerance)?;

        if sim.num_rows() != self.scenario.expected_samples() {
            tracing::warn!(
                case = %case.name,
                quantity = what,
                rows = sim.num_rows(),
                expected = self.scenario.expected_samples(),
                "table length differs from the scenario's output grid"
            );
        }

        #[cfg(feature = "charts")]
        if let Some(dir) = &self.charts_dir {
            let path = dir.join(format!("{}_{what}.png", case.name));
            if let Err(e) =
                crate::metrics::generate_comparison_chart(what, &sim, &reference, &result, &path)
            {
                tracing::warn!(path = %path.display(), "failed to draw chart: {e}");
            }
        }

        Ok(result)
    }

    fn record_case_metrics(
        &self,
        case: &JointCase,
        checks: &[QuantityCheck],
        metrics: &mut Metrics,
    ) {
        metrics.add(
            format!("{}_JointLoc", case.name),
            case.joint_location.coords.as_slice(),
        );
        metrics.add(
            format!("{}_InitialCG", case.name),
            case.body_position.coords.as_slice(),
        );

        let pe = self
            .scenario
            .pendulum
            .potential_energy(&case.body_position, &case.joint_location);
        metrics.add(format!("{}_InitialPE", case.name), pe);

        let suffix = format!("{}max", self.norm.to_string().to_uppercase());
        for check in checks {
            let Some(result) = check.result() else {
                let key = format!("{}_{}_Error", case.name, check.quantity);
                metrics.add(key, "missing or malformed data");
                continue;
            };
            let value = if check.quantity == "Energy" {
                result.last_norm().unwrap_or(f64::NAN)
            } else {
                result.max_norm()
            };
            let key = format!("{}_{}_{suffix}", case.name, check.quantity);
            // JSON has no NaN or infinity; keep them readable as text.
            if value.is_finite() {
                metrics.add(key, value);
            } else {
                metrics.add(key, value.to_string());
            }
        }
    }
}

impl TestCase for JointTest {
    fn execute(&mut self, metrics: &mut Metrics) -> bool {
        let full = Instant::now();
        let mut test_passed = true;

        metrics.add("sim_step", self.scenario.sim_step);
        metrics.add("out_step", self.scenario.out_step);
        metrics.add("duration", self.scenario.duration);

        for case in &self.scenario.cases {
            println!("TEST: {}", case.name);
            let timer = Instant::now();
            let checks = self.validate_case(case);
            metrics.add(format!("{}_ExecTime", case.name), timer.elapsed().as_secs_f64());

            for check in &checks {
                println!("   {check}");
                if let Err(e) = &check.outcome {
                    tracing::error!(case = %case.name, quantity = %check.quantity, "{e}");
                }
            }
            self.record_case_metrics(case, &checks, metrics);

            let outcome = CaseOutcome {
                case: case.name.clone(),
                checks,
            };
            test_passed &= outcome.passed();
            self.outcomes.push(outcome);
        }

        self.execution_time = full.elapsed().as_secs_f64();
        println!("Full Execution Time = {:.6} s", self.execution_time);
        test_passed
    }

    fn execution_time(&self) -> f64 {
        self.execution_time
    }
}

/// Result of running one scenario through a recorder.
#[derive(Debug)]
pub struct ScenarioOutcome {
    pub name: String,
    pub passed: bool,
    pub cases: Vec<CaseOutcome>,
    /// Set when the JSON report could not be written.
    pub report_error: Option<String>,
}

/// Runs scenarios against the directories of a [`SuiteConfig`].
pub struct ValidationHarness {
    config: SuiteConfig,
}

impl ValidationHarness {
    pub fn new(config: SuiteConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Validate all cases of `scenario` and write `<results_dir>/<name>.json`.
    pub fn run_scenario(&self, scenario: ScenarioConfig) -> ScenarioOutcome {
        let name = scenario.name.clone();
        let layout = DataLayout::from_config(&self.config);
        let mut test = JointTest::new(scenario, layout, self.config.norm);
        if self.config.charts {
            if cfg!(feature = "charts") {
                test = test.with_charts(self.config.results_dir.join("charts"));
            } else {
                tracing::warn!("charts requested but the `charts` feature is disabled");
            }
        }

        let mut recorder = TestRecorder::new(
            name.as_str(),
            self.config.project_name.as_str(),
            &self.config.results_dir,
        );
        let report_error = match recorder.run(&mut test) {
            Ok(_) => None,
            Err(e) => {
                eprintln!("  Failed to write report: {e}");
                Some(e.to_string())
            }
        };

        ScenarioOutcome {
            name,
            passed: recorder.passed(),
            cases: test.outcomes,
            report_error,
        }
    }
}

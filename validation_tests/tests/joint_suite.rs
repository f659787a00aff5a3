//! End-to-end runs of the harness over tables written to a scratch directory.

use mbdval::{MetricValue, TableWriter, TestReport};
use mbdval_validation::scenarios::{rev_spherical_scenario, RevSphericalParams};
use mbdval_validation::{
    DataLayout, JointCase, PendulumParams, ScenarioConfig, SuiteConfig, SuiteSummary, Tolerances,
    ValidationHarness,
};
use nalgebra::{Point3, UnitQuaternion};
use std::path::{Path, PathBuf};

const STEPS: usize = 50;

fn scenario() -> ScenarioConfig {
    let pendulum = PendulumParams::default();
    let location = Point3::origin();
    let orientation = UnitQuaternion::identity();
    let body_position = pendulum.cg_from_joint(&location, &orientation);
    ScenarioConfig {
        name: "swing".to_string(),
        sim_subdir: "swing".to_string(),
        ref_subdir: "swing_ref".to_string(),
        pendulum,
        out_step: 1e-2,
        duration: 0.5,
        cases: vec![JointCase {
            name: "Case01".to_string(),
            joint_location: location,
            joint_orientation: orientation,
            body_position,
            tolerances: Tolerances::new(&[("Pos", 1e-3)], 1e-2, 1e-5),
        }],
        ..Default::default()
    }
}

fn config(root: &Path) -> SuiteConfig {
    SuiteConfig {
        project_name: "demo".to_string(),
        sim_dir: root.join("RESULTS"),
        ref_dir: root.join("validation_data"),
        results_dir: root.join("results"),
        ..Default::default()
    }
}

/// Write a table sampled on the shared output grid.
fn write_table(path: &Path, header: &[&str], row: impl Fn(f64) -> Vec<f64>) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut table = TableWriter::new(header.iter().copied());
    for i in 0..=STEPS {
        let t = i as f64 * 0.01;
        table.push_row(t, &row(t)).unwrap();
    }
    table.write_to_file(path, "Validation test").unwrap();
}

/// Lay out a complete data set for `scenario()`. `pos_offset` is added to
/// the simulated X position.
fn write_data(config: &SuiteConfig, pos_offset: f64) -> DataLayout {
    let layout = DataLayout::from_config(config);
    let scenario = scenario();
    let pos = |t: f64| vec![2.0 * (1.0 - t * t).sqrt(), 0.0, -2.0 * t];

    write_table(
        &layout.sim_file(&scenario, "Case01", "Pos"),
        &["Time", "X_Pos", "Y_Pos", "Z_Pos"],
        |t| {
            let mut p = pos(t);
            p[0] += pos_offset;
            p
        },
    );
    write_table(
        &layout.ref_file(&scenario, "Case01", "Pos"),
        &["Time", "X_Pos", "Y_Pos", "Z_Pos"],
        pos,
    );
    write_table(
        &layout.sim_file(&scenario, "Case01", "Energy"),
        &["Time", "Transl_KE", "Rot_KE", "Delta_PE", "KE+PE"],
        |t| vec![t, 0.1 * t, -1.1 * t, 1e-4 * t],
    );
    write_table(
        &layout.sim_file(&scenario, "Case01", "Constraints"),
        &["Time", "C1", "C2", "C3"],
        |_| vec![1e-7, -1e-7, 0.0],
    );
    layout
}

fn load_report(config: &SuiteConfig) -> TestReport {
    TestReport::load_json(&config.results_dir.join("swing.json")).unwrap()
}

#[test]
fn matching_data_passes_and_writes_report() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    write_data(&config, 1e-5);

    let outcome = ValidationHarness::new(config.clone()).run_scenario(scenario());
    assert!(outcome.passed);
    assert!(outcome.report_error.is_none());
    assert_eq!(outcome.cases.len(), 1);
    let quantities: Vec<_> = outcome.cases[0]
        .checks
        .iter()
        .map(|c| c.quantity.as_str())
        .collect();
    assert_eq!(quantities, ["Pos", "Energy", "Constraints"]);

    let report = load_report(&config);
    assert_eq!(report.name, "swing");
    assert_eq!(report.project_name, "demo");
    assert!(report.passed);
    assert!(report.execution_time >= 0.0);
    assert_eq!(
        report.metrics.get("Case01_JointLoc"),
        Some(&MetricValue::Vector(vec![0.0, 0.0, 0.0]))
    );
    assert_eq!(
        report.metrics.get("Case01_InitialCG"),
        Some(&MetricValue::Vector(vec![2.0, 0.0, 0.0]))
    );
    assert!(matches!(
        report.metrics.get("Case01_Pos_RMSmax"),
        Some(MetricValue::Double(v)) if *v < 1e-3
    ));
    assert!(report.metrics.get("Case01_ExecTime").is_some());
    assert!(report.metrics.get("Case01_Energy_RMSmax").is_some());
    assert!(report.metrics.get("Case01_Constraints_RMSmax").is_some());
}

#[test]
fn position_offset_over_tolerance_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    write_data(&config, 5e-3);

    let outcome = ValidationHarness::new(config.clone()).run_scenario(scenario());
    assert!(!outcome.passed);
    let pos = &outcome.cases[0].checks[0];
    assert!(!pos.passed());
    assert!(!pos.is_error());
    assert!(outcome.cases[0].checks[1..].iter().all(|c| c.passed()));

    assert!(!load_report(&config).passed);
}

#[test]
fn missing_reference_is_an_error_not_a_pass() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    let layout = write_data(&config, 0.0);
    std::fs::remove_file(layout.ref_file(&scenario(), "Case01", "Pos")).unwrap();

    let outcome = ValidationHarness::new(config.clone()).run_scenario(scenario());
    assert!(!outcome.passed);
    assert!(outcome.cases[0].checks[0].is_error());

    let report = load_report(&config);
    assert!(!report.passed);
    assert!(matches!(
        report.metrics.get("Case01_Pos_Error"),
        Some(MetricValue::Text(_))
    ));

    let mut summary = SuiteSummary::new("demo");
    summary.push(&outcome);
    assert!(!summary.all_passed());
    assert_eq!(summary.scenarios[0].errored_checks, ["Case01/Pos"]);
}

#[test]
fn energy_drift_over_tolerance_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    let layout = write_data(&config, 0.0);
    write_table(
        &layout.sim_file(&scenario(), "Case01", "Energy"),
        &["Time", "Transl_KE", "Rot_KE", "Delta_PE", "KE+PE"],
        |t| vec![t, 0.1 * t, -1.1 * t, 0.05],
    );

    let outcome = ValidationHarness::new(config).run_scenario(scenario());
    assert!(!outcome.passed);
    let energy = &outcome.cases[0].checks[1];
    assert_eq!(energy.quantity, "Energy");
    assert!(!energy.passed());
}

#[test]
fn nan_residual_fails_and_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(dir.path());
    config.norm = mbdval::NormKind::Inf;
    let layout = write_data(&config, 0.0);
    write_table(
        &layout.sim_file(&scenario(), "Case01", "Constraints"),
        &["Time", "C1", "C2", "C3"],
        |t| vec![if t > 0.2 { f64::NAN } else { 0.0 }, 5.0, 0.0],
    );

    let outcome = ValidationHarness::new(config.clone()).run_scenario(scenario());
    assert!(!outcome.passed);
    assert!(!outcome.cases[0].checks[2].passed());

    let report = load_report(&config);
    assert_eq!(
        report.metrics.get("Case01_Constraints_INFmax"),
        Some(&MetricValue::Text("NaN".to_string()))
    );
}

#[test]
fn unwritable_results_dir_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(dir.path());
    write_data(&config, 0.0);
    // A regular file where the results directory should be.
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();
    config.results_dir = blocker.join("results");

    let outcome = ValidationHarness::new(config).run_scenario(scenario());
    assert!(outcome.passed);
    assert!(outcome.report_error.is_some());

    let mut summary = SuiteSummary::new("demo");
    summary.push(&outcome);
    assert!(!summary.all_passed());
}

#[test]
fn layout_follows_producer_naming() {
    let layout = DataLayout::from_config(&SuiteConfig::default());
    let scenario = rev_spherical_scenario(RevSphericalParams::default());
    let case = scenario.cases[0].name.as_str();
    assert_eq!(
        layout.sim_file(&scenario, case, "Pos"),
        PathBuf::from("RESULTS/REVSPH_CONSTRAINT/RevSpherical_Case01_CHRONO_Pos.txt")
    );
    assert_eq!(
        layout.ref_file(&scenario, case, "Rforce_Body1"),
        PathBuf::from(
            "validation_data/revsph_constraint/RevSpherical_Case01_ADAMS_Rforce_Body1.txt"
        )
    );
}

//! Suite-level summary of scenario outcomes, and optional comparison charts.

use crate::harness::ScenarioOutcome;
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

/// Verdict counts of one scenario.
#[derive(Clone, Debug, Serialize)]
pub struct ScenarioSummary {
    pub name: String,
    pub passed: bool,
    pub cases: usize,
    pub failed_checks: Vec<String>,
    /// Checks that produced no norms (missing or malformed data).
    pub errored_checks: Vec<String>,
    pub report_error: Option<String>,
}

impl ScenarioSummary {
    pub fn from_outcome(outcome: &ScenarioOutcome) -> Self {
        let mut failed_checks = Vec::new();
        let mut errored_checks = Vec::new();
        for case in &outcome.cases {
            for check in &case.checks {
                let label = format!("{}/{}", case.case, check.quantity);
                if check.is_error() {
                    errored_checks.push(label);
                } else if !check.passed() {
                    failed_checks.push(label);
                }
            }
        }

        Self {
            name: outcome.name.clone(),
            passed: outcome.passed && outcome.report_error.is_none(),
            cases: outcome.cases.len(),
            failed_checks,
            errored_checks,
            report_error: outcome.report_error.clone(),
        }
    }
}

/// Aggregate over every scenario of a run.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SuiteSummary {
    pub project_name: String,
    pub scenarios: Vec<ScenarioSummary>,
}

impl SuiteSummary {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            scenarios: Vec::new(),
        }
    }

    pub fn push(&mut self, outcome: &ScenarioOutcome) {
        self.scenarios.push(ScenarioSummary::from_outcome(outcome));
    }

    /// True iff at least one scenario ran and all of them passed.
    pub fn all_passed(&self) -> bool {
        !self.scenarios.is_empty() && self.scenarios.iter().all(|s| s.passed)
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.all_passed() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }

    /// Generate a human-readable report.
    pub fn report(&self) -> String {
        let mut out = format!(
            "{}\nVALIDATION SUMMARY: {}\n{}\n{:<20} {:<8} {:<8} {:<8} {:<8}\n{}\n",
            "=".repeat(60),
            self.project_name,
            "=".repeat(60),
            "Scenario",
            "Result",
            "Cases",
            "Failed",
            "Errors",
            "-".repeat(60),
        );
        for s in &self.scenarios {
            out.push_str(&format!(
                "{:<20} {:<8} {:<8} {:<8} {:<8}\n",
                s.name,
                if s.passed { "PASS" } else { "FAIL" },
                s.cases,
                s.failed_checks.len(),
                s.errored_checks.len(),
            ));
            for label in &s.failed_checks {
                out.push_str(&format!("    failed: {label}\n"));
            }
            for label in &s.errored_checks {
                out.push_str(&format!("    error:  {label}\n"));
            }
            if let Some(e) = &s.report_error {
                out.push_str(&format!("    report: {e}\n"));
            }
        }
        out
    }

    /// Export the summary to JSON.
    pub fn export_json(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Plot every simulation column against its reference column, one panel
/// per column.
#[cfg(feature = "charts")]
pub fn generate_comparison_chart(
    quantity: &str,
    sim: &mbdval::DataTable,
    reference: &mbdval::DataTable,
    result: &mbdval::ValidationResult,
    output_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    use plotters::prelude::*;

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let columns = sim.num_columns().max(1);
    let root = BitMapBackend::new(output_path, (900, 300 * columns as u32)).into_drawing_area();
    root.fill(&WHITE)?;
    let areas = root.split_evenly((columns, 1));

    let t_min = sim.time().first().copied().unwrap_or(0.0);
    let t_max = sim.time().last().copied().unwrap_or(1.0).max(t_min + f64::EPSILON);

    for (i, area) in areas.iter().enumerate().take(sim.num_columns()) {
        let s = sim.column(i);
        let r = reference.column(i);
        let lo = s.iter().chain(r).copied().fold(f64::MAX, f64::min);
        let hi = s.iter().chain(r).copied().fold(f64::MIN, f64::max);
        let margin = ((hi - lo) * 0.05).max(1e-9);

        let name = result.columns.get(i).map(String::as_str).unwrap_or("?");
        let norm = result.norms.get(i).copied().unwrap_or(f64::NAN);
        let mut chart = ChartBuilder::on(area)
            .caption(
                format!("{quantity} {name}  (norm {norm:.3e})"),
                ("sans-serif", 18),
            )
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(70)
            .build_cartesian_2d(t_min..t_max, (lo - margin)..(hi + margin))?;

        chart
            .configure_mesh()
            .x_desc("Time (s)")
            .y_desc(name)
            .draw()?;

        chart
            .draw_series(LineSeries::new(
                sim.time().iter().copied().zip(s.iter().copied()),
                &BLUE,
            ))?
            .label("simulation")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
        chart
            .draw_series(LineSeries::new(
                reference.time().iter().copied().zip(r.iter().copied()),
                &RED,
            ))?
            .label("reference")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::CaseOutcome;
    use mbdval::{QuantityCheck, ValidationError, ValidationResult};
    use std::path::PathBuf;

    fn check(quantity: &str, passed: bool) -> QuantityCheck {
        QuantityCheck::new(
            quantity,
            Ok(ValidationResult {
                columns: vec!["X".to_string()],
                norms: vec![if passed { 0.0 } else { 1.0 }],
                passed,
            }),
        )
    }

    fn outcome(name: &str, checks: Vec<QuantityCheck>) -> ScenarioOutcome {
        let passed = checks.iter().all(QuantityCheck::passed);
        ScenarioOutcome {
            name: name.to_string(),
            passed,
            cases: vec![CaseOutcome {
                case: "Case01".to_string(),
                checks,
            }],
            report_error: None,
        }
    }

    #[test]
    fn failures_and_errors_are_listed_separately() {
        let mut summary = SuiteSummary::new("demo");
        summary.push(&outcome("spherical", vec![check("Pos", true)]));
        summary.push(&outcome(
            "revolute",
            vec![
                check("Pos", false),
                QuantityCheck::new(
                    "Vel",
                    Err(ValidationError::Empty(PathBuf::from("Case01_Vel.txt"))),
                ),
            ],
        ));

        assert!(!summary.all_passed());
        assert!(summary.scenarios[0].passed);
        let revolute = &summary.scenarios[1];
        assert_eq!(revolute.failed_checks, ["Case01/Pos"]);
        assert_eq!(revolute.errored_checks, ["Case01/Vel"]);

        let report = summary.report();
        assert!(report.contains("spherical"));
        assert!(report.contains("failed: Case01/Pos"));
        assert!(report.contains("error:  Case01/Vel"));
    }

    #[test]
    fn empty_suite_does_not_pass() {
        assert!(!SuiteSummary::new("demo").all_passed());
    }

    #[test]
    fn unwritable_report_fails_the_scenario() {
        let mut o = outcome("spherical", vec![check("Pos", true)]);
        o.report_error = Some("permission denied".to_string());
        let summary = ScenarioSummary::from_outcome(&o);
        assert!(!summary.passed);
    }

    #[test]
    fn summary_json_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("summary.json");
        let mut summary = SuiteSummary::new("demo");
        summary.push(&outcome("spherical", vec![check("Pos", true)]));
        summary.export_json(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["project_name"], "demo");
        assert_eq!(value["scenarios"][0]["passed"], true);
    }
}

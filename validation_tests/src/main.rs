//! Joint regression runner.
//!
//! Validates the tables recorded by the engine's joint tests against the
//! reference data, writes one JSON report per scenario and a summary, and
//! exits non-zero when anything failed.
//!
//! Usage:
//!   cargo run -p mbdval_validation_tests -- [OPTIONS]
//!
//! Exit status: 0 when every check passed, 1 when a check failed or could
//! not run, 2 when the configuration is invalid.

use clap::Parser;
use mbdval::NormKind;
use mbdval_validation::config::{ConfigError, SuiteConfig};
use mbdval_validation::harness::ValidationHarness;
use mbdval_validation::metrics::SuiteSummary;
use mbdval_validation::scenarios::{self, SCENARIO_NAMES};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "joint-validation")]
#[command(about = "Validate recorded joint tests against reference data", long_about = None)]
#[command(version)]
struct Cli {
    /// Scenario to validate: all, spherical, revolute or rev_spherical
    #[arg(short, long, default_value = "all")]
    scenario: String,

    /// JSON configuration file
    #[arg(short, long, env = "JOINT_VALIDATION_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the engine output
    #[arg(long)]
    sim_dir: Option<PathBuf>,

    /// Directory holding the reference data
    #[arg(long)]
    ref_dir: Option<PathBuf>,

    /// Directory receiving reports and charts
    #[arg(long)]
    results_dir: Option<PathBuf>,

    /// Project name written into the reports
    #[arg(long)]
    project: Option<String>,

    /// Error norm (rms, l2, inf)
    #[arg(long)]
    norm: Option<NormKind>,

    /// Draw simulation vs reference charts (requires the "charts" feature)
    #[arg(long)]
    charts: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn suite_config(&self) -> Result<SuiteConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => SuiteConfig::load(path)?,
            None => SuiteConfig::default(),
        };
        if let Some(dir) = &self.sim_dir {
            config.sim_dir = dir.clone();
        }
        if let Some(dir) = &self.ref_dir {
            config.ref_dir = dir.clone();
        }
        if let Some(dir) = &self.results_dir {
            config.results_dir = dir.clone();
        }
        if let Some(project) = &self.project {
            config.project_name = project.clone();
        }
        if let Some(norm) = self.norm {
            config.norm = norm;
        }
        config.charts |= self.charts;
        config.validate()?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let setup = cli.suite_config().and_then(|config| {
        let selected = scenarios::select(&cli.scenario)?;
        Ok::<_, ConfigError>((config, selected))
    });
    let (config, selected) = match setup {
        Ok(v) => v,
        Err(e) => {
            tracing::error!("{e}");
            if matches!(e, ConfigError::UnknownScenario(_)) {
                eprintln!("Known scenarios: all, {}", SCENARIO_NAMES.join(", "));
            }
            return ExitCode::from(2);
        }
    };

    tracing::info!(
        sim_dir = %config.sim_dir.display(),
        ref_dir = %config.ref_dir.display(),
        norm = %config.norm,
        "validating {} scenario(s)",
        selected.len()
    );

    let mut summary = SuiteSummary::new(config.project_name.clone());
    let summary_path = config.results_dir.join("summary.json");
    let harness = ValidationHarness::new(config);

    for scenario in selected {
        println!("\nValidating scenario: {}", scenario.name);
        println!("  Cases: {}", scenario.cases.len());
        let outcome = harness.run_scenario(scenario);
        println!(
            "  {}: {}",
            outcome.name,
            if outcome.passed { "PASSED" } else { "FAILED" }
        );
        summary.push(&outcome);
    }

    println!("\n{}", summary.report());
    match summary.export_json(&summary_path) {
        Ok(()) => println!("Saved summary: {}", summary_path.display()),
        Err(e) => tracing::error!(path = %summary_path.display(), "failed to save summary: {e}"),
    }

    summary.exit_code()
}

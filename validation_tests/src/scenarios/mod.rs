//! Joint validation scenarios.
//!
//! Each scenario describes a pendulum attached through one kind of joint,
//! the cases it is run in, and the tolerances each recorded quantity must
//! meet.

pub mod rev_spherical;
pub mod revolute;
pub mod spherical;

pub use rev_spherical::{rev_spherical_scenario, RevSphericalParams, RevSphericalSetup};
pub use revolute::{revolute_scenario, RevoluteParams};
pub use spherical::{spherical_scenario, SphericalParams};

use crate::config::ConfigError;
use crate::harness::ScenarioConfig;

/// Names accepted by [`select`], in run order.
pub const SCENARIO_NAMES: [&str; 3] = ["spherical", "revolute", "rev_spherical"];

/// Every scenario with its default parameters.
pub fn all() -> Vec<ScenarioConfig> {
    vec![
        spherical_scenario(SphericalParams::default()),
        revolute_scenario(RevoluteParams::default()),
        rev_spherical_scenario(RevSphericalParams::default()),
    ]
}

/// The scenario named `filter`, or all of them for `"all"`.
pub fn select(filter: &str) -> Result<Vec<ScenarioConfig>, ConfigError> {
    if filter == "all" {
        return Ok(all());
    }
    let selected: Vec<_> = all().into_iter().filter(|s| s.name == filter).collect();
    if selected.is_empty() {
        return Err(ConfigError::UnknownScenario(filter.to_string()));
    }
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_scenarios() {
        let names: Vec<_> = all().into_iter().map(|s| s.name).collect();
        assert_eq!(names, SCENARIO_NAMES);
    }

    #[test]
    fn case_names_match_engine_test_names() {
        let names: Vec<_> = all()
            .into_iter()
            .flat_map(|s| s.cases)
            .map(|c| c.name)
            .collect();
        assert_eq!(
            names,
            [
                "Spherical_Case01",
                "Spherical_Case02",
                "Revolute_Case01",
                "Revolute_Case02",
                "RevSpherical_Case01",
                "RevSpherical_Case02",
            ]
        );
    }

    #[test]
    fn select_by_name() {
        assert_eq!(select("all").unwrap().len(), 3);
        assert_eq!(select("revolute").unwrap()[0].name, "revolute");
        assert!(matches!(
            select("prismatic"),
            Err(ConfigError::UnknownScenario(name)) if name == "prismatic"
        ));
    }
}

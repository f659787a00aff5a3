//! Spherical Joint Validation Test
//!
//! A horizontal pendulum hangs off a spherical joint and swings under
//! gravity from rest. The joint frame is either the world frame or rotated
//! about X, so the same motion is exercised with a non-trivial orientation.
//!
//! Key metrics:
//!   - CG kinematics and orientation vs the reference model
//!   - Joint reaction force and torque (the torque should vanish)
//!   - Energy conservation and constraint residuals

use crate::harness::{JointCase, PendulumParams, ScenarioConfig, Tolerances};
use nalgebra::{point, Point3, UnitQuaternion, Vector3};
use std::f64::consts::FRAC_PI_4;

/// Parameters for the spherical joint test.
#[derive(Clone, Debug)]
pub struct SphericalParams {
    pub pendulum: PendulumParams,
    /// Integration step (s)
    pub sim_step: f64,
    /// Output sampling step (s)
    pub out_step: f64,
    /// Simulated time (s)
    pub duration: f64,
}

impl Default for SphericalParams {
    fn default() -> Self {
        Self {
            pendulum: PendulumParams::default(),
            sim_step: 5e-4,
            out_step: 1e-2,
            duration: 5.0,
        }
    }
}

impl SphericalParams {
    fn case(
        &self,
        name: &str,
        location: Point3<f64>,
        orientation: UnitQuaternion<f64>,
        tolerances: Tolerances,
    ) -> JointCase {
        JointCase {
            name: name.to_string(),
            joint_location: location,
            joint_orientation: orientation,
            body_position: self.pendulum.cg_from_joint(&location, &orientation),
            tolerances,
        }
    }
}

/// Create the spherical joint scenario configuration.
pub fn spherical_scenario(params: SphericalParams) -> ScenarioConfig {
    let tolerances = || {
        Tolerances::new(
            &[
                ("Pos", 2e-3),
                ("Vel", 1e-3),
                ("Acc", 2e-2),
                ("Quat", 1e-3),
                ("Avel", 2e-2),
                ("Aacc", 2e-2),
                ("Rforce", 2e-2),
                ("Rtorque", 1e-6),
            ],
            1e-2,
            1e-5,
        )
    };

    let cases = vec![
        params.case(
            "Spherical_Case01",
            Point3::origin(),
            UnitQuaternion::identity(),
            tolerances(),
        ),
        params.case(
            "Spherical_Case02",
            point![1.0, 2.0, 3.0],
            UnitQuaternion::from_axis_angle(&Vector3::x_axis(), -FRAC_PI_4),
            tolerances(),
        ),
    ];

    ScenarioConfig {
        name: "spherical".to_string(),
        sim_subdir: "spherical_joint".to_string(),
        ref_subdir: "spherical_joint".to_string(),
        pendulum: params.pendulum,
        sim_step: params.sim_step,
        out_step: params.out_step,
        duration: params.duration,
        cases,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn cg_sits_half_a_length_along_the_joint_x_axis() {
        let scenario = spherical_scenario(SphericalParams::default());
        assert_eq!(scenario.cases.len(), 2);
        assert_relative_eq!(scenario.cases[0].body_position, point![2.0, 0.0, 0.0]);
        // A rotation about X leaves the X axis in place.
        assert_relative_eq!(
            scenario.cases[1].body_position,
            point![3.0, 2.0, 3.0],
            epsilon = 1e-12
        );
        assert_eq!(scenario.expected_samples(), 501);
    }
}

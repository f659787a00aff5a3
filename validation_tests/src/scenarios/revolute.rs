//! Revolute Joint Validation Test
//!
//! A pendulum swings about a revolute joint whose axis is the joint frame's
//! Z axis. Case01 turns the axis to world Y, Case02 tilts it by 45 degrees
//! about X so the pendulum swings out of the vertical plane.
//!
//! Key metrics:
//!   - CG kinematics and orientation vs the reference model
//!   - Joint reaction force and torque
//!   - Energy conservation and constraint residuals

use crate::harness::{JointCase, PendulumParams, ScenarioConfig, Tolerances};
use nalgebra::{point, Point3, UnitQuaternion, Vector3};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

/// Parameters for the revolute joint test.
#[derive(Clone, Debug)]
pub struct RevoluteParams {
    pub pendulum: PendulumParams,
    /// Integration step (s)
    pub sim_step: f64,
    /// Output sampling step (s)
    pub out_step: f64,
    /// Simulated time (s)
    pub duration: f64,
}

impl Default for RevoluteParams {
    fn default() -> Self {
        Self {
            pendulum: PendulumParams::default(),
            sim_step: 5e-4,
            out_step: 1e-2,
            duration: 5.0,
        }
    }
}

/// Create the revolute joint scenario configuration.
pub fn revolute_scenario(params: RevoluteParams) -> ScenarioConfig {
    let case = |name: &str, location: Point3<f64>, angle: f64, tolerances: Tolerances| {
        let orientation = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), angle);
        JointCase {
            name: name.to_string(),
            joint_location: location,
            joint_orientation: orientation,
            body_position: params.pendulum.cg_from_joint(&location, &orientation),
            tolerances,
        }
    };

    let cases = vec![
        case(
            "Revolute_Case01",
            Point3::origin(),
            -FRAC_PI_2,
            Tolerances::new(
                &[
                    ("Pos", 1e-3),
                    ("Vel", 1e-4),
                    ("Acc", 2e-2),
                    ("Quat", 1e-3),
                    ("Avel", 1e-2),
                    ("Aacc", 1e-2),
                    ("Rforce", 2e-2),
                    ("Rtorque", 1e-2),
                ],
                1e-2,
                1e-5,
            ),
        ),
        case(
            "Revolute_Case02",
            point![1.0, 2.0, 3.0],
            -FRAC_PI_4,
            Tolerances::new(
                &[
                    ("Pos", 1e-3),
                    ("Vel", 1e-4),
                    ("Acc", 1e-2),
                    ("Quat", 1e-3),
                    ("Avel", 1e-5),
                    ("Aacc", 1e-2),
                    ("Rforce", 1e-2),
                    ("Rtorque", 1e-2),
                ],
                1e-2,
                1e-5,
            ),
        ),
    ];

    ScenarioConfig {
        name: "revolute".to_string(),
        sim_subdir: "revolute_joint".to_string(),
        ref_subdir: "revolute_joint".to_string(),
        pendulum: params.pendulum,
        sim_step: params.sim_step,
        out_step: params.out_step,
        duration: params.duration,
        cases,
    }
}

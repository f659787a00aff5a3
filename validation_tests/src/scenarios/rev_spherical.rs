//! Revolute-Spherical Joint Validation Test
//!
//! A massless link connects a revolute joint on the ground to a spherical
//! joint at the end of a pendulum. The pendulum starts horizontal, at rest,
//! and falls while the link keeps the attachment point at a fixed distance
//! from the revolute axis.
//!
//! Key metrics:
//!   - CG kinematics and orientation vs the reference model
//!   - Reaction force and torque on both connected bodies
//!   - Energy conservation and the two constraint residuals

use crate::harness::{JointCase, PendulumParams, ScenarioConfig, Tolerances};
use nalgebra::{point, vector, Point3, UnitQuaternion, Vector3};

/// Parameters for the revolute-spherical test.
#[derive(Clone, Debug)]
pub struct RevSphericalParams {
    pub pendulum: PendulumParams,
    /// Integration step (s); the composite joint needs a much finer step.
    pub sim_step: f64,
    /// Output sampling step (s)
    pub out_step: f64,
    /// Simulated time (s)
    pub duration: f64,
}

impl Default for RevSphericalParams {
    fn default() -> Self {
        Self {
            pendulum: PendulumParams {
                inertia_xx: vector![0.1, 0.04, 0.1],
                ..Default::default()
            },
            sim_step: 1e-5,
            out_step: 1e-2,
            duration: 5.0,
        }
    }
}

/// Geometry of one revolute-spherical case.
#[derive(Clone, Debug)]
pub struct RevSphericalSetup {
    pub revolute_location: Point3<f64>,
    /// Revolute axis in world coordinates; need not be normalized.
    pub revolute_axis: Vector3<f64>,
    pub spherical_location: Point3<f64>,
    pub pendulum_cg: Point3<f64>,
}

impl RevSphericalSetup {
    /// Joint frame whose Z axis is the revolute axis.
    pub fn joint_orientation(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::rotation_between(&Vector3::z(), &self.revolute_axis)
            .unwrap_or_else(|| {
                // Axis is exactly -Z.
                UnitQuaternion::from_axis_angle(&Vector3::x_axis(), std::f64::consts::PI)
            })
    }

    /// Distance kept by the massless link.
    pub fn link_length(&self) -> f64 {
        (self.spherical_location - self.revolute_location).norm()
    }
}

fn tolerances() -> Tolerances {
    Tolerances::new(
        &[
            ("Pos", 1e-4),
            ("Vel", 1e-4),
            ("Acc", 1e-1),
            ("Quat", 1e-5),
            ("Avel", 1e-4),
            ("Aacc", 5e-1),
            ("Rforce_Body1", 5e-1),
            ("Rtorque_Body1", 5e-1),
            ("Rforce_Body2", 5e-1),
            ("Rtorque_Body2", 5e-1),
        ],
        1e-2,
        1e-5,
    )
}

/// Create the revolute-spherical scenario configuration.
pub fn rev_spherical_scenario(params: RevSphericalParams) -> ScenarioConfig {
    let setups = [
        (
            "RevSpherical_Case01",
            RevSphericalSetup {
                revolute_location: Point3::origin(),
                revolute_axis: Vector3::z(),
                spherical_location: point![2.0, 0.0, 0.0],
                pendulum_cg: point![2.0, 2.0, 0.0],
            },
        ),
        (
            "RevSpherical_Case02",
            RevSphericalSetup {
                revolute_location: point![1.0, 2.0, 3.0],
                revolute_axis: vector![0.0, 1.0, 1.0],
                spherical_location: point![3.0, 2.0, 3.0],
                pendulum_cg: point![3.0, 4.0, 3.0],
            },
        ),
    ];

    let cases = setups
        .iter()
        .map(|(name, setup)| JointCase {
            name: name.to_string(),
            joint_location: setup.revolute_location,
            joint_orientation: setup.joint_orientation(),
            body_position: setup.pendulum_cg,
            tolerances: tolerances(),
        })
        .collect();

    ScenarioConfig {
        name: "rev_spherical".to_string(),
        sim_subdir: "REVSPH_CONSTRAINT".to_string(),
        ref_subdir: "revsph_constraint".to_string(),
        pendulum: params.pendulum,
        sim_step: params.sim_step,
        out_step: params.out_step,
        duration: params.duration,
        cases,
    }
}

//! Mechanical energy bookkeeping for a single rigid body.
//!
//! Producers sample the body state at every output step and log the energy
//! terms relative to the initial state. The last logged column is the total
//! energy drift that [`crate::validator::validate_energy`] gates.

use crate::error::TableError;
use crate::table::TableWriter;
use nalgebra::{Matrix3, Vector3};

/// Header of an energy table.
pub const ENERGY_HEADER: [&str; 5] = ["Time", "Transl_KE", "Rot_KE", "Delta_PE", "KE+PE"];

/// Energy terms of a rigid body at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnergyTerms {
    /// `1/2 m |v|^2`
    pub translational: f64,
    /// `1/2 w^T I w`, with `w` and `I` in the body frame.
    pub rotational: f64,
    /// `m g (z - z_ref)`
    pub potential: f64,
}

impl EnergyTerms {
    pub fn from_state(
        mass: f64,
        inertia: &Matrix3<f64>,
        linear_velocity: &Vector3<f64>,
        local_angular_velocity: &Vector3<f64>,
        height: f64,
        reference_height: f64,
        gravity: f64,
    ) -> Self {
        Self {
            translational: 0.5 * mass * linear_velocity.norm_squared(),
            rotational: 0.5 * local_angular_velocity.dot(&(inertia * local_angular_velocity)),
            potential: mass * gravity * (height - reference_height),
        }
    }

    pub fn total(&self) -> f64 {
        self.translational + self.rotational + self.potential
    }
}

/// Accumulates energy samples relative to an initial state.
#[derive(Clone, Debug)]
pub struct EnergyLog {
    initial_total: f64,
    table: TableWriter,
}

impl EnergyLog {
    pub fn new(initial: EnergyTerms) -> Self {
        Self {
            initial_total: initial.total(),
            table: TableWriter::new(ENERGY_HEADER),
        }
    }

    /// Record the terms at `time`; the last column is `E(t) - E(0)`.
    pub fn record(&mut self, time: f64, terms: &EnergyTerms) -> Result<(), TableError> {
        self.table.push_row(
            time,
            &[
                terms.translational,
                terms.rotational,
                terms.potential,
                terms.total() - self.initial_total,
            ],
        )
    }

    pub fn table(&self) -> &TableWriter {
        &self.table
    }

    pub fn into_table(self) -> TableWriter {
        self.table
    }
}

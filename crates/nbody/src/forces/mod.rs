//! Force models for few-body simulations

use crate::body::Body;
use nalgebra::Vector3;

pub mod gravity;


pub use gravity::DirectGravity;

/// Gravitational constant in code units (au, M☉, yr/2π)
pub const G: f64 = 1.0;

/// A source of acceleration on bodies in a few-body system
///
/// Force models work on plain body slices so that integrators can evaluate
/// them on trial states without building a full `SystemState`.
pub trait ForceModel: Send + Sync {
    /// Acceleration on body `idx` given every body in the system
    fn acceleration(&self, idx: usize, bodies: &[Body]) -> Vector3<f64>;

    /// Accelerations on every body, in body order
    fn accelerations(&self, bodies: &[Body]) -> Vec<Vector3<f64>> {
        (0..bodies.len())
            .map(|i| self.acceleration(i, bodies))
            .collect()
    }

    /// Potential energy of the configuration (zero for non-conservative models)
    fn potential_energy(&self, _bodies: &[Body]) -> f64 {
        0.0
    }
}

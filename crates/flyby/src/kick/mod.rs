//! Eccentricity kicks delivered by a single flyby.
//!
//! Both models see the same inputs: the sampled encounter, the perturber
//! hyperbola derived from it, and the current inner orbit. The regime
//! classifier decides which one the driver calls.

mod analytic;
mod simulated;

#[cfg(test)]
mod analytic_test;

pub use analytic::{heggie_rasio_delta_e, AnalyticKick};
pub use simulated::SimulatedKick;

use crate::encounter::{EncounterParams, PerturberOrbit};
use crate::error::Result;
use crate::orbit::OrbitState;

/// Δe produced by one encounter
pub trait KickModel: Send + Sync {
    /// Change in the inner eccentricity. `orbit` must be bound.
    fn delta_e(
        &self,
        params: &EncounterParams,
        perturber: &PerturberOrbit,
        orbit: &OrbitState,
    ) -> Result<f64>;
}

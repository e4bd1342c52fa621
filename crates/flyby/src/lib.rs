//! Eccentricity diffusion of a bound binary under repeated stellar flybys.
//!
//! A run has two phases. First, [`sampling::generate_encounters`] draws a
//! table of random perturber encounters (mass, speed, impact parameter and
//! orientation). Then [`DiffusionDriver`] replays that table for many
//! independent realizations of the binary. Each encounter is routed by
//! [`RegimeClassifier`] to either the closed-form secular kick or a direct
//! three-body integration, and the resulting eccentricity history is
//! collected into [`Trajectories`].
//!
//! All kernels use N-body code units: G = 1, au, M☉, and yr/2π.

pub mod config;
pub mod diffusion;
pub mod encounter;
pub mod encounter_table;
pub mod error;
pub mod kick;
pub mod orbit;
pub mod regime;
pub mod sampling;
pub mod trajectory;

#[cfg(test)]
mod encounter_table_test;
#[cfg(test)]
mod regime_test;
#[cfg(test)]
mod trajectory_test;

pub use config::{MassFunction, NumericsConfig, PhysicalConfig};
pub use diffusion::DiffusionDriver;
pub use encounter::{EncounterParams, PerturberOrbit};
pub use encounter_table::EncounterTable;
pub use error::{FlybyError, Result, Stage};
pub use kick::{AnalyticKick, KickModel, SimulatedKick};
pub use orbit::{OrbitState, OrbitStatus};
pub use regime::{Regime, RegimeClassifier};
pub use sampling::{generate_encounters, EncounterSampler};
pub use trajectory::{RealizationHistory, Trajectories};

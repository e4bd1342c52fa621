//! Few-body gravitational dynamics in N-body code units (G = 1, au, M☉).
//!
//! Provides the pieces needed to set up a small system from orbital
//! elements, integrate it with an adaptive Runge-Kutta scheme, and read the
//! resulting orbits back out.

pub mod body;
pub mod forces;
pub mod integrator;
pub mod orbital_elements;
pub mod roots;
pub mod state;

#[cfg(test)]
mod integrator_test;
#[cfg(test)]
mod orbital_elements_test;

pub use body::{Body, BodyId};
pub use forces::{DirectGravity, ForceModel, G};
pub use integrator::{IntegrationError, IntegrationStats, Integrator, Rkf45, Tolerances};
pub use orbital_elements::{ElementsError, OrbitalElements};
pub use roots::{RootSolver, SolveError};
pub use state::SystemState;

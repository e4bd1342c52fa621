//! Typed physical quantities.
//!
//! The N-body kernels work in code units where G = 1: lengths in au,
//! masses in solar masses, and time in yr/2π. These newtypes sit at the
//! configuration surface and convert into those code units.

pub mod length;
pub mod mass;
pub mod time;
pub mod velocity;

#[cfg(test)]
mod velocity_test;

pub use length::Length;
pub use mass::Mass;
pub use time::Time;
pub use velocity::Velocity;

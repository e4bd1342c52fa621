use crate::length::AU_TO_KM;
use crate::time::SECONDS_PER_YEAR;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::ops::{Add, Div, Mul, Sub};

/// One N-body code unit of velocity (au per yr/2π) in km/s, ≈ 29.785 km/s.
///
/// This is the mean orbital speed of the Earth.
pub const CODE_VELOCITY_KM_PER_SEC: f64 = AU_TO_KM * TAU / SECONDS_PER_YEAR;

/// A velocity stored in N-body code units (G = 1, au, M☉).
///
/// # Examples
///
/// ```rust
/// use units::Velocity;
///
/// let dispersion = Velocity::from_km_per_sec(10.0);
/// assert!((dispersion.to_km_per_sec() - 10.0).abs() < 1e-12);
/// assert!(dispersion.to_code_units() < 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Velocity(f64); // Base unit: au per (yr/2π)

impl Velocity {
    pub fn from_code_units(value: f64) -> Self {
        Self(value)
    }

    pub fn from_km_per_sec(value: f64) -> Self {
        Self(value / CODE_VELOCITY_KM_PER_SEC)
    }

    pub fn to_code_units(&self) -> f64 {
        self.0
    }

    pub fn to_km_per_sec(&self) -> f64 {
        self.0 * CODE_VELOCITY_KM_PER_SEC
    }
}

impl Add for Velocity {
    type Output = Velocity;

    fn add(self, rhs: Velocity) -> Velocity {
        Velocity(self.0 + rhs.0)
    }
}

impl Sub for Velocity {
    type Output = Velocity;

    fn sub(self, rhs: Velocity) -> Velocity {
        Velocity(self.0 - rhs.0)
    }
}

impl Mul<f64> for Velocity {
    type Output = Velocity;

    fn mul(self, rhs: f64) -> Velocity {
        Velocity(self.0 * rhs)
    }
}

/// Division of Velocity by Velocity returns a dimensionless ratio
impl Div for Velocity {
    type Output = f64;

    fn div(self, rhs: Velocity) -> f64 {
        self.0 / rhs.0
    }
}

/// Circular orbital speed in code units for a central mass (M☉) at a radius (au).
///
/// # Examples
/// ```
/// use units::velocity::circular_orbital_velocity;
///
/// // Earth around the Sun moves at one code unit of velocity
/// let v = circular_orbital_velocity(1.0, 1.0);
/// assert_eq!(v.to_code_units(), 1.0);
/// ```
pub fn circular_orbital_velocity(central_mass: f64, radius: f64) -> Velocity {
    Velocity((central_mass / radius).sqrt())
}

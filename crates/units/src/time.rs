use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::ops::{Add, Div, Mul, Sub};

pub const SECONDS_PER_YEAR: f64 = 31_557_600.0; // 365.25 days per year

/// Million years in regular years
const MYR_TO_YEARS: f64 = 1_000_000.0;

/// A physical time quantity using f64 precision.
///
/// Years are the base unit. With G = 1, au and solar masses, one unit of
/// code time is 1/2π years, so a 1 au circular orbit around one solar mass
/// has a period of 2π code units.
///
/// # Examples
///
/// ```rust
/// use units::Time;
///
/// let run = Time::from_myr(0.1);
/// assert_eq!(run.to_years(), 100_000.0);
///
/// let one_orbit = Time::from_years(1.0);
/// assert!((one_orbit.to_code_units() - std::f64::consts::TAU).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Time(f64); // Base unit: Years

impl Time {
    /// Creates a zero time value
    pub fn zero() -> Self {
        Self(0.0)
    }

    /// Creates a new `Time` from a value in years.
    pub fn from_years(value: f64) -> Self {
        Self(value)
    }

    /// Creates a time from a value in million years (Myr)
    pub fn from_myr(value: f64) -> Self {
        Self(value * MYR_TO_YEARS)
    }

    /// Creates a time from N-body code units (yr/2π).
    pub fn from_code_units(value: f64) -> Self {
        Self(value / TAU)
    }

    /// Creates a new `Time` from a value in seconds.
    pub fn from_seconds(value: f64) -> Self {
        Self(value / SECONDS_PER_YEAR)
    }

    /// Returns the time in years.
    pub fn to_years(&self) -> f64 {
        self.0
    }

    /// Returns the time in million years
    pub fn to_myr(&self) -> f64 {
        self.0 / MYR_TO_YEARS
    }

    /// Returns the time in N-body code units (yr/2π).
    pub fn to_code_units(&self) -> f64 {
        self.0 * TAU
    }

    /// Converts the time to seconds.
    pub fn to_seconds(&self) -> f64 {
        self.0 * SECONDS_PER_YEAR
    }
}

impl Add for Time {
    type Output = Time;

    fn add(self, rhs: Time) -> Time {
        Time(self.0 + rhs.0)
    }
}

impl Sub for Time {
    type Output = Time;

    fn sub(self, rhs: Time) -> Time {
        Time(self.0 - rhs.0)
    }
}

impl Mul<f64> for Time {
    type Output = Time;

    fn mul(self, rhs: f64) -> Time {
        Time(self.0 * rhs)
    }
}

/// Division of Time by Time returns a dimensionless ratio
impl Div for Time {
    type Output = f64;

    fn div(self, rhs: Time) -> f64 {
        self.0 / rhs.0
    }
}

/// Allow f64 * Time (commutative multiplication)
impl Mul<Time> for f64 {
    type Output = Time;

    fn mul(self, rhs: Time) -> Time {
        rhs * self
    }
}

//! A single sampled flyby and the hyperbola it traces.

use nbody::OrbitalElements;
use serde::{Deserialize, Serialize};

use crate::config::PhysicalConfig;
use crate::error::{FlybyError, Result};

/// One sampled perturber encounter, in code units
///
/// Field order matches the columns of the encounter table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EncounterParams {
    /// m3 (M☉)
    pub perturber_mass: f64,
    /// v∞ relative to the binary's centre of mass
    pub asymptotic_speed: f64,
    /// b (au)
    pub impact_parameter: f64,
    /// Ω (radians)
    pub node: f64,
    /// i (radians)
    pub inclination: f64,
    /// ω (radians)
    pub argument: f64,
}

impl EncounterParams {
    pub fn new(
        perturber_mass: f64,
        asymptotic_speed: f64,
        impact_parameter: f64,
        node: f64,
        inclination: f64,
        argument: f64,
    ) -> Self {
        Self {
            perturber_mass,
            asymptotic_speed,
            impact_parameter,
            node,
            inclination,
            argument,
        }
    }

    /// Encounter with the configured default perturber mass
    pub fn from_config(
        config: &PhysicalConfig,
        asymptotic_speed: f64,
        impact_parameter: f64,
        node: f64,
        inclination: f64,
        argument: f64,
    ) -> Self {
        Self::new(
            config.perturber_mass.to_solar_masses(),
            asymptotic_speed,
            impact_parameter,
            node,
            inclination,
            argument,
        )
    }
}

/// Hyperbolic orbit of the perturber about the inner binary
///
/// Derived from v∞, b and the inner mass only: a = −M/v∞², e = √(1 + (b/a)²).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerturberOrbit {
    /// Negative semi-major axis (au)
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    /// Closest approach r_p = −a (e − 1)
    pub pericenter: f64,
}

impl PerturberOrbit {
    /// Build the hyperbola for asymptotic speed `speed` and impact parameter
    /// `impact_parameter` about a binary of mass `inner_mass`.
    ///
    /// # Examples
    /// ```
    /// use flyby::PerturberOrbit;
    ///
    /// let orbit = PerturberOrbit::new(1.0, 100.0, 1.0).unwrap();
    /// assert_eq!(orbit.semi_major_axis, -1.0);
    /// assert!(orbit.pericenter < 100.0);
    /// ```
    pub fn new(speed: f64, impact_parameter: f64, inner_mass: f64) -> Result<Self> {
        if speed <= 0.0 || !speed.is_finite() {
            return Err(FlybyError::DegenerateGeometry(format!(
                "asymptotic speed must be positive, got {speed}"
            )));
        }
        if impact_parameter <= 0.0 || !impact_parameter.is_finite() {
            return Err(FlybyError::DegenerateGeometry(format!(
                "impact parameter must be positive, got {impact_parameter}"
            )));
        }
        if inner_mass <= 0.0 || inner_mass.is_nan() {
            return Err(FlybyError::DegenerateGeometry(format!(
                "inner mass must be positive, got {inner_mass}"
            )));
        }

        let semi_major_axis = -inner_mass / (speed * speed);
        let ratio = impact_parameter / semi_major_axis;
        let eccentricity = (1.0 + ratio * ratio).sqrt();
        // b² / (|a| (1 + e)) is −a (e − 1) without the cancellation as e → 1
        let pericenter =
            impact_parameter * impact_parameter / (semi_major_axis.abs() * (1.0 + eccentricity));

        if pericenter <= 0.0 || !pericenter.is_finite() {
            return Err(FlybyError::DegenerateGeometry(format!(
                "pericentre distance {pericenter:e} for v∞ = {speed}, b = {impact_parameter}"
            )));
        }

        Ok(Self {
            semi_major_axis,
            eccentricity,
            pericenter,
        })
    }

    pub fn for_encounter(params: &EncounterParams, inner_mass: f64) -> Result<Self> {
        Self::new(params.asymptotic_speed, params.impact_parameter, inner_mass)
    }

    /// Asymptotic true anomaly arccos(−1/e)
    pub fn max_true_anomaly(&self) -> f64 {
        (-1.0 / self.eccentricity).acos()
    }

    /// p = |a| (e² − 1)
    pub fn semi_latus_rectum(&self) -> f64 {
        self.semi_major_axis.abs() * (self.eccentricity * self.eccentricity - 1.0)
    }

    /// Orbital elements at `true_anomaly`, oriented by the encounter angles
    pub fn elements(&self, true_anomaly: f64, params: &EncounterParams) -> OrbitalElements {
        OrbitalElements {
            semi_major_axis: self.semi_major_axis,
            eccentricity: self.eccentricity,
            inclination: params.inclination,
            longitude_ascending_node: params.node,
            argument_of_periapsis: params.argument,
            true_anomaly,
        }
    }
}

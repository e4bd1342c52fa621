//! Secular eccentricity change for distant, slow encounters
//! (Heggie & Rasio 1996).

use crate::config::PhysicalConfig;
use crate::encounter::{EncounterParams, PerturberOrbit};
use crate::error::{FlybyError, Result};
use crate::orbit::OrbitState;

use super::KickModel;

/// Closed-form Δe from secular perturbation theory
///
/// Exact to leading order in (a / r_p)^{3/2}; only trustworthy when the
/// regime classifier routes here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyticKick {
    /// m1 + m2 (M☉)
    pub inner_mass: f64,
}

impl AnalyticKick {
    pub fn new(inner_mass: f64) -> Self {
        Self { inner_mass }
    }

    pub fn from_config(config: &PhysicalConfig) -> Self {
        Self::new(config.inner_mass())
    }
}

impl KickModel for AnalyticKick {
    fn delta_e(
        &self,
        params: &EncounterParams,
        perturber: &PerturberOrbit,
        orbit: &OrbitState,
    ) -> Result<f64> {
        let delta_e = heggie_rasio_delta_e(
            params,
            perturber,
            orbit.eccentricity,
            orbit.semi_major_axis,
            self.inner_mass,
        );
        if delta_e.is_finite() {
            Ok(delta_e)
        } else {
            Err(FlybyError::DegenerateGeometry(format!(
                "secular kick is not finite for r_p = {:e}, e_p = {}",
                perturber.pericenter, perturber.eccentricity
            )))
        }
    }
}

/// Heggie–Rasio Δe for an inner orbit (e, a) of mass `inner_mass`
///
/// Δe = −(15/4) (1 + e_p)^{−3/2} · e√(1 − e²) · m3 / √(m12 m123)
///      · (a / r_p)^{3/2} · [Θ1 χ + (Θ2 + Θ3) ψ]
///
/// with χ = arccos(−1/e_p) + √(e_p² − 1), ψ = (e_p² − 1)^{3/2} / (3 e_p²) and
/// the orientation terms
///
/// Θ1 = sin²i sin 2Ω
/// Θ2 = (1 + cos²i) cos 2ω sin 2Ω
/// Θ3 = 2 cos i sin 2ω cos 2Ω
pub fn heggie_rasio_delta_e(
    params: &EncounterParams,
    perturber: &PerturberOrbit,
    eccentricity: f64,
    semi_major_axis: f64,
    inner_mass: f64,
) -> f64 {
    let m3 = params.perturber_mass;
    let total_mass = inner_mass + m3;
    let e_p = perturber.eccentricity;
    let e_p2_minus_one = e_p * e_p - 1.0;

    let mass_factor = eccentricity * (1.0 - eccentricity * eccentricity).sqrt() * m3
        / (inner_mass * total_mass).sqrt();
    let amplitude = -3.75 * (1.0 + e_p).powf(-1.5);
    let chi = perturber.max_true_anomaly() + e_p2_minus_one.sqrt();
    let psi = e_p2_minus_one.powf(1.5) / (3.0 * e_p * e_p);

    let (sin_i, cos_i) = params.inclination.sin_cos();
    let (sin_2node, cos_2node) = (2.0 * params.node).sin_cos();
    let (sin_2arg, cos_2arg) = (2.0 * params.argument).sin_cos();

    let theta1 = sin_i * sin_i * sin_2node;
    let theta2 = (1.0 + cos_i * cos_i) * cos_2arg * sin_2node;
    let theta3 = 2.0 * cos_i * sin_2arg * cos_2node;

    amplitude
        * mass_factor
        * (semi_major_axis / perturber.pericenter).powf(1.5)
        * (theta1 * chi + (theta2 + theta3) * psi)
}

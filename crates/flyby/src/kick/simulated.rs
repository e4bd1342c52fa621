//! Δe from direct three-body integration, averaged over inner phases.

use std::f64::consts::{PI, TAU};

use log::trace;
use nalgebra::{Point3, Vector3};
use nbody::orbital_elements::{
    eccentricity_from_state, hyperbolic_time_from_pericenter, true_anomaly_from_mean,
};
use nbody::{DirectGravity, Integrator, OrbitalElements, Rkf45, RootSolver, SystemState, G};
use rayon::prelude::*;

use crate::config::PhysicalConfig;
use crate::encounter::{EncounterParams, PerturberOrbit};
use crate::error::{FlybyError, Result};
use crate::orbit::OrbitState;

use super::KickModel;

/// Integrates primary, secondary and perturber through the encounter
///
/// The perturber starts where its tidal force is a fraction ξ of the
/// pericentre value and runs to the mirror point on the outgoing branch.
/// Each of `phases` runs starts the secondary at a different mean anomaly;
/// the reported Δe is their mean.
#[derive(Debug, Clone)]
pub struct SimulatedKick {
    pub host_mass: f64,
    pub secondary_mass: f64,
    /// ξ, in (0, 1)
    pub force_ratio: f64,
    pub phases: usize,
    pub solver: RootSolver,
    pub integrator: Rkf45,
    pub gravity: DirectGravity,
}

impl SimulatedKick {
    pub fn from_config(config: &PhysicalConfig) -> Self {
        Self {
            host_mass: config.host_mass.to_solar_masses(),
            secondary_mass: config.secondary_mass.to_solar_masses(),
            force_ratio: config.force_ratio,
            phases: config.init_phases,
            solver: config.numerics.root_solver(),
            integrator: config.numerics.integrator(),
            gravity: DirectGravity::new(),
        }
    }

    fn inner_mass(&self) -> f64 {
        self.host_mass + self.secondary_mass
    }

    /// Incoming true anomaly −θ at which the perturber distance is
    /// r_p ξ^{−1/3}
    pub fn start_true_anomaly(&self, perturber: &PerturberOrbit) -> Result<f64> {
        let critical_radius = perturber.pericenter * self.force_ratio.powf(-1.0 / 3.0);
        let cos_theta =
            (perturber.semi_latus_rectum() / critical_radius - 1.0) / perturber.eccentricity;
        let theta = cos_theta.clamp(-1.0, 1.0).acos();

        if theta > 0.0 && theta < perturber.max_true_anomaly() {
            Ok(-theta)
        } else {
            Err(FlybyError::DegenerateGeometry(format!(
                "no start point at {critical_radius:e} au on an e = {} hyperbola",
                perturber.eccentricity
            )))
        }
    }

    /// True anomalies of the secondary for mean anomalies evenly spaced on
    /// [−π, π)
    pub fn phase_true_anomalies(&self, eccentricity: f64) -> Result<Vec<f64>> {
        (0..self.phases)
            .map(|k| {
                let mean_anomaly = -PI + TAU * k as f64 / self.phases as f64;
                true_anomaly_from_mean(mean_anomaly, eccentricity, &self.solver)
                    .map_err(FlybyError::from)
            })
            .collect()
    }

    /// Final inner eccentricity for one starting phase
    pub fn integrate_phase(
        &self,
        params: &EncounterParams,
        perturber: &PerturberOrbit,
        orbit: &OrbitState,
        phase: f64,
        start: f64,
        duration: f64,
    ) -> Result<f64> {
        let mut system = SystemState::new();
        system.add_body(self.host_mass, Point3::origin(), Vector3::zeros());
        system.add_body_with_elements(
            self.secondary_mass,
            &OrbitalElements::planar(orbit.semi_major_axis, orbit.eccentricity, phase),
        )?;
        system.add_body_with_elements(params.perturber_mass, &perturber.elements(start, params))?;
        system.move_to_center_of_mass();

        let stats = self.integrator.integrate(&mut system, duration, &self.gravity)?;
        trace!(
            "phase {phase:.4}: {} steps accepted, {} rejected",
            stats.accepted_steps,
            stats.rejected_steps
        );

        let (position, velocity) = system.relative_state(0, 1);
        Ok(eccentricity_from_state(&position, &velocity, G * self.inner_mass()))
    }
}

impl KickModel for SimulatedKick {
    fn delta_e(
        &self,
        params: &EncounterParams,
        perturber: &PerturberOrbit,
        orbit: &OrbitState,
    ) -> Result<f64> {
        let start = self.start_true_anomaly(perturber)?;
        let mu = G * (self.inner_mass() + params.perturber_mass);
        let duration = 2.0
            * hyperbolic_time_from_pericenter(
                perturber.semi_major_axis,
                perturber.eccentricity,
                start,
                mu,
            );
        if duration <= 0.0 || !duration.is_finite() {
            return Err(FlybyError::DegenerateGeometry(format!(
                "encounter duration {duration:e} is not positive"
            )));
        }

        let phases = self.phase_true_anomalies(orbit.eccentricity)?;
        let finals = phases
            .par_iter()
            .map(|&phase| self.integrate_phase(params, perturber, orbit, phase, start, duration))
            .collect::<Result<Vec<f64>>>()?;

        let mean = finals.iter().sum::<f64>() / finals.len() as f64;
        Ok(mean - orbit.eccentricity)
    }
}

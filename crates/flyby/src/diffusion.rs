//! Monte Carlo driver: replays an encounter table over many realizations.

use std::sync::atomic::{AtomicUsize, Ordering};

use log::{debug, info};
use rayon::prelude::*;
use units::Time;

use crate::config::PhysicalConfig;
use crate::encounter::{EncounterParams, PerturberOrbit};
use crate::encounter_table::EncounterTable;
use crate::error::{FlybyError, Result, Stage};
use crate::kick::{AnalyticKick, KickModel, SimulatedKick};
use crate::orbit::OrbitState;
use crate::regime::{Regime, RegimeClassifier};
use crate::trajectory::{RealizationHistory, Trajectories};

/// Evolves independent binaries through their blocks of the encounter table
///
/// Realizations run in parallel; within a realization encounters are applied
/// strictly in table order. Given the same table and configuration the
/// output is identical from run to run.
#[derive(Debug, Clone)]
pub struct DiffusionDriver {
    config: PhysicalConfig,
    classifier: RegimeClassifier,
    analytic: AnalyticKick,
    simulated: SimulatedKick,
}

impl DiffusionDriver {
    pub fn new(config: PhysicalConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            classifier: RegimeClassifier::from_config(&config),
            analytic: AnalyticKick::from_config(&config),
            simulated: SimulatedKick::from_config(&config),
            config,
        })
    }

    pub fn config(&self) -> &PhysicalConfig {
        &self.config
    }

    pub fn classifier(&self) -> &RegimeClassifier {
        &self.classifier
    }

    /// Run `config.realizations` binaries for `elapsed`
    pub fn run(&self, table: &EncounterTable, elapsed: Time) -> Result<Trajectories> {
        let per_realization = self.config.encounters_for(elapsed);
        self.run_encounters(table, per_realization, self.config.realizations)
    }

    /// Run `realizations` binaries through `per_realization` encounters each
    ///
    /// Fails before any kick is computed if the table is too short.
    pub fn run_encounters(
        &self,
        table: &EncounterTable,
        per_realization: usize,
        realizations: usize,
    ) -> Result<Trajectories> {
        let insufficient = || FlybyError::InsufficientEncounters {
            required: per_realization.saturating_mul(realizations),
            available: table.len(),
            realizations,
            per_realization,
        };
        let required = per_realization
            .checked_mul(realizations)
            .ok_or_else(insufficient)?;
        if table.len() < required {
            return Err(insufficient());
        }

        info!(
            "Diffusing {realizations} realizations through {per_realization} encounters each"
        );

        let milestone = (realizations / 10).max(1);
        let completed = AtomicUsize::new(0);

        let histories = (0..realizations)
            .into_par_iter()
            .map(|k| {
                let encounters = table.block(k, per_realization).ok_or_else(insufficient)?;
                let history = self.evolve(k, encounters)?;

                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                if done % milestone == 0 {
                    info!("Diffusion progress: {}%", done * 100 / realizations);
                }
                Ok(history)
            })
            .collect::<Result<Vec<_>>>()?;

        let trajectories = Trajectories::from_histories(per_realization, histories);
        info!(
            "Diffusion finished: {:.1}% of realizations unbound",
            100.0 * trajectories.unbound_fraction()
        );
        Ok(trajectories)
    }

    /// Evolve realization `realization` through `encounters` in order
    pub fn evolve(
        &self,
        realization: usize,
        encounters: &[EncounterParams],
    ) -> Result<RealizationHistory> {
        let mut orbit = OrbitState::initial(&self.config);
        let mut eccentricity = Vec::with_capacity(encounters.len() + 1);
        let mut semi_major_axis = Vec::with_capacity(encounters.len() + 1);

        for (j, params) in encounters.iter().enumerate() {
            eccentricity.push(orbit.eccentricity);
            semi_major_axis.push(orbit.semi_major_axis);

            if orbit.is_bound() {
                let delta_e = self.kick(params, &orbit, realization, j)?;
                orbit.apply_kick(delta_e, j);
            }
        }
        eccentricity.push(orbit.eccentricity);
        semi_major_axis.push(orbit.semi_major_axis);

        match orbit.unbound_at() {
            Some(j) => debug!(
                "realization {realization}: unbound at encounter {j} (e = {:.4})",
                orbit.eccentricity
            ),
            None => debug!(
                "realization {realization}: bound, final e = {:.6}",
                orbit.eccentricity
            ),
        }

        Ok(RealizationHistory {
            eccentricity,
            semi_major_axis,
            unbound_at: orbit.unbound_at(),
        })
    }

    /// Kick model for a regime
    pub fn model(&self, regime: Regime) -> &dyn KickModel {
        match regime {
            Regime::Analytic => &self.analytic,
            Regime::Simulated => &self.simulated,
        }
    }

    fn kick(
        &self,
        params: &EncounterParams,
        orbit: &OrbitState,
        realization: usize,
        encounter: usize,
    ) -> Result<f64> {
        let perturber = PerturberOrbit::for_encounter(params, self.config.inner_mass())
            .map_err(|e| e.at(Stage::Classification, realization, encounter))?;
        let regime = self.classifier.classify(&perturber, orbit.semi_major_axis);

        let delta_e = self
            .model(regime)
            .delta_e(params, &perturber, orbit)
            .map_err(|e| e.at(regime.stage(), realization, encounter))?;

        if delta_e.is_finite() {
            Ok(delta_e)
        } else {
            Err(FlybyError::DegenerateGeometry(format!(
                "{regime:?} kick returned {delta_e}"
            ))
            .at(Stage::Driver, realization, encounter))
        }
    }
}

//! Per-realization state of the inner binary.

use serde::{Deserialize, Serialize};

use crate::config::PhysicalConfig;

/// Bound until the eccentricity first reaches 1, then frozen for good
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrbitStatus {
    Bound,
    Unbound {
        /// Index of the encounter that unbound the binary
        at_encounter: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitState {
    pub eccentricity: f64,
    /// Semi-major axis (au)
    pub semi_major_axis: f64,
    pub status: OrbitStatus,
}

impl OrbitState {
    pub fn new(eccentricity: f64, semi_major_axis: f64) -> Self {
        Self {
            eccentricity,
            semi_major_axis,
            status: OrbitStatus::Bound,
        }
    }

    /// Starting orbit of every realization
    pub fn initial(config: &PhysicalConfig) -> Self {
        Self::new(
            config.initial_eccentricity,
            config.initial_semi_major_axis.to_au(),
        )
    }

    pub fn is_bound(&self) -> bool {
        matches!(self.status, OrbitStatus::Bound)
    }

    /// Encounter index at which the binary became unbound
    pub fn unbound_at(&self) -> Option<usize> {
        match self.status {
            OrbitStatus::Bound => None,
            OrbitStatus::Unbound { at_encounter } => Some(at_encounter),
        }
    }

    /// Apply the eccentricity change from encounter `encounter`.
    ///
    /// A kick that would drive e negative is reflected; e = |e + Δe| is the
    /// same orbit with the pericentre rotated by π.
    ///
    /// # Panics
    /// If the orbit is already unbound. The driver never kicks a frozen
    /// realization.
    pub fn apply_kick(&mut self, delta_e: f64, encounter: usize) {
        assert!(
            self.is_bound() && self.eccentricity < 1.0,
            "kick applied to an unbound orbit (e = {})",
            self.eccentricity
        );

        self.eccentricity = (self.eccentricity + delta_e).abs();
        if self.eccentricity >= 1.0 {
            self.status = OrbitStatus::Unbound {
                at_encounter: encounter,
            };
        }
    }
}

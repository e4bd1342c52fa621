//! Routing of encounters between the secular and direct kick models.

use crate::config::PhysicalConfig;
use crate::encounter::PerturberOrbit;
use crate::error::Stage;

/// Which kick model handles an encounter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    /// Distant, slow encounter: closed-form secular kick
    Analytic,
    /// Close or fast encounter: three-body integration
    Simulated,
}

impl Regime {
    /// Stage reported when the selected model fails
    pub fn stage(&self) -> Stage {
        match self {
            Regime::Analytic => Stage::AnalyticKick,
            Regime::Simulated => Stage::SimulatedKick,
        }
    }
}

/// r_p / a
pub fn tidal_parameter(pericenter: f64, semi_major_axis: f64) -> f64 {
    pericenter / semi_major_axis
}

/// (r_p / a)^{3/2} (1 + e_p)^{−1/2}
///
/// Ratio of the perturber's pericentre passage time to the inner orbital
/// period, up to a constant.
pub fn slow_parameter(pericenter: f64, perturber_eccentricity: f64, semi_major_axis: f64) -> f64 {
    tidal_parameter(pericenter, semi_major_axis).powf(1.5) / (1.0 + perturber_eccentricity).sqrt()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegimeClassifier {
    /// Both parameters must strictly exceed this for the analytic regime
    pub threshold: f64,
}

impl Default for RegimeClassifier {
    fn default() -> Self {
        Self { threshold: 5.0 }
    }
}

impl RegimeClassifier {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn from_config(config: &PhysicalConfig) -> Self {
        Self::new(config.regime_threshold)
    }

    pub fn classify(&self, perturber: &PerturberOrbit, semi_major_axis: f64) -> Regime {
        let tidal = tidal_parameter(perturber.pericenter, semi_major_axis);
        let slow = slow_parameter(perturber.pericenter, perturber.eccentricity, semi_major_axis);

        if tidal > self.threshold && slow > self.threshold {
            Regime::Analytic
        } else {
            Regime::Simulated
        }
    }
}

//! Physical and numerical parameters for a diffusion run.
//!
//! A [`PhysicalConfig`] is built once (from defaults or YAML), validated,
//! and then shared read-only by the sampler, the kick models and the
//! driver. Nothing is reconfigured mid-run.
//!
//! # YAML format
//!
//! Every field is optional and falls back to its default:
//!
//! ```yaml
//! host_mass: 1.0                 # M☉
//! secondary_mass: 1.0e-9         # M☉
//! initial_eccentricity: 0.9
//! initial_semi_major_axis: 5.0   # au
//! realizations: 1000
//! max_impact_parameter: 1000.0   # au
//! stellar_density: 1.0           # 10⁶ stars pc⁻³
//! velocity_dispersion: 0.3357    # code units (≈ 10 km/s)
//! mass_function:
//!   min_mass: 0.08
//!   max_mass: 50.0
//!   break_mass: 0.8
//! regime_threshold: 5.0
//! force_ratio: 0.01
//! init_phases: 20
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use nbody::{RootSolver, Rkf45, Tolerances};
use serde::{Deserialize, Serialize};
use units::{Length, Mass, Time, Velocity};

use crate::error::{FlybyError, Result};

/// Encounters per Myr for n = 10⁶ pc⁻³, a = 5 au and σ = 10 km/s
const REFERENCE_ENCOUNTER_RATE: f64 = 1204.0;
const REFERENCE_SEMI_MAJOR_AXIS_AU: f64 = 5.0;
const REFERENCE_DISPERSION_KM_PER_SEC: f64 = 10.0;

/// Bounds of the broken power-law perturber mass function
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MassFunction {
    pub min_mass: Mass,
    pub max_mass: Mass,
    /// Mass at which the slope steepens
    pub break_mass: Mass,
}

impl Default for MassFunction {
    fn default() -> Self {
        Self {
            min_mass: Mass::from_solar_masses(0.08),
            max_mass: Mass::from_solar_masses(50.0),
            break_mass: Mass::from_solar_masses(0.8),
        }
    }
}

/// Tolerances for the root solvers and the three-body integrator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumericsConfig {
    pub root_tolerance: f64,
    pub root_max_iterations: usize,
    pub absolute_tolerance: f64,
    pub relative_tolerance: f64,
    pub max_steps: usize,
}

impl Default for NumericsConfig {
    fn default() -> Self {
        let solver = RootSolver::default();
        let integrator = Rkf45::default();
        Self {
            root_tolerance: solver.tolerance,
            root_max_iterations: solver.max_iterations,
            absolute_tolerance: integrator.tolerances.absolute,
            relative_tolerance: integrator.tolerances.relative,
            max_steps: integrator.max_steps,
        }
    }
}

impl NumericsConfig {
    pub fn root_solver(&self) -> RootSolver {
        RootSolver::new(self.root_tolerance, self.root_max_iterations)
    }

    pub fn integrator(&self) -> Rkf45 {
        Rkf45::new(Tolerances::new(self.absolute_tolerance, self.relative_tolerance))
            .with_max_steps(self.max_steps)
    }
}

/// Immutable parameter set for sampling and diffusion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalConfig {
    /// Primary of the inner binary (m1)
    pub host_mass: Mass,
    /// Secondary of the inner binary (m2)
    pub secondary_mass: Mass,
    /// Default m3 for encounters built with [`EncounterParams::from_config`];
    /// sampled encounters draw m3 from `mass_function` instead
    ///
    /// [`EncounterParams::from_config`]: crate::EncounterParams::from_config
    pub perturber_mass: Mass,

    pub initial_eccentricity: f64,
    pub initial_semi_major_axis: Length,

    /// Independent realizations of the binary in a Monte Carlo run
    pub realizations: usize,

    /// Encounters are drawn out to this impact parameter
    pub max_impact_parameter: Length,
    /// Stellar number density in units of 10⁶ pc⁻³
    pub stellar_density: f64,
    /// σ of the Maxwellian perturber speeds
    ///
    /// Converted to code units (1 ≈ 29.8 km/s) before sampling, so the
    /// 10 km/s default enters the speed CDF as σ ≈ 0.336. A dimensionless
    /// σ = 1 in that CDF would correspond to ≈ 29.8 km/s and encounters
    /// about three times faster.
    pub velocity_dispersion: Velocity,
    pub mass_function: MassFunction,

    /// Tidal and slow parameters must both exceed this for the analytic kick
    pub regime_threshold: f64,
    /// ξ: perturber tidal force at the start of a simulated encounter, as a
    /// fraction of its value at pericentre
    pub force_ratio: f64,
    /// Inner-binary phases averaged over in a simulated encounter
    pub init_phases: usize,

    pub numerics: NumericsConfig,
}

impl Default for PhysicalConfig {
    fn default() -> Self {
        Self {
            host_mass: Mass::from_solar_masses(1.0),
            secondary_mass: Mass::from_solar_masses(1e-9),
            perturber_mass: Mass::from_solar_masses(1.0),
            initial_eccentricity: 0.9,
            initial_semi_major_axis: Length::from_au(5.0),
            realizations: 1000,
            max_impact_parameter: Length::from_au(1000.0),
            stellar_density: 1.0,
            velocity_dispersion: Velocity::from_km_per_sec(REFERENCE_DISPERSION_KM_PER_SEC),
            mass_function: MassFunction::default(),
            regime_threshold: 5.0,
            force_ratio: 0.01,
            init_phases: 20,
            numerics: NumericsConfig::default(),
        }
    }
}

impl PhysicalConfig {
    /// Parse a YAML document and validate it
    pub fn from_yaml_reader<R: Read>(reader: R) -> Result<Self> {
        let config: PhysicalConfig = serde_yaml::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_yaml_reader(BufReader::new(file))
    }

    /// Total inner-binary mass m1 + m2 in M☉ (the gravitational parameter with G = 1)
    pub fn inner_mass(&self) -> f64 {
        (self.host_mass + self.secondary_mass).to_solar_masses()
    }

    /// Expected number of encounters per Myr
    ///
    /// Scales with density, geometric cross-section of the orbit and
    /// velocity dispersion from 1204 Myr⁻¹ at the reference values.
    ///
    /// # Examples
    /// ```
    /// use flyby::PhysicalConfig;
    ///
    /// let config = PhysicalConfig::default();
    /// assert!((config.encounter_rate() - 1204.0).abs() < 1e-9);
    /// ```
    pub fn encounter_rate(&self) -> f64 {
        let size = self.initial_semi_major_axis.to_au() / REFERENCE_SEMI_MAJOR_AXIS_AU;
        let dispersion =
            self.velocity_dispersion.to_km_per_sec() / REFERENCE_DISPERSION_KM_PER_SEC;
        REFERENCE_ENCOUNTER_RATE * self.stellar_density * size * size * dispersion
    }

    /// Number of encounters each realization sees in `elapsed` (rounded down)
    ///
    /// Also used to turn snapshot times into trajectory columns.
    pub fn encounters_for(&self, elapsed: Time) -> usize {
        (self.encounter_rate() * elapsed.to_myr()).max(0.0).floor() as usize
    }

    /// Reject parameter sets the sampler or kick models cannot use
    pub fn validate(&self) -> Result<()> {
        let positive = |value: f64, name: &str| {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(FlybyError::config(format!("{name} must be positive, got {value}")))
            }
        };

        positive(self.host_mass.to_solar_masses(), "host_mass")?;
        positive(self.secondary_mass.to_solar_masses(), "secondary_mass")?;
        positive(self.perturber_mass.to_solar_masses(), "perturber_mass")?;
        positive(self.initial_semi_major_axis.to_au(), "initial_semi_major_axis")?;
        positive(self.max_impact_parameter.to_au(), "max_impact_parameter")?;
        positive(self.stellar_density, "stellar_density")?;
        positive(self.velocity_dispersion.to_code_units(), "velocity_dispersion")?;
        positive(self.regime_threshold, "regime_threshold")?;
        positive(self.numerics.root_tolerance, "numerics.root_tolerance")?;
        positive(self.numerics.relative_tolerance, "numerics.relative_tolerance")?;

        if !(0.0..1.0).contains(&self.initial_eccentricity) {
            return Err(FlybyError::config(format!(
                "initial_eccentricity must lie in [0, 1), got {}",
                self.initial_eccentricity
            )));
        }

        let imf = &self.mass_function;
        positive(imf.min_mass.to_solar_masses(), "mass_function.min_mass")?;
        if !(imf.min_mass < imf.break_mass && imf.break_mass < imf.max_mass) {
            return Err(FlybyError::config(format!(
                "mass_function needs min < break < max, got {} / {} / {}",
                imf.min_mass.to_solar_masses(),
                imf.break_mass.to_solar_masses(),
                imf.max_mass.to_solar_masses()
            )));
        }

        if self.force_ratio <= 0.0 || self.force_ratio >= 1.0 || self.force_ratio.is_nan() {
            return Err(FlybyError::config(format!(
                "force_ratio must lie in (0, 1), got {}",
                self.force_ratio
            )));
        }
        if self.init_phases == 0 {
            return Err(FlybyError::config("init_phases must be at least 1"));
        }
        if self.numerics.root_max_iterations == 0 || self.numerics.max_steps == 0 {
            return Err(FlybyError::config("numerical iteration budgets must be non-zero"));
        }

        Ok(())
    }
}

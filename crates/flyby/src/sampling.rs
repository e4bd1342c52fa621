//! Random draws of flyby parameters.
//!
//! Every sampler takes the caller's `ChaChaRng`, so a table generated from a
//! fixed seed is reproducible. Draws for one encounter are made in table
//! column order: mass, speed, impact parameter, Ω, i, ω.

use std::f64::consts::{PI, SQRT_2, TAU};

use log::info;
use nbody::{RootSolver, SolveError};
use rand::Rng;
use rand_chacha::ChaChaRng;
use statrs::function::erf::erf;
use units::Time;

use crate::config::{MassFunction, PhysicalConfig};
use crate::encounter::EncounterParams;
use crate::encounter_table::EncounterTable;
use crate::error::{FlybyError, Result, Stage};

/// Exponents of the closed-form inverse below and above the break mass
const LOW_MASS_EXPONENT: f64 = 0.6;
const HIGH_MASS_EXPONENT: f64 = 1.8;

/// Doublings of the upper bracket before the speed inversion gives up
const MAX_BRACKET_EXPANSIONS: usize = 64;

/// Normalisations (a, b) and the CDF value at the break mass
fn mass_function_constants(imf: &MassFunction) -> (f64, f64, f64) {
    let m_min = imf.min_mass.to_solar_masses();
    let m_max = imf.max_mass.to_solar_masses();
    let m_br = imf.break_mass.to_solar_masses();

    let a = HIGH_MASS_EXPONENT
        / (4.0 * m_br.powf(LOW_MASS_EXPONENT)
            - 3.0 * m_min.powf(LOW_MASS_EXPONENT)
            - m_br.powf(2.4) * m_max.powf(-HIGH_MASS_EXPONENT));
    let b = a * m_br.powf(2.4);
    let y_crit = (a / LOW_MASS_EXPONENT) * (m_br.powf(LOW_MASS_EXPONENT) - m_min.powf(LOW_MASS_EXPONENT));
    (a, b, y_crit)
}

/// Cumulative probability of a perturber lighter than `mass` (M☉)
pub fn mass_cdf(mass: f64, imf: &MassFunction) -> f64 {
    let m_min = imf.min_mass.to_solar_masses();
    let m_max = imf.max_mass.to_solar_masses();
    let m_br = imf.break_mass.to_solar_masses();
    let (a, b, y_crit) = mass_function_constants(imf);

    if mass <= m_min {
        0.0
    } else if mass >= m_max {
        1.0
    } else if mass <= m_br {
        (a / LOW_MASS_EXPONENT) * (mass.powf(LOW_MASS_EXPONENT) - m_min.powf(LOW_MASS_EXPONENT))
    } else {
        y_crit
            + (b / HIGH_MASS_EXPONENT)
                * (m_br.powf(-HIGH_MASS_EXPONENT) - mass.powf(-HIGH_MASS_EXPONENT))
    }
}

/// Mass (M☉) at cumulative probability `y`
///
/// Closed-form inverse of [`mass_cdf`], branching at the break mass.
///
/// # Examples
/// ```
/// use flyby::config::MassFunction;
/// use flyby::sampling::{invert_mass_cdf, mass_cdf};
///
/// let imf = MassFunction::default();
/// assert!((invert_mass_cdf(0.0, &imf) - 0.08).abs() < 1e-12);
/// assert!((mass_cdf(invert_mass_cdf(0.7, &imf), &imf) - 0.7).abs() < 1e-12);
/// ```
pub fn invert_mass_cdf(y: f64, imf: &MassFunction) -> f64 {
    let m_min = imf.min_mass.to_solar_masses();
    let m_br = imf.break_mass.to_solar_masses();
    let (a, b, y_crit) = mass_function_constants(imf);

    if y <= y_crit {
        (LOW_MASS_EXPONENT * y / a + m_min.powf(LOW_MASS_EXPONENT)).powf(1.0 / LOW_MASS_EXPONENT)
    } else {
        (m_br.powf(-HIGH_MASS_EXPONENT) + (HIGH_MASS_EXPONENT / b) * (y_crit - y))
            .powf(-1.0 / HIGH_MASS_EXPONENT)
    }
}

/// Sample a perturber mass (M☉) from the broken power-law mass function
pub fn sample_perturber_mass(rng: &mut ChaChaRng, imf: &MassFunction) -> f64 {
    let y: f64 = rng.random();
    invert_mass_cdf(y, imf)
}

/// Sample an impact parameter with b² uniform on [0, b_max²]
pub fn sample_impact_parameter(rng: &mut ChaChaRng, max_impact_parameter: f64) -> f64 {
    let u: f64 = rng.random();
    u.sqrt() * max_impact_parameter
}

/// Cumulative distribution of the Maxwellian speed with dispersion `sigma`
///
/// erf(x / √2σ) − √(2/π) (x/σ) exp(−x² / 2σ²)
pub fn speed_cdf(speed: f64, sigma: f64) -> f64 {
    let x = speed / sigma;
    erf(x / SQRT_2) - (2.0 / PI).sqrt() * x * (-0.5 * x * x).exp()
}

/// Sample an asymptotic speed by inverting [`speed_cdf`] numerically
///
/// The root is bracketed on [0, √2σ], widening the upper end by doubling,
/// then located with Brent's method.
pub fn sample_asymptotic_speed(rng: &mut ChaChaRng, sigma: f64, solver: &RootSolver) -> Result<f64> {
    let u: f64 = rng.random();
    let residual = |x: f64| speed_cdf(x, sigma) - u;

    let mut upper = SQRT_2 * sigma;
    let mut expansions = 0;
    while residual(upper) < 0.0 {
        if expansions == MAX_BRACKET_EXPANSIONS {
            return Err(SolveError::NotBracketed { lower: 0.0, upper }.into());
        }
        upper *= 2.0;
        expansions += 1;
    }

    Ok(solver.brent(residual, 0.0, upper)?)
}

/// Sample an inclination isotropically, arccos(1 − 2u) on [0, π]
pub fn sample_inclination(rng: &mut ChaChaRng) -> f64 {
    let u: f64 = rng.random();
    (1.0 - 2.0 * u).acos()
}

/// Sample an angle uniformly on [0, 2π)
pub fn sample_angle(rng: &mut ChaChaRng) -> f64 {
    let u: f64 = rng.random();
    u * TAU
}

/// Draws complete encounters for one perturber population
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncounterSampler {
    pub mass_function: MassFunction,
    /// b_max (au)
    pub max_impact_parameter: f64,
    /// σ in code velocity units
    pub velocity_dispersion: f64,
    pub solver: RootSolver,
}

impl EncounterSampler {
    pub fn from_config(config: &PhysicalConfig) -> Self {
        Self {
            mass_function: config.mass_function,
            max_impact_parameter: config.max_impact_parameter.to_au(),
            velocity_dispersion: config.velocity_dispersion.to_code_units(),
            solver: config.numerics.root_solver(),
        }
    }

    pub fn sample(&self, rng: &mut ChaChaRng) -> Result<EncounterParams> {
        let perturber_mass = sample_perturber_mass(rng, &self.mass_function);
        let asymptotic_speed = sample_asymptotic_speed(rng, self.velocity_dispersion, &self.solver)?;
        let impact_parameter = sample_impact_parameter(rng, self.max_impact_parameter);
        let node = sample_angle(rng);
        let inclination = sample_inclination(rng);
        let argument = sample_angle(rng);

        Ok(EncounterParams::new(
            perturber_mass,
            asymptotic_speed,
            impact_parameter,
            node,
            inclination,
            argument,
        ))
    }
}

/// Generate every encounter needed to run `realizations` binaries for
/// `elapsed`
///
/// Rows are realization-major: realization k owns rows
/// `k * n .. (k + 1) * n` where n = `config.encounters_for(elapsed)`.
///
/// # Examples
/// ```
/// use flyby::{generate_encounters, PhysicalConfig};
/// use rand::SeedableRng;
/// use rand_chacha::ChaChaRng;
/// use units::Time;
///
/// let config = PhysicalConfig::default();
/// let mut rng = ChaChaRng::seed_from_u64(7);
/// let table = generate_encounters(&config, Time::from_myr(0.01), 3, &mut rng).unwrap();
/// assert_eq!(table.len(), 3 * config.encounters_for(Time::from_myr(0.01)));
/// ```
pub fn generate_encounters(
    config: &PhysicalConfig,
    elapsed: Time,
    realizations: usize,
    rng: &mut ChaChaRng,
) -> Result<EncounterTable> {
    config.validate()?;
    let per_realization = config.encounters_for(elapsed);
    let total = per_realization.checked_mul(realizations).ok_or_else(|| {
        FlybyError::config(format!(
            "{realizations} realizations × {per_realization} encounters overflows"
        ))
    })?;

    info!(
        "Sampling {total} encounters ({realizations} realizations × {per_realization}) for {:.4} Myr",
        elapsed.to_myr()
    );

    let sampler = EncounterSampler::from_config(config);
    let milestone = (realizations / 10).max(1);
    let mut rows = Vec::with_capacity(total);

    for k in 0..realizations {
        for j in 0..per_realization {
            let params = sampler
                .sample(rng)
                .map_err(|e| e.at(Stage::Sampling, k, j))?;
            rows.push(params);
        }
        if (k + 1) % milestone == 0 {
            info!("Sampled encounters: {}%", (k + 1) * 100 / realizations);
        }
    }

    Ok(EncounterTable::new(rows))
}

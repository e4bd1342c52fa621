//! Conic orbital elements and conversions.
//!
//! Elements describe either a bound ellipse (0 ≤ e < 1, a > 0) or an unbound
//! hyperbola (e > 1, a < 0). The orbit is positioned by the true anomaly
//! rather than the mean anomaly so that the same type covers both cases.
//!
//! # Frames
//!
//! The orbital plane is rotated into the reference frame by
//! R = Rz(Ω) · Rx(i) · Rz(ω), the usual ascending node / inclination /
//! argument of pericentre sequence.

use nalgebra::{Rotation3, Vector3};
use thiserror::Error;

use crate::roots::{RootSolver, SolveError};

/// Eccentricities below this are treated as circular when recovering angles
const CIRCULAR_TOLERANCE: f64 = 1e-11;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ElementsError {
    #[error("semi-latus rectum {0:.3e} is not positive; orbit is degenerate")]
    DegenerateConic(f64),

    #[error("true anomaly {true_anomaly:.6} lies beyond the asymptote of an e = {eccentricity:.6} hyperbola")]
    BeyondAsymptote { true_anomaly: f64, eccentricity: f64 },

    #[error("a body needs a primary to orbit")]
    NoPrimary,
}

/// Keplerian orbital elements for a two-body conic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalElements {
    /// Semi-major axis (AU); negative for hyperbolic orbits
    pub semi_major_axis: f64,

    /// Eccentricity (dimensionless)
    pub eccentricity: f64,

    /// Inclination (radians)
    pub inclination: f64,

    /// Longitude of ascending node (radians)
    pub longitude_ascending_node: f64,

    /// Argument of pericentre (radians)
    pub argument_of_periapsis: f64,

    /// True anomaly (radians)
    pub true_anomaly: f64,
}

impl OrbitalElements {
    /// An orbit in the reference plane with pericentre along +x.
    pub fn planar(semi_major_axis: f64, eccentricity: f64, true_anomaly: f64) -> Self {
        Self {
            semi_major_axis,
            eccentricity,
            inclination: 0.0,
            longitude_ascending_node: 0.0,
            argument_of_periapsis: 0.0,
            true_anomaly,
        }
    }

    /// p = a (1 − e²), positive for every non-degenerate conic
    pub fn semi_latus_rectum(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity * self.eccentricity)
    }

    /// Pericentre distance |a (1 − e)|
    pub fn pericenter(&self) -> f64 {
        (self.semi_major_axis * (1.0 - self.eccentricity)).abs()
    }

    pub fn is_bound(&self) -> bool {
        self.eccentricity < 1.0 && self.semi_major_axis > 0.0
    }

    /// Rotation from the orbital (perifocal) frame into the reference frame
    pub fn rotation(&self) -> Rotation3<f64> {
        Rotation3::from_axis_angle(&Vector3::z_axis(), self.longitude_ascending_node)
            * Rotation3::from_axis_angle(&Vector3::x_axis(), self.inclination)
            * Rotation3::from_axis_angle(&Vector3::z_axis(), self.argument_of_periapsis)
    }

    /// Relative position and velocity for gravitational parameter `mu`
    pub fn to_cartesian(&self, mu: f64) -> Result<(Vector3<f64>, Vector3<f64>), ElementsError> {
        let p = self.semi_latus_rectum();
        if p <= 0.0 || p.is_nan() {
            return Err(ElementsError::DegenerateConic(p));
        }

        let e = self.eccentricity;
        let f = self.true_anomaly;
        let denominator = 1.0 + e * f.cos();
        if denominator <= 0.0 {
            return Err(ElementsError::BeyondAsymptote {
                true_anomaly: f,
                eccentricity: e,
            });
        }

        let r = p / denominator;
        let v_factor = (mu / p).sqrt();

        let position = Vector3::new(r * f.cos(), r * f.sin(), 0.0);
        let velocity = Vector3::new(-v_factor * f.sin(), v_factor * (e + f.cos()), 0.0);

        let rotation = self.rotation();
        Ok((rotation * position, rotation * velocity))
    }
}

/// Eccentricity vector (v² − μ/r) r/μ − (r·v) v/μ
pub fn eccentricity_vector(position: &Vector3<f64>, velocity: &Vector3<f64>, mu: f64) -> Vector3<f64> {
    let r = position.magnitude();
    (position * (velocity.magnitude_squared() - mu / r) - velocity * position.dot(velocity)) / mu
}

/// Eccentricity of the relative orbit described by a position and velocity
pub fn eccentricity_from_state(position: &Vector3<f64>, velocity: &Vector3<f64>, mu: f64) -> f64 {
    eccentricity_vector(position, velocity, mu).magnitude()
}

/// Semi-major axis from the vis-viva relation, a = −μ / 2ε
pub fn semi_major_axis_from_state(position: &Vector3<f64>, velocity: &Vector3<f64>, mu: f64) -> f64 {
    let specific_energy = 0.5 * velocity.magnitude_squared() - mu / position.magnitude();
    -mu / (2.0 * specific_energy)
}

/// Convert a relative Cartesian state to orbital elements.
///
/// Angles that are undefined (node of an equatorial orbit, pericentre of a
/// circular one) are set to zero and the remaining angle absorbs the phase.
pub fn cartesian_to_orbital_elements(
    position: &Vector3<f64>,
    velocity: &Vector3<f64>,
    mu: f64,
) -> OrbitalElements {
    let h = position.cross(velocity);
    let node = Vector3::z().cross(&h);
    let e_vec = eccentricity_vector(position, velocity, mu);
    let e = e_vec.magnitude();

    let inclination = (h.z / h.magnitude()).clamp(-1.0, 1.0).acos();
    let equatorial = node.magnitude() < CIRCULAR_TOLERANCE * h.magnitude();

    let longitude_ascending_node = if equatorial {
        0.0
    } else {
        node.y.atan2(node.x)
    };

    // Reference direction in the orbital plane from which ω is measured
    let reference = if equatorial {
        Vector3::x()
    } else {
        node.normalize()
    };
    let h_hat = h.normalize();
    let angle_in_plane = |v: &Vector3<f64>| {
        let cos = reference.dot(v);
        let sin = h_hat.dot(&reference.cross(v));
        sin.atan2(cos)
    };

    let (argument_of_periapsis, true_anomaly) = if e > CIRCULAR_TOLERANCE {
        let omega = angle_in_plane(&e_vec);
        let e_hat = e_vec / e;
        let f = h_hat.dot(&e_hat.cross(position)).atan2(e_hat.dot(position));
        (omega, f)
    } else {
        (0.0, angle_in_plane(position))
    };

    OrbitalElements {
        semi_major_axis: semi_major_axis_from_state(position, velocity, mu),
        eccentricity: e,
        inclination,
        longitude_ascending_node,
        argument_of_periapsis,
        true_anomaly,
    }
}

/// Solve Kepler's equation M = E − e sin E for the eccentric anomaly E.
///
/// The mean anomaly is wrapped into [−π, π]. For high eccentricities Newton
/// iteration is started from ±π, which converges for every M.
pub fn solve_keplers_equation(
    mean_anomaly: f64,
    eccentricity: f64,
    solver: &RootSolver,
) -> Result<f64, SolveError> {
    use std::f64::consts::{PI, TAU};

    let m = (mean_anomaly + PI).rem_euclid(TAU) - PI;
    let guess = if eccentricity > 0.8 {
        PI.copysign(m)
    } else {
        m + eccentricity * m.sin()
    };

    solver.newton(
        |ecc_anomaly| ecc_anomaly - eccentricity * ecc_anomaly.sin() - m,
        |ecc_anomaly| 1.0 - eccentricity * ecc_anomaly.cos(),
        guess,
    )
}

/// True anomaly corresponding to a mean anomaly on an ellipse
///
/// Uses f = E + 2 atan(β sin E / (1 − β cos E)) with β = e / (1 + √(1 − e²)),
/// which stays continuous in E.
pub fn true_anomaly_from_mean(
    mean_anomaly: f64,
    eccentricity: f64,
    solver: &RootSolver,
) -> Result<f64, SolveError> {
    let ecc_anomaly = solve_keplers_equation(mean_anomaly, eccentricity, solver)?;
    let beta = eccentricity / (1.0 + (1.0 - eccentricity * eccentricity).sqrt());
    Ok(ecc_anomaly
        + 2.0 * (beta * ecc_anomaly.sin() / (1.0 - beta * ecc_anomaly.cos())).atan())
}

/// Time taken on a hyperbola to travel from pericentre to true anomaly `f`
///
/// With hyperbolic anomaly F = arccosh((e + cos f) / (1 + e cos f)),
/// t = (e sinh F − F) √(−a³ / μ). Symmetric in f.
pub fn hyperbolic_time_from_pericenter(semi_major_axis: f64, eccentricity: f64, true_anomaly: f64, mu: f64) -> f64 {
    let cos_f = true_anomaly.cos();
    let anomaly = ((eccentricity + cos_f) / (1.0 + eccentricity * cos_f)).acosh();
    (eccentricity * anomaly.sinh() - anomaly) * ((-semi_major_axis).powi(3) / mu).sqrt()
}

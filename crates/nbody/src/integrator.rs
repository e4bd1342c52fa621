//! Time integration for few-body systems
//!
//! Close encounters compress the relevant timescale by orders of magnitude,
//! so the integrator here adapts its step from an embedded error estimate
//! rather than marching at a fixed dt.

use crate::body::Body;
use crate::forces::gravity::shortest_dynamical_time;
use crate::forces::ForceModel;
use crate::state::SystemState;
use nalgebra::Vector3;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegrationError {
    #[error("step size {step:.3e} fell below the minimum {min_step:.3e} at t = {time:.6}")]
    StepSizeUnderflow { step: f64, min_step: f64, time: f64 },

    #[error("step budget of {max_steps} exhausted at t = {time:.6} of {duration:.6}")]
    MaxStepsExceeded {
        max_steps: usize,
        time: f64,
        duration: f64,
    },

    #[error("state became non-finite at t = {time:.6}")]
    NonFinite { time: f64 },

    #[error("cannot integrate for a negative or non-finite duration {0}")]
    InvalidDuration(f64),
}

/// Bookkeeping returned by a completed integration
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IntegrationStats {
    pub accepted_steps: usize,
    pub rejected_steps: usize,
    /// Size of the last accepted step
    pub last_step: f64,
}

/// A time integrator for few-body systems
pub trait Integrator: Send + Sync {
    /// Advance the system by `duration` code-time units
    ///
    /// On success the state time has advanced by exactly `duration`.
    fn integrate(
        &self,
        state: &mut SystemState,
        duration: f64,
        force: &dyn ForceModel,
    ) -> Result<IntegrationStats, IntegrationError>;
}

/// Mixed absolute/relative error tolerances per step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub absolute: f64,
    pub relative: f64,
}

impl Tolerances {
    pub fn new(absolute: f64, relative: f64) -> Self {
        Self { absolute, relative }
    }

    fn scale(&self, a: f64, b: f64) -> f64 {
        self.absolute + self.relative * a.max(b)
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self::new(1e-12, 1e-10)
    }
}

// Fehlberg 4(5) tableau. Gravity is autonomous, so the nodes cᵢ are not needed.
const A: [&[f64]; 6] = [
    &[],
    &[1.0 / 4.0],
    &[3.0 / 32.0, 9.0 / 32.0],
    &[1932.0 / 2197.0, -7200.0 / 2197.0, 7296.0 / 2197.0],
    &[439.0 / 216.0, -8.0, 3680.0 / 513.0, -845.0 / 4104.0],
    &[-8.0 / 27.0, 2.0, -3544.0 / 2565.0, 1859.0 / 4104.0, -11.0 / 40.0],
];
/// Fifth-order weights (propagated solution)
const B5: [f64; 6] = [
    16.0 / 135.0,
    0.0,
    6656.0 / 12825.0,
    28561.0 / 56430.0,
    -9.0 / 50.0,
    2.0 / 55.0,
];
/// Fifth- minus fourth-order weights (local error estimate)
const ERR: [f64; 6] = [
    1.0 / 360.0,
    0.0,
    -128.0 / 4275.0,
    -2197.0 / 75240.0,
    1.0 / 50.0,
    2.0 / 55.0,
];

const SAFETY: f64 = 0.9;
const MIN_SHRINK: f64 = 0.2;
const MAX_GROWTH: f64 = 5.0;

/// Time derivative of every body's (position, velocity)
struct Derivative {
    velocity: Vec<Vector3<f64>>,
    acceleration: Vec<Vector3<f64>>,
}

impl Derivative {
    fn of(bodies: &[Body], force: &dyn ForceModel) -> Self {
        Self {
            velocity: bodies.iter().map(|b| b.velocity).collect(),
            acceleration: force.accelerations(bodies),
        }
    }
}

/// `base + h Σ wᵢ kᵢ` applied to every body
fn advance(base: &[Body], h: f64, weights: &[f64], stages: &[Derivative]) -> Vec<Body> {
    base.iter()
        .enumerate()
        .map(|(n, body)| {
            let mut next = *body;
            for (w, k) in weights.iter().zip(stages).filter(|(w, _)| **w != 0.0) {
                next.position += k.velocity[n] * (h * w);
                next.velocity += k.acceleration[n] * (h * w);
            }
            next
        })
        .collect()
}

/// Adaptive Runge-Kutta-Fehlberg 4(5) integrator
///
/// Each step carries the fifth-order solution and uses the embedded
/// fourth-order solution to estimate the local error. Steps whose scaled
/// error exceeds one are retried with a smaller step.
///
/// # Examples
///
/// ```
/// use nbody::integrator::{Integrator, Rkf45};
/// use nbody::forces::DirectGravity;
/// use nbody::orbital_elements::OrbitalElements;
/// use nbody::state::SystemState;
/// use nalgebra::{Point3, Vector3};
///
/// let mut system = SystemState::new();
/// system.add_body(1.0, Point3::origin(), Vector3::zeros());
/// system
///     .add_body_with_elements(1e-9, &OrbitalElements::planar(1.0, 0.0, 0.0))
///     .unwrap();
///
/// let stats = Rkf45::default()
///     .integrate(&mut system, 1.0, &DirectGravity::new())
///     .unwrap();
///
/// assert_eq!(system.time, 1.0);
/// assert!(stats.accepted_steps > 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rkf45 {
    pub tolerances: Tolerances,
    /// First trial step; defaults to 1% of the shortest pair dynamical time
    pub initial_step: Option<f64>,
    pub min_step: f64,
    pub max_steps: usize,
}

impl Default for Rkf45 {
    fn default() -> Self {
        Self {
            tolerances: Tolerances::default(),
            initial_step: None,
            min_step: 1e-12,
            max_steps: 5_000_000,
        }
    }
}

impl Rkf45 {
    pub fn new(tolerances: Tolerances) -> Self {
        Self {
            tolerances,
            ..Self::default()
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// One trial step of size `h`; returns the candidate bodies and the
    /// scaled error norm (≤ 1 means acceptable)
    fn attempt(&self, bodies: &[Body], h: f64, force: &dyn ForceModel) -> (Vec<Body>, f64) {
        let mut stages: Vec<Derivative> = Vec::with_capacity(A.len());
        stages.push(Derivative::of(bodies, force));
        for weights in A.iter().skip(1) {
            let trial = advance(bodies, h, weights, &stages);
            stages.push(Derivative::of(&trial, force));
        }

        let candidate = advance(bodies, h, &B5, &stages);

        let error = bodies
            .iter()
            .zip(&candidate)
            .enumerate()
            .map(|(n, (old, new))| {
                let (dx, dv) = ERR.iter().zip(&stages).fold(
                    (Vector3::zeros(), Vector3::zeros()),
                    |(dx, dv), (w, k)| (dx + k.velocity[n] * (h * w), dv + k.acceleration[n] * (h * w)),
                );
                let position_scale = self
                    .tolerances
                    .scale(old.position.coords.magnitude(), new.position.coords.magnitude());
                let velocity_scale = self
                    .tolerances
                    .scale(old.velocity.magnitude(), new.velocity.magnitude());
                (dx.magnitude() / position_scale).max(dv.magnitude() / velocity_scale)
            })
            .fold(0.0_f64, |acc, e| if e.is_nan() { f64::NAN } else { acc.max(e) });

        (candidate, error)
    }
}

impl Integrator for Rkf45 {
    fn integrate(
        &self,
        state: &mut SystemState,
        duration: f64,
        force: &dyn ForceModel,
    ) -> Result<IntegrationStats, IntegrationError> {
        if duration < 0.0 || !duration.is_finite() {
            return Err(IntegrationError::InvalidDuration(duration));
        }

        let mut stats = IntegrationStats::default();
        let start = state.time;
        let mut elapsed = 0.0;
        let mut h = self
            .initial_step
            .or_else(|| shortest_dynamical_time(&state.bodies).map(|t| 0.01 * t))
            .unwrap_or(duration)
            .min(duration);

        while elapsed < duration {
            if stats.accepted_steps + stats.rejected_steps >= self.max_steps {
                return Err(IntegrationError::MaxStepsExceeded {
                    max_steps: self.max_steps,
                    time: state.time,
                    duration,
                });
            }

            let remaining = duration - elapsed;
            let last = h >= remaining;
            let h_try = if last { remaining } else { h };

            let (candidate, error) = self.attempt(&state.bodies, h_try, force);
            if !error.is_finite() {
                return Err(IntegrationError::NonFinite { time: state.time });
            }

            let factor = if error == 0.0 {
                MAX_GROWTH
            } else {
                (SAFETY * error.powf(-0.2)).clamp(MIN_SHRINK, MAX_GROWTH)
            };

            if error <= 1.0 {
                state.bodies = candidate;
                elapsed = if last { duration } else { elapsed + h_try };
                state.time = start + elapsed;
                stats.accepted_steps += 1;
                stats.last_step = h_try;
                // A clipped final step says nothing about the natural step size
                if !last {
                    h = h_try * factor;
                }
            } else {
                stats.rejected_steps += 1;
                h = h_try * factor;
                if h < self.min_step {
                    return Err(IntegrationError::StepSizeUnderflow {
                        step: h,
                        min_step: self.min_step,
                        time: state.time,
                    });
                }
            }
        }

        Ok(stats)
    }
}

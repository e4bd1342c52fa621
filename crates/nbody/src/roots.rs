//! Bounded iterative root finding.
//!
//! Every solve has an explicit tolerance and iteration cap. Running out of
//! iterations is reported as [`SolveError::NoConvergence`] instead of
//! handing back the last iterate.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    #[error("no convergence after {iterations} iterations (estimate {estimate}, residual {residual:.3e})")]
    NoConvergence {
        iterations: usize,
        estimate: f64,
        residual: f64,
    },

    #[error("interval [{lower}, {upper}] does not bracket a root")]
    NotBracketed { lower: f64, upper: f64 },

    #[error("function is not finite at x = {x}")]
    NonFinite { x: f64 },

    #[error("derivative vanished at x = {x}")]
    ZeroDerivative { x: f64 },
}

/// Tolerance and iteration budget shared by the solvers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootSolver {
    /// Convergence tolerance on x
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for RootSolver {
    fn default() -> Self {
        Self {
            tolerance: 1e-12,
            max_iterations: 100,
        }
    }
}

impl RootSolver {
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Newton-Raphson iteration from `x0`
    ///
    /// Converged once a step is smaller than `tolerance · (1 + |x|)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use nbody::roots::RootSolver;
    ///
    /// let root = RootSolver::default()
    ///     .newton(|x| x * x - 2.0, |x| 2.0 * x, 1.0)
    ///     .unwrap();
    /// assert!((root - 2.0_f64.sqrt()).abs() < 1e-12);
    /// ```
    pub fn newton<F, D>(&self, f: F, df: D, x0: f64) -> Result<f64, SolveError>
    where
        F: Fn(f64) -> f64,
        D: Fn(f64) -> f64,
    {
        let mut x = x0;
        for _ in 0..self.max_iterations {
            let fx = f(x);
            let slope = df(x);
            if !fx.is_finite() || !slope.is_finite() {
                return Err(SolveError::NonFinite { x });
            }
            if slope == 0.0 {
                return Err(SolveError::ZeroDerivative { x });
            }

            let delta = fx / slope;
            x -= delta;

            if delta.abs() <= self.tolerance * (1.0 + x.abs()) {
                return Ok(x);
            }
        }

        Err(SolveError::NoConvergence {
            iterations: self.max_iterations,
            estimate: x,
            residual: f(x),
        })
    }

    /// Brent's method on a bracketing interval
    ///
    /// Combines bisection with secant and inverse quadratic steps, so it
    /// cannot leave the bracket. `f(lower)` and `f(upper)` must differ in sign.
    ///
    /// # Examples
    ///
    /// ```
    /// use nbody::roots::RootSolver;
    ///
    /// let root = RootSolver::default().brent(|x| x.cos() - x, 0.0, 1.0).unwrap();
    /// assert!((root - 0.739_085_133_215_160_6).abs() < 1e-10);
    /// ```
    pub fn brent<F>(&self, f: F, lower: f64, upper: f64) -> Result<f64, SolveError>
    where
        F: Fn(f64) -> f64,
    {
        let evaluate = |x: f64| {
            let fx = f(x);
            if fx.is_finite() {
                Ok(fx)
            } else {
                Err(SolveError::NonFinite { x })
            }
        };

        let (mut a, mut b) = (lower, upper);
        let (mut fa, mut fb) = (evaluate(a)?, evaluate(b)?);

        if fa == 0.0 {
            return Ok(a);
        }
        if fb == 0.0 {
            return Ok(b);
        }
        if fa.signum() == fb.signum() {
            return Err(SolveError::NotBracketed { lower, upper });
        }

        let (mut c, mut fc) = (b, fb);
        let mut d = b - a;
        let mut e = d;

        for _ in 0..self.max_iterations {
            if fb.signum() == fc.signum() {
                // Re-establish the bracket [b, c]
                c = a;
                fc = fa;
                d = b - a;
                e = d;
            }
            if fc.abs() < fb.abs() {
                a = b;
                b = c;
                c = a;
                fa = fb;
                fb = fc;
                fc = fa;
            }

            let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * self.tolerance;
            let midpoint = 0.5 * (c - b);
            if midpoint.abs() <= tol || fb == 0.0 {
                return Ok(b);
            }

            if e.abs() >= tol && fa.abs() > fb.abs() {
                let s = fb / fa;
                let (mut p, mut q) = if a == c {
                    (2.0 * midpoint * s, 1.0 - s)
                } else {
                    let q = fa / fc;
                    let r = fb / fc;
                    (
                        s * (2.0 * midpoint * q * (q - r) - (b - a) * (r - 1.0)),
                        (q - 1.0) * (r - 1.0) * (s - 1.0),
                    )
                };
                if p > 0.0 {
                    q = -q;
                }
                p = p.abs();

                let interpolation_limit = 3.0 * midpoint * q - (tol * q).abs();
                let previous_limit = (e * q).abs();
                if 2.0 * p < interpolation_limit.min(previous_limit) {
                    e = d;
                    d = p / q;
                } else {
                    d = midpoint;
                    e = d;
                }
            } else {
                d = midpoint;
                e = d;
            }

            a = b;
            fa = fb;
            b += if d.abs() > tol { d } else { tol.copysign(midpoint) };
            fb = evaluate(b)?;
        }

        Err(SolveError::NoConvergence {
            iterations: self.max_iterations,
            estimate: b,
            residual: fb,
        })
    }
}

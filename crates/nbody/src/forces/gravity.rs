//! Direct N-body gravity (O(N²) implementation)

use crate::body::Body;
use crate::forces::{ForceModel, G};
use nalgebra::Vector3;

/// Direct O(N²) gravitational force computation
///
/// Sums pairwise Newtonian attraction between all bodies. With three bodies
/// there is nothing to gain from a tree code, and the exact sum keeps close
/// encounters accurate.
///
/// # Examples
///
/// ```
/// use nbody::forces::{DirectGravity, ForceModel};
/// use nbody::state::SystemState;
/// use nalgebra::{Point3, Vector3};
///
/// let mut system = SystemState::new();
/// system.add_body(1.0, Point3::origin(), Vector3::zeros());
/// system.add_body(1e-3, Point3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 1.0, 0.0));
///
/// let gravity = DirectGravity::new();
/// let accel = gravity.acceleration(1, &system.bodies);
///
/// // Pulled back toward the primary
/// assert!(accel.x < 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectGravity {
    /// Optional softening length to prevent singularities (AU)
    pub softening: f64,
}

impl DirectGravity {
    /// Creates a new direct gravity force with no softening
    pub fn new() -> Self {
        Self { softening: 0.0 }
    }

    /// Creates a new direct gravity force with specified softening length
    pub fn with_softening(softening: f64) -> Self {
        Self { softening }
    }
}

impl Default for DirectGravity {
    fn default() -> Self {
        Self::new()
    }
}

impl ForceModel for DirectGravity {
    fn acceleration(&self, idx: usize, bodies: &[Body]) -> Vector3<f64> {
        let body = &bodies[idx];
        let eps2 = self.softening * self.softening;

        bodies
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != idx)
            .map(|(_, other)| {
                let dr = other.position - body.position;
                let r2 = dr.magnitude_squared() + eps2;
                let r = r2.sqrt();
                dr * (G * other.mass / (r2 * r))
            })
            .fold(Vector3::zeros(), |acc, a| acc + a)
    }

    fn potential_energy(&self, bodies: &[Body]) -> f64 {
        let eps2 = self.softening * self.softening;

        // Each pair counted once
        bodies
            .iter()
            .enumerate()
            .flat_map(|(i, a)| {
                bodies[i + 1..].iter().map(move |b| {
                    let dr = a.position - b.position;
                    let r = (dr.magnitude_squared() + eps2).sqrt();
                    -G * a.mass * b.mass / r
                })
            })
            .sum()
    }
}

/// Shortest two-body dynamical time, sqrt(r³ / G(m_i + m_j)), over all pairs
///
/// Used to seed the first step of adaptive integrators. Returns `None` for
/// fewer than two bodies.
pub fn shortest_dynamical_time(bodies: &[Body]) -> Option<f64> {
    bodies
        .iter()
        .enumerate()
        .flat_map(|(i, a)| {
            bodies[i + 1..]
                .iter()
                .map(move |b| (a.distance_to(b).powi(3) / (G * (a.mass + b.mass))).sqrt())
        })
        .min_by(|x, y| x.total_cmp(y))
}

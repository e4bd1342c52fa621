use nalgebra::{Point3, Vector3};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(pub u32);

#[derive(Debug, Clone, Copy)]
pub struct Body {
    pub id: BodyId,
    pub mass: f64,              // Solar masses
    pub position: Point3<f64>,  // AU
    pub velocity: Vector3<f64>, // AU per (yr/2π)
}

impl Body {
    pub fn momentum(&self) -> Vector3<f64> {
        self.velocity * self.mass
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.magnitude_squared()
    }

    pub fn distance_to(&self, other: &Body) -> f64 {
        (self.position - other.position).magnitude()
    }

    /// Angular momentum about the origin, m (r × v)
    pub fn angular_momentum(&self) -> Vector3<f64> {
        self.position.coords.cross(&self.velocity) * self.mass
    }
}

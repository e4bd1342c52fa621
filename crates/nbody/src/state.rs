use crate::body::{Body, BodyId};
use crate::forces::{ForceModel, G};
use crate::orbital_elements::{ElementsError, OrbitalElements};
use nalgebra::{Point3, Vector3};

/// Complete state of a few-body system at a given time
#[derive(Debug, Clone, Default)]
pub struct SystemState {
    /// Current simulation time in code units (yr/2π)
    pub time: f64,
    /// All bodies, in insertion order
    pub bodies: Vec<Body>,
    /// Next available body ID
    next_id: u32,
}

impl SystemState {
    /// Creates an empty system at t = 0
    ///
    /// # Examples
    ///
    /// ```
    /// use nbody::state::SystemState;
    ///
    /// let system = SystemState::new();
    /// assert_eq!(system.body_count(), 0);
    /// assert_eq!(system.time, 0.0);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a new body with an explicit Cartesian state and returns its ID
    ///
    /// # Arguments
    ///
    /// * `mass` - Body mass in solar masses
    /// * `position` - Position in AU
    /// * `velocity` - Velocity in code units
    pub fn add_body(&mut self, mass: f64, position: Point3<f64>, velocity: Vector3<f64>) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.bodies.push(Body {
            id,
            mass,
            position,
            velocity,
        });
        id
    }

    /// Adds a body on a conic orbit about the existing bodies
    ///
    /// The elements are interpreted relative to the centre of mass of every
    /// body already in the system (Jacobi coordinates), with gravitational
    /// parameter μ = G (M_existing + mass).
    ///
    /// # Examples
    ///
    /// ```
    /// use nbody::orbital_elements::OrbitalElements;
    /// use nbody::state::SystemState;
    /// use nalgebra::{Point3, Vector3};
    ///
    /// let mut system = SystemState::new();
    /// system.add_body(1.0, Point3::origin(), Vector3::zeros());
    ///
    /// let orbit = OrbitalElements::planar(5.0, 0.9, 0.0);
    /// system.add_body_with_elements(1e-9, &orbit).unwrap();
    ///
    /// // Starts at pericentre, a(1 - e) from the primary
    /// assert!((system.bodies[1].position.x - 0.5).abs() < 1e-12);
    /// ```
    pub fn add_body_with_elements(
        &mut self,
        mass: f64,
        elements: &OrbitalElements,
    ) -> Result<BodyId, ElementsError> {
        if self.bodies.is_empty() {
            return Err(ElementsError::NoPrimary);
        }
        let mu = G * (self.total_mass() + mass);
        let (relative_position, relative_velocity) = elements.to_cartesian(mu)?;

        let position = self.center_of_mass() + relative_position;
        let velocity = self.center_of_mass_velocity() + relative_velocity;
        Ok(self.add_body(mass, position, velocity))
    }

    /// Returns the number of bodies in the system
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Returns the total mass of all bodies
    pub fn total_mass(&self) -> f64 {
        self.bodies.iter().map(|b| b.mass).sum()
    }

    /// Mass-weighted mean position
    pub fn center_of_mass(&self) -> Point3<f64> {
        let weighted = self
            .bodies
            .iter()
            .fold(Vector3::zeros(), |acc, b| acc + b.position.coords * b.mass);
        Point3::from(weighted / self.total_mass())
    }

    /// Mass-weighted mean velocity
    pub fn center_of_mass_velocity(&self) -> Vector3<f64> {
        self.total_momentum() / self.total_mass()
    }

    /// Shifts into the barycentric frame (centre of mass at rest at the origin)
    pub fn move_to_center_of_mass(&mut self) {
        let com = self.center_of_mass().coords;
        let com_velocity = self.center_of_mass_velocity();
        self.bodies.iter_mut().for_each(|b| {
            b.position -= com;
            b.velocity -= com_velocity;
        });
    }

    /// Position and velocity of body `j` relative to body `i`
    pub fn relative_state(&self, i: usize, j: usize) -> (Vector3<f64>, Vector3<f64>) {
        let (a, b) = (&self.bodies[i], &self.bodies[j]);
        (b.position - a.position, b.velocity - a.velocity)
    }

    /// Returns the total momentum of all bodies
    ///
    /// Zero in the barycentric frame (useful for checking numerical drift)
    pub fn total_momentum(&self) -> Vector3<f64> {
        self.bodies
            .iter()
            .map(|b| b.momentum())
            .fold(Vector3::zeros(), |acc, p| acc + p)
    }

    /// Returns the total angular momentum about the origin
    pub fn total_angular_momentum(&self) -> Vector3<f64> {
        self.bodies
            .iter()
            .map(|b| b.angular_momentum())
            .fold(Vector3::zeros(), |acc, l| acc + l)
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.bodies.iter().map(|b| b.kinetic_energy()).sum()
    }

    /// Kinetic plus potential energy under the given force model
    pub fn total_energy(&self, force: &dyn ForceModel) -> f64 {
        self.kinetic_energy() + force.potential_energy(&self.bodies)
    }
}

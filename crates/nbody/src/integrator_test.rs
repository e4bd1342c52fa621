use std::f64::consts::TAU;

use nalgebra::{Point3, Vector3};

use crate::forces::DirectGravity;
use crate::integrator::{IntegrationError, Integrator, Rkf45, Tolerances};
use crate::orbital_elements::{eccentricity_from_state, OrbitalElements};
use crate::state::SystemState;

fn make_test_system(eccentricity: f64) -> SystemState {
    let mut system = SystemState::new();
    system.add_body(1.0, Point3::origin(), Vector3::zeros());
    system
        .add_body_with_elements(1e-9, &OrbitalElements::planar(1.0, eccentricity, 0.0))
        .unwrap();
    system.move_to_center_of_mass();
    system
}

#[test]
fn test_advances_time_exactly() {
    let mut system = make_test_system(0.0);

    Rkf45::default()
        .integrate(&mut system, 0.37, &DirectGravity::new())
        .unwrap();

    assert_eq!(system.time, 0.37);
}

#[test]
fn test_zero_duration_takes_no_steps() {
    let mut system = make_test_system(0.0);
    let before = system.bodies[1].position;

    let stats = Rkf45::default()
        .integrate(&mut system, 0.0, &DirectGravity::new())
        .unwrap();

    assert_eq!(stats.accepted_steps, 0);
    assert_eq!(system.bodies[1].position, before);
}

#[test]
fn test_circular_orbit_returns_after_one_period() {
    let mut system = make_test_system(0.0);
    let (initial, _) = system.relative_state(0, 1);

    // Period is 2π code units for a 1 au orbit about one solar mass
    Rkf45::default()
        .integrate(&mut system, TAU, &DirectGravity::new())
        .unwrap();

    let (r, _) = system.relative_state(0, 1);
    assert!((r - initial).magnitude() < 1e-6, "drift {:.2e}", (r - initial).magnitude());
}

#[test]
fn test_conserves_energy_on_eccentric_orbit() {
    let mut system = make_test_system(0.9);
    let force = DirectGravity::new();
    let initial_energy = system.total_energy(&force);

    // Three pericentre passages
    Rkf45::default()
        .integrate(&mut system, 3.0 * TAU, &force)
        .unwrap();

    let error = ((system.total_energy(&force) - initial_energy) / initial_energy).abs();
    assert!(error < 1e-6, "Energy error: {:.2e}", error);

    let (r, v) = system.relative_state(0, 1);
    let e = eccentricity_from_state(&r, &v, 1.0 + 1e-9);
    assert!((e - 0.9).abs() < 1e-5, "eccentricity {}", e);
}

#[test]
fn test_conserves_angular_momentum() {
    let mut system = make_test_system(0.5);
    let initial = system.total_angular_momentum();

    Rkf45::new(Tolerances::new(1e-13, 1e-12))
        .integrate(&mut system, 5.0, &DirectGravity::new())
        .unwrap();

    let error = (system.total_angular_momentum() - initial).magnitude() / initial.magnitude();
    assert!(error < 1e-8, "Angular momentum error: {:.2e}", error);
}

#[test]
fn test_step_budget_is_enforced() {
    let mut system = make_test_system(0.0);

    let result = Rkf45::default()
        .with_max_steps(3)
        .integrate(&mut system, 100.0 * TAU, &DirectGravity::new());

    assert!(matches!(
        result,
        Err(IntegrationError::MaxStepsExceeded { max_steps: 3, .. })
    ));
}

#[test]
fn test_rejects_negative_duration() {
    let mut system = make_test_system(0.0);

    let result = Rkf45::default().integrate(&mut system, -1.0, &DirectGravity::new());

    assert_eq!(result, Err(IntegrationError::InvalidDuration(-1.0)));
}

#[test]
fn test_rejects_nan_duration() {
    let mut system = make_test_system(0.0);

    let result = Rkf45::default().integrate(&mut system, f64::NAN, &DirectGravity::new());

    assert!(matches!(result, Err(IntegrationError::InvalidDuration(_))));
}

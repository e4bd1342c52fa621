use std::f64::consts::{FRAC_PI_2, PI};

use approx::assert_relative_eq;
use nalgebra::Vector3;

use crate::orbital_elements::{
    cartesian_to_orbital_elements, eccentricity_from_state, hyperbolic_time_from_pericenter,
    semi_major_axis_from_state, solve_keplers_equation, true_anomaly_from_mean, ElementsError,
    OrbitalElements,
};
use crate::roots::RootSolver;

#[test]
fn pericenter_of_planar_ellipse() {
    let elements = OrbitalElements::planar(5.0, 0.9, 0.0);

    let (r, v) = elements.to_cartesian(1.0).unwrap();

    assert_relative_eq!(r.x, 0.5, epsilon = 1e-12);
    assert_relative_eq!(r.y, 0.0, epsilon = 1e-12);
    // Vis-viva at pericentre: v² = μ (1 + e) / (a (1 − e))
    assert_relative_eq!(v.norm(), (1.9_f64 / 0.5).sqrt(), epsilon = 1e-12);
    assert_relative_eq!(elements.pericenter(), 0.5, epsilon = 1e-12);
}

#[test]
fn inclined_orbit_round_trips_through_cartesian() {
    let elements = OrbitalElements {
        semi_major_axis: 3.0,
        eccentricity: 0.4,
        inclination: 0.7,
        longitude_ascending_node: 1.1,
        argument_of_periapsis: 2.3,
        true_anomaly: -0.8,
    };

    let (r, v) = elements.to_cartesian(2.0).unwrap();
    let recovered = cartesian_to_orbital_elements(&r, &v, 2.0);

    assert_relative_eq!(recovered.semi_major_axis, 3.0, max_relative = 1e-12);
    assert_relative_eq!(recovered.eccentricity, 0.4, epsilon = 1e-12);
    assert_relative_eq!(recovered.inclination, 0.7, epsilon = 1e-12);
    assert_relative_eq!(recovered.longitude_ascending_node, 1.1, epsilon = 1e-12);
    assert_relative_eq!(recovered.argument_of_periapsis, 2.3, epsilon = 1e-12);
    assert_relative_eq!(recovered.true_anomaly, -0.8, epsilon = 1e-12);
}

#[test]
fn hyperbolic_state_has_hyperbolic_elements() {
    let elements = OrbitalElements {
        semi_major_axis: -2.0,
        eccentricity: 3.0,
        inclination: 0.3,
        longitude_ascending_node: 0.2,
        argument_of_periapsis: 0.1,
        true_anomaly: -1.0,
    };

    let (r, v) = elements.to_cartesian(1.5).unwrap();

    assert!(!elements.is_bound());
    assert_relative_eq!(eccentricity_from_state(&r, &v, 1.5), 3.0, epsilon = 1e-12);
    assert_relative_eq!(semi_major_axis_from_state(&r, &v, 1.5), -2.0, epsilon = 1e-12);
    assert_relative_eq!(elements.pericenter(), 4.0);
}

#[test]
fn position_beyond_asymptote_is_rejected() {
    let elements = OrbitalElements::planar(-1.0, 2.0, 0.99 * PI);

    assert!(matches!(
        elements.to_cartesian(1.0),
        Err(ElementsError::BeyondAsymptote { .. })
    ));
}

#[test]
fn degenerate_conic_is_rejected() {
    // A zero semi-major axis collapses the semi-latus rectum
    let elements = OrbitalElements::planar(0.0, 0.5, 0.0);

    assert!(matches!(
        elements.to_cartesian(1.0),
        Err(ElementsError::DegenerateConic(_))
    ));

    let undefined = OrbitalElements::planar(f64::NAN, 0.5, 0.0);
    assert!(matches!(
        undefined.to_cartesian(1.0),
        Err(ElementsError::DegenerateConic(_))
    ));
}

#[test]
fn keplers_equation_is_satisfied() {
    let solver = RootSolver::default();

    for &(m, e) in &[(0.3, 0.1), (1.0, 0.9), (-2.9, 0.99), (3.0, 0.5)] {
        let ecc_anomaly = solve_keplers_equation(m, e, &solver).unwrap();
        assert_relative_eq!(ecc_anomaly - e * ecc_anomaly.sin(), m, epsilon = 1e-10);
    }
}

#[test]
fn true_anomaly_at_apsides() {
    let solver = RootSolver::default();

    assert_relative_eq!(true_anomaly_from_mean(0.0, 0.9, &solver).unwrap(), 0.0, epsilon = 1e-12);
    assert_relative_eq!(
        true_anomaly_from_mean(PI - 1e-9, 0.9, &solver).unwrap(),
        PI,
        epsilon = 1e-6
    );
}

#[test]
fn eccentric_orbit_runs_ahead_of_mean_anomaly_near_pericenter() {
    let solver = RootSolver::default();

    let f = true_anomaly_from_mean(0.1, 0.7, &solver).unwrap();

    assert!(f > 0.1);
    assert!(f < FRAC_PI_2 * 2.0);
}

#[test]
fn hyperbolic_time_grows_away_from_pericenter() {
    let at_pericenter = hyperbolic_time_from_pericenter(-1.0, 2.0, 0.0, 1.0);
    let early = hyperbolic_time_from_pericenter(-1.0, 2.0, 0.5, 1.0);
    let late = hyperbolic_time_from_pericenter(-1.0, 2.0, 1.5, 1.0);

    assert_relative_eq!(at_pericenter, 0.0);
    assert!(early > 0.0);
    assert!(late > early);
    assert_relative_eq!(hyperbolic_time_from_pericenter(-1.0, 2.0, -1.5, 1.0), late);
}

#[test]
fn eccentricity_vector_is_zero_for_circular_motion() {
    let r = Vector3::new(1.0, 0.0, 0.0);
    let v = Vector3::new(0.0, 1.0, 0.0);

    assert_relative_eq!(eccentricity_from_state(&r, &v, 1.0), 0.0, epsilon = 1e-15);
}

use std::f64::consts::FRAC_PI_4;

use approx::assert_relative_eq;

use crate::encounter::{EncounterParams, PerturberOrbit};
use crate::kick::{heggie_rasio_delta_e, AnalyticKick, KickModel};
use crate::orbit::OrbitState;

const INNER_MASS: f64 = 1.0 + 1e-9;

fn oblique_encounter(perturber_mass: f64) -> EncounterParams {
    EncounterParams::new(perturber_mass, 1.0, 1000.0, FRAC_PI_4, 1.0, 0.3)
}

#[test]
fn test_weak_encounter_has_negligible_effect() {
    let params = oblique_encounter(1.0);
    let perturber = PerturberOrbit::for_encounter(&params, INNER_MASS).unwrap();
    let orbit = OrbitState::new(0.9, 5.0);

    let delta_e = AnalyticKick::new(INNER_MASS)
        .delta_e(&params, &perturber, &orbit)
        .unwrap();

    assert!(delta_e != 0.0);
    assert!(delta_e.abs() < 0.01, "Δe = {delta_e}");
}

#[test]
fn test_kick_is_reproducible() {
    let params = oblique_encounter(0.4);
    let perturber = PerturberOrbit::for_encounter(&params, INNER_MASS).unwrap();
    let orbit = OrbitState::new(0.7, 5.0);
    let kick = AnalyticKick::new(INNER_MASS);

    let first = kick.delta_e(&params, &perturber, &orbit).unwrap();
    let second = kick.delta_e(&params, &perturber, &orbit).unwrap();
    assert_eq!(first.to_bits(), second.to_bits());
}

#[test]
fn test_circular_and_coplanar_orbits_are_unperturbed() {
    let params = oblique_encounter(1.0);
    let perturber = PerturberOrbit::for_encounter(&params, INNER_MASS).unwrap();
    assert_eq!(heggie_rasio_delta_e(&params, &perturber, 0.0, 5.0, INNER_MASS), 0.0);

    // Every orientation term vanishes with Ω = i = ω = 0
    let coplanar = EncounterParams::new(1.0, 1.0, 1000.0, 0.0, 0.0, 0.0);
    assert_eq!(heggie_rasio_delta_e(&coplanar, &perturber, 0.9, 5.0, INNER_MASS), 0.0);
}

#[test]
fn test_scales_with_inner_semi_major_axis() {
    let params = oblique_encounter(1.0);
    let perturber = PerturberOrbit::for_encounter(&params, INNER_MASS).unwrap();

    let near = heggie_rasio_delta_e(&params, &perturber, 0.9, 5.0, INNER_MASS);
    let wide = heggie_rasio_delta_e(&params, &perturber, 0.9, 10.0, INNER_MASS);
    assert_relative_eq!(wide / near, 2.0_f64.powf(1.5), max_relative = 1e-12);
}

#[test]
fn test_uses_sampled_perturber_mass() {
    let light = oblique_encounter(1.0);
    let heavy = oblique_encounter(2.0);
    let perturber = PerturberOrbit::for_encounter(&light, INNER_MASS).unwrap();

    let ratio = heggie_rasio_delta_e(&heavy, &perturber, 0.9, 5.0, INNER_MASS)
        / heggie_rasio_delta_e(&light, &perturber, 0.9, 5.0, INNER_MASS);
    let expected = 2.0 * ((INNER_MASS + 1.0) / (INNER_MASS + 2.0)).sqrt();
    assert_relative_eq!(ratio, expected, max_relative = 1e-12);
}

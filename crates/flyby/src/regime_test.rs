use crate::encounter::PerturberOrbit;
use crate::regime::{slow_parameter, tidal_parameter, Regime, RegimeClassifier};

fn perturber(pericenter: f64, eccentricity: f64) -> PerturberOrbit {
    PerturberOrbit {
        semi_major_axis: -1.0,
        eccentricity,
        pericenter,
    }
}

#[test]
fn test_parameters_increase_with_pericenter() {
    let pericenters = [0.5, 1.0, 5.0, 25.0, 100.0, 1000.0];
    for pair in pericenters.windows(2) {
        assert!(tidal_parameter(pair[1], 5.0) > tidal_parameter(pair[0], 5.0));
        assert!(slow_parameter(pair[1], 3.0, 5.0) > slow_parameter(pair[0], 3.0, 5.0));
    }
}

#[test]
fn test_slow_parameter_value() {
    // (4)^{3/2} / √(1 + 3) = 8 / 2
    assert!((slow_parameter(20.0, 3.0, 5.0) - 4.0).abs() < 1e-12);
}

#[test]
fn test_tidal_threshold_straddle() {
    let classifier = RegimeClassifier::default();

    // Mildly hyperbolic: the slow parameter is comfortably above 5
    assert_eq!(classifier.classify(&perturber(5.01, 1.5), 1.0), Regime::Analytic);
    assert_eq!(classifier.classify(&perturber(4.99, 1.5), 1.0), Regime::Simulated);
    // The boundary itself is not "above" the threshold
    assert_eq!(classifier.classify(&perturber(5.0, 1.5), 1.0), Regime::Simulated);
}

#[test]
fn test_slow_threshold_straddle() {
    let classifier = RegimeClassifier::default();

    // Tidal ≈ 13.6 in both cases; only the slow parameter crosses 5
    assert_eq!(classifier.classify(&perturber(13.8, 100.0), 1.0), Regime::Analytic);
    assert_eq!(classifier.classify(&perturber(13.5, 100.0), 1.0), Regime::Simulated);
}

#[test]
fn test_threshold_is_configurable() {
    let strict = RegimeClassifier::new(200.0);
    let orbit = perturber(100.0, 1.5);
    assert_eq!(RegimeClassifier::default().classify(&orbit, 1.0), Regime::Analytic);
    assert_eq!(strict.classify(&orbit, 1.0), Regime::Simulated);
}

#[test]
fn test_weak_encounter_is_analytic() {
    let orbit = PerturberOrbit::new(1.0, 1000.0, 1.0).unwrap();
    assert_eq!(RegimeClassifier::default().classify(&orbit, 5.0), Regime::Analytic);

    let close = PerturberOrbit::new(1.0, 10.0, 1.0).unwrap();
    assert_eq!(RegimeClassifier::default().classify(&close, 5.0), Regime::Simulated);
}

use flyby::{generate_encounters, DiffusionDriver, EncounterTable, PhysicalConfig};
use rand::SeedableRng;
use rand_chacha::ChaChaRng;
use units::Time;

fn small_config() -> PhysicalConfig {
    PhysicalConfig {
        realizations: 4,
        init_phases: 4,
        ..Default::default()
    }
}

#[test]
fn sample_then_diffuse() {
    let config = small_config();
    let elapsed = Time::from_myr(0.005);
    let per_realization = config.encounters_for(elapsed);
    assert_eq!(per_realization, 6);

    let mut rng = ChaChaRng::seed_from_u64(31);
    let table = generate_encounters(&config, elapsed, config.realizations, &mut rng).unwrap();
    let driver = DiffusionDriver::new(config.clone()).unwrap();
    let trajectories = driver.run(&table, elapsed).unwrap();

    assert_eq!(trajectories.realizations(), 4);
    assert_eq!(trajectories.encounters(), per_realization);
    assert_eq!(trajectories.snapshot(0).unwrap(), vec![0.9; 4]);

    for history in trajectories.histories() {
        assert!(history.eccentricity.iter().all(|e| e.is_finite() && *e >= 0.0));
        if let Some(j) = history.unbound_at {
            let frozen = history.eccentricity[j + 1];
            assert!(history.eccentricity[j + 1..].iter().all(|&e| e == frozen));
        } else {
            assert!(history.eccentricity.iter().all(|&e| e < 1.0));
        }
    }
}

#[test]
fn replayed_table_gives_identical_trajectories() {
    let config = small_config();
    let elapsed = Time::from_myr(0.005);

    let mut rng = ChaChaRng::seed_from_u64(8);
    let table = generate_encounters(&config, elapsed, config.realizations, &mut rng).unwrap();

    let path = std::env::temp_dir().join(format!("flyby-replay-{}.csv", std::process::id()));
    table.save(&path).unwrap();
    let replayed = EncounterTable::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let driver = DiffusionDriver::new(config).unwrap();
    let original = driver.run(&table, elapsed).unwrap();
    let again = driver.run(&replayed, elapsed).unwrap();

    assert_eq!(original, again);
}

#[test]
fn short_table_cannot_drive_longer_run() {
    // A table sized for a short run cannot drive a longer one
    let config = small_config();
    let mut rng = ChaChaRng::seed_from_u64(3);
    let table =
        generate_encounters(&config, Time::from_myr(0.002), config.realizations, &mut rng).unwrap();

    let driver = DiffusionDriver::new(config).unwrap();
    let result = driver.run(&table, Time::from_myr(0.005));
    assert!(matches!(
        result,
        Err(flyby::FlybyError::InsufficientEncounters { .. })
    ));
}

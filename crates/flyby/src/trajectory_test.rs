use approx::assert_relative_eq;

use crate::trajectory::{RealizationHistory, Trajectories};

fn sample_trajectories() -> Trajectories {
    Trajectories::from_histories(
        2,
        vec![
            RealizationHistory {
                eccentricity: vec![0.9, 0.95, 0.97],
                semi_major_axis: vec![5.0, 5.0, 5.0],
                unbound_at: None,
            },
            RealizationHistory {
                eccentricity: vec![0.9, 1.25, 1.25],
                semi_major_axis: vec![5.0, 5.0, 5.0],
                unbound_at: Some(0),
            },
        ],
    )
}

#[test]
fn test_accessors() {
    let trajectories = sample_trajectories();
    assert_eq!(trajectories.encounters(), 2);
    assert_eq!(trajectories.realizations(), 2);
    assert_eq!(trajectories.eccentricity(0, 1), Some(0.95));
    assert_eq!(trajectories.eccentricity(0, 3), None);
    assert_eq!(trajectories.eccentricity(2, 0), None);
    assert_eq!(trajectories.history(1).unwrap().final_eccentricity(), Some(1.25));
}

#[test]
fn test_snapshot_columns() {
    let trajectories = sample_trajectories();
    assert_eq!(trajectories.snapshot(0), Some(vec![0.9, 0.9]));
    assert_eq!(trajectories.snapshot(2), Some(vec![0.97, 1.25]));
    assert_eq!(trajectories.snapshot(3), None);
}

#[test]
fn test_unbound_bookkeeping() {
    let trajectories = sample_trajectories();
    assert_eq!(trajectories.unbound_at(0), None);
    assert_eq!(trajectories.unbound_at(1), Some(0));
    assert_relative_eq!(trajectories.unbound_fraction(), 0.5);

    assert_eq!(Trajectories::from_histories(0, Vec::new()).unbound_fraction(), 0.0);
}

#[test]
fn test_csv_tables() {
    let trajectories = sample_trajectories();

    let mut buffer = Vec::new();
    trajectories.write_csv(&mut buffer).unwrap();
    let table = String::from_utf8(buffer).unwrap();
    assert_eq!(table, "realization,e_0,e_1,e_2\n0,0.9,0.95,0.97\n1,0.9,1.25,1.25\n");

    // Initial state plus one column per encounter; the last is the final state
    for line in table.lines() {
        assert_eq!(line.split(',').count() - 1, trajectories.encounters() + 1);
    }
    assert!(table.lines().nth(2).unwrap().ends_with(",1.25"));

    let mut buffer = Vec::new();
    trajectories.write_semi_major_axis_csv(&mut buffer).unwrap();
    assert_eq!(
        String::from_utf8(buffer).unwrap(),
        "realization,a_0,a_1,a_2\n0,5,5,5\n1,5,5,5\n"
    );
}

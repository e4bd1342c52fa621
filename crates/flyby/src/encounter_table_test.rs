use rand::SeedableRng;
use rand_chacha::ChaChaRng;
use units::Time;

use crate::config::PhysicalConfig;
use crate::encounter::EncounterParams;
use crate::encounter_table::{EncounterTable, HEADER};
use crate::error::FlybyError;
use crate::sampling::generate_encounters;

fn small_table() -> EncounterTable {
    EncounterTable::new(vec![
        EncounterParams::new(0.5, 0.25, 100.0, 1.0, 0.5, 2.0),
        EncounterParams::new(1.5, 0.125, 250.0, 3.0, 1.5, 4.0),
    ])
}

#[test]
fn test_csv_layout() {
    let mut buffer = Vec::new();
    small_table().write_csv(&mut buffer).unwrap();

    let text = String::from_utf8(buffer).unwrap();
    assert_eq!(
        text,
        "m3,v_infty,b,Omega,inc,omega\n0.5,0.25,100,1,0.5,2\n1.5,0.125,250,3,1.5,4\n"
    );
}

#[test]
fn test_sampled_table_replays_exactly() {
    let config = PhysicalConfig::default();
    let mut rng = ChaChaRng::seed_from_u64(2024);
    let table = generate_encounters(&config, Time::from_myr(0.01), 4, &mut rng).unwrap();

    let mut buffer = Vec::new();
    table.write_csv(&mut buffer).unwrap();
    let replayed = EncounterTable::read_csv(buffer.as_slice()).unwrap();

    assert_eq!(replayed.len(), table.len());
    for (a, b) in table.rows().iter().zip(replayed.rows()) {
        assert_eq!(a.perturber_mass.to_bits(), b.perturber_mass.to_bits());
        assert_eq!(a.asymptotic_speed.to_bits(), b.asymptotic_speed.to_bits());
        assert_eq!(a.impact_parameter.to_bits(), b.impact_parameter.to_bits());
        assert_eq!(a.node.to_bits(), b.node.to_bits());
        assert_eq!(a.inclination.to_bits(), b.inclination.to_bits());
        assert_eq!(a.argument.to_bits(), b.argument.to_bits());
    }
}

#[test]
fn test_blank_lines_are_skipped() {
    let text = format!("{HEADER}\n1,2,3,4,5,6\n\n1,2,3,4,5,6\n");
    let table = EncounterTable::read_csv(text.as_bytes()).unwrap();
    assert_eq!(table.len(), 2);
}

#[test]
fn test_bad_header_is_rejected() {
    let result = EncounterTable::read_csv("a,b,c\n1,2,3,4,5,6\n".as_bytes());
    assert!(matches!(result, Err(FlybyError::Table { line: 1, .. })));

    let result = EncounterTable::read_csv("".as_bytes());
    assert!(matches!(result, Err(FlybyError::Table { line: 1, .. })));
}

#[test]
fn test_malformed_rows_report_line() {
    let text = format!("{HEADER}\n1,2,3,4,5,6\n1,2,x,4,5,6\n");
    let result = EncounterTable::read_csv(text.as_bytes());
    assert!(matches!(result, Err(FlybyError::Table { line: 3, .. })));

    let text = format!("{HEADER}\n1,2,3,4,5\n");
    let result = EncounterTable::read_csv(text.as_bytes());
    assert!(matches!(result, Err(FlybyError::Table { line: 2, .. })));
}

#[test]
fn test_blocks_are_contiguous() {
    let rows = (0..6)
        .map(|i| EncounterParams::new(i as f64, 1.0, 1.0, 0.0, 0.0, 0.0))
        .collect();
    let table = EncounterTable::new(rows);

    let block = table.block(1, 3).unwrap();
    assert_eq!(block[0].perturber_mass, 3.0);
    assert_eq!(block[2].perturber_mass, 5.0);
    assert!(table.block(2, 3).is_none());
    assert_eq!(table.block(7, 0).unwrap().len(), 0);
}

#[test]
fn test_save_and_load() {
    let path = std::env::temp_dir().join(format!("flyby-table-{}.csv", std::process::id()));
    let table = small_table();

    table.save(&path).unwrap();
    let loaded = EncounterTable::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded, table);
}

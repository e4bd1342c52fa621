//! Replayable table of sampled encounters.
//!
//! Stored as CSV with a fixed header. Values are written with Rust's
//! shortest round-trip float formatting, so a table read back from disk is
//! bit-identical to the one that was sampled.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::encounter::EncounterParams;
use crate::error::{FlybyError, Result};

pub const HEADER: &str = "m3,v_infty,b,Omega,inc,omega";
const COLUMNS: usize = 6;

/// Flat, realization-major list of encounters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncounterTable {
    rows: Vec<EncounterParams>,
}

impl EncounterTable {
    pub fn new(rows: Vec<EncounterParams>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[EncounterParams] {
        &self.rows
    }

    /// Encounters of realization `realization` when each one sees
    /// `per_realization` of them
    pub fn block(&self, realization: usize, per_realization: usize) -> Option<&[EncounterParams]> {
        let start = realization.checked_mul(per_realization)?;
        self.rows.get(start..start.checked_add(per_realization)?)
    }

    pub fn write_csv<W: Write>(&self, mut writer: W) -> Result<()> {
        writeln!(writer, "{HEADER}")?;
        for row in &self.rows {
            writeln!(
                writer,
                "{},{},{},{},{},{}",
                row.perturber_mass,
                row.asymptotic_speed,
                row.impact_parameter,
                row.node,
                row.inclination,
                row.argument
            )?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Parse a table written by [`EncounterTable::write_csv`]
    ///
    /// Blank lines are skipped. Errors carry the 1-based line number.
    pub fn read_csv<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = reader.lines();

        match lines.next().transpose()? {
            Some(header) if header.trim() == HEADER => {}
            Some(header) => {
                return Err(FlybyError::Table {
                    line: 1,
                    message: format!("expected header `{HEADER}`, found `{}`", header.trim()),
                })
            }
            None => {
                return Err(FlybyError::Table {
                    line: 1,
                    message: "missing header".to_string(),
                })
            }
        }

        let mut rows = Vec::new();
        for (index, line) in lines.enumerate() {
            let line = line?;
            let number = index + 2;
            if line.trim().is_empty() {
                continue;
            }
            rows.push(parse_row(&line, number)?);
        }

        Ok(Self { rows })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.write_csv(BufWriter::new(File::create(path)?))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::read_csv(BufReader::new(File::open(path)?))
    }
}

fn parse_row(line: &str, number: usize) -> Result<EncounterParams> {
    let values = line
        .split(',')
        .map(|field| {
            field.trim().parse::<f64>().map_err(|e| FlybyError::Table {
                line: number,
                message: format!("`{}`: {e}", field.trim()),
            })
        })
        .collect::<Result<Vec<f64>>>()?;

    match values[..] {
        [m3, v_infty, b, node, inc, arg] => Ok(EncounterParams::new(m3, v_infty, b, node, inc, arg)),
        _ => Err(FlybyError::Table {
            line: number,
            message: format!("expected {COLUMNS} columns, found {}", values.len()),
        }),
    }
}

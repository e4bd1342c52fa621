//! Eccentricity and semi-major-axis histories of a diffusion run.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// State of one realization before each encounter, plus the final state
///
/// Both vectors hold `encounters + 1` values. Once the binary is unbound
/// the remaining entries repeat the value it was frozen at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealizationHistory {
    pub eccentricity: Vec<f64>,
    pub semi_major_axis: Vec<f64>,
    /// Encounter that unbound the binary, if any
    pub unbound_at: Option<usize>,
}

impl RealizationHistory {
    pub fn final_eccentricity(&self) -> Option<f64> {
        self.eccentricity.last().copied()
    }
}

/// Histories of every realization in a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectories {
    encounters: usize,
    histories: Vec<RealizationHistory>,
}

impl Trajectories {
    pub fn from_histories(encounters: usize, histories: Vec<RealizationHistory>) -> Self {
        debug_assert!(histories
            .iter()
            .all(|h| h.eccentricity.len() == encounters + 1
                && h.semi_major_axis.len() == encounters + 1));
        Self {
            encounters,
            histories,
        }
    }

    /// Encounters each realization went through
    pub fn encounters(&self) -> usize {
        self.encounters
    }

    pub fn realizations(&self) -> usize {
        self.histories.len()
    }

    pub fn histories(&self) -> &[RealizationHistory] {
        &self.histories
    }

    pub fn history(&self, realization: usize) -> Option<&RealizationHistory> {
        self.histories.get(realization)
    }

    /// Eccentricity of `realization` just before encounter `index`
    /// (`index == encounters` gives the final value)
    pub fn eccentricity(&self, realization: usize, index: usize) -> Option<f64> {
        self.history(realization)?.eccentricity.get(index).copied()
    }

    /// Eccentricity of every realization at column `index`
    ///
    /// This is what the histograms at fixed times are built from; use
    /// [`PhysicalConfig::encounters_for`](crate::PhysicalConfig::encounters_for)
    /// to turn a time into a column.
    pub fn snapshot(&self, index: usize) -> Option<Vec<f64>> {
        if index > self.encounters {
            return None;
        }
        Some(self.histories.iter().map(|h| h.eccentricity[index]).collect())
    }

    pub fn unbound_at(&self, realization: usize) -> Option<usize> {
        self.history(realization)?.unbound_at
    }

    /// Fraction of realizations unbound by the end of the run
    pub fn unbound_fraction(&self) -> f64 {
        if self.histories.is_empty() {
            return 0.0;
        }
        let unbound = self.histories.iter().filter(|h| h.unbound_at.is_some()).count();
        unbound as f64 / self.histories.len() as f64
    }

    /// Eccentricity table: `realization,e_0,...,e_n`
    ///
    /// `e_0` is the initial state and `e_n` the state after the last
    /// encounter, so each row carries `encounters() + 1` values.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        self.write_table(writer, "e", |h| &h.eccentricity)
    }

    /// Semi-major-axis table: `realization,a_0,...,a_n`
    pub fn write_semi_major_axis_csv<W: Write>(&self, writer: W) -> Result<()> {
        self.write_table(writer, "a", |h| &h.semi_major_axis)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.write_csv(BufWriter::new(File::create(path)?))
    }

    pub fn save_semi_major_axis(&self, path: impl AsRef<Path>) -> Result<()> {
        self.write_semi_major_axis_csv(BufWriter::new(File::create(path)?))
    }

    fn write_table<W, F>(&self, mut writer: W, prefix: &str, column: F) -> Result<()>
    where
        W: Write,
        F: Fn(&RealizationHistory) -> &Vec<f64>,
    {
        write!(writer, "realization")?;
        for j in 0..=self.encounters {
            write!(writer, ",{prefix}_{j}")?;
        }
        writeln!(writer)?;

        for (k, history) in self.histories.iter().enumerate() {
            write!(writer, "{k}")?;
            for value in column(history) {
                write!(writer, ",{value}")?;
            }
            writeln!(writer)?;
        }
        writer.flush()?;
        Ok(())
    }
}

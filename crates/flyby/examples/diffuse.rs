//! Eccentricity diffusion of a wide binary in a dense star cluster
//!
//! Samples a table of stellar flybys, replays it over many realizations of
//! the binary and prints eccentricity histograms at 0, t/2 and 0.99 t.
//!
//! Run with: cargo run --release --package flyby --example diffuse -- --time-myr 0.1
//!
//! Set `RUST_LOG=info` for progress.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use flyby::{generate_encounters, DiffusionDriver, EncounterTable, PhysicalConfig, Trajectories};
use rand::SeedableRng;
use rand_chacha::ChaChaRng;
use units::Time;

const HISTOGRAM_BINS: usize = 10;

#[derive(Parser, Debug)]
#[command(about = "Monte Carlo eccentricity diffusion under stellar flybys")]
struct Args {
    /// Total elapsed time (Myr)
    #[arg(long, default_value_t = 0.1)]
    time_myr: f64,

    /// Override the number of realizations in the configuration
    #[arg(short = 'n', long)]
    realizations: Option<usize>,

    /// YAML configuration; defaults are used for missing fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the encounter table
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Where the encounter table is written (or read with --reuse)
    #[arg(long, default_value = "encounters.csv")]
    encounters: PathBuf,

    /// Reuse an existing encounter table instead of sampling a new one
    #[arg(long)]
    reuse: bool,

    /// Eccentricity trajectories are written here
    #[arg(short, long, default_value = "diffusion.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => PhysicalConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => PhysicalConfig::default(),
    };
    if let Some(n) = args.realizations {
        config.realizations = n;
    }

    let elapsed = Time::from_myr(args.time_myr);
    println!("Flyby diffusion over {:.3} Myr", elapsed.to_myr());
    println!("{}", "=".repeat(60));
    println!("  Encounter rate:  {:.1} per Myr", config.encounter_rate());
    println!("  Encounters:      {} per realization", config.encounters_for(elapsed));
    println!("  Realizations:    {}", config.realizations);
    println!(
        "  Inner orbit:     a = {:.2} au, e = {:.2}",
        config.initial_semi_major_axis.to_au(),
        config.initial_eccentricity
    );

    let table = if args.reuse {
        EncounterTable::load(&args.encounters)
            .with_context(|| format!("reading {}", args.encounters.display()))?
    } else {
        let mut rng = ChaChaRng::seed_from_u64(args.seed);
        let table = generate_encounters(&config, elapsed, config.realizations, &mut rng)?;
        table
            .save(&args.encounters)
            .with_context(|| format!("writing {}", args.encounters.display()))?;
        println!("\nSaved {} encounters to {}", table.len(), args.encounters.display());
        table
    };

    let driver = DiffusionDriver::new(config)?;
    let trajectories = driver.run(&table, elapsed)?;

    trajectories
        .save(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    let semi_major_axis_path = args.output.with_extension("a.csv");
    trajectories.save_semi_major_axis(&semi_major_axis_path)?;
    println!("Saved trajectories to {}", args.output.display());

    for fraction in [0.0, 0.5, 0.99] {
        let time = elapsed * fraction;
        let column = driver.config().encounters_for(time);
        print_snapshot(&trajectories, time, column);
    }

    println!(
        "\nUnbound after {:.3} Myr: {:.1}%",
        elapsed.to_myr(),
        100.0 * trajectories.unbound_fraction()
    );

    let bound: Vec<f64> = trajectories
        .histories()
        .iter()
        .filter(|history| history.unbound_at.is_none())
        .filter_map(|history| history.final_eccentricity())
        .collect();
    if !bound.is_empty() {
        println!(
            "Mean final eccentricity of bound binaries: {:.4}",
            bound.iter().sum::<f64>() / bound.len() as f64
        );
    }

    Ok(())
}

fn print_snapshot(trajectories: &Trajectories, time: Time, column: usize) {
    let Some(values) = trajectories.snapshot(column) else {
        return;
    };

    let mut counts = [0usize; HISTOGRAM_BINS];
    let mut unbound = 0;
    for e in &values {
        if *e >= 1.0 {
            unbound += 1;
        } else {
            counts[((e * HISTOGRAM_BINS as f64) as usize).min(HISTOGRAM_BINS - 1)] += 1;
        }
    }

    println!("\n{:.3} Myr (encounter {column}):", time.to_myr());
    let widest = counts.iter().copied().max().unwrap_or(0).max(1);
    for (bin, count) in counts.iter().enumerate() {
        let bar = "#".repeat(count * 40 / widest);
        println!(
            "  e ∈ [{:.1}, {:.1})  {count:>6}  {bar}",
            bin as f64 / HISTOGRAM_BINS as f64,
            (bin + 1) as f64 / HISTOGRAM_BINS as f64
        );
    }
    println!("  unbound          {unbound:>6}");
}

//! Equipot command-line interface.
//!
//! Relax a potential grid from a TOML job file or straight from two matrix
//! files:
//! ```sh
//! equipot run job.toml
//! equipot validate job.toml
//! equipot solve --mask mask.txt --potential potential.txt --boundary periodic
//! ```

mod config;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use equipot_core::solver::{SweepOrdering, DEFAULT_RELAXATION_FACTOR, DEFAULT_TOLERANCE};
use equipot_core::types::BoundarySpec;

use crate::config::{FieldConfig, InputConfig, JobConfig, OutputConfig, SolverConfig};

#[derive(Parser)]
#[command(name = "equipot")]
#[command(about = "Equipot: 2D electrostatic potential solver")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a solve from a TOML configuration file.
    Run {
        /// Path to the job configuration file.
        config: PathBuf,
        /// Output directory (overrides config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file and its grids without solving.
    Validate {
        /// Path to the job configuration file.
        config: PathBuf,
    },
    /// Solve two matrix files directly, without a configuration file.
    Solve {
        /// Mask matrix (non-zero = free, 0 = fixed).
        #[arg(long)]
        mask: PathBuf,
        /// Seed potential matrix.
        #[arg(long)]
        potential: PathBuf,
        /// Edge handling: "fixed" or "periodic".
        #[arg(long, default_value_t = BoundarySpec::Fixed)]
        boundary: BoundarySpec,
        /// SOR relaxation factor in (0, 2).
        #[arg(long, default_value_t = DEFAULT_RELAXATION_FACTOR)]
        relaxation: f64,
        /// Relative per-cell convergence tolerance.
        #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
        tolerance: f64,
        /// Sweep cap (default: 100000).
        #[arg(long)]
        max_iterations: Option<usize>,
        /// Sweep ordering: "lexicographic" or "red_black".
        #[arg(long, default_value_t = SweepOrdering::Lexicographic)]
        ordering: SweepOrdering,
        /// Return the last iterate instead of failing at the sweep cap.
        #[arg(long)]
        best_effort: bool,
        /// Output directory.
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, output } => {
            println!("Equipot Potential Solver");
            println!("========================");
            let job = config::load_config(&config)?;
            println!("Configuration: {}", config.display());

            let result = runner::run_job(&job)?;

            let out_dir = output.unwrap_or_else(|| PathBuf::from(&job.output.directory));
            runner::write_outputs(&result, &job.output, &out_dir)?;

            println!("Solve complete.");
            Ok(())
        }
        Commands::Validate { config } => {
            let job = config::load_config(&config)?;
            let state = equipot_io::load_grid_state(&job.input.mask, &job.input.potential)?;
            let (rows, cols) = state.dim();
            println!("Configuration is valid: {}", config.display());
            println!("  Grid: {}x{} ({} free cells)", rows, cols, state.free_cells());
            Ok(())
        }
        Commands::Solve {
            mask,
            potential,
            boundary,
            relaxation,
            tolerance,
            max_iterations,
            ordering,
            best_effort,
            output,
        } => {
            let mut solver = SolverConfig {
                boundary,
                relaxation_factor: relaxation,
                tolerance,
                ordering,
                best_effort,
                ..Default::default()
            };
            if let Some(n) = max_iterations {
                solver.max_iterations = n;
            }
            let job = JobConfig {
                input: InputConfig { mask, potential },
                solver,
                field: FieldConfig::default(),
                output: OutputConfig {
                    directory: output.display().to_string(),
                    ..Default::default()
                },
            };

            let result = runner::run_job(&job)?;
            runner::write_outputs(&result, &job.output, &output)?;
            Ok(())
        }
    }
}

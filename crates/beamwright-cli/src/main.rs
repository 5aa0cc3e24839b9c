//! Beamwright command-line interface.
//!
//! Run phased-array simulations from TOML configuration files:
//! ```sh
//! beamwright-cli run job.toml
//! beamwright-cli validate job.toml
//! beamwright-cli scenarios
//! ```

mod config;
mod runner;
mod scenarios;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "beamwright-cli")]
#[command(about = "Beamwright: phased-array near-field and beam-pattern simulator")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation from a TOML configuration file.
    Run {
        /// Path to the job configuration file.
        config: PathBuf,
        /// Output directory (overrides config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Snapshot time in seconds (overrides config file setting).
        #[arg(short, long)]
        time: Option<f64>,
    },
    /// Validate a configuration file without running the simulation.
    Validate {
        /// Path to the job configuration file.
        config: PathBuf,
    },
    /// List the built-in scenario presets.
    Scenarios,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, output, time } => {
            println!("Beamwright Phased-Array Simulator");
            println!("=================================");
            let job = config::load_config(&config)?;
            println!("Configuration: {}", config.display());

            let mut resolved = job.resolve()?;
            if let Some(t) = time {
                resolved.set_time(t)?;
            }
            let result = runner::run_simulation(&resolved)?;

            let out_dir = output.unwrap_or_else(|| PathBuf::from(&job.output.directory));

            if job.output.save_field {
                runner::write_field_csv(
                    &result.field,
                    &result.grid,
                    &out_dir.join("field.csv"),
                    &resolved.array,
                    resolved.mode,
                )?;
            }
            if job.output.save_beam {
                runner::write_beam_csv(
                    &result.profile,
                    &out_dir.join("beam_profile.csv"),
                    &resolved.array,
                    resolved.mode,
                )?;
            }
            if job.output.save_elements {
                runner::write_elements_csv(&result.layout, &out_dir.join("elements.csv"))?;
            }
            if job.output.save_json {
                runner::write_json(&result, &resolved, &out_dir.join("summary.json"))?;
            }

            println!("Simulation complete.");
            Ok(())
        }
        Commands::Validate { config } => {
            let job = config::load_config(&config)?.resolve()?;
            let grid = runner::validate_job(&job)?;
            println!(
                "Configuration is valid: {} ({}x{} grid)",
                config.display(),
                grid.nx(),
                grid.ny()
            );
            Ok(())
        }
        Commands::Scenarios => {
            println!("Available scenarios:");
            println!();
            for s in scenarios::SCENARIOS {
                println!(
                    "  {:<15} {} (λ={:.3e} m, θ={}°, {})",
                    s.name,
                    s.description,
                    s.wavelength(),
                    s.steering_deg,
                    s.geometry.name()
                );
            }
            Ok(())
        }
    }
}

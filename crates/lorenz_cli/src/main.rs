use anyhow::{bail, Context, Result};
use log::{info, warn};
use lorenz_cli::{run, write_csv};
use lorenz_core::config::SimulationConfig;
use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

const USAGE: &str = "usage: lorenz <config.toml> [output.csv]";

fn main() -> Result<()> {
    let mut args = std::env::args_os().skip(1);
    let Some(config_path) = args.next().map(PathBuf::from) else {
        bail!("{USAGE}");
    };
    let output_path = args.next().map(PathBuf::from);
    if args.next().is_some() {
        bail!("{USAGE}");
    }

    let config = SimulationConfig::load(&config_path)?;

    // Logs go to stderr so CSV on stdout stays clean.
    if CombinedLogger::init(vec![TermLogger::new(
        config.log_level_filter()?,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )])
    .is_err()
    {
        eprintln!("logger already initialized");
    }
    info!("loaded {}", config_path.display());

    let trajectory = run(&config)?;
    match &output_path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}.", path.display()))?;
            write_csv(&trajectory, BufWriter::new(file))?;
            info!("wrote {} rows to {}", trajectory.samples.len(), path.display());
        }
        None => write_csv(&trajectory, io::stdout().lock())?,
    }

    if let Some(failure) = trajectory.failure {
        warn!(
            "{} completed {} of {} steps",
            trajectory.source, trajectory.steps_completed, config.steps
        );
        bail!("Run stopped early: {failure}");
    }
    Ok(())
}

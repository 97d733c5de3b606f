//! # ECU Torque Control
//!
//! Loads the ECU configuration, builds the selected peripheral driver and
//! the RTE, initializes the torque control component, and runs the control
//! cycle until Ctrl-C or the configured cycle count.

use clap::Parser;
use ecu_control_unit::config::{ConfigOverrides, build_rte, load_config};
use ecu_control_unit::cycle::{CycleRunner, RunSummary};
use ecu_control_unit::torque_control::TorqueControl;
use ecu_hal::driver_registry::DriverRegistry;
use ecu_hal::drivers::simulation;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::Ordering;
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

/// ECU Torque Control: cycle-driven torque command computation
#[derive(Parser, Debug)]
#[command(name = "ecu_torque_control")]
#[command(author = "ECU Team")]
#[command(version)]
#[command(about = "Computes bounded motor torque commands from throttle, speed and load")]
struct Args {
    /// Path to the ECU configuration TOML (default: /etc/ecu/ecu.toml if present).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Peripheral driver name (overrides `peripheral.driver`).
    #[arg(long, value_name = "NAME", conflicts_with = "simulate")]
    driver: Option<String>,

    /// Shorthand for `--driver simulation`.
    #[arg(long)]
    simulate: bool,

    /// Seed for the simulation driver's random source.
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many cycles (0 = run until Ctrl-C).
    #[arg(long, value_name = "N")]
    cycles: Option<u64>,

    /// Cycle period in milliseconds.
    #[arg(long, value_name = "MS")]
    cycle_time_ms: Option<u64>,

    /// Write a JSON run summary to this path on exit.
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        let driver = if self.simulate {
            Some(simulation::DRIVER_NAME.to_string())
        } else {
            self.driver.clone()
        };
        ConfigOverrides {
            driver,
            seed: self.seed,
            max_cycles: self.cycles,
            cycle_time_ms: self.cycle_time_ms,
        }
    }
}

fn main() {
    let args = Args::parse();
    setup_tracing(&args);

    info!("ECU Torque Control v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args) {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("ECU Torque Control shutdown complete");
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(args.config.as_deref(), &args.overrides())?;
    info!(
        "Config OK: service={}, driver={}, cycle_time={}us, max_cycles={}",
        config.shared.service_name,
        config.peripheral.driver,
        config.cycle.cycle_time_us,
        config.cycle.max_cycles
    );

    let registry = DriverRegistry::with_builtin_drivers()?;
    let rte = build_rte(&registry, &config)?;

    let mut control = TorqueControl::new(rte, config.control);
    control.init()?;

    let mut runner = CycleRunner::new(control, &config.cycle);

    // Setup signal handler for graceful shutdown.
    let running = runner.running_flag();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        running.store(false, Ordering::SeqCst);
    })?;

    let summary = runner.run()?;

    let (mut rte, _) = runner.into_control().into_parts();
    if let Some(diag) = rte.peripheral().diagnostics() {
        info!(
            "Peripheral counters: adc_reads={}, pwm_writes={}, errors={}",
            diag.adc_reads, diag.pwm_writes, diag.errors
        );
    }
    if let Err(e) = rte.shutdown() {
        warn!("Peripheral shutdown failed: {e}");
    }

    if let Some(path) = &args.report {
        write_report(path, &summary)?;
        info!("Run summary written to {}", path.display());
    }

    Ok(())
}

/// Write the run summary as pretty-printed JSON.
fn write_report(path: &Path, summary: &RunSummary) -> Result<(), Box<dyn std::error::Error>> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, summary)?;
    Ok(())
}

/// Setup tracing subscriber based on CLI arguments.
fn setup_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}

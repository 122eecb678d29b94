//! # Robot Control Unit
//!
//! Runs the robot's control core against the simulation HAL through a
//! scripted match (disabled → autonomous → teleop → disabled).
//!
//! The simulation wires two plant links so the scripted autonomous routine
//! plays out end to end: the catapult motor turns its encoder, and the
//! front-left drive motor closes the range to the wall.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use robo_common::hal::clock::SharedClock;
use robo_common::config::LogLevel;
use robo_control_unit::config::{LoadedConfig, load_config, log_filter, precheck_gains};
use robo_control_unit::cycle::{CycleRunner, MatchSchedule, Pacing};
use robo_hal::{MonotonicClock, PlantLink, SimClock, SimulationDriver};
use tracing::level_filters::LevelFilter;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Catapult arm travel at full power [clicks/s].
const SIM_CATAPULT_CLICKS_PER_SECOND: f64 = 600.0;
/// Range closing speed at full forward power [raw units/s].
const SIM_RANGE_UNITS_PER_SECOND: f64 = 40.0;
/// Range reading at the starting line [raw units].
const SIM_START_RANGE: f64 = 420.0;

/// Robot Control Unit - periodic control loop (simulation HAL)
#[derive(Parser, Debug)]
#[command(name = "robo_control_unit")]
#[command(version)]
#[command(about = "Catapult robot control loop running a simulated match")]
struct Args {
    /// Path to the robot configuration TOML.
    #[arg(long, default_value = "config/robot.toml")]
    config: PathBuf,

    /// Heading gain file, overriding `[teleop] gains_path`.
    #[arg(long, value_name = "FILE")]
    gains: Option<PathBuf>,

    /// Number of cycles to run (0 = until Ctrl-C).
    #[arg(long, default_value_t = 0)]
    cycles: u64,

    /// Pace cycles against the wall clock instead of a simulated clock.
    #[arg(long)]
    realtime: bool,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    // Loaded before the subscriber so `[shared] log_level` sets the filter.
    let loaded = load_config(&args.config);
    let level = match &loaded {
        Ok(config) => config.log_filter(args.verbose),
        Err(_) => log_filter(LogLevel::default(), args.verbose),
    };
    setup_tracing(&args, level);

    info!("Robot Control Unit v{} starting...", env!("CARGO_PKG_VERSION"));

    let result = match loaded {
        Ok(config) => run(&args, config),
        Err(e) => Err(e.into()),
    };
    if let Err(e) = result {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("Robot Control Unit shutdown complete");
}

fn run(args: &Args, mut loaded: LoadedConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        path = %args.config.display(),
        service = %loaded.robot.shared.service_name,
        log_level = loaded.robot.shared.log_level.as_directive(),
        period_ms = loaded.robot.cycle.period_ms,
        "Configuration loaded"
    );
    if let Some(ref gains) = args.gains {
        loaded = loaded.with_gains_path(gains)?;
    }
    precheck_gains(&loaded);

    let hal = build_simulation(&loaded)?;

    let (clock, pacing) = if args.realtime {
        let clock: SharedClock = Arc::new(MonotonicClock::new());
        (clock, Pacing::Realtime)
    } else {
        let sim = Arc::new(SimClock::new());
        let clock: SharedClock = sim.clone();
        (clock, Pacing::Simulated(sim))
    };

    let schedule = MatchSchedule::standard();
    info!(
        match_secs = schedule.total_duration().as_secs_f64(),
        realtime = args.realtime,
        "Match schedule ready"
    );
    let mut runner = CycleRunner::new(&loaded, hal, Box::new(schedule), clock, pacing)?;

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    })?;

    let max_cycles = (args.cycles > 0).then_some(args.cycles);
    let stats = runner.run(max_cycles, &running);
    let min_ns = if stats.cycle_count > 0 { stats.min_cycle_ns } else { 0 };
    info!(
        cycles = stats.cycle_count,
        min_us = min_ns / 1000,
        avg_us = stats.avg_cycle_ns() / 1000,
        max_us = stats.max_cycle_ns / 1000,
        overruns = stats.overruns,
        "Final cycle statistics"
    );

    let snapshot = runner.robot().snapshot();
    info!(
        mode = snapshot.mode.name(),
        catapult = snapshot.catapult_phase.name(),
        unfolding = snapshot.unfolding.name(),
        approach = snapshot.approach.name(),
        fired = snapshot.fired,
        "Final robot state"
    );
    Ok(())
}

/// Simulation HAL with the plant links and starting sensor values of a
/// robot parked at the starting line.
fn build_simulation(loaded: &LoadedConfig) -> Result<SimulationDriver, Box<dyn std::error::Error>> {
    let ports = &loaded.robot.ports;
    let mut hal = SimulationDriver::new();
    hal.add_link(PlantLink::EncoderFromMotor {
        motor: ports.catapult_motor_one,
        encoder: ports.catapult_encoder,
        clicks_per_second: SIM_CATAPULT_CLICKS_PER_SECOND,
    })?;
    hal.add_link(PlantLink::AnalogFromMotor {
        motor: ports.drive_front_left,
        analog: ports.range_sensor,
        units_per_second: SIM_RANGE_UNITS_PER_SECOND,
    })?;

    let probe = hal.probe();
    probe.set_analog(ports.range_sensor, SIM_START_RANGE);
    Ok(hal)
}

/// Setup tracing subscriber: `level` is the default, `RUST_LOG` directives
/// still apply on top of it.
fn setup_tracing(args: &Args, level: LevelFilter) {
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

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use mission_control::config::EngineConfigBuilder;
use mission_control::driver::MissionEngine;
use mission_control::listener::{ControlCommand, ControlListener};
use mission_control::store::MissionSnapshot;
use mission_control::telemetry::{export_csv, MissionClock};
use mission_control::{CHECKLIST_LEN, DEFAULT_HISTORY_CAPACITY, TELEMETRY_FILE};
use termcolor::ColorChoice;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

#[derive(Parser, Debug)]
#[command(name = "mission")]
#[command(about = "Simulated CanSat mission feeding a ground station")]
#[command(version)]
struct Args {
    /// Milliseconds between ticks in real-time mode
    #[arg(long, default_value_t = 1000)]
    tick_ms: u64,

    /// Number of samples kept in the history
    #[arg(long, default_value_t = DEFAULT_HISTORY_CAPACITY)]
    capacity: usize,

    /// Seed for the telemetry noise
    #[arg(long)]
    seed: Option<u64>,

    /// Run this many ticks as fast as possible then exit, instead of running in real time
    #[arg(long)]
    ticks: Option<u32>,

    /// Stop the mission once the clock reaches this many seconds
    #[arg(long)]
    max_mission_time: Option<u32>,

    /// Where the telemetry history is exported
    #[arg(long, default_value = TELEMETRY_FILE)]
    export: PathBuf,

    #[arg(long, default_value_t = Level::DEBUG)]
    log_level: Level,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // initialise the file writer
    let log_file_name = format!("{}.log", env!("CARGO_PKG_NAME"));
    let file_appender = tracing_appender::rolling::never(".", log_file_name);
    let (file_writer, _file_guard) = tracing_appender::non_blocking(file_appender);

    // initialise the colored stderr logger
    let colored_stderr = termcolor::StandardStream::stderr(ColorChoice::Always);
    let (stderr_writer, _stderr_guard) = tracing_appender::non_blocking(colored_stderr);

    tracing_subscriber::fmt()
        .with_ansi(true)
        .with_max_level(args.log_level)
        .with_thread_names(true)
        .with_writer(file_writer.and(stderr_writer))
        .init();

    let mut builder = EngineConfigBuilder::default()
        .tick_period(Duration::from_millis(args.tick_ms))
        .history_capacity(args.capacity);
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }
    if let Some(max) = args.max_mission_time {
        builder = builder.max_mission_time(max);
    }
    let config = builder.build()?;
    tracing::debug!("{config:?}");

    let engine = MissionEngine::new(config)?;

    match args.ticks {
        Some(ticks) => run_fast(engine, ticks, &args.export),
        None => run_real_time(engine, &args.export),
    }
}

/// step the mission without waiting on the clock
fn run_fast(mut engine: MissionEngine, ticks: u32, export: &Path) -> Result<()> {
    engine.start_stepped();

    let mut ran = 0;
    while ran < ticks && engine.tick() {
        ran += 1;
    }
    tracing::info!("Ran {ran} ticks.");

    engine.stop();
    export_history(&engine.snapshot(), export)
}

/// tick on the timer, taking commands from stdin until it closes or `QUIT`
fn run_real_time(mut engine: MissionEngine, export: &Path) -> Result<()> {
    let snapshots = engine.subscribe();
    let display: JoinHandle<()> = thread::Builder::new()
        .name("display".to_string())
        .spawn(move || {
            for snapshot in snapshots {
                log_snapshot(&snapshot);
            }
        })?;

    let (tx, rx) = channel();
    let _listener: JoinHandle<Result<()>> = thread::Builder::new()
        .name("listener".to_string())
        .spawn(move || ControlListener::new(io::stdin().lock(), tx).run())?;

    tracing::info!("Waiting for commands: START, STOP, RESET, CHECK,<i>,<ON|OFF>, EXPORT, QUIT");

    for command in rx {
        match command {
            ControlCommand::Quit => break,
            ControlCommand::Export => export_history(&engine.snapshot(), export)?,
            command => {
                if let Some(action) = command.action() {
                    engine.dispatch(action)?;
                }
            }
        }
    }

    engine.shutdown();
    let result = export_history(&engine.snapshot(), export);

    // the display thread finishes once the engine's senders are gone
    drop(engine);
    if display.join().is_err() {
        tracing::error!("The display thread panicked.");
    }

    result
}

fn log_snapshot(snapshot: &MissionSnapshot) {
    let mission = snapshot.mission();
    let altitude = snapshot.current().map_or(0.0, |s| s.altitude);
    let status = snapshot.system_status();

    tracing::info!(
        "{} {} packets={} alt={altitude:.1}m signal={:.0}% range={:.0}m checklist={}/{}",
        MissionClock(mission.mission_time),
        mission.flight_phase,
        mission.packet_count,
        status.signal_strength,
        status.link_range,
        snapshot.checklist().completed(),
        CHECKLIST_LEN,
    );
}

fn export_history(snapshot: &MissionSnapshot, path: &Path) -> Result<()> {
    if snapshot.history().is_empty() {
        tracing::warn!("No telemetry collected, nothing to export.");
        return Ok(());
    }

    let file = File::create(path).with_context(|| format!("Failed to create {path:?}"))?;
    let rows = export_csv(BufWriter::new(file), snapshot.history())
        .with_context(|| format!("Failed to write telemetry to {path:?}"))?;
    tracing::info!("Exported {rows} samples to {path:?}");

    Ok(())
}

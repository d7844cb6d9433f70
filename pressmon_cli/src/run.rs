//! Config mapping, seam assembly, and the run/snapshot/self-check commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use eyre::WrapErr;

use pressmon_config::Config;
use pressmon_core::framebuffer::FrameBuffer;
use pressmon_core::monitor::MonitorBuilder;
use pressmon_core::protocol::Snapshot;
use pressmon_core::render::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use pressmon_core::storage::CsvStore;
use pressmon_core::{CHANNEL_COUNT, sampler};
use pressmon_hardware::{NullTransport, SerialTransport, SimulatedSensors};
use pressmon_traits::{MonotonicClock, Transport};

fn resolve_log_dir(cfg: &Config, log_dir: Option<&Path>) -> eyre::Result<PathBuf> {
    let dir = log_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&cfg.logging.dir));
    if !dir.is_dir() {
        std::fs::create_dir_all(&dir)
            .wrap_err_with(|| format!("create log directory {}", dir.display()))?;
    }
    Ok(dir)
}

pub fn run_monitor(
    cfg: &Config,
    sim: bool,
    cycles: Option<u64>,
    port: Option<&str>,
    log_dir: Option<&Path>,
    shutdown: Arc<AtomicBool>,
) -> eyre::Result<()> {
    if !sim {
        eyre::bail!("no hardware sensor backend is available on this platform; rerun with --sim");
    }
    let dir = resolve_log_dir(cfg, log_dir)?;
    let store = CsvStore::new(dir);
    let sensors = SimulatedSensors::new();

    let port_sel = port.map(str::to_string).or_else(|| cfg.serial.port.clone());
    match port_sel {
        Some(p) => {
            let transport = SerialTransport::open(&p, cfg.serial.baud)?;
            drive(cfg, sensors, transport, store, cycles, &shutdown)
        }
        None => drive(cfg, sensors, NullTransport, store, cycles, &shutdown),
    }
}

fn drive<T: Transport>(
    cfg: &Config,
    sensors: SimulatedSensors,
    transport: T,
    store: CsvStore,
    cycles: Option<u64>,
    shutdown: &AtomicBool,
) -> eyre::Result<()> {
    let mut monitor = MonitorBuilder::new()
        .sensors(sensors)
        .transport(transport)
        .display(FrameBuffer::new(DISPLAY_WIDTH, DISPLAY_HEIGHT))
        .clock(MonotonicClock::new())
        .store(store)
        .cycle_ms(cfg.sampling.cycle_ms)
        .log_interval_ms(cfg.logging.interval_ms)
        .thresholds(cfg.thresholds)
        .try_build()?;

    match cycles {
        Some(n) => {
            for _ in 0..n {
                monitor.cycle()?;
            }
            tracing::info!(cycles = n, "run finished");
        }
        None => monitor.run(shutdown)?,
    }
    println!("monitor finished");
    Ok(())
}

/// Sample every channel once, print the live-update line and the band
/// each channel lands in.
pub fn print_snapshot(cfg: &Config) -> eyre::Result<()> {
    let mut sensors = SimulatedSensors::new();
    let values = sampler::read_all(&mut sensors)?;
    let snapshot = Snapshot {
        timestamp: String::new(),
        values,
    };
    println!("{}", snapshot.data_line());
    for (i, v) in values.iter().enumerate() {
        let band = pressmon_core::Band::classify(*v, &cfg.thresholds);
        println!("S{:<2} {:>4} {}", i + 1, v, band.label());
    }
    Ok(())
}

pub fn self_check(cfg: &Config, log_dir: Option<&Path>) -> eyre::Result<()> {
    let dir = resolve_log_dir(cfg, log_dir)?;
    let store = CsvStore::new(&dir);
    if !store.available() {
        return Err(pressmon_core::MonitorError::StorageUnavailable(dir.display().to_string()).into());
    }

    let mut sensors = SimulatedSensors::new();
    let values = sampler::read_all(&mut sensors)?;
    tracing::debug!(channels = CHANNEL_COUNT, first = values[0], "sim sensors readable");

    println!("self-check ok");
    Ok(())
}

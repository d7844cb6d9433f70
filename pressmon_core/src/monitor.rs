//! The monitor control loop.
//!
//! A single cooperative loop owns all state: each cycle samples the
//! channels, repaints the grid, appends to the CSV log when the
//! interval has elapsed, services serial commands, then sleeps out the
//! rest of the cycle. Storage trouble is logged and skipped; the
//! monitor keeps running.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::DrawTarget;

use crate::error::{BuildError, Result};
use crate::protocol::{self, Command, Snapshot};
use crate::render::GridRenderer;
use crate::sampler;
use crate::storage::{CsvStore, LogFile};
use pressmon_config::Thresholds;
use pressmon_traits::{CHANNEL_COUNT, Clock, SensorArray, Transport};

fn wall_clock_hms() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

#[derive(Debug)]
pub struct Monitor<S, T, D, C> {
    sensors: S,
    transport: T,
    display: D,
    clock: C,
    renderer: GridRenderer,
    store: CsvStore,
    log: Option<LogFile>,
    cycle: Duration,
    log_interval_ms: u64,
    epoch: std::time::Instant,
    last_log_ms: Option<u64>,
    last_values: [u16; CHANNEL_COUNT],
}

impl<S, T, D, C> Monitor<S, T, D, C>
where
    S: SensorArray,
    T: Transport,
    D: DrawTarget<Color = Rgb565>,
    D::Error: core::fmt::Debug,
    C: Clock,
{
    pub fn builder() -> MonitorBuilder<S, T, D, C> {
        MonitorBuilder::new()
    }

    /// Run until the shutdown flag is raised.
    pub fn run(&mut self, shutdown: &AtomicBool) -> Result<()> {
        self.renderer
            .draw_layout(&mut self.display)
            .map_err(|e| eyre::eyre!("display error: {e:?}"))?;
        tracing::info!(
            cycle_ms = self.cycle.as_millis() as u64,
            log_interval_ms = self.log_interval_ms,
            "monitor start"
        );

        while !shutdown.load(Ordering::Relaxed) {
            self.cycle()?;
        }
        tracing::info!("monitor stop");
        Ok(())
    }

    /// One pass of the loop: sample, render, log, serve commands, sleep.
    pub fn cycle(&mut self) -> Result<()> {
        let sampled = match sampler::read_all(&mut self.sensors) {
            Ok(values) => {
                self.last_values = values;
                self.renderer
                    .update(&mut self.display, &values)
                    .map_err(|e| eyre::eyre!("display error: {e:?}"))?;
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "sample failed, no log row this cycle");
                false
            }
        };

        // A logged row must come from the cycle's own sample, so a
        // failed read defers the tick to the next good cycle.
        let now_ms = self.clock.ms_since(self.epoch);
        let due = match self.last_log_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.log_interval_ms,
        };
        if due && sampled {
            self.log_tick(now_ms);
            self.last_log_ms = Some(now_ms);
        }

        self.poll_commands();
        self.clock.sleep(self.cycle);
        Ok(())
    }

    /// Append one row to the active log and emit the live update line.
    /// The log file is created on the first tick the volume is present.
    fn log_tick(&mut self, now_ms: u64) {
        if self.log.is_none() {
            match self.store.create_log(now_ms) {
                Ok(log) => {
                    tracing::info!(file = log.file_name(), "log file created");
                    self.log = Some(log);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "cannot create log file, skipping");
                }
            }
        }

        let snapshot = Snapshot {
            timestamp: wall_clock_hms(),
            values: self.last_values,
        };

        // A failed append drops the row, never the file. The handle is
        // kept so the run stays in one log.
        if let Some(log) = &self.log {
            if let Err(e) = log.append_row(&snapshot.timestamp, &snapshot.values) {
                tracing::warn!(error = %e, file = log.file_name(), "log append failed, row dropped");
            }
        }

        if let Err(e) = protocol::write_live(&mut self.transport, &snapshot) {
            tracing::warn!(error = %e, "live update send failed");
        }
    }

    /// Drain pending serial input and dispatch recognized commands.
    /// Anything unparseable is dropped without a reply.
    fn poll_commands(&mut self) {
        loop {
            let line = match self.transport.poll_line() {
                Ok(Some(line)) => line,
                Ok(None) => return,
                Err(e) => {
                    tracing::warn!(error = %e, "serial poll failed");
                    return;
                }
            };
            match Command::parse(&line) {
                Some(cmd) => self.dispatch(cmd),
                None => {
                    tracing::trace!(line = %line.trim(), "ignoring unrecognized input");
                }
            }
        }
    }

    fn dispatch(&mut self, cmd: Command) {
        tracing::info!(?cmd, "command received");
        let outcome = match cmd {
            Command::Screenshot => {
                let snapshot = Snapshot {
                    timestamp: wall_clock_hms(),
                    values: self.last_values,
                };
                protocol::write_snapshot(&mut self.transport, &snapshot)
            }
            Command::ExportCsv => self.export_csv(),
            Command::Help => protocol::write_help(&mut self.transport),
        };
        if let Err(e) = outcome {
            tracing::warn!(?cmd, error = %e, "command reply failed");
        }
    }

    /// Send every stored log inside a single export frame.
    fn export_csv(&mut self) -> std::result::Result<(), crate::error::MonitorError> {
        let logs = match self.store.stored_logs() {
            Ok(logs) => logs,
            Err(e) => {
                tracing::warn!(error = %e, "cannot list stored logs");
                return protocol::write_no_files(&mut self.transport);
            }
        };
        let mut files = Vec::with_capacity(logs.len());
        for path in logs {
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("LOG.CSV")
                .to_string();
            match std::fs::read_to_string(&path) {
                Ok(contents) => files.push((name, contents)),
                Err(e) => {
                    tracing::warn!(file = %name, error = %e, "cannot read stored log, skipping");
                }
            }
        }
        if files.is_empty() {
            return protocol::write_no_files(&mut self.transport);
        }
        protocol::write_export(&mut self.transport, &files)
    }

    /// Latest sampled values, for diagnostics and tests.
    pub fn last_values(&self) -> &[u16; CHANNEL_COUNT] {
        &self.last_values
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn display(&self) -> &D {
        &self.display
    }
}

/// Builder for [`Monitor`]; every hardware seam must be supplied.
pub struct MonitorBuilder<S, T, D, C> {
    sensors: Option<S>,
    transport: Option<T>,
    display: Option<D>,
    clock: Option<C>,
    store: Option<CsvStore>,
    cycle_ms: u64,
    log_interval_ms: u64,
    thresholds: Thresholds,
}

impl<S, T, D, C> MonitorBuilder<S, T, D, C> {
    pub fn new() -> Self {
        Self {
            sensors: None,
            transport: None,
            display: None,
            clock: None,
            store: None,
            cycle_ms: 100,
            log_interval_ms: 5000,
            thresholds: Thresholds::default(),
        }
    }
}

impl<S, T, D, C> Default for MonitorBuilder<S, T, D, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, T, D, C> MonitorBuilder<S, T, D, C>
where
    S: SensorArray,
    T: Transport,
    D: DrawTarget<Color = Rgb565>,
    D::Error: core::fmt::Debug,
    C: Clock,
{
    pub fn sensors(mut self, sensors: S) -> Self {
        self.sensors = Some(sensors);
        self
    }

    pub fn transport(mut self, transport: T) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn display(mut self, display: D) -> Self {
        self.display = Some(display);
        self
    }

    pub fn clock(mut self, clock: C) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn store(mut self, store: CsvStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn cycle_ms(mut self, ms: u64) -> Self {
        self.cycle_ms = ms;
        self
    }

    pub fn log_interval_ms(mut self, ms: u64) -> Self {
        self.log_interval_ms = ms;
        self
    }

    pub fn thresholds(mut self, t: Thresholds) -> Self {
        self.thresholds = t;
        self
    }

    pub fn try_build(self) -> std::result::Result<Monitor<S, T, D, C>, BuildError> {
        let sensors = self.sensors.ok_or(BuildError::MissingSensors)?;
        let transport = self.transport.ok_or(BuildError::MissingTransport)?;
        let display = self.display.ok_or(BuildError::MissingDisplay)?;
        let clock = self.clock.ok_or(BuildError::MissingClock)?;
        let store = self.store.ok_or(BuildError::MissingStorage)?;
        if self.cycle_ms == 0 {
            return Err(BuildError::InvalidConfig("cycle_ms must be > 0"));
        }
        if self.log_interval_ms < self.cycle_ms {
            return Err(BuildError::InvalidConfig(
                "log_interval_ms must be >= cycle_ms",
            ));
        }

        let epoch = clock.now();
        Ok(Monitor {
            sensors,
            transport,
            display,
            clock,
            renderer: GridRenderer::new(self.thresholds),
            store,
            log: None,
            cycle: Duration::from_millis(self.cycle_ms),
            log_interval_ms: self.log_interval_ms,
            epoch,
            last_log_ms: None,
            last_values: [0u16; CHANNEL_COUNT],
        })
    }
}

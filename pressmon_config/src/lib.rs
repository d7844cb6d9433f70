#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the pressure monitor.
//!
//! `Config` and sub-structs are deserialized from TOML and validated
//! before the monitor loop is built.
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct Sampling {
    /// Main loop cycle period in milliseconds.
    pub cycle_ms: u64,
}

impl Default for Sampling {
    fn default() -> Self {
        Self { cycle_ms: 100 }
    }
}

/// Band cutoffs applied to raw 10-bit ADC readings.
///
/// Readings below `medium` are Low, below `high` Medium, below
/// `very_high` High, and anything at or above `very_high` is VeryHigh.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct Thresholds {
    pub medium: u16,
    pub high: u16,
    pub very_high: u16,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            medium: 200,
            high: 500,
            very_high: 800,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Logging {
    /// Directory on the removable volume where CSV logs are written.
    pub dir: String,
    /// How often a row is appended to the active log (ms).
    pub interval_ms: u64,
    /// Optional path to a diagnostics .log file (JSON lines).
    pub file: Option<String>,
    /// Diagnostics level: "info", "debug".
    pub level: Option<String>,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            dir: "logs".to_string(),
            interval_ms: 5000,
            file: None,
            level: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Serial {
    /// Serial device path, e.g. "/dev/ttyACM0". None means no link.
    pub port: Option<String>,
    pub baud: u32,
}

impl Default for Serial {
    fn default() -> Self {
        Self {
            port: None,
            baud: 115_200,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub sampling: Sampling,
    pub thresholds: Thresholds,
    pub logging: Logging,
    pub serial: Serial,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Sampling
        if self.sampling.cycle_ms == 0 {
            eyre::bail!("sampling.cycle_ms must be >= 1");
        }
        if self.sampling.cycle_ms > 60 * 1000 {
            eyre::bail!("sampling.cycle_ms is unreasonably large (>60s)");
        }

        // Thresholds must be strictly ascending so every reading maps
        // to exactly one band.
        if self.thresholds.medium == 0 {
            eyre::bail!("thresholds.medium must be > 0");
        }
        if self.thresholds.medium >= self.thresholds.high {
            eyre::bail!("thresholds.medium must be < thresholds.high");
        }
        if self.thresholds.high >= self.thresholds.very_high {
            eyre::bail!("thresholds.high must be < thresholds.very_high");
        }
        if self.thresholds.very_high > 1023 {
            eyre::bail!("thresholds.very_high must be <= 1023");
        }

        // Logging
        if self.logging.dir.is_empty() {
            eyre::bail!("logging.dir must not be empty");
        }
        if self.logging.interval_ms == 0 {
            eyre::bail!("logging.interval_ms must be >= 1");
        }
        if self.logging.interval_ms < self.sampling.cycle_ms {
            eyre::bail!("logging.interval_ms must be >= sampling.cycle_ms");
        }

        // Serial
        if self.serial.baud == 0 {
            eyre::bail!("serial.baud must be > 0");
        }

        Ok(())
    }
}

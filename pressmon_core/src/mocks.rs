//! Test and helper mocks for pressmon_core

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use pressmon_traits::{CHANNEL_COUNT, Clock, SensorArray, Transport};

/// Sensor bank that returns a fixed value per channel.
#[derive(Debug)]
pub struct FixedSensors {
    values: [u16; CHANNEL_COUNT],
}

impl FixedSensors {
    pub fn new(values: [u16; CHANNEL_COUNT]) -> Self {
        Self { values }
    }

    /// Ascending ramp: channel i reads i * 50.
    pub fn ramp() -> Self {
        Self {
            values: std::array::from_fn(|i| (i as u16) * 50),
        }
    }

    pub fn set(&mut self, channel: usize, value: u16) {
        self.values[channel] = value;
    }
}

impl SensorArray for FixedSensors {
    fn read_channel(
        &mut self,
        channel: usize,
    ) -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
        self.values
            .get(channel)
            .copied()
            .ok_or_else(|| -> Box<dyn std::error::Error + Send + Sync> {
                Box::new(std::io::Error::other("channel out of range"))
            })
    }
}

/// Sensor bank where one channel always fails.
pub struct FailingSensors {
    failing: usize,
}

impl FailingSensors {
    pub fn at(channel: usize) -> Self {
        Self { failing: channel }
    }
}

impl SensorArray for FailingSensors {
    fn read_channel(
        &mut self,
        channel: usize,
    ) -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
        if channel == self.failing {
            Err(Box::new(std::io::Error::other("adc fault")))
        } else {
            Ok(0)
        }
    }
}

/// Transport whose inbound lines are scripted and whose outbound lines
/// are captured for assertions.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    pub incoming: VecDeque<String>,
    pub sent: Vec<String>,
}

impl ScriptedTransport {
    pub fn with_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            incoming: lines.into_iter().map(Into::into).collect(),
            sent: Vec::new(),
        }
    }
}

impl Transport for ScriptedTransport {
    fn poll_line(&mut self) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.incoming.pop_front())
    }

    fn send_line(&mut self, line: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.sent.push(line.to_string());
        Ok(())
    }
}

/// Deterministic clock that only moves when advanced; sleep() advances
/// it instead of blocking.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset: Arc<Mutex<Duration>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, d: Duration) {
        if let Ok(mut off) = self.offset.lock() {
            *off = off.saturating_add(d);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let off = self.offset.lock().map(|g| *g).unwrap_or(Duration::ZERO);
        self.origin + off
    }

    fn sleep(&self, d: Duration) {
        self.advance(d);
    }
}

pub mod error;
pub mod serial;

pub use error::HwError;
pub use serial::SerialTransport;

use pressmon_traits::{CHANNEL_COUNT, SensorArray, Transport};

/// Simulated sensor bank for running without hardware.
///
/// Produces a deterministic sweep: every channel walks the full 10-bit
/// range at its own phase so all four bands show up on screen.
pub struct SimulatedSensors {
    tick: u64,
}

impl SimulatedSensors {
    pub fn new() -> Self {
        SimulatedSensors { tick: 0 }
    }
}

impl Default for SimulatedSensors {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorArray for SimulatedSensors {
    fn read_channel(
        &mut self,
        channel: usize,
    ) -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
        let phase = (channel as u64) * 131;
        let value = (self.tick * 7 + phase) % 1024;
        if channel == CHANNEL_COUNT - 1 {
            self.tick = self.tick.wrapping_add(1);
        }
        Ok(value as u16)
    }
}

/// Transport used when no serial port is configured: never receives,
/// discards everything sent.
pub struct NullTransport;

impl Transport for NullTransport {
    fn poll_line(&mut self) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(None)
    }

    fn send_line(&mut self, _line: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }
}

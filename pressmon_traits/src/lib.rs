pub mod clock;

pub use clock::{Clock, MonotonicClock};

/// Number of pressure channels the monitor samples each cycle.
pub const CHANNEL_COUNT: usize = 15;

/// Bank of analog pressure sensors addressed by channel index.
pub trait SensorArray {
    /// Read the raw ADC value for `channel` (0..CHANNEL_COUNT).
    ///
    /// Values are expected in the 10-bit range 0..=1023.
    fn read_channel(
        &mut self,
        channel: usize,
    ) -> Result<u16, Box<dyn std::error::Error + Send + Sync>>;
}

/// Line-oriented serial link to the companion host.
pub trait Transport {
    /// Return the next complete inbound line, if one is available.
    ///
    /// Non-blocking: returns `Ok(None)` when no full line has arrived yet.
    fn poll_line(&mut self) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>>;

    /// Send one line, appending the newline terminator.
    fn send_line(&mut self, line: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

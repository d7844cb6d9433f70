//! Channel sampling over the `SensorArray` seam.

use crate::error::MonitorError;
use pressmon_traits::{CHANNEL_COUNT, SensorArray};

/// Maximum value a 10-bit ADC reading can take.
pub const ADC_MAX: u16 = 1023;

/// Read every channel in index order, clamping to the 10-bit range.
///
/// Stops at the first failing channel; the caller decides whether the
/// cycle is skipped or the run aborts.
pub fn read_all<S: SensorArray>(sensors: &mut S) -> Result<[u16; CHANNEL_COUNT], MonitorError> {
    let mut values = [0u16; CHANNEL_COUNT];
    for (channel, slot) in values.iter_mut().enumerate() {
        let raw = sensors
            .read_channel(channel)
            .map_err(|e| MonitorError::Sensor {
                channel,
                msg: e.to_string(),
            })?;
        *slot = raw.min(ADC_MAX);
    }
    Ok(values)
}

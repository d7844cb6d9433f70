//! Human-readable error descriptions and structured JSON error formatting.

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    use pressmon_core::error::{BuildError, MonitorError};

    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingSensors => {
                "What happened: No sensor array was provided to the monitor.\nLikely causes: Hardware init failed or the builder was not wired up.\nHow to fix: Pass a sensor backend via sensors(...), or run with --sim.".to_string()
            }
            BuildError::MissingTransport => {
                "What happened: No serial transport was provided to the monitor.\nLikely causes: The port failed to open or the builder was not wired up.\nHow to fix: Set serial.port in the config or pass --port.".to_string()
            }
            BuildError::MissingDisplay => {
                "What happened: No display target was provided to the monitor.\nLikely causes: The builder was not wired up.\nHow to fix: Pass a render target via display(...).".to_string()
            }
            BuildError::MissingClock => {
                "What happened: No clock was provided to the monitor.\nLikely causes: The builder was not wired up.\nHow to fix: Pass a clock via clock(...).".to_string()
            }
            BuildError::MissingStorage => {
                "What happened: No storage directory was provided to the monitor.\nLikely causes: The builder was not wired up.\nHow to fix: Set logging.dir in the config or pass --log-dir.".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun. See README for a sample."
            ),
        };
    }

    if let Some(me) = err.downcast_ref::<MonitorError>() {
        return match me {
            MonitorError::StorageUnavailable(path) => format!(
                "What happened: The log volume is unavailable ({path}).\nLikely causes: SD card not inserted or mount point missing.\nHow to fix: Insert the card or create the directory, then retry."
            ),
            MonitorError::StorageOpenFailure(msg) => format!(
                "What happened: A log file could not be opened ({msg}).\nLikely causes: Full or write-protected volume, or permissions.\nHow to fix: Check free space and permissions on the log directory."
            ),
            MonitorError::NoFilesFound => {
                "What happened: No CSV files are stored on the volume.\nHow to fix: Let the monitor run past one logging interval first.".to_string()
            }
            MonitorError::Sensor { channel, msg } => format!(
                "What happened: Channel {channel} failed to read ({msg}).\nLikely causes: Wiring fault or ADC trouble on that input.\nHow to fix: Check the sensor wiring for that channel."
            ),
            MonitorError::Transport(msg) => format!(
                "What happened: The serial link failed ({msg}).\nLikely causes: Cable unplugged or the port is held by another process.\nHow to fix: Reconnect the cable and make sure nothing else has the port open."
            ),
        };
    }

    // String-based heuristics for errors coming from init or config
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("cannot open serial port") {
        return "What happened: The serial port could not be opened.\nLikely causes: Wrong device path, missing permissions, or the port is busy.\nHow to fix: Check serial.port in the config and your group membership (dialout).".to_string();
    }

    if lower.contains("thresholds.") || lower.contains("sampling.") || lower.contains("logging.") {
        return format!(
            "What happened: Configuration is invalid ({msg}).\nHow to fix: Edit the TOML config and try again."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Map storage errors to stable exit codes; everything else returns 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    use pressmon_core::error::MonitorError;
    if let Some(me) = err.downcast_ref::<MonitorError>() {
        return match me {
            MonitorError::StorageUnavailable(_) => 3,
            MonitorError::StorageOpenFailure(_) => 4,
            MonitorError::NoFilesFound => 5,
            _ => 1,
        };
    }
    1
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use pressmon_core::error::MonitorError;
    use serde_json::json;

    let reason = match err.downcast_ref::<MonitorError>() {
        Some(MonitorError::StorageUnavailable(_)) => "StorageUnavailable",
        Some(MonitorError::StorageOpenFailure(_)) => "StorageOpenFailure",
        Some(MonitorError::NoFilesFound) => "NoFilesFound",
        Some(MonitorError::Sensor { .. }) => "Sensor",
        Some(MonitorError::Transport(_)) => "Transport",
        None => "Error",
    };
    json!({ "reason": reason, "message": humanize(err) }).to_string()
}

//! Line protocol spoken over the serial link.
//!
//! The host sends single-word commands; the monitor answers with
//! framed blocks so the companion can tell screenshot data, CSV
//! exports and live updates apart. Unrecognized input is ignored.

use crate::error::MonitorError;
use pressmon_traits::{CHANNEL_COUNT, Transport};

pub const SCREENSHOT_BEGIN: &str = "SCREENSHOT_BEGIN";
pub const SCREENSHOT_END: &str = "SCREENSHOT_END";
pub const CSV_EXPORT_BEGIN: &str = "CSV_EXPORT_BEGIN";
pub const CSV_EXPORT_END: &str = "CSV_EXPORT_END";
pub const TIME_PREFIX: &str = "TIME:";
pub const DATA_PREFIX: &str = "DATA:";
pub const FILENAME_PREFIX: &str = "FILENAME:";
pub const NO_FILES_MSG: &str = "No CSV files found";

pub const HELP_TEXT: &[&str] = &[
    "Available commands:",
    "  SCREENSHOT  - send the current readings as a framed snapshot",
    "  EXPORT_CSV  - send all stored CSV logs",
    "  HELP        - show this text",
];

/// Commands accepted from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Screenshot,
    ExportCsv,
    Help,
}

impl Command {
    /// Parse one inbound line. Surrounding whitespace is tolerated;
    /// anything else returns None and the line is dropped.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "SCREENSHOT" => Some(Command::Screenshot),
            "EXPORT_CSV" => Some(Command::ExportCsv),
            "HELP" => Some(Command::Help),
            _ => None,
        }
    }

    /// The wire form a host sends to issue this command.
    pub fn as_line(self) -> &'static str {
        match self {
            Command::Screenshot => "SCREENSHOT",
            Command::ExportCsv => "EXPORT_CSV",
            Command::Help => "HELP",
        }
    }
}

/// One sampled frame of all channels plus its wall-clock stamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub timestamp: String,
    pub values: [u16; CHANNEL_COUNT],
}

impl Snapshot {
    /// Render the values as a `DATA:` line, comma separated in
    /// channel order.
    pub fn data_line(&self) -> String {
        let joined = self
            .values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        format!("{DATA_PREFIX}{joined}")
    }
}

fn send<T: Transport>(transport: &mut T, line: &str) -> Result<(), MonitorError> {
    transport
        .send_line(line)
        .map_err(|e| MonitorError::Transport(e.to_string()))
}

/// Send a snapshot frame: BEGIN, TIME, DATA, END.
pub fn write_snapshot<T: Transport>(
    transport: &mut T,
    snapshot: &Snapshot,
) -> Result<(), MonitorError> {
    send(transport, SCREENSHOT_BEGIN)?;
    send(transport, &format!("{TIME_PREFIX}{}", snapshot.timestamp))?;
    send(transport, &snapshot.data_line())?;
    send(transport, SCREENSHOT_END)
}

/// Send all stored logs in one export frame: BEGIN, then per file a
/// FILENAME line followed by its body line by line, then END.
pub fn write_export<T: Transport>(
    transport: &mut T,
    files: &[(String, String)],
) -> Result<(), MonitorError> {
    send(transport, CSV_EXPORT_BEGIN)?;
    for (file_name, contents) in files {
        send(transport, &format!("{FILENAME_PREFIX}{file_name}"))?;
        for line in contents.lines() {
            send(transport, line)?;
        }
    }
    send(transport, CSV_EXPORT_END)
}

/// An empty export frame: the sentinel message between BEGIN and END.
pub fn write_no_files<T: Transport>(transport: &mut T) -> Result<(), MonitorError> {
    send(transport, CSV_EXPORT_BEGIN)?;
    send(transport, NO_FILES_MSG)?;
    send(transport, CSV_EXPORT_END)
}

pub fn write_help<T: Transport>(transport: &mut T) -> Result<(), MonitorError> {
    for line in HELP_TEXT {
        send(transport, line)?;
    }
    Ok(())
}

/// Bare live update outside any frame, emitted alongside each log row.
pub fn write_live<T: Transport>(
    transport: &mut T,
    snapshot: &Snapshot,
) -> Result<(), MonitorError> {
    send(transport, &snapshot.data_line())
}

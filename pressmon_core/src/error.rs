use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum MonitorError {
    #[error("sensor error on channel {channel}: {msg}")]
    Sensor { channel: usize, msg: String },
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("failed to open log file: {0}")]
    StorageOpenFailure(String),
    #[error("no CSV files found")]
    NoFilesFound,
    #[error("transport error: {0}")]
    Transport(String),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing sensor array")]
    MissingSensors,
    #[error("missing transport")]
    MissingTransport,
    #[error("missing display")]
    MissingDisplay,
    #[error("missing clock")]
    MissingClock,
    #[error("missing storage")]
    MissingStorage,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;

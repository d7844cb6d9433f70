use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("cannot open serial port {path}: {msg}")]
    SerialOpen { path: String, msg: String },
    #[error("serial io error: {0}")]
    SerialIo(String),
}

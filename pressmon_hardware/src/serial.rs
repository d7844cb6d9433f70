//! Serial link to the companion host.

use std::io::{Read, Write};
use std::time::Duration;

use crate::error::HwError;
use pressmon_traits::Transport;

/// Pull the first complete line out of the receive buffer, if any.
/// Trailing carriage returns are stripped.
fn take_line(buf: &mut Vec<u8>) -> Option<String> {
    let pos = buf.iter().position(|b| *b == b'\n')?;
    let mut line: Vec<u8> = buf.drain(..=pos).collect();
    line.pop(); // the newline itself
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    Some(String::from_utf8_lossy(&line).into_owned())
}

/// Line-oriented transport over a real serial port.
///
/// Reads use a short timeout so `poll_line` never blocks the loop; a
/// timed-out read simply means no new bytes this cycle.
pub struct SerialTransport {
    port: Box<dyn serialport::SerialPort>,
    buf: Vec<u8>,
}

impl SerialTransport {
    pub fn open(path: &str, baud: u32) -> Result<Self, HwError> {
        let port = serialport::new(path, baud)
            .timeout(Duration::from_millis(10))
            .data_bits(serialport::DataBits::Eight)
            .open()
            .map_err(|e| HwError::SerialOpen {
                path: path.to_string(),
                msg: e.to_string(),
            })?;
        tracing::info!(path, baud, "serial port open");
        Ok(SerialTransport {
            port,
            buf: Vec::new(),
        })
    }
}

impl Transport for SerialTransport {
    fn poll_line(&mut self) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        if let Some(line) = take_line(&mut self.buf) {
            return Ok(Some(line));
        }
        let mut chunk = [0u8; 256];
        match self.port.read(&mut chunk) {
            Ok(0) => Ok(None),
            Ok(n) => {
                self.buf.extend_from_slice(&chunk[..n]);
                Ok(take_line(&mut self.buf))
            }
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(None),
            Err(e) => Err(Box::new(HwError::SerialIo(e.to_string()))),
        }
    }

    fn send_line(&mut self, line: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.port
            .write_all(line.as_bytes())
            .and_then(|()| self.port.write_all(b"\n"))
            .and_then(|()| self.port.flush())
            .map_err(|e| -> Box<dyn std::error::Error + Send + Sync> {
                Box::new(HwError::SerialIo(e.to_string()))
            })
    }
}

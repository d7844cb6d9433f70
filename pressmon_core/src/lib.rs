#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core monitor logic (hardware-agnostic).
//!
//! This crate provides the hardware-independent monitoring engine. All
//! hardware interactions go through the `pressmon_traits::SensorArray`
//! and `pressmon_traits::Transport` seams plus any embedded-graphics
//! `DrawTarget` for the panel.
//!
//! ## Architecture
//!
//! - **Sampling**: per-cycle channel reads (`sampler` module)
//! - **Classification**: four pressure bands with display colors (`band`)
//! - **Rendering**: static grid layout plus per-cell dynamic repaints (`render`)
//! - **Storage**: CSV logs on the removable volume (`storage`)
//! - **Protocol**: framed serial replies and command parsing (`protocol`)
//! - **Control**: the single cooperative loop tying it together (`monitor`)

pub mod band;
pub mod error;
pub mod framebuffer;
pub mod mocks;
pub mod monitor;
pub mod protocol;
pub mod render;
pub mod sampler;
pub mod storage;

pub use band::Band;
pub use error::{BuildError, MonitorError};
pub use framebuffer::FrameBuffer;
pub use monitor::{Monitor, MonitorBuilder};
pub use protocol::{Command, Snapshot};
pub use render::GridRenderer;
pub use storage::{CsvStore, LogFile};

pub use pressmon_traits::CHANNEL_COUNT;

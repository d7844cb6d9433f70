//! Pressure band classification.
//!
//! Raw 10-bit readings are mapped to one of four bands using the
//! configured cutoffs. Each band carries a display color and a short
//! label for the on-screen legend.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::{RgbColor, WebColors};
use pressmon_config::Thresholds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Band {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl Band {
    /// Classify a raw reading against the cutoffs.
    ///
    /// Cutoffs are lower bounds of the band above them: a value equal
    /// to `t.medium` is already Medium.
    pub fn classify(value: u16, t: &Thresholds) -> Self {
        if value < t.medium {
            Band::Low
        } else if value < t.high {
            Band::Medium
        } else if value < t.very_high {
            Band::High
        } else {
            Band::VeryHigh
        }
    }

    pub fn color(self) -> Rgb565 {
        match self {
            Band::Low => Rgb565::GREEN,
            Band::Medium => Rgb565::YELLOW,
            Band::High => Rgb565::CSS_ORANGE,
            Band::VeryHigh => Rgb565::RED,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Band::Low => "LOW",
            Band::Medium => "MED",
            Band::High => "HIGH",
            Band::VeryHigh => "VHIGH",
        }
    }
}

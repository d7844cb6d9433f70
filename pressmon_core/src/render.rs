//! On-device display rendering.
//!
//! The panel shows a 5x3 grid, one cell per channel, with a band legend
//! strip along the bottom edge. Cell outlines, channel labels and the
//! legend are drawn once at startup; each cycle only repaints the
//! dynamic region inside every cell (band indicator plus value).

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use profont::{PROFONT_9_POINT, PROFONT_12_POINT};

use crate::band::Band;
use pressmon_config::Thresholds;
use pressmon_traits::CHANNEL_COUNT;

pub const DISPLAY_WIDTH: u32 = 320;
pub const DISPLAY_HEIGHT: u32 = 240;
pub const GRID_COLS: usize = 5;
pub const GRID_ROWS: usize = 3;

/// Height of the band legend strip along the bottom edge.
const LEGEND_H: u32 = 18;

const CELL_W: u32 = DISPLAY_WIDTH / GRID_COLS as u32;
const CELL_H: u32 = (DISPLAY_HEIGHT - LEGEND_H) / GRID_ROWS as u32;

// The grid must cover all channels exactly.
const _: () = assert!(GRID_COLS * GRID_ROWS == CHANNEL_COUNT);

/// Top-left corner of a channel's cell.
pub fn cell_origin(channel: usize) -> Point {
    let col = (channel % GRID_COLS) as i32;
    let row = (channel / GRID_COLS) as i32;
    Point::new(col * CELL_W as i32, row * CELL_H as i32)
}

/// The repainted part of a cell: everything below the label row,
/// inset from the outline.
pub fn dynamic_region(channel: usize) -> Rectangle {
    let origin = cell_origin(channel);
    Rectangle::new(
        origin + Point::new(2, 20),
        Size::new(CELL_W - 4, CELL_H - 22),
    )
}

/// Draws the sensor grid onto any `Rgb565` target.
#[derive(Debug, Clone)]
pub struct GridRenderer {
    thresholds: Thresholds,
}

impl GridRenderer {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    /// Draw the static layout: background, cell outlines, channel
    /// labels. Drawing it again produces the identical frame.
    pub fn draw_layout<D>(&self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        display.clear(Rgb565::BLACK)?;

        let outline = PrimitiveStyle::with_stroke(Rgb565::WHITE, 1);
        let label_style = MonoTextStyle::new(&PROFONT_9_POINT, Rgb565::WHITE);

        for channel in 0..CHANNEL_COUNT {
            let origin = cell_origin(channel);
            Rectangle::new(origin, Size::new(CELL_W, CELL_H))
                .into_styled(outline)
                .draw(display)?;

            let label = format!("S{}", channel + 1);
            Text::with_baseline(
                &label,
                origin + Point::new(4, 4),
                label_style,
                Baseline::Top,
            )
            .draw(display)?;
        }

        self.draw_legend(display)?;
        Ok(())
    }

    /// One colored swatch and label per band, along the bottom strip.
    fn draw_legend<D>(&self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let strip_top = (DISPLAY_HEIGHT - LEGEND_H) as i32;
        let label_style = MonoTextStyle::new(&PROFONT_9_POINT, Rgb565::WHITE);
        let bands = [Band::Low, Band::Medium, Band::High, Band::VeryHigh];

        for (i, band) in bands.into_iter().enumerate() {
            let x = 8 + i as i32 * 80;
            let swatch = Rectangle::new(Point::new(x, strip_top + 5), Size::new(8, 8));
            display.fill_solid(&swatch, band.color())?;

            Text::with_baseline(
                band.label(),
                Point::new(x + 12, strip_top + 4),
                label_style,
                Baseline::Top,
            )
            .draw(display)?;
        }
        Ok(())
    }

    /// Repaint every cell's dynamic region with the latest values.
    ///
    /// Never touches pixels outside the dynamic regions, so the static
    /// layout survives any number of updates.
    pub fn update<D>(&self, display: &mut D, values: &[u16; CHANNEL_COUNT]) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        for (channel, value) in values.iter().enumerate() {
            self.draw_cell_value(display, channel, *value)?;
        }
        Ok(())
    }

    fn draw_cell_value<D>(&self, display: &mut D, channel: usize, value: u16) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let region = dynamic_region(channel);
        display.fill_solid(&region, Rgb565::BLACK)?;

        let band = Band::classify(value, &self.thresholds);

        // Band indicator, top-right of the region.
        let indicator = Rectangle::new(
            region.top_left + Point::new(region.size.width as i32 - 12, 2),
            Size::new(10, 10),
        );
        display.fill_solid(&indicator, band.color())?;

        // Value text, horizontally centered in band color.
        let text = value.to_string();
        let style = MonoTextStyle::new(&PROFONT_12_POINT, band.color());
        let text_w = style.font.character_size.width * text.len() as u32;
        let x = region.top_left.x + ((region.size.width.saturating_sub(text_w)) / 2) as i32;
        let y = region.top_left.y + 18;
        Text::with_baseline(&text, Point::new(x, y), style, Baseline::Top).draw(display)?;

        Ok(())
    }
}

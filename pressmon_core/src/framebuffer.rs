//! In-memory render target.
//!
//! The grid renderer draws into this buffer; a hardware backend would
//! blit it to the panel, and tests read pixels back directly.

use std::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// Heap-allocated `DrawTarget<Color = Rgb565>` with pixel readback.
#[derive(Debug)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgb565>,
}

impl FrameBuffer {
    /// Allocate a buffer of the given size filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb565::BLACK; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Color at (x, y), or None when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb565> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Raw pixel data in row-major order.
    pub fn data(&self) -> &[Rgb565] {
        &self.pixels
    }

    #[inline]
    fn set_pixel(&mut self, x: usize, y: usize, color: Rgb565) {
        self.pixels[y * self.width as usize + x] = color;
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let w = self.width as i32;
        let h = self.height as i32;
        for Pixel(coord, color) in pixels {
            if coord.x >= 0 && coord.y >= 0 && coord.x < w && coord.y < h {
                self.set_pixel(coord.x as usize, coord.y as usize, color);
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let w = self.width as usize;
        let h = self.height as usize;

        // Clamp the true corners so a negative origin shrinks the fill
        // instead of shifting it.
        let x_start = (area.top_left.x.max(0) as usize).min(w);
        let y_start = (area.top_left.y.max(0) as usize).min(h);
        let x_end = (i64::from(area.top_left.x) + i64::from(area.size.width)).clamp(0, w as i64)
            as usize;
        let y_end = (i64::from(area.top_left.y) + i64::from(area.size.height)).clamp(0, h as i64)
            as usize;

        for y in y_start..y_end {
            for x in x_start..x_end {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.pixels.fill(color);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_black() {
        let fb = FrameBuffer::new(8, 8);
        assert_eq!(fb.pixel(0, 0), Some(Rgb565::BLACK));
        assert_eq!(fb.pixel(7, 7), Some(Rgb565::BLACK));
        assert_eq!(fb.pixel(8, 0), None);
    }

    #[test]
    fn out_of_bounds_draws_are_dropped() {
        let mut fb = FrameBuffer::new(4, 4);
        fb.draw_iter([
            Pixel(Point::new(-1, 0), Rgb565::RED),
            Pixel(Point::new(0, 4), Rgb565::RED),
            Pixel(Point::new(2, 2), Rgb565::RED),
        ])
        .expect("infallible");
        assert_eq!(fb.pixel(2, 2), Some(Rgb565::RED));
        assert!(fb.data().iter().filter(|c| **c == Rgb565::RED).count() == 1);
    }

    #[test]
    fn fill_solid_with_negative_origin_keeps_its_extent() {
        let mut fb = FrameBuffer::new(8, 8);
        fb.fill_solid(
            &Rectangle::new(Point::new(-5, 0), Size::new(10, 1)),
            Rgb565::RED,
        )
        .expect("infallible");
        assert_eq!(fb.pixel(4, 0), Some(Rgb565::RED));
        assert_eq!(fb.pixel(5, 0), Some(Rgb565::BLACK));
    }

    #[test]
    fn fill_solid_clamps_to_bounds() {
        let mut fb = FrameBuffer::new(4, 4);
        fb.fill_solid(
            &Rectangle::new(Point::new(2, 2), Size::new(10, 10)),
            Rgb565::BLUE,
        )
        .expect("infallible");
        assert_eq!(fb.pixel(3, 3), Some(Rgb565::BLUE));
        assert_eq!(fb.pixel(1, 1), Some(Rgb565::BLACK));
    }
}

//! RGBA raster standing in for the page's 2D drawing surface.

use crate::roi::Roi;
use image::{Rgba, RgbaImage, imageops};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

/// Size a fresh canvas starts at before any snapshot is loaded.
pub const DEFAULT_WIDTH: u32 = 300;
pub const DEFAULT_HEIGHT: u32 = 150;

#[derive(Debug, Clone)]
pub struct Canvas {
    pixels: RgbaImage,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Whether `(x, y)` lies on the canvas surface.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width() && (y as u32) < self.height()
    }

    /// Resize to `width` x `height`. Like resetting a canvas element's size,
    /// this also clears everything drawn so far.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.pixels = RgbaImage::new(width, height);
    }

    /// Composite `image` with its top-left corner at (0, 0).
    pub fn draw_image(&mut self, image: &RgbaImage) {
        imageops::overlay(&mut self.pixels, image, 0, 0);
    }

    /// Stroke the outline of `roi` with a line centred on the rectangle's edges.
    ///
    /// Negative extents are drawn toward the origin. A rectangle with both
    /// extents zero draws nothing.
    pub fn stroke_rect(&mut self, roi: Roi, color: Rgba<u8>, line_width: u32) {
        let (left, top, width, height) = roi.normalized();
        if width == 0 && height == 0 {
            return;
        }

        let half = (line_width / 2) as i64;
        for ring in 0..line_width as i64 {
            // Negative insets grow the ring outward from the path.
            let inset = ring - half;
            let ring_w = width as i64 - 2 * inset;
            let ring_h = height as i64 - 2 * inset;
            if ring_w <= 0 || ring_h <= 0 {
                continue;
            }
            let rect = Rect::at(left + inset as i32, top + inset as i32)
                .of_size(ring_w as u32, ring_h as u32);
            draw_hollow_rect_mut(&mut self.pixels, rect, color);
        }
    }
}

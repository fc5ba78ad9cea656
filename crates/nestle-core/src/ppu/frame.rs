//! Pixel output side of the PPU.
//!
//! The core knows nothing about displays: every visible dot is handed to a
//! [`PixelSink`], and the sink is told once per frame that the picture is
//! complete.

use std::{cell::RefCell, rc::Rc};

use super::palette::Rgb;

/// Visible dots per scanline.
pub const SCREEN_WIDTH: usize = 256;
/// Visible scanlines per frame.
pub const SCREEN_HEIGHT: usize = 240;

/// Receives the 256x240 pixels of every frame.
pub trait PixelSink {
    /// Stores the color of one visible dot. `x < 256`, `y < 240`; pixels of
    /// a line arrive left to right, lines top to bottom.
    fn set_pixel(&mut self, x: usize, y: usize, color: Rgb);

    /// Called when vblank starts, after the last visible pixel of a frame.
    fn present(&mut self) {}
}

/// Discards everything. Used when no sink is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl PixelSink for NullSink {
    fn set_pixel(&mut self, _x: usize, _y: usize, _color: Rgb) {}
}

/// Row-major RGB frame buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: Vec<Rgb>,
    presented: u64,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            pixels: vec![Rgb::default(); SCREEN_WIDTH * SCREEN_HEIGHT],
            presented: 0,
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        self.pixels[y * SCREEN_WIDTH + x]
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Number of completed frames written into this buffer.
    pub fn frames_presented(&self) -> u64 {
        self.presented
    }

    /// Packed `RGBRGB...` bytes, ready for an image encoder.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| [p.r, p.g, p.b]).collect()
    }
}

impl PixelSink for FrameBuffer {
    fn set_pixel(&mut self, x: usize, y: usize, color: Rgb) {
        if x < SCREEN_WIDTH && y < SCREEN_HEIGHT {
            self.pixels[y * SCREEN_WIDTH + x] = color;
        }
    }

    fn present(&mut self) {
        self.presented += 1;
    }
}

/// Lets a front end keep a handle on the sink it gave to the console.
impl<T: PixelSink> PixelSink for Rc<RefCell<T>> {
    fn set_pixel(&mut self, x: usize, y: usize, color: Rgb) {
        self.borrow_mut().set_pixel(x, y, color);
    }

    fn present(&mut self) {
        self.borrow_mut().present();
    }
}

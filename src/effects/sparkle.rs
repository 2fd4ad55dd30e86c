//! Random pixels flashing on a dark face.

use super::{Animation, random_cell};
use crate::grid::PixelGrid;
use crate::{Color, requested_color};
use rand::Rng;
use std::ops::Range;

/// Sparkles per frame, re-rolled each frame.
const COUNT: Range<u32> = 5..15;
const BRIGHTNESS: Range<u8> = 100..255;

#[derive(Clone, Debug)]
pub struct Sparkle {
    base: Color,
}

impl Sparkle {
    /// Sparkles of `base`, or white when `base` is `None` or black.
    pub fn new(base: Option<Color>) -> Self {
        Self {
            base: requested_color(base).unwrap_or(Color::WHITE),
        }
    }

    pub fn base(&self) -> Color {
        self.base
    }
}

impl Animation for Sparkle {
    const FRAME_DELAY_MS: u64 = 50;

    fn render<G, R>(&mut self, grid: &mut G, rng: &mut R)
    where
        G: PixelGrid + ?Sized,
        R: Rng + ?Sized,
    {
        let panel = grid.panel();
        grid.clear_pixels(false);

        for _ in 0..rng.gen_range(COUNT) {
            let (x, y) = random_cell(panel, rng);
            let brightness = rng.gen_range(BRIGHTNESS);
            grid.set_pixel(x, y, self.base.dim(brightness));
        }
    }
}

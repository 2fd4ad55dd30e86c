//! Diagonal rainbow sweeping across the face.

use super::Animation;
use crate::grid::PixelGrid;
use crate::wheel;
use rand::Rng;

/// Wheel positions per column and per row. Rows step twice as far, which
/// tilts the bands.
const X_STEP: u32 = 10;
const Y_STEP: u32 = 20;
const OFFSET_STEP: u8 = 5;

#[derive(Clone, Debug, Default)]
pub struct RainbowWave {
    offset: u8,
}

impl RainbowWave {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wheel offset of the next frame.
    pub fn offset(&self) -> u8 {
        self.offset
    }
}

impl Animation for RainbowWave {
    const FRAME_DELAY_MS: u64 = 30;

    fn render<G, R>(&mut self, grid: &mut G, _rng: &mut R)
    where
        G: PixelGrid + ?Sized,
        R: Rng + ?Sized,
    {
        let panel = grid.panel();
        for y in 0..panel.rows {
            for x in 0..panel.cols {
                let pos = (x * X_STEP + y * Y_STEP + self.offset as u32) as u8;
                grid.set_pixel(x, y, wheel(pos));
            }
        }
        self.offset = self.offset.wrapping_add(OFFSET_STEP);
    }
}

//! Random colored pixels popping in and fading out.

use super::{Animation, random_cell};
use crate::grid::PixelGrid;
use crate::{Color, PanelConfig, random_color};
use rand::Rng;

const PIECES_PER_FRAME: usize = 2;
const FADE_STEP: u8 = 15;

/// Brightness and color of every cell, row-major.
#[derive(Clone, Debug)]
pub struct Confetti {
    panel: PanelConfig,
    brightness: Vec<u8>,
    colors: Vec<Color>,
}

impl Confetti {
    pub fn new(panel: PanelConfig) -> Self {
        let len = panel.pixel_count() as usize;
        Self {
            panel,
            brightness: vec![0; len],
            colors: vec![Color::BLACK; len],
        }
    }

    /// Light one cell at full brightness.
    pub fn ignite(&mut self, x: u32, y: u32, color: Color) {
        if let Some(i) = self.panel.index_of(x, y) {
            self.brightness[i] = 255;
            self.colors[i] = color;
        }
    }

    /// Remaining brightness of a cell.
    pub fn brightness(&self, x: u32, y: u32) -> Option<u8> {
        self.panel.index_of(x, y).map(|i| self.brightness[i])
    }

    fn sprinkle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for _ in 0..PIECES_PER_FRAME {
            let (x, y) = random_cell(self.panel, rng);
            let color = random_color(rng);
            self.ignite(x, y, color);
        }
    }

    /// Draw every cell at its current brightness, then fade the lit ones.
    pub fn draw_and_fade<G: PixelGrid + ?Sized>(&mut self, grid: &mut G) {
        for y in 0..self.panel.rows {
            for x in 0..self.panel.cols {
                let i = (y * self.panel.cols + x) as usize;
                let brightness = self.brightness[i];
                if brightness > 0 {
                    grid.set_pixel(x, y, self.colors[i].dim(brightness));
                    self.brightness[i] = brightness.saturating_sub(FADE_STEP);
                } else {
                    grid.set_pixel(x, y, Color::BLACK);
                }
            }
        }
    }
}

impl Animation for Confetti {
    const FRAME_DELAY_MS: u64 = 30;

    fn render<G, R>(&mut self, grid: &mut G, rng: &mut R)
    where
        G: PixelGrid + ?Sized,
        R: Rng + ?Sized,
    {
        self.sprinkle(rng);
        self.draw_and_fade(grid);
    }
}

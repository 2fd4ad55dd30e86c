//! Green drops falling down each column, trailing a fading tail.

use super::Animation;
use crate::grid::PixelGrid;
use crate::{Color, PanelConfig};
use rand::Rng;
use std::ops::Range;

const TRAIL_LEN: i32 = 5;
const TRAIL_FADE: i32 = 50;
/// How far below the bottom edge a drop falls before it respawns.
const OVERRUN: i32 = 5;
const RESPAWN: Range<i32> = -5..0;
/// Frames per one-row step.
const SPEEDS: Range<u32> = 1..4;

/// Per-column drop state, sized to the panel width.
#[derive(Clone, Debug)]
pub struct MatrixRain {
    rows: i32,
    drops: Vec<i32>,
    speeds: Vec<u32>,
    frame: u32,
}

impl MatrixRain {
    pub fn new<R: Rng + ?Sized>(panel: PanelConfig, rng: &mut R) -> Self {
        let rows = panel.rows as i32;
        let drops = (0..panel.cols).map(|_| rng.gen_range(-5..rows)).collect();
        let speeds = (0..panel.cols).map(|_| rng.gen_range(SPEEDS)).collect();
        Self {
            rows,
            drops,
            speeds,
            frame: 0,
        }
    }

    /// Head row of each column's drop. Negative while above the top edge.
    pub fn drops(&self) -> &[i32] {
        &self.drops
    }

    pub fn speeds(&self) -> &[u32] {
        &self.speeds
    }

    fn draw_trail<G: PixelGrid + ?Sized>(&self, grid: &mut G, x: u32) {
        let head = self.drops[x as usize];
        for trail in 0..TRAIL_LEN {
            let y = head - trail;
            if (0..self.rows).contains(&y) {
                let green = (255 - trail * TRAIL_FADE) as u8;
                grid.set_pixel(x, y as u32, Color::new(0, green, 0));
            }
        }
    }

    fn fall<R: Rng + ?Sized>(&mut self, column: usize, rng: &mut R) {
        if self.frame % self.speeds[column] != 0 {
            return;
        }
        self.drops[column] += 1;
        if self.drops[column] > self.rows + OVERRUN {
            self.drops[column] = rng.gen_range(RESPAWN);
            self.speeds[column] = rng.gen_range(SPEEDS);
        }
    }
}

impl Animation for MatrixRain {
    const FRAME_DELAY_MS: u64 = 40;

    fn render<G, R>(&mut self, grid: &mut G, rng: &mut R)
    where
        G: PixelGrid + ?Sized,
        R: Rng + ?Sized,
    {
        grid.clear_pixels(false);
        for x in 0..self.drops.len() {
            self.draw_trail(grid, x as u32);
            self.fall(x, rng);
        }
        self.frame = self.frame.wrapping_add(1);
    }
}

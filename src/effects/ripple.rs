//! Rainbow rings expanding from the middle of the face.

use super::Animation;
use crate::grid::PixelGrid;
use crate::{PanelConfig, wheel};
use rand::Rng;

/// Distance between two ring fronts.
const RING_SPACING: f32 = 4.0;
/// Width of the lit part of each ring; the rest of the spacing stays dark.
const RING_WIDTH: f32 = 1.5;
const GROWTH: f32 = 0.3;
/// Wheel positions per unit of distance from the center.
const HUE_PER_UNIT: f32 = 20.0;
const HUE_SHIFT: u8 = 30;

#[derive(Clone, Debug)]
pub struct Ripple {
    center_x: f32,
    center_y: f32,
    max_dist: f32,
    radius: f32,
    color_offset: u8,
}

impl Ripple {
    pub fn new(panel: PanelConfig) -> Self {
        let center_x = panel.cols as f32 / 2.0;
        let center_y = panel.rows as f32 / 2.0;
        Self {
            center_x,
            center_y,
            max_dist: center_x.hypot(center_y),
            radius: 0.0,
            color_offset: 0,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn color_offset(&self) -> u8 {
        self.color_offset
    }

    /// Position inside the repeating ring pattern, in `[0, RING_SPACING)`.
    fn ring_phase(&self, dist: f32) -> f32 {
        let phase = (dist - self.radius) % RING_SPACING;
        if phase < 0.0 { phase + RING_SPACING } else { phase }
    }

    fn advance(&mut self) {
        self.radius += GROWTH;
        if self.radius > self.max_dist + RING_SPACING {
            self.radius = 0.0;
            self.color_offset = self.color_offset.wrapping_add(HUE_SHIFT);
        }
    }
}

impl Animation for Ripple {
    const FRAME_DELAY_MS: u64 = 30;

    fn render<G, R>(&mut self, grid: &mut G, _rng: &mut R)
    where
        G: PixelGrid + ?Sized,
        R: Rng + ?Sized,
    {
        let panel = grid.panel();
        grid.clear_pixels(false);

        for y in 0..panel.rows {
            for x in 0..panel.cols {
                let dist = (x as f32 - self.center_x).hypot(y as f32 - self.center_y);
                let phase = self.ring_phase(dist);
                if phase < RING_WIDTH {
                    let brightness = (255.0 * (1.0 - phase / RING_WIDTH)) as u8;
                    let hue = self
                        .color_offset
                        .wrapping_add((dist * HUE_PER_UNIT) as u32 as u8);
                    grid.set_pixel(x, y, wheel(hue).dim(brightness));
                }
            }
        }

        self.advance();
    }
}

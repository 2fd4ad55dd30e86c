//! Firework bursts: a ring of particles flying out from a random point and
//! fading as they go.

use crate::grid::PixelGrid;
use crate::timing::{Clock, FrameBudget};
use crate::{Color, PanelConfig, random_color};
use rand::Rng;
use std::f32::consts::TAU;
use std::ops::Range;

pub const STEP_DELAY_MS: u64 = 40;
pub const BURST_FRAMES: u32 = 20;
pub const PARTICLES: usize = 12;
pub const PAUSE_MS: u64 = 100;

const SPEED: f32 = 0.5;
const FADE_PER_FRAME: u32 = 12;
/// Keep launch points this far from the edges.
const LAUNCH_MARGIN: u32 = 2;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Particle {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
}

/// One launch-and-explode cycle.
#[derive(Clone, Debug)]
pub struct Burst {
    color: Color,
    particles: [Particle; PARTICLES],
    frame: u32,
}

impl Burst {
    /// A burst at `(x, y)` with particles spread at equal angles.
    pub fn at(x: u32, y: u32, color: Color) -> Self {
        let particles = std::array::from_fn(|i| {
            let angle = TAU / PARTICLES as f32 * i as f32;
            Particle {
                x: x as f32,
                y: y as f32,
                vx: angle.cos() * SPEED,
                vy: angle.sin() * SPEED,
            }
        });
        Self {
            color,
            particles,
            frame: 0,
        }
    }

    /// A burst at a random point away from the edges, in a random color.
    pub fn launch<R: Rng + ?Sized>(panel: PanelConfig, rng: &mut R) -> Self {
        let x = rng.gen_range(launch_range(panel.cols));
        let y = rng.gen_range(launch_range(panel.rows));
        let color = random_color(rng);
        Self::at(x, y, color)
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Frames rendered so far.
    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn is_done(&self) -> bool {
        self.frame >= BURST_FRAMES
    }

    /// Clear the grid, move every particle one step and draw the ones still
    /// on the panel.
    pub fn render_step<G: PixelGrid + ?Sized>(&mut self, grid: &mut G) {
        let panel = grid.panel();
        grid.clear_pixels(false);

        let brightness = 255u32.saturating_sub(self.frame * FADE_PER_FRAME) as u8;
        let color = self.color.dim(brightness);

        for p in &mut self.particles {
            p.x += p.vx;
            p.y += p.vy;

            // truncates toward zero, like the rest of the integer math
            let (x, y) = (p.x as i32, p.y as i32);
            if panel.index_of_signed(x, y).is_some() {
                grid.set_pixel(x as u32, y as u32, color);
            }
        }

        self.frame += 1;
    }
}

/// Launch coordinates along one axis. Falls back to the whole axis when it
/// is too short to keep a margin.
fn launch_range(extent: u32) -> Range<u32> {
    if extent > 2 * LAUNCH_MARGIN {
        LAUNCH_MARGIN..extent - LAUNCH_MARGIN
    } else {
        0..extent.max(1)
    }
}

/// Fire bursts until `duration_ms` runs out. Returns frames shown.
pub(crate) fn run<G, C, R>(grid: &mut G, clock: &mut C, rng: &mut R, duration_ms: u64) -> usize
where
    G: PixelGrid + ?Sized,
    C: Clock + ?Sized,
    R: Rng + ?Sized,
{
    let budget = FrameBudget::start(clock, duration_ms);
    let mut frames = 0;

    while !budget.is_exhausted(clock) {
        let mut burst = Burst::launch(grid.panel(), rng);
        tracing::trace!("Firework burst in {:06x}", burst.color().packed());

        while !burst.is_done() {
            burst.render_step(grid);
            grid.show();
            frames += 1;
            if budget.step(clock, STEP_DELAY_MS) {
                return frames;
            }
        }

        budget.pause(clock, PAUSE_MS);
    }

    frames
}

//! The whole face breathing in and out in one color.

use super::Animation;
use crate::grid::PixelGrid;
use crate::{Color, random_color, requested_color};
use rand::Rng;
use std::f32::consts::TAU;

const PHASE_STEP: f32 = 0.08;

#[derive(Clone, Debug)]
pub struct Pulse {
    color: Color,
    fixed: bool,
    phase: f32,
}

impl Pulse {
    /// A pulse in `color`, kept for every breath. `None` or black picks a
    /// random color now and a new one at the end of every breath.
    pub fn new<R: Rng + ?Sized>(color: Option<Color>, rng: &mut R) -> Self {
        let (color, fixed) = match requested_color(color) {
            Some(color) => (color, true),
            None => (random_color(rng), false),
        };
        Self {
            color,
            fixed,
            phase: 0.0,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Brightness of a sine breath at `phase`, 0-255.
    pub fn brightness(phase: f32) -> u8 {
        (127.5 * (1.0 + phase.sin())) as u8
    }
}

impl Animation for Pulse {
    const FRAME_DELAY_MS: u64 = 20;

    fn render<G, R>(&mut self, grid: &mut G, rng: &mut R)
    where
        G: PixelGrid + ?Sized,
        R: Rng + ?Sized,
    {
        grid.fill(self.color.dim(Self::brightness(self.phase)));

        self.phase += PHASE_STEP;
        if self.phase > TAU {
            self.phase -= TAU;
            if !self.fixed {
                self.color = random_color(rng);
                tracing::trace!("Pulse color changed to {:06x}", self.color.packed());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PanelConfig;
    use crate::grid::FrameBuffer;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::f32::consts::{FRAC_PI_2, PI};

    /// 0.08 rad per frame crosses 2π on the 79th frame.
    const FRAMES_PER_BREATH: usize = 79;

    #[test]
    fn brightness_follows_the_sine() {
        assert_eq!(Pulse::brightness(0.0), 127);
        assert_eq!(Pulse::brightness(FRAC_PI_2), 255);
        assert_eq!(Pulse::brightness(PI + FRAC_PI_2), 0);
    }

    #[test]
    fn fills_the_whole_grid() {
        let mut grid = FrameBuffer::new(PanelConfig::new(3, 3));
        let mut rng = StdRng::seed_from_u64(0);
        let color = Color::new(200, 0, 100);
        Pulse::new(Some(color), &mut rng).render(&mut grid, &mut rng);
        assert!(grid.pixels().iter().all(|&c| c == color.dim(127)));
    }

    #[test]
    fn fixed_color_survives_every_breath() {
        let mut grid = FrameBuffer::new(PanelConfig::new(1, 1));
        let mut rng = StdRng::seed_from_u64(0);
        let color = Color::new(10, 20, 30);
        let mut pulse = Pulse::new(Some(color), &mut rng);
        for _ in 0..FRAMES_PER_BREATH * 3 {
            pulse.render(&mut grid, &mut rng);
        }
        assert_eq!(pulse.color(), color);
    }

    #[test]
    fn auto_color_changes_only_at_the_end_of_a_breath() {
        let mut grid = FrameBuffer::new(PanelConfig::new(1, 1));
        // pick a seed whose first two random colors differ
        let (mut rng, mut pulse) = (0..)
            .map(|seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                let pulse = Pulse::new(Some(Color::BLACK), &mut rng);
                let mut probe = rng.clone();
                (rng, pulse, random_color(&mut probe))
            })
            .find(|(_, pulse, next)| pulse.color() != *next)
            .map(|(rng, pulse, _)| (rng, pulse))
            .unwrap();

        let first = pulse.color();
        for _ in 0..FRAMES_PER_BREATH - 1 {
            pulse.render(&mut grid, &mut rng);
        }
        assert_eq!(pulse.color(), first);

        pulse.render(&mut grid, &mut rng);
        assert_ne!(pulse.color(), first);
    }
}

//! The effect engine: eight bounded-duration animations and the dispatcher
//! that picks one.
//!
//! Every effect is a timed loop: render a frame, `show` it, sleep the
//! effect's frame delay, and stop once the requested duration has elapsed.
//! Effects run one at a time to completion on the caller's thread; the only
//! way to stop one early is its own duration budget.
//!
//! ## Rust concepts
//! - Associated consts on traits (`Animation::FRAME_DELAY_MS`)
//! - Function pointers as a dispatch table (`Generator`)
//! - Generic structs over the grid, clock and RNG, so tests swap in
//!   in-memory versions of all three

mod confetti;
mod firework;
mod matrix_rain;
mod pulse;
mod rainbow;
mod ripple;
mod sparkle;
mod wipe;

pub use confetti::Confetti;
pub use firework::Burst;
pub use matrix_rain::MatrixRain;
pub use pulse::Pulse;
pub use rainbow::RainbowWave;
pub use ripple::Ripple;
pub use sparkle::Sparkle;

use crate::grid::PixelGrid;
use crate::timing::{Clock, FrameBudget};
use crate::{Color, PanelConfig};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

// ── EffectType ───────────────────────────────────────────────────────

/// Every effect the engine can play, plus `Random`.
///
/// `Random` is never played itself: it resolves to one of
/// [`EffectType::CONCRETE`] first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum EffectType {
    RainbowWave,
    Sparkle,
    MatrixRain,
    Ripple,
    ColorWipe,
    Pulse,
    Confetti,
    Firework,
    Random,
}

impl EffectType {
    /// The effects `Random` chooses between. Does not contain `Random`.
    pub const CONCRETE: [EffectType; 8] = [
        EffectType::RainbowWave,
        EffectType::Sparkle,
        EffectType::MatrixRain,
        EffectType::Ripple,
        EffectType::ColorWipe,
        EffectType::Pulse,
        EffectType::Confetti,
        EffectType::Firework,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::RainbowWave => "rainbow-wave",
            Self::Sparkle => "sparkle",
            Self::MatrixRain => "matrix-rain",
            Self::Ripple => "ripple",
            Self::ColorWipe => "color-wipe",
            Self::Pulse => "pulse",
            Self::Confetti => "confetti",
            Self::Firework => "firework",
            Self::Random => "random",
        }
    }

    pub fn is_concrete(self) -> bool {
        self != Self::Random
    }

    /// Pick one of the concrete effects uniformly.
    pub fn choose_concrete<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::CONCRETE[rng.gen_range(0..Self::CONCRETE.len())]
    }

    /// The sleep between two committed frames, `None` for `Random`.
    ///
    /// For the wipe and the firework this is the inner step delay; their
    /// longer pauses between cycles are cut short at the end of the budget.
    pub fn frame_delay_ms(self) -> Option<u64> {
        Some(match self {
            Self::RainbowWave => RainbowWave::FRAME_DELAY_MS,
            Self::Sparkle => Sparkle::FRAME_DELAY_MS,
            Self::MatrixRain => MatrixRain::FRAME_DELAY_MS,
            Self::Ripple => Ripple::FRAME_DELAY_MS,
            Self::ColorWipe => wipe::STEP_DELAY_MS,
            Self::Pulse => Pulse::FRAME_DELAY_MS,
            Self::Confetti => Confetti::FRAME_DELAY_MS,
            Self::Firework => firework::STEP_DELAY_MS,
            Self::Random => return None,
        })
    }
}

impl fmt::Display for EffectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Animation ────────────────────────────────────────────────────────

/// One frame-at-a-time effect with a fixed delay between frames.
///
/// `render` draws the next frame into the grid and advances the internal
/// state; [`animate`] commits it and handles timing.
pub trait Animation {
    const FRAME_DELAY_MS: u64;

    fn render<G, R>(&mut self, grid: &mut G, rng: &mut R)
    where
        G: PixelGrid + ?Sized,
        R: Rng + ?Sized;
}

/// Run `animation` until `duration_ms` has elapsed. Returns the number of
/// frames shown.
///
/// The duration is checked before every frame, so the loop ends at most one
/// frame delay late, and a zero duration renders nothing.
pub fn animate<A, G, C, R>(
    animation: &mut A,
    grid: &mut G,
    clock: &mut C,
    rng: &mut R,
    duration_ms: u64,
) -> usize
where
    A: Animation + ?Sized,
    G: PixelGrid + ?Sized,
    C: Clock + ?Sized,
    R: Rng + ?Sized,
{
    let budget = FrameBudget::start(clock, duration_ms);
    let mut frames = 0;

    while !budget.is_exhausted(clock) {
        animation.render(grid, rng);
        grid.show();
        frames += 1;
        clock.sleep_ms(A::FRAME_DELAY_MS);
    }

    frames
}

/// A uniformly random cell of the panel.
pub(crate) fn random_cell<R: Rng + ?Sized>(panel: PanelConfig, rng: &mut R) -> (u32, u32) {
    let x = rng.gen_range(0..panel.cols.max(1));
    let y = rng.gen_range(0..panel.rows.max(1));
    (x, y)
}

// ── Dispatcher ───────────────────────────────────────────────────────

type Generator<G, C, R> = fn(&mut DisplayEffects<G, C, R>, u64);

/// Owns the grid, clock and RNG and plays effects on them.
///
/// # Rust concept: exclusive borrows
/// Every effect method takes `&mut self`, so the borrow checker guarantees
/// only one effect touches the grid at a time.
pub struct DisplayEffects<G, C, R> {
    grid: G,
    clock: C,
    rng: R,
}

impl<G, C, R> DisplayEffects<G, C, R>
where
    G: PixelGrid,
    C: Clock,
    R: Rng,
{
    pub fn new(grid: G, clock: C, rng: R) -> Self {
        Self { grid, clock, rng }
    }

    pub fn grid(&self) -> &G {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut G {
        &mut self.grid
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Generator for a concrete effect, `None` for `Random`.
    fn generator(effect: EffectType) -> Option<Generator<G, C, R>> {
        let generator: Generator<G, C, R> = match effect {
            EffectType::RainbowWave => Self::rainbow_wave,
            EffectType::Sparkle => |fx, duration_ms| fx.sparkle(duration_ms, None),
            EffectType::MatrixRain => Self::matrix_rain,
            EffectType::Ripple => Self::ripple,
            EffectType::ColorWipe => |fx, duration_ms| fx.color_wipe(duration_ms, None),
            EffectType::Pulse => |fx, duration_ms| fx.pulse(duration_ms, None),
            EffectType::Confetti => Self::confetti,
            EffectType::Firework => Self::firework,
            EffectType::Random => return None,
        };
        Some(generator)
    }

    /// Play `effect` for `duration_ms`, resolving `Random` first. Returns the
    /// effect that actually ran.
    pub fn play_effect(&mut self, effect: EffectType, duration_ms: u64) -> EffectType {
        match Self::generator(effect) {
            Some(generator) => {
                generator(self, duration_ms);
                effect
            }
            None => self.play_random_effect(duration_ms),
        }
    }

    /// Play one of the eight concrete effects, chosen uniformly.
    pub fn play_random_effect(&mut self, duration_ms: u64) -> EffectType {
        let effect = EffectType::choose_concrete(&mut self.rng);
        tracing::info!("Random effect resolved to {}", effect);
        self.play_effect(effect, duration_ms)
    }

    /// Like [`play_effect`](Self::play_effect), passing `color` on to the
    /// effects that take one (sparkle, color wipe, pulse).
    pub fn play_effect_with_color(
        &mut self,
        effect: EffectType,
        duration_ms: u64,
        color: Option<Color>,
    ) -> EffectType {
        let effect = if effect.is_concrete() {
            effect
        } else {
            let chosen = EffectType::choose_concrete(&mut self.rng);
            tracing::info!("Random effect resolved to {}", chosen);
            chosen
        };

        match effect {
            EffectType::Sparkle => self.sparkle(duration_ms, color),
            EffectType::ColorWipe => self.color_wipe(duration_ms, color),
            EffectType::Pulse => self.pulse(duration_ms, color),
            other => return self.play_effect(other, duration_ms),
        }
        effect
    }

    pub fn rainbow_wave(&mut self, duration_ms: u64) {
        self.run(EffectType::RainbowWave, duration_ms, |grid, clock, rng| {
            animate(&mut RainbowWave::new(), grid, clock, rng, duration_ms)
        });
    }

    /// Random twinkles of `base_color`, white when `None` or black.
    pub fn sparkle(&mut self, duration_ms: u64, base_color: Option<Color>) {
        self.run(EffectType::Sparkle, duration_ms, |grid, clock, rng| {
            animate(&mut Sparkle::new(base_color), grid, clock, rng, duration_ms)
        });
    }

    pub fn matrix_rain(&mut self, duration_ms: u64) {
        self.run(EffectType::MatrixRain, duration_ms, |grid, clock, rng| {
            let mut rain = MatrixRain::new(grid.panel(), rng);
            animate(&mut rain, grid, clock, rng, duration_ms)
        });
    }

    pub fn ripple(&mut self, duration_ms: u64) {
        self.run(EffectType::Ripple, duration_ms, |grid, clock, rng| {
            animate(
                &mut Ripple::new(grid.panel()),
                grid,
                clock,
                rng,
                duration_ms,
            )
        });
    }

    /// Diagonal wipe on and off. A new random color every cycle unless a
    /// non-black `color` is given.
    pub fn color_wipe(&mut self, duration_ms: u64, color: Option<Color>) {
        self.run(EffectType::ColorWipe, duration_ms, |grid, clock, rng| {
            wipe::run(grid, clock, rng, duration_ms, color)
        });
    }

    /// Breathing brightness over the whole grid. A new random color every
    /// breath unless a non-black `color` is given.
    pub fn pulse(&mut self, duration_ms: u64, color: Option<Color>) {
        self.run(EffectType::Pulse, duration_ms, |grid, clock, rng| {
            let mut pulse = Pulse::new(color, rng);
            animate(&mut pulse, grid, clock, rng, duration_ms)
        });
    }

    pub fn confetti(&mut self, duration_ms: u64) {
        self.run(EffectType::Confetti, duration_ms, |grid, clock, rng| {
            animate(
                &mut Confetti::new(grid.panel()),
                grid,
                clock,
                rng,
                duration_ms,
            )
        });
    }

    pub fn firework(&mut self, duration_ms: u64) {
        self.run(EffectType::Firework, duration_ms, |grid, clock, rng| {
            firework::run(grid, clock, rng, duration_ms)
        });
    }

    fn run<F>(&mut self, effect: EffectType, duration_ms: u64, body: F)
    where
        F: FnOnce(&mut G, &mut C, &mut R) -> usize,
    {
        tracing::debug!("Effect {} started ({} ms)", effect, duration_ms);
        let started = self.clock.now_ms();

        let frames = body(&mut self.grid, &mut self.clock, &mut self.rng);

        tracing::debug!(
            "Effect {} finished: {} frames in {} ms",
            effect,
            frames,
            self.clock.now_ms().saturating_sub(started)
        );
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::engine;
    use super::*;
    use crate::grid::FrameBuffer;
    use crate::timing::ManualClock;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::rstest;

    #[test]
    fn concrete_set_excludes_random() {
        assert_eq!(EffectType::CONCRETE.len(), 8);
        assert!(!EffectType::CONCRETE.contains(&EffectType::Random));
        assert!(EffectType::CONCRETE.iter().all(|e| e.is_concrete()));
        assert!(!EffectType::Random.is_concrete());
    }

    #[test]
    fn choose_concrete_never_picks_random_and_covers_all() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1_000 {
            let effect = EffectType::choose_concrete(&mut rng);
            assert_ne!(effect, EffectType::Random);
            seen.insert(effect);
        }
        assert_eq!(seen.len(), 8);
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    #[case(99)]
    fn play_random_effect_runs_a_concrete_effect(#[case] seed: u64) {
        let mut fx = engine(seed);
        let played = fx.play_random_effect(100);
        assert!(played.is_concrete());
        assert!(fx.grid().show_count() > 0);
    }

    #[test]
    fn play_effect_random_resolves_before_running() {
        let mut fx = engine(5);
        assert!(fx.play_effect(EffectType::Random, 50).is_concrete());
    }

    #[test]
    fn play_effect_with_color_forwards_the_color() {
        let teal = Color::new(0, 128, 128);
        let mut fx = engine(2);
        assert_eq!(
            fx.play_effect_with_color(EffectType::Pulse, 20, Some(teal)),
            EffectType::Pulse
        );
        assert!(fx.grid().shown().iter().all(|&c| c == teal.dim(127)));

        let mut fx = engine(2);
        fx.play_effect_with_color(EffectType::ColorWipe, 20, Some(teal));
        assert_eq!(fx.grid().shown_pixel(0, 0), Some(teal));
    }

    #[test]
    fn play_effect_with_color_resolves_random() {
        let mut fx = engine(13);
        let played = fx.play_effect_with_color(EffectType::Random, 100, Some(Color::WHITE));
        assert!(played.is_concrete());
    }

    #[rstest]
    #[case(EffectType::RainbowWave)]
    #[case(EffectType::Sparkle)]
    #[case(EffectType::MatrixRain)]
    #[case(EffectType::Ripple)]
    #[case(EffectType::ColorWipe)]
    #[case(EffectType::Pulse)]
    #[case(EffectType::Confetti)]
    #[case(EffectType::Firework)]
    fn play_effect_reports_the_requested_effect(#[case] effect: EffectType) {
        let mut fx = engine(11);
        assert_eq!(fx.play_effect(effect, 200), effect);
    }

    #[rstest]
    fn every_effect_overshoots_by_less_than_one_frame_delay(
        #[values(
            EffectType::RainbowWave,
            EffectType::Sparkle,
            EffectType::MatrixRain,
            EffectType::Ripple,
            EffectType::ColorWipe,
            EffectType::Pulse,
            EffectType::Confetti,
            EffectType::Firework
        )]
        effect: EffectType,
        #[values(1, 37, 250, 1_000, 4_000)] duration_ms: u64,
    ) {
        let mut fx = engine(3);
        fx.play_effect(effect, duration_ms);

        let delay = effect.frame_delay_ms().unwrap();
        let elapsed = fx.clock().now_ms();
        assert!(elapsed >= duration_ms, "{effect}: {elapsed} < {duration_ms}");
        assert!(
            elapsed < duration_ms + delay,
            "{effect}: {elapsed} >= {duration_ms} + {delay}"
        );
    }

    #[rstest]
    fn zero_duration_renders_nothing(
        #[values(
            EffectType::RainbowWave,
            EffectType::Sparkle,
            EffectType::MatrixRain,
            EffectType::Ripple,
            EffectType::ColorWipe,
            EffectType::Pulse,
            EffectType::Confetti,
            EffectType::Firework
        )]
        effect: EffectType,
    ) {
        let mut fx = engine(8);
        fx.play_effect(effect, 0);
        assert_eq!(fx.grid().show_count(), 0);
        assert_eq!(fx.clock().sleeps(), 0);
        assert!(fx.grid().pixels().iter().all(|c| c.is_black()));
    }

    #[test]
    fn effects_do_not_depend_on_previous_runs() {
        let mut first = engine(21);
        first.ripple(300);
        let mut second = engine(21);
        second.confetti(500);
        second.ripple(300);
        assert_eq!(first.grid().shown(), second.grid().shown());
    }

    #[test]
    fn animate_counts_frames_and_respects_the_delay() {
        let mut grid = FrameBuffer::new(PanelConfig::default());
        let mut clock = ManualClock::new();
        let mut rng = StdRng::seed_from_u64(0);

        let frames = animate(
            &mut RainbowWave::new(),
            &mut grid,
            &mut clock,
            &mut rng,
            100,
        );

        // 0, 30, 60, 90 start a frame; 120 ends the loop
        assert_eq!(frames, 4);
        assert_eq!(grid.show_count(), 4);
        assert_eq!(clock.now_ms(), 120);
    }

    #[test]
    fn effect_type_names_match_serde_and_clap() {
        use clap::ValueEnum;
        for effect in EffectType::CONCRETE.into_iter().chain([EffectType::Random]) {
            let json = serde_json::to_string(&effect).unwrap();
            assert_eq!(json, format!("\"{}\"", effect.name()));
            assert_eq!(EffectType::from_str(effect.name(), false), Ok(effect));
        }
    }
}

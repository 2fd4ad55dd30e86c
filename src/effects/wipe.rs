//! Diagonal color wipe: fill the face one anti-diagonal at a time, hold,
//! then clear it the same way.

use crate::grid::PixelGrid;
use crate::timing::{Clock, FrameBudget};
use crate::{Color, PanelConfig, random_color, requested_color};
use rand::Rng;

pub const STEP_DELAY_MS: u64 = 20;
pub const HOLD_MS: u64 = 200;
pub const REST_MS: u64 = 100;

/// Number of sweep steps: one per value of `x + y`, plus a trailing empty one.
pub fn diagonal_count(panel: PanelConfig) -> u32 {
    panel.cols + panel.rows
}

/// Set every cell with `x + y == diagonal` to `color`.
pub fn paint_diagonal<G: PixelGrid + ?Sized>(grid: &mut G, diagonal: u32, color: Color) {
    let panel = grid.panel();
    for x in 0..panel.cols {
        if let Some(y) = diagonal.checked_sub(x).filter(|&y| y < panel.rows) {
            grid.set_pixel(x, y, color);
        }
    }
}

/// One sweep over all diagonals. Returns `true` if the budget ran out
/// part-way.
fn sweep<G, C>(
    grid: &mut G,
    clock: &mut C,
    budget: &FrameBudget,
    color: Color,
    frames: &mut usize,
) -> bool
where
    G: PixelGrid + ?Sized,
    C: Clock + ?Sized,
{
    for diagonal in 0..diagonal_count(grid.panel()) {
        paint_diagonal(grid, diagonal, color);
        grid.show();
        *frames += 1;
        if budget.step(clock, STEP_DELAY_MS) {
            return true;
        }
    }
    false
}

/// Wipe on and off until `duration_ms` runs out. Returns frames shown.
///
/// Every step and every pause is followed by a budget check, and pauses are
/// cut short at the end of the budget.
pub(crate) fn run<G, C, R>(
    grid: &mut G,
    clock: &mut C,
    rng: &mut R,
    duration_ms: u64,
    color: Option<Color>,
) -> usize
where
    G: PixelGrid + ?Sized,
    C: Clock + ?Sized,
    R: Rng + ?Sized,
{
    let fixed = requested_color(color);
    let budget = FrameBudget::start(clock, duration_ms);
    let mut frames = 0;

    while !budget.is_exhausted(clock) {
        let color = fixed.unwrap_or_else(|| random_color(rng));
        tracing::trace!("Wipe cycle in {:06x}", color.packed());

        if sweep(grid, clock, &budget, color, &mut frames) || budget.pause(clock, HOLD_MS) {
            break;
        }
        if sweep(grid, clock, &budget, Color::BLACK, &mut frames) {
            break;
        }
        budget.pause(clock, REST_MS);
    }

    frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::test_support::{Recorder, engine, engine_with_panel};
    use crate::grid::FrameBuffer;
    use crate::timing::ManualClock;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const TEAL: Color = Color::new(0, 128, 128);

    #[test]
    fn diagonal_covers_cells_with_matching_sum() {
        let panel = PanelConfig::new(3, 4);
        let mut grid = FrameBuffer::new(panel);
        paint_diagonal(&mut grid, 2, TEAL);

        for y in 0..3 {
            for x in 0..4 {
                let expected = if x + y == 2 { TEAL } else { Color::BLACK };
                assert_eq!(grid.pixel(x, y), Some(expected), "({x}, {y})");
            }
        }
    }

    #[test]
    fn last_diagonals_clip_to_the_panel() {
        let panel = PanelConfig::new(3, 4);
        let mut grid = FrameBuffer::new(panel);
        paint_diagonal(&mut grid, 5, TEAL);
        assert_eq!(grid.pixels().iter().filter(|&&c| c == TEAL).count(), 1);
        assert_eq!(grid.pixel(3, 2), Some(TEAL));

        paint_diagonal(&mut grid, 6, Color::BLACK);
        assert_eq!(grid.pixel(3, 2), Some(TEAL));
    }

    #[test]
    fn short_budget_returns_mid_sweep() {
        let mut fx = engine(0);
        fx.color_wipe(60, Some(TEAL));

        let grid = fx.grid();
        assert_eq!(grid.show_count(), 3);
        for y in 0..10 {
            for x in 0..11 {
                let expected = if x + y <= 2 { TEAL } else { Color::BLACK };
                assert_eq!(grid.shown_pixel(x, y), Some(expected), "({x}, {y})");
            }
        }
        assert_eq!(fx.clock().now_ms(), 60);
    }

    #[test]
    fn full_cycle_fills_then_clears() {
        // 2×2: 4 steps on, 200 hold, 4 steps off, 100 rest = 460 ms per cycle
        let panel = PanelConfig::new(2, 2);

        let mut fx = engine_with_panel(panel, 0);
        fx.color_wipe(80, Some(TEAL));
        assert!(fx.grid().shown().iter().all(|&c| c == TEAL));

        let mut fx = engine_with_panel(panel, 0);
        fx.color_wipe(460, Some(TEAL));
        assert_eq!(fx.grid().show_count(), 8);
        assert_eq!(fx.clock().now_ms(), 460);
        assert!(fx.grid().shown().iter().all(|c| c.is_black()));
    }

    #[test]
    fn hold_is_cut_short_by_the_budget() {
        let mut fx = engine_with_panel(PanelConfig::new(2, 2), 0);
        fx.color_wipe(150, Some(TEAL));
        assert_eq!(fx.grid().show_count(), 4);
        assert_eq!(fx.clock().now_ms(), 150);
    }

    #[test]
    fn auto_color_is_rerolled_every_cycle() {
        // 1×1: 2 steps on, 200 hold, 2 steps off, 100 rest = 380 ms per cycle
        let mut grid = Recorder::new(PanelConfig::new(1, 1));
        let mut clock = ManualClock::new();
        let mut rng = StdRng::seed_from_u64(4);
        let frames = run(&mut grid, &mut clock, &mut rng, 4 * 380, None);

        assert_eq!(frames, 16);
        assert_eq!(clock.now_ms(), 1_520);

        let mut colors = Vec::new();
        for cycle in grid.frames.chunks(4) {
            let color = cycle[0][0];
            assert!(!color.is_black());
            assert_eq!(cycle[1][0], color);
            assert!(cycle[2][0].is_black() && cycle[3][0].is_black());
            colors.push(color);
        }
        assert_eq!(colors.len(), 4);

        colors.dedup();
        assert!(colors.len() > 1, "same color every cycle: {colors:?}");
    }
}

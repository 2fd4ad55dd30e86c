//! The pixel grid every effect paints on.
//!
//! Effects only ever see a `PixelGrid`: buffered per-pixel writes, a full
//! clear and a `show` that commits the buffer. Nothing is visible until
//! `show` is called. Implementations:
//! - [`FrameBuffer`]: in memory, records every committed frame (tests, embedding)
//! - [`TerminalGrid`](crate::preview::TerminalGrid): ANSI preview on a terminal
//! - `MatrixGrid` (feature `hardware`): the physical LED panel
//!
//! ## Rust concepts
//! - Traits with default methods
//! - `?Sized` bounds so effects accept `&mut dyn PixelGrid` as well as concrete grids

use crate::{Color, PanelConfig};

/// Buffered access to a fixed-size grid of RGB pixels.
///
/// Writes outside the panel must be ignored, never panic.
pub trait PixelGrid {
    /// Grid dimensions. Constant for the lifetime of the grid.
    fn panel(&self) -> PanelConfig;

    /// Buffer one pixel's color.
    fn set_pixel(&mut self, x: u32, y: u32, color: Color);

    /// Set every buffered pixel to black, committing immediately if `show` is set.
    fn clear_pixels(&mut self, show: bool);

    /// Commit the buffer to the display.
    fn show(&mut self);

    /// Buffer the same color on every pixel.
    fn fill(&mut self, color: Color) {
        let panel = self.panel();
        for y in 0..panel.rows {
            for x in 0..panel.cols {
                self.set_pixel(x, y, color);
            }
        }
    }
}

impl<G: PixelGrid + ?Sized> PixelGrid for &mut G {
    fn panel(&self) -> PanelConfig {
        (**self).panel()
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        (**self).set_pixel(x, y, color);
    }

    fn clear_pixels(&mut self, show: bool) {
        (**self).clear_pixels(show);
    }

    fn show(&mut self) {
        (**self).show();
    }

    fn fill(&mut self, color: Color) {
        (**self).fill(color);
    }
}

// ── FrameBuffer ──────────────────────────────────────────────────────

/// An in-memory grid.
///
/// Keeps the working buffer and a copy of the last committed frame, and
/// counts commits, so callers can observe exactly what an effect showed.
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    panel: PanelConfig,
    pixels: Vec<Color>,
    shown: Vec<Color>,
    show_count: usize,
}

impl FrameBuffer {
    pub fn new(panel: PanelConfig) -> Self {
        let len = panel.pixel_count() as usize;
        Self {
            panel,
            pixels: vec![Color::BLACK; len],
            shown: vec![Color::BLACK; len],
            show_count: 0,
        }
    }

    /// Buffered (not necessarily committed) color at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.panel.index_of(x, y).map(|i| self.pixels[i])
    }

    /// Color at `(x, y)` as of the last `show`.
    pub fn shown_pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.panel.index_of(x, y).map(|i| self.shown[i])
    }

    /// The working buffer in row-major order.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// The last committed frame in row-major order.
    pub fn shown(&self) -> &[Color] {
        &self.shown
    }

    /// How many times `show` (or `clear_pixels(true)`) committed a frame.
    pub fn show_count(&self) -> usize {
        self.show_count
    }

    /// Number of lit pixels in the last committed frame.
    pub fn lit_count(&self) -> usize {
        self.shown.iter().filter(|c| !c.is_black()).count()
    }
}

impl PixelGrid for FrameBuffer {
    fn panel(&self) -> PanelConfig {
        self.panel
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if let Some(i) = self.panel.index_of(x, y) {
            self.pixels[i] = color;
        }
    }

    fn clear_pixels(&mut self, show: bool) {
        self.pixels.fill(Color::BLACK);
        if show {
            self.show();
        }
    }

    fn show(&mut self) {
        self.shown.copy_from_slice(&self.pixels);
        self.show_count += 1;
    }
}

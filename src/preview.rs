//! Terminal preview: renders every committed frame as true-color blocks.
//!
//! Lets the effects run on a development machine without the LED panel.
//! Each pixel becomes two `█` characters so cells look roughly square.
//!
//! ## Rust concepts
//! - Generic over `io::Write`, so tests render into a `Vec<u8>`
//! - Composition: the buffer logic is reused from `FrameBuffer`

use crate::grid::{FrameBuffer, PixelGrid};
use crate::{Color, PanelConfig};
use std::io::{self, Write};

const CLEAR_SCREEN: &str = "\x1b[2J";
const CURSOR_HOME: &str = "\x1b[H";
const RESET: &str = "\x1b[0m";

pub struct TerminalGrid<W: Write> {
    buffer: FrameBuffer,
    out: W,
    cleared: bool,
}

impl TerminalGrid<io::Stdout> {
    pub fn stdout(panel: PanelConfig) -> Self {
        Self::new(panel, io::stdout())
    }
}

impl<W: Write> TerminalGrid<W> {
    pub fn new(panel: PanelConfig, out: W) -> Self {
        Self {
            buffer: FrameBuffer::new(panel),
            out,
            cleared: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self) -> io::Result<()> {
        if !self.cleared {
            self.out.write_all(CLEAR_SCREEN.as_bytes())?;
            self.cleared = true;
        }
        self.out.write_all(CURSOR_HOME.as_bytes())?;

        let panel = self.buffer.panel();
        for row in self.buffer.shown().chunks(panel.cols.max(1) as usize) {
            for &Color { r, g, b } in row {
                write!(self.out, "\x1b[38;2;{r};{g};{b}m██")?;
            }
            writeln!(self.out, "{RESET}")?;
        }
        self.out.flush()
    }
}

impl<W: Write> PixelGrid for TerminalGrid<W> {
    fn panel(&self) -> PanelConfig {
        self.buffer.panel()
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        self.buffer.set_pixel(x, y, color);
    }

    fn clear_pixels(&mut self, show: bool) {
        self.buffer.clear_pixels(false);
        if show {
            self.show();
        }
    }

    fn show(&mut self) {
        self.buffer.show();
        // A broken terminal must not stop the effect; the frame is just lost.
        if let Err(e) = self.draw() {
            tracing::warn!("Failed to draw preview frame: {}", e);
        }
    }
}

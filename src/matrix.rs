//! The physical LED panel as a `PixelGrid`.
//!
//! The `rpi-led-matrix` C library is not thread-safe, so the grid is owned by
//! whichever thread plays effects and is never shared. Pixels are buffered in
//! a `FrameBuffer`; `show` copies the buffer onto the off-screen canvas and
//! swaps it in on the next vsync.
//!
//! ## Rust concepts
//! - `Option::take()` to move a value out of a field and put it back
//! - `Into` conversions at the hardware boundary (`Color` → `LedColor`)

use crate::grid::{FrameBuffer, PixelGrid};
use crate::{Color, PanelConfig, create_matrix};
use rpi_led_matrix::{LedCanvas, LedMatrix};

pub struct MatrixGrid {
    matrix: LedMatrix,
    /// Off-screen canvas. Only `None` while a swap is in flight.
    canvas: Option<LedCanvas>,
    buffer: FrameBuffer,
}

impl MatrixGrid {
    /// Initialize the panel. Fails if GPIO is unavailable (e.g. not root).
    pub fn new(panel: PanelConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let matrix = create_matrix(panel)?;
        let canvas = matrix.offscreen_canvas();
        tracing::info!("LED matrix initialized: {}x{}", panel.cols, panel.rows);
        Ok(Self {
            matrix,
            canvas: Some(canvas),
            buffer: FrameBuffer::new(panel),
        })
    }
}

/// Draw the buffered frame onto the LED canvas pixel by pixel.
fn draw_frame_to_canvas(canvas: &mut LedCanvas, buffer: &FrameBuffer) {
    let panel = buffer.panel();
    for (i, &color) in buffer.pixels().iter().enumerate() {
        let x = i as u32 % panel.cols;
        let y = i as u32 / panel.cols;
        canvas.set(x as i32, y as i32, &color.into());
    }
}

impl PixelGrid for MatrixGrid {
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
        if let Some(mut canvas) = self.canvas.take() {
            draw_frame_to_canvas(&mut canvas, &self.buffer);
            self.canvas = Some(self.matrix.swap(canvas));
        }
    }
}

impl Drop for MatrixGrid {
    /// Leave the panel dark when the program exits.
    fn drop(&mut self) {
        if let Some(mut canvas) = self.canvas.take() {
            canvas.clear();
            self.canvas = Some(self.matrix.swap(canvas));
        }
    }
}

//! Procedural lighting effects for an LED word-clock.
//!
//! The crate drives a fixed-size pixel grid (the clock face) with a small
//! library of bounded-duration animations. This module holds the shared
//! value types every part of the crate uses:
//! - Panel geometry
//! - The `Color` type and the color-wheel helpers all effects rely on
//! - Signal handling for clean shutdown of the binary
//! - Matrix initialization (behind the `hardware` feature)
//!
//! The effect engine itself lives in [`effects`], the grid contract in
//! [`grid`] and the injectable clock in [`timing`].

pub mod config;
pub mod effects;
pub mod grid;
#[cfg(feature = "hardware")]
pub mod matrix;
pub mod preview;
pub mod timing;

use rand::Rng;
#[cfg(feature = "hardware")]
use rpi_led_matrix::{LedMatrix, LedMatrixOptions, LedRuntimeOptions};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

// ── Panel configuration ────────────────────────────────────────────

/// Dimensions of the clock face.
///
/// # Rust concept: derive macros
/// `Clone, Copy` make this cheaply copyable (it's just two u32s), so every
/// effect can take its own copy instead of borrowing the grid twice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelConfig {
    pub rows: u32,
    pub cols: u32,
}

impl PanelConfig {
    pub fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }

    /// Total number of pixels on the panel.
    pub fn pixel_count(&self) -> u32 {
        self.rows * self.cols
    }

    /// Row-major buffer index of `(x, y)`, or `None` when out of bounds.
    pub fn index_of(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.cols && y < self.rows {
            Some((y * self.cols + x) as usize)
        } else {
            None
        }
    }

    /// Same as [`index_of`](Self::index_of) for signed coordinates.
    pub fn index_of_signed(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        self.index_of(x as u32, y as u32)
    }
}

impl Default for PanelConfig {
    /// An 11×10 word-clock face.
    fn default() -> Self {
        Self { rows: 10, cols: 11 }
    }
}

// ── Color ──────────────────────────────────────────────────────────

/// A 24-bit RGB color.
///
/// Black doubles as the "pick a color for me" sentinel wherever an effect
/// accepts an optional color, see [`Color::or_auto`].
///
/// Written and parsed as `#rrggbb` (the `#` is optional when parsing), which
/// is also its JSON form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Unpack a `0xRRGGBB` value. Bits above 24 are ignored.
    pub const fn from_packed(packed: u32) -> Self {
        Self {
            r: (packed >> 16) as u8,
            g: (packed >> 8) as u8,
            b: packed as u8,
        }
    }

    /// Pack into `0xRRGGBB`.
    pub const fn packed(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    pub const fn is_black(self) -> bool {
        self.r == 0 && self.g == 0 && self.b == 0
    }

    /// Map a position on the 0-255 color wheel to a color.
    ///
    /// The input is inverted first, then split into three 85-wide segments:
    /// red→blue, blue→green, green→red. Adjacent segments meet without a
    /// jump, and `0` and `255` both land on pure red.
    ///
    /// # Rust concept: shadowing
    /// `let pos = 255 - pos;` creates a new binding that hides the
    /// parameter, so the inverted value can't be confused with the input.
    pub fn from_wheel(pos: u8) -> Self {
        let pos = 255 - pos;
        match pos {
            0..85 => Self::new(255 - pos * 3, 0, pos * 3),
            85..170 => {
                let pos = pos - 85;
                Self::new(0, pos * 3, 255 - pos * 3)
            }
            _ => {
                let pos = pos - 170;
                Self::new(pos * 3, 255 - pos * 3, 0)
            }
        }
    }

    /// Scale every channel by `brightness / 255`, truncating.
    ///
    /// `255` is the identity and `0` is black.
    pub fn dim(self, brightness: u8) -> Self {
        let scale = |channel: u8| (channel as u16 * brightness as u16 / 255) as u8;
        Self {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
        }
    }

    /// Treat black as "unset": returns `None` for black, `Some(self)` otherwise.
    pub fn or_auto(self) -> Option<Self> {
        if self.is_black() { None } else { Some(self) }
    }
}

impl From<u32> for Color {
    fn from(packed: u32) -> Self {
        Self::from_packed(packed)
    }
}

impl From<Color> for u32 {
    fn from(c: Color) -> Self {
        c.packed()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.packed())
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("invalid color {s:?}, expected #rrggbb"));
        }
        u32::from_str_radix(hex, 16)
            .map(Self::from_packed)
            .map_err(|e| format!("invalid color {s:?}: {e}"))
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

/// Convert our Color to the hardware crate's LedColor at the boundary.
#[cfg(feature = "hardware")]
impl From<Color> for rpi_led_matrix::LedColor {
    fn from(c: Color) -> Self {
        rpi_led_matrix::LedColor {
            red: c.r,
            green: c.g,
            blue: c.b,
        }
    }
}

// ── Color helpers ──────────────────────────────────────────────────
// Free-function forms of the color math, used throughout the effects.

/// Color wheel lookup, see [`Color::from_wheel`].
pub fn wheel(pos: u8) -> Color {
    Color::from_wheel(pos)
}

/// Brightness scaling, see [`Color::dim`].
pub fn dim_color(color: Color, brightness: u8) -> Color {
    color.dim(brightness)
}

/// A uniformly random position on the color wheel.
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Color {
    wheel(rng.gen_range(0..=u8::MAX))
}

/// Resolve an optional color override, treating `None` and black as "auto".
pub(crate) fn requested_color(color: Option<Color>) -> Option<Color> {
    color.and_then(Color::or_auto)
}

// ── Matrix initialization ──────────────────────────────────────────

/// Create a matrix configured for our hardware:
/// Pi Zero 2 W + Adafruit Bonnet + configurable panel size.
///
/// # Rust concept: Result and the ? operator
/// This function returns `Result` because matrix initialization can fail
/// (e.g., if not running as root, or if GPIO is unavailable).
/// The caller uses `?` to propagate errors upward.
#[cfg(feature = "hardware")]
pub fn create_matrix(panel: PanelConfig) -> Result<LedMatrix, Box<dyn std::error::Error>> {
    let mut options = LedMatrixOptions::new();
    options.set_rows(panel.rows);
    options.set_cols(panel.cols);
    options.set_hardware_mapping("adafruit-hat");
    options.set_pwm_bits(8)?;
    options.set_pwm_lsb_nanoseconds(130);

    let mut rt_options = LedRuntimeOptions::new();
    rt_options.set_gpio_slowdown(2); // Pi Zero 2 W requires slowdown=2

    let matrix = LedMatrix::new(Some(options), Some(rt_options))?;
    Ok(matrix)
}

// ── Shutdown ───────────────────────────────────────────────────────

/// Set up a Ctrl+C handler that sets `running` to false.
///
/// Effects are never interrupted mid-run; the flag is only consulted
/// between effects.
pub fn setup_signal_handler() -> Result<Arc<AtomicBool>, ctrlc::Error> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    Ok(running)
}

/// Check if the playlist loop should keep running.
pub fn is_running(running: &AtomicBool) -> bool {
    running.load(Ordering::SeqCst)
}

// ── Tests ──────────────────────────────────────────────────────────

//! Runtime configuration for the `clockfx` binary.
//!
//! Settings come from an optional JSON file; command-line flags override
//! whatever the file says. Every field has a default, so an empty object
//! `{}` is a valid file.
//!
//! ```json
//! { "rows": 10, "cols": 11, "effect": "matrix-rain", "duration_ms": 4000 }
//! ```

use crate::effects::EffectType;
use crate::{Color, PanelConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How long an effect plays when nothing else is configured.
pub const DEFAULT_DURATION_MS: u64 = 4_000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EffectsConfig {
    /// Number of rows on the clock face
    pub rows: u32,
    /// Number of columns on the clock face
    pub cols: u32,
    /// Effect to play; `random` picks a new one every time
    pub effect: EffectType,
    /// Play time per effect
    pub duration_ms: u64,
    /// Color override for sparkle, color-wipe and pulse
    pub color: Option<Color>,
    /// Seed for reproducible runs
    pub seed: Option<u64>,
    /// Keep playing effects until interrupted
    pub repeat: bool,
    /// Dark time between effects when repeating
    pub pause_ms: u64,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        let panel = PanelConfig::default();
        Self {
            rows: panel.rows,
            cols: panel.cols,
            effect: EffectType::Random,
            duration_ms: DEFAULT_DURATION_MS,
            color: None,
            seed: None,
            repeat: false,
            pause_ms: 0,
        }
    }
}

impl EffectsConfig {
    /// Read a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let text = fs::read_to_string(path)
            .map_err(|e| format!("could not read {}: {}", path.display(), e))?;
        let config = Self::from_json(&text)
            .map_err(|e| format!("invalid config {}: {}", path.display(), e))?;
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn panel(&self) -> PanelConfig {
        PanelConfig::new(self.rows, self.cols)
    }

    /// Reject settings the effects can't run with.
    pub fn validate(&self) -> Result<(), String> {
        if self.rows == 0 || self.cols == 0 {
            return Err(format!(
                "panel must have at least one pixel, got {}x{}",
                self.cols, self.rows
            ));
        }
        if self.rows.checked_mul(self.cols).is_none() {
            return Err(format!("panel is too large, got {}x{}", self.cols, self.rows));
        }
        Ok(())
    }
}

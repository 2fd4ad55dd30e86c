//! clockfx: play lighting effects on an LED word-clock face.
//!
//! Plays one effect (or a random one) for a fixed duration, or with
//! `--repeat` keeps playing effects back to back until Ctrl+C. Built with the
//! `hardware` feature it drives the LED panel; otherwise it previews the
//! effects in the terminal.
//!
//! ## Usage
//! ```sh
//! clockfx --effect matrix-rain --duration-ms 4000
//! clockfx --effect random --repeat --pause-ms 500
//! sudo ./target/release/clockfx --config /etc/clockfx.json   # with --features hardware
//! ```

use clap::Parser;
use clockfx::config::EffectsConfig;
use clockfx::effects::{DisplayEffects, EffectType};
use clockfx::grid::PixelGrid;
use clockfx::timing::Clock;
use clockfx::{Color, is_running, setup_signal_handler};
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Lighting effects for an LED word-clock
#[derive(Parser)]
#[command(name = "clockfx")]
#[command(about = "Play lighting effects on an LED word-clock face")]
#[command(version)]
struct Args {
    /// Effect to play
    #[arg(long, value_enum)]
    effect: Option<EffectType>,

    /// How long each effect plays, in milliseconds
    #[arg(long)]
    duration_ms: Option<u64>,

    /// Color for sparkle, color-wipe and pulse (#rrggbb)
    #[arg(long)]
    color: Option<Color>,

    /// Number of rows on the clock face
    #[arg(long)]
    rows: Option<u32>,

    /// Number of columns on the clock face
    #[arg(long)]
    cols: Option<u32>,

    /// Seed the random generator for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Keep playing effects until Ctrl+C
    #[arg(long)]
    repeat: bool,

    /// Dark time between repeated effects, in milliseconds
    #[arg(long)]
    pause_ms: Option<u64>,

    /// JSON configuration file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Args {
    fn into_config(self) -> Result<EffectsConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => EffectsConfig::load(path)?,
            None => EffectsConfig::default(),
        };

        if let Some(effect) = self.effect {
            config.effect = effect;
        }
        if let Some(duration_ms) = self.duration_ms {
            config.duration_ms = duration_ms;
        }
        if self.color.is_some() {
            config.color = self.color;
        }
        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(cols) = self.cols {
            config.cols = cols;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(pause_ms) = self.pause_ms {
            config.pause_ms = pause_ms;
        }
        config.repeat |= self.repeat;

        config.validate()?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    // Logs go to stderr so they don't tear the terminal preview on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(false)
        .compact()
        .init();

    let config = match Args::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &EffectsConfig) -> Result<(), Box<dyn std::error::Error>> {
    let panel = config.panel();

    tracing::info!("clockfx v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Panel: {}x{}", panel.cols, panel.rows);
    tracing::info!("Effect: {} for {} ms", config.effect, config.duration_ms);

    let rng = match config.seed {
        Some(seed) => {
            tracing::info!("Seed: {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    #[cfg(feature = "hardware")]
    let grid = clockfx::matrix::MatrixGrid::new(panel)?;
    #[cfg(not(feature = "hardware"))]
    let grid = clockfx::preview::TerminalGrid::stdout(panel);

    let running = if config.repeat {
        Some(setup_signal_handler()?)
    } else {
        None
    };

    let mut effects = DisplayEffects::new(grid, clockfx::timing::SystemClock::new(), rng);
    let keep_playing = || running.as_deref().is_some_and(is_running);
    let played = play(&mut effects, config, keep_playing);

    tracing::info!("Played {} effects. Shutting down cleanly.", played);
    Ok(())
}

/// Play the configured effect once, or while `keep_playing` says so when
/// repeating. Returns the number of effects played.
///
/// `keep_playing` is only asked between effects; a running effect always
/// plays out its full duration.
fn play<G, C, R>(
    effects: &mut DisplayEffects<G, C, R>,
    config: &EffectsConfig,
    mut keep_playing: impl FnMut() -> bool,
) -> u64
where
    G: PixelGrid,
    C: Clock,
    R: Rng,
{
    let mut played_count = 0u64;
    loop {
        let effect = config.effect;
        let played = effects.play_effect_with_color(effect, config.duration_ms, config.color);
        played_count += 1;
        tracing::info!("Played {} ({} so far)", played, played_count);

        effects.grid_mut().clear_pixels(true);

        if !config.repeat || !keep_playing() {
            break;
        }
        if config.pause_ms > 0 {
            effects.clock_mut().sleep_ms(config.pause_ms);
        }
    }
    played_count
}

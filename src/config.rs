//! Playfield constants and runtime settings.
//!
//! Everything the simulation needs is a compile-time constant; the few
//! knobs a player may want to change are read once from the environment.

use std::path::PathBuf;
use std::time::Duration;

// ── Playfield ─────────────────────────────────────────────────────────────────

pub const GAME_TITLE: &str = "Ship XB11";

/// World size in pixels.
pub const WIDTH: i32 = 600;
pub const HEIGHT: i32 = 800;

/// Default simulation rate.
pub const FPS: u32 = 60;

/// The dividing line under the HUD; player missiles vanish above it.
pub const LINE_Y: i32 = 70;
pub const LINE_X: i32 = 50;

// ── Aliens ────────────────────────────────────────────────────────────────────

/// Columns in the alien formation.
pub const ALIEN_POPULATION: usize = 10;
/// Rows (alien kinds) in the formation.
pub const ALIEN_TYPE: usize = 4;

pub const FORMATION_LEADER_X: f64 = 5.0;
pub const FORMATION_LEADER_Y: f64 = 20.0;
pub const FORMATION_GAP: f64 = 20.0;

/// Vertical band aliens bounce inside once the level exceeds `ALIEN_TYPE`.
pub const ALIEN_BAND_TOP: f64 = 72.0;
pub const ALIEN_BAND_BOTTOM: f64 = 600.0;

// ── Lives & scoring ───────────────────────────────────────────────────────────

pub const START_LIVES: u32 = 3;
pub const MAX_LIVES: u32 = 6;

pub const ALIEN_POINTS: u32 = 20;
pub const ASTEROID_POINTS: u32 = 20;
pub const BIGBLUE_POINTS: u32 = 100;

/// Digits shown for each of the score and high score.
pub const SCORE_DIGITS: usize = 7;

// ── Random events ─────────────────────────────────────────────────────────────

/// Missile chance per tick is `level / FIRE_ROLL_RANGE`.
pub const FIRE_ROLL_RANGE: u32 = 1024;
/// Rare events roll in `0..RARE_ROLL_RANGE`.
pub const RARE_ROLL_RANGE: u32 = 8192;
/// Big-blue appears when the roll exceeds this.
pub const BIGBLUE_SPAWN_THRESHOLD: u32 = 8189;
/// Above level `ALIEN_TYPE`, an alien starts sinking when the roll exceeds this.
pub const ALIEN_DRIFT_THRESHOLD: u32 = 8189;
pub const ASTEROID_SPAWN_THRESHOLD: u32 = 8182;

// ── Projectiles & movers ──────────────────────────────────────────────────────

pub const PLAYER_MISSILE_SPEED: f64 = 5.0;
pub const ALIEN_MISSILE_SPEED: i32 = 2;
pub const BIGBLUE_MISSILE_SPEED: f64 = 2.0;
pub const BIGBLUE_MISSILE_DROP: f64 = 101.0;
pub const BIGBLUE_SPEED: f64 = -2.0;
/// Ticks big-blue stays armed after a first hit before it recovers.
pub const BIGBLUE_HIT_TIMEOUT: u32 = 500;

/// Horizontal offsets of the player's four missile launchers.
pub const LAUNCHER_X: [f64; 4] = [3.0, 9.0, 22.0, 28.0];

pub const PLAYER_STEP: i32 = 2;
pub const PLAYER_BOTTOM_MARGIN: f64 = 20.0;
pub const LIVES_Y: f64 = 10.0;

pub const QUARTER_DX: f64 = 0.25;

// ── Terminal mapping ──────────────────────────────────────────────────────────

/// World pixels covered by one terminal cell.
pub const CELL_WIDTH: i32 = 8;
pub const CELL_HEIGHT: i32 = 16;

pub const TERMINAL_COLS: u16 = (WIDTH / CELL_WIDTH) as u16;
pub const TERMINAL_ROWS: u16 = (HEIGHT / CELL_HEIGHT) as u16;

// ── Runtime settings ──────────────────────────────────────────────────────────

const ENV_DATADIR: &str = "SHIPXB11_DATADIR";
const ENV_FPS: &str = "SHIPXB11_FPS";
const ENV_SOUND: &str = "SHIPXB11_SOUND";
const ENV_SEED: &str = "SHIPXB11_SEED";
const ENV_LOG: &str = "SHIPXB11_LOG";

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub fps: u32,
    pub sound: bool,
    pub seed: Option<u64>,
    pub log_path: PathBuf,
    /// Complaints about rejected values, logged once the logger is up.
    pub warnings: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("assets"),
            fps: FPS,
            sound: true,
            seed: None,
            log_path: std::env::temp_dir().join("ship_xb11.log"),
            warnings: Vec::new(),
        }
    }
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Bad values keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        if let Some(dir) = lookup(ENV_DATADIR) {
            settings.data_dir = PathBuf::from(dir);
        }

        if let Some(raw) = lookup(ENV_FPS) {
            match raw.trim().parse::<u32>() {
                Ok(fps) => settings.fps = fps.clamp(1, 240),
                Err(_) => settings
                    .warnings
                    .push(format!("{}={:?} is not a number; using {}", ENV_FPS, raw, FPS)),
            }
        }

        if let Some(raw) = lookup(ENV_SOUND) {
            settings.sound = !matches!(
                raw.trim().to_lowercase().as_str(),
                "0" | "off" | "false" | "no"
            );
        }

        if let Some(raw) = lookup(ENV_SEED) {
            match raw.trim().parse::<u64>() {
                Ok(seed) => settings.seed = Some(seed),
                Err(_) => settings.warnings.push(format!(
                    "{}={:?} is not a u64; seeding from entropy",
                    ENV_SEED, raw
                )),
            }
        }

        if let Some(path) = lookup(ENV_LOG) {
            settings.log_path = PathBuf::from(path);
        }

        settings
    }

    /// Send the collected warnings to the log.
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            log::warn!("{}", warning);
        }
    }

    /// Wall-clock length of one simulation tick.
    pub fn tick_duration(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(self.fps.max(1)))
    }
}

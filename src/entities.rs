//! Gameplay entity types. Pure data, no simulation logic.

use crate::config::QUARTER_DX;
use crate::sprite::Sprite;

// ── Game phase ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the first key press after launch.
    Starting,
    Playing,
    /// Paused by the player; P resumes.
    Paused,
    /// Lives ran out; only N (or Q) leaves this phase.
    GameOver,
}

impl Phase {
    pub fn is_paused(self) -> bool {
        !matches!(self, Phase::Playing)
    }
}

// ── Held direction keys ───────────────────────────────────────────────────────

/// Bitmask of the direction the player is holding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyIntent(u8);

impl KeyIntent {
    pub const NONE: KeyIntent = KeyIntent(0);
    pub const RIGHT: KeyIntent = KeyIntent(0x1);
    pub const LEFT: KeyIntent = KeyIntent(0x4);

    pub fn bits(self) -> u8 {
        self.0
    }

    /// Clear one direction, leaving any other bit alone.
    pub fn release(&mut self, direction: KeyIntent) {
        self.0 &= !direction.0;
    }
}

// ── Craft ─────────────────────────────────────────────────────────────────────

/// A sprite with explosion and missile state attached.
#[derive(Clone, Debug, PartialEq)]
pub struct Craft {
    pub sprite: Sprite,
    pub is_exploding: bool,
    pub missile_is_launched: bool,
    /// Position of this craft's missile while it is in flight.
    pub missile_x: i32,
    pub missile_y: i32,
    /// Held direction; only meaningful for the player.
    pub key: KeyIntent,
}

impl Craft {
    pub fn new(sprite: Sprite) -> Self {
        Self {
            sprite,
            is_exploding: false,
            missile_is_launched: false,
            missile_x: 0,
            missile_y: 0,
            key: KeyIntent::NONE,
        }
    }

    /// Forget any explosion or missile in progress.
    pub fn clear_action(&mut self) {
        self.is_exploding = false;
        self.missile_is_launched = false;
    }
}

// ── Asteroid quarters ─────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Corner {
    UpperLeft,
    UpperRight,
    LowerLeft,
    LowerRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::UpperLeft,
        Corner::UpperRight,
        Corner::LowerLeft,
        Corner::LowerRight,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_left(self) -> bool {
        matches!(self, Corner::UpperLeft | Corner::LowerLeft)
    }

    pub fn is_upper(self) -> bool {
        matches!(self, Corner::UpperLeft | Corner::UpperRight)
    }

    /// Launch velocity: drift away sideways, fly off vertically.
    pub fn velocity(self) -> (f64, f64) {
        let dx = if self.is_left() { -QUARTER_DX } else { QUARTER_DX };
        let dy = if self.is_upper() { -1.0 } else { 1.0 };
        (dx, dy)
    }

    /// Asset stem for this fragment.
    pub fn asset_name(self) -> &'static str {
        match self {
            Corner::UpperLeft => "ul",
            Corner::UpperRight => "ur",
            Corner::LowerLeft => "ll",
            Corner::LowerRight => "lr",
        }
    }
}

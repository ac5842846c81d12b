//! The root game aggregate: every craft and sprite, lives, level and score,
//! plus the resets and phase transitions driven by player input.
//!
//! Visual resources are loaded once into a `SpriteSet` and reused by every
//! reset and every new game.

use std::path::Path;

use rand::Rng;

use crate::backend::{Graphics, InputEvent, Key};
use crate::config::{
    ALIEN_POPULATION, ALIEN_TYPE, FORMATION_GAP, FORMATION_LEADER_X, FORMATION_LEADER_Y, HEIGHT,
    LAUNCHER_X, LINE_X, LINE_Y, MAX_LIVES, PLAYER_BOTTOM_MARGIN, START_LIVES, WIDTH,
};
use crate::entities::{Corner, Craft, KeyIntent, Phase};
use crate::error::StartupError;
use crate::score::Score;
use crate::sprite::{Sprite, SpriteFrames};

/// Alien kinds, top row first.
pub const ALIEN_ASSETS: [&str; ALIEN_TYPE] = ["purple", "green", "yellow", "cyan"];

// ── Loaded visual resources ───────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct SpriteSet {
    pub bigblue: SpriteFrames,
    pub player: SpriteFrames,
    pub aliens: [SpriteFrames; ALIEN_TYPE],
    pub background: SpriteFrames,
    pub explosion: SpriteFrames,
    pub missile: SpriteFrames,
    pub player_missile: SpriteFrames,
    pub line: SpriteFrames,
    pub big_blue_missile: SpriteFrames,
    pub asteroid: SpriteFrames,
    pub quarters: [SpriteFrames; 4],
}

impl SpriteSet {
    /// Load every resource from `dir`. Any missing base frame is fatal.
    pub fn load<G: Graphics>(gfx: &mut G, dir: &Path) -> Result<Self, StartupError> {
        let mut load = |stem: &str| {
            let path = dir.join(format!("{}.{}", stem, G::FRAME_EXTENSION));
            let frames = gfx.load_visual_resource(&path)?;
            log::debug!(
                "loaded {} ({} frames, {}x{})",
                path.display(),
                frames.frames.len(),
                frames.width,
                frames.height
            );
            Ok::<_, StartupError>(frames)
        };

        Ok(Self {
            bigblue: load("bigblue")?,
            player: load("player")?,
            aliens: [
                load(ALIEN_ASSETS[0])?,
                load(ALIEN_ASSETS[1])?,
                load(ALIEN_ASSETS[2])?,
                load(ALIEN_ASSETS[3])?,
            ],
            background: load("background")?,
            explosion: load("explosion")?,
            missile: load("missile")?,
            player_missile: load("playmis")?,
            line: load("line")?,
            big_blue_missile: load("missiles")?,
            asteroid: load("asteroid")?,
            quarters: [
                load(Corner::UpperLeft.asset_name())?,
                load(Corner::UpperRight.asset_name())?,
                load(Corner::LowerLeft.asset_name())?,
                load(Corner::LowerRight.asset_name())?,
            ],
        })
    }

    /// Placeholder frames with the shipped asset sizes, for running the
    /// simulation without any backend.
    pub fn blank() -> Self {
        Self {
            bigblue: SpriteFrames::blank(96, 96, 4),
            player: SpriteFrames::blank(32, 32, 2),
            aliens: std::array::from_fn(|_| SpriteFrames::blank(32, 32, 2)),
            background: SpriteFrames::blank(WIDTH, HEIGHT, 1),
            explosion: SpriteFrames::blank(48, 48, 8),
            missile: SpriteFrames::blank(8, 16, 2),
            player_missile: SpriteFrames::blank(8, 16, 2),
            line: SpriteFrames::blank(496, 16, 1),
            big_blue_missile: SpriteFrames::blank(24, 16, 1),
            asteroid: SpriteFrames::blank(48, 64, 1),
            quarters: std::array::from_fn(|_| SpriteFrames::blank(24, 32, 2)),
        }
    }
}

// ── Input response ────────────────────────────────────────────────────────────

/// What the frame loop must do after an input event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Response {
    Continue,
    /// The game just paused; freeze the current frame as a backdrop.
    CaptureBackdrop,
    Quit,
}

// ── Game ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Game {
    pub phase: Phase,
    pub aliens: [[Craft; ALIEN_POPULATION]; ALIEN_TYPE],
    pub asteroid: Craft,
    pub bigblue: Craft,
    pub player: Craft,
    /// Asteroid fragments, indexed by `Corner::index`.
    pub quarters: [Craft; 4],
    pub alien_count: usize,
    /// Number of active alien rows.
    pub alien_type: usize,
    pub level: u32,
    pub lives: u32,
    /// Quarters still on screen.
    pub qcount: u32,
    pub score: Score,
    pub background: Sprite,
    pub explosion: Sprite,
    pub line: Sprite,
    /// Shared by every alien missile.
    pub missile: Sprite,
    pub big_blue_missile: Sprite,
    pub player_missile: Sprite,
    /// Vertical scroll of the background, in pixels.
    pub background_offset: i32,
    /// Where the player ship is easing towards.
    pub player_target_x: i32,
    /// Which launcher fires next.
    pub launcher_index: usize,
    /// Ticks big-blue has spent armed after a first hit.
    pub bigblue_hit_time: u32,
    pub audio_enabled: bool,
    /// An explosion sound was cued and its explosion has not finished yet.
    pub sound_playing: bool,
}

impl Game {
    /// Build a fresh game waiting for its first key press.
    pub fn new(sprites: SpriteSet, audio_enabled: bool) -> Self {
        let mut player = Craft::new(Sprite::new(sprites.player));
        player.sprite.x = (WIDTH / 2 - player.sprite.width / 2) as f64;
        player.sprite.y = (HEIGHT - player.sprite.height) as f64 - PLAYER_BOTTOM_MARGIN;
        player.sprite.is_animated = true;
        player.sprite.frame_delay = 1;
        player.sprite.is_visible = true;

        let aliens = std::array::from_fn(|row| {
            std::array::from_fn(|_| {
                let mut sprite = Sprite::new(sprites.aliens[row].clone());
                sprite.is_animated = true;
                Craft::new(sprite)
            })
        });

        let mut bigblue = Craft::new(Sprite::new(sprites.bigblue));
        bigblue.sprite.frame_delay = 3;

        let mut explosion = Sprite::new(sprites.explosion);
        explosion.is_animated = true;

        let mut missile = Sprite::new(sprites.missile);
        missile.frame_delay = 3;
        missile.is_animated = true;
        missile.is_visible = true;

        let mut player_missile = Sprite::new(sprites.player_missile);
        player_missile.frame_delay = 3;
        player_missile.is_animated = true;

        let mut line = Sprite::new(sprites.line);
        line.move_to(LINE_X as f64, LINE_Y as f64);
        line.is_visible = true;

        let quarters = sprites.quarters.map(|frames| {
            let mut sprite = Sprite::new(frames);
            sprite.is_animated = true;
            Craft::new(sprite)
        });

        let mut game = Self {
            phase: Phase::Starting,
            aliens,
            asteroid: Craft::new(Sprite::new(sprites.asteroid)),
            bigblue,
            player,
            quarters,
            alien_count: ALIEN_POPULATION,
            alien_type: 1,
            level: 1,
            lives: START_LIVES,
            qcount: 0,
            score: Score::new(),
            background: Sprite::new(sprites.background),
            explosion,
            line,
            missile,
            big_blue_missile: Sprite::new(sprites.big_blue_missile),
            player_missile,
            background_offset: 0,
            player_target_x: WIDTH / 2,
            launcher_index: 0,
            bigblue_hit_time: 0,
            audio_enabled,
            sound_playing: false,
        };
        game.reset_game();
        game
    }

    pub fn quarter(&self, corner: Corner) -> &Craft {
        &self.quarters[corner.index()]
    }

    pub fn quarter_mut(&mut self, corner: Corner) -> &mut Craft {
        &mut self.quarters[corner.index()]
    }

    /// Active alien rows, top first.
    pub fn active_aliens(&self) -> impl Iterator<Item = &Craft> {
        self.aliens[..self.alien_type]
            .iter()
            .flat_map(move |row| row[..self.alien_count].iter())
    }

    pub fn aliens_alive(&self) -> usize {
        self.active_aliens().filter(|a| a.sprite.is_visible).count()
    }

    /// Some craft still has an explosion running.
    pub fn any_exploding(&self) -> bool {
        self.active_aliens().any(|a| a.is_exploding)
            || self.bigblue.is_exploding
            || self.asteroid.is_exploding
            || self.player.is_exploding
    }

    // ── Resets ────────────────────────────────────────────────────────────────

    /// Rewind the shared explosion once no craft is using it, so a blast cut
    /// short by a reset neither lingers on screen nor shortens the next one.
    pub fn settle_explosion(&mut self) {
        if self.any_exploding() {
            return;
        }
        self.explosion.is_visible = false;
        self.explosion.current_frame = 0;
        self.explosion.next_frame_time = 0;
        self.sound_playing = false;
    }

    /// Back to level 1 with three lives. Keeps the high score and the
    /// player's current position.
    pub fn reset_game(&mut self) {
        self.alien_count = ALIEN_POPULATION;
        self.level = 1;
        self.lives = START_LIVES;
        self.score.reset_current();
        self.alien_type = 1;
        self.reset_aliens();
        self.reset_bigblue();
        self.reset_player();
        self.kill_asteroid();
        self.player.clear_action();
        self.settle_explosion();
    }

    /// Put every active alien back in formation.
    pub fn reset_aliens(&mut self) {
        for (row, aliens) in self.aliens.iter_mut().enumerate().take(self.alien_type) {
            for (col, alien) in aliens.iter_mut().enumerate().take(self.alien_count) {
                alien.missile_is_launched = false;
                alien.is_exploding = false;

                let sprite = &mut alien.sprite;
                sprite.is_visible = true;
                sprite.dx = if row & 1 == 1 { 2.0 } else { -2.0 };
                sprite.dy = 0.1;
                sprite.x = FORMATION_LEADER_X + col as f64 * (sprite.width as f64 + FORMATION_GAP);
                sprite.y =
                    FORMATION_LEADER_Y + (row + 1) as f64 * (sprite.height as f64 + FORMATION_GAP);
            }
        }
        self.settle_explosion();
    }

    /// Park big-blue off the right edge, hidden, with no missile out.
    pub fn reset_bigblue(&mut self) {
        self.bigblue.clear_action();
        self.big_blue_missile.is_visible = false;

        let sprite = &mut self.bigblue.sprite;
        sprite.is_visible = false;
        sprite.x = WIDTH as f64;
        sprite.y = (HEIGHT / 2) as f64;
        sprite.frame_delay = 3;
        self.settle_explosion();
    }

    pub fn reset_player(&mut self) {
        self.player_missile.move_to(0.0, 0.0);
        self.player_missile.is_visible = false;
        self.player.sprite.is_visible = true;
    }

    /// Remove the asteroid and all of its fragments.
    pub fn kill_asteroid(&mut self) {
        self.asteroid.sprite.is_visible = false;
        self.asteroid.is_exploding = false;
        for quarter in &mut self.quarters {
            quarter.sprite.is_visible = false;
        }
        self.qcount = 0;
        self.settle_explosion();
    }

    /// Send a new asteroid in from a random side.
    pub fn reset_asteroid<R: Rng>(&mut self, rng: &mut R) {
        let from_left = rng.gen_bool(0.5);
        let drop = rng.gen_range(0..1024) & 128;

        self.asteroid.clear_action();
        let sprite = &mut self.asteroid.sprite;
        if from_left {
            sprite.x = -(sprite.width as f64);
            sprite.dx = 1.0;
        } else {
            sprite.x = WIDTH as f64;
            sprite.dx = -1.0;
        }
        sprite.y = (LINE_Y + drop) as f64;
        sprite.dy = 1.0;
        sprite.is_visible = true;
        self.settle_explosion();
    }

    /// Split the asteroid into four fragments at its current position.
    pub fn reset_asteroid_quarters(&mut self) {
        let x = self.asteroid.sprite.x.trunc();
        let y = self.asteroid.sprite.y.trunc();
        let half_w = (self.asteroid.sprite.width / 2) as f64;
        let half_h = (self.asteroid.sprite.height / 2) as f64;

        for corner in Corner::ALL {
            let quarter = &mut self.quarters[corner.index()];
            quarter.clear_action();

            let (dx, dy) = corner.velocity();
            let sprite = &mut quarter.sprite;
            sprite.x = if corner.is_left() { x } else { x + half_w };
            sprite.y = if corner.is_upper() { y } else { y + half_h };
            sprite.dx = dx;
            sprite.dy = dy;
            sprite.is_visible = true;
        }

        self.qcount = 4;
    }

    /// All active aliens cleared: harder level, maybe another row and life.
    pub fn level_up(&mut self) {
        self.level += 1;

        if self.alien_type < ALIEN_TYPE {
            self.alien_type += 1;
        }

        if self.lives < MAX_LIVES {
            self.lives += 1;
        }

        log::info!(
            "level {} ({} alien rows, {} lives)",
            self.level,
            self.alien_type,
            self.lives
        );
        self.reset_aliens();
    }

    /// Fire from the next launcher if no player missile is in flight.
    pub fn launch_missile(&mut self) {
        if self.player_missile.is_visible {
            return;
        }

        let offset = LAUNCHER_X[self.launcher_index & 3];
        self.player_missile.is_visible = true;
        self.player_missile.x = self.player.sprite.x + offset;
        self.player_missile.y = self.player.sprite.y;
        self.launcher_index = self.launcher_index.wrapping_add(1);
    }

    // ── Phase transitions ─────────────────────────────────────────────────────

    pub fn is_paused(&self) -> bool {
        self.phase.is_paused()
    }

    pub fn handle_event(&mut self, event: InputEvent) -> Response {
        match event {
            InputEvent::Quit => Response::Quit,
            InputEvent::KeyDown(key) => self.key_down(key),
            InputEvent::KeyUp(key) => {
                self.key_up(key);
                Response::Continue
            }
        }
    }

    fn key_down(&mut self, key: Key) -> Response {
        // The very first key press only dismisses the start screen.
        if self.phase == Phase::Starting {
            self.phase = Phase::Playing;
            log::info!("game started");
            return Response::Continue;
        }

        if self.is_paused() && !matches!(key, Key::Pause | Key::NewGame | Key::Quit) {
            return Response::Continue;
        }

        match key {
            Key::Left => self.player.key = KeyIntent::LEFT,
            Key::Right => self.player.key = KeyIntent::RIGHT,
            Key::Fire => self.launch_missile(),
            Key::NewGame => self.restart(),
            Key::Pause => return self.toggle_pause(),
            Key::Quit => return Response::Quit,
            Key::Other => {}
        }

        Response::Continue
    }

    fn key_up(&mut self, key: Key) {
        match key {
            Key::Left => self.player.key.release(KeyIntent::LEFT),
            Key::Right => self.player.key.release(KeyIntent::RIGHT),
            _ => {}
        }
    }

    /// Pause or resume. Does nothing once the lives have run out.
    pub fn toggle_pause(&mut self) -> Response {
        if self.lives == 0 {
            return Response::Continue;
        }

        match self.phase {
            Phase::Playing => {
                self.phase = Phase::Paused;
                log::info!("paused");
                Response::CaptureBackdrop
            }
            Phase::Paused | Phase::GameOver => {
                self.phase = Phase::Playing;
                log::info!("resumed");
                Response::Continue
            }
            Phase::Starting => Response::Continue,
        }
    }

    /// Start a new game straight away, keeping the high score.
    pub fn restart(&mut self) {
        self.reset_game();
        self.phase = Phase::Playing;
        log::info!("new game (high score {})", self.score.high);
    }

    /// Freeze the game if the last life is gone. Returns true when the
    /// game just ended and a backdrop should be captured.
    pub fn check_game_over(&mut self) -> bool {
        if self.phase != Phase::Playing || self.lives != 0 {
            return false;
        }

        self.phase = Phase::GameOver;
        log::info!(
            "game over at level {} with {} points",
            self.level,
            self.score.score
        );
        true
    }
}

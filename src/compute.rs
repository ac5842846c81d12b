//! Per-tick simulation.
//!
//! `tick` advances the whole game by one frame: animation steps, explosion
//! lifecycles, the score odometer, random arrivals, then movement and hit
//! detection for every entity. All randomness comes through the injected
//! `rng` so a seeded generator replays a game exactly.
//!
//! The individual steps are public so tests can drive one concern at a
//! time; `tick` calls them in a fixed order.

use rand::Rng;

use crate::collision::{boxes_intersect, intersects, Bounds};
use crate::config::{
    ALIEN_BAND_BOTTOM, ALIEN_BAND_TOP, ALIEN_DRIFT_THRESHOLD, ALIEN_MISSILE_SPEED, ALIEN_POINTS,
    ALIEN_TYPE, ASTEROID_POINTS, ASTEROID_SPAWN_THRESHOLD, BIGBLUE_HIT_TIMEOUT,
    BIGBLUE_MISSILE_DROP, BIGBLUE_MISSILE_SPEED, BIGBLUE_POINTS, BIGBLUE_SPAWN_THRESHOLD,
    BIGBLUE_SPEED, FIRE_ROLL_RANGE, HEIGHT, LINE_Y, PLAYER_MISSILE_SPEED, PLAYER_STEP,
    RARE_ROLL_RANGE, WIDTH,
};
use crate::entities::{Corner, Craft, KeyIntent};
use crate::game::Game;
use crate::sprite::Sprite;

/// Side effects of one tick that the frame loop has to act on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Start the explosion sound.
    pub explosion_sound: bool,
    pub levelled_up: bool,
}

/// Advance the simulation by one frame.
pub fn tick<R: Rng>(game: &mut Game, rng: &mut R) -> TickReport {
    let mut report = TickReport::default();

    scroll_background(game);
    advance_animations(game);
    report.explosion_sound = advance_explosions(game);
    game.score.chase();

    do_irregular_actions(game, rng);

    move_bigblue(game);
    move_big_blue_missile(game, rng);
    report.levelled_up = move_aliens(game, rng);
    move_player(game);
    move_player_missile(game);
    move_asteroid(game);
    move_asteroid_quarters(game);

    report
}

fn roll<R: Rng>(rng: &mut R, range: u32) -> u32 {
    rng.gen_range(0..range)
}

// ── Animation ─────────────────────────────────────────────────────────────────

pub fn scroll_background(game: &mut Game) {
    game.background_offset += 1;
    if game.background_offset >= HEIGHT {
        game.background_offset = 0;
    }
}

/// One animation step for every sprite that is on screen.
pub fn advance_animations(game: &mut Game) {
    let (rows, cols) = (game.alien_type, game.alien_count);
    for row in &mut game.aliens[..rows] {
        for alien in &mut row[..cols] {
            alien.sprite.advance_frame();
        }
    }

    game.missile.advance_frame();
    game.bigblue.sprite.advance_frame();
    game.asteroid.sprite.advance_frame();
    for quarter in &mut game.quarters {
        quarter.sprite.advance_frame();
    }
    game.player.sprite.advance_frame();
    game.player_missile.advance_frame();
    game.big_blue_missile.advance_frame();
}

// ── Explosions ────────────────────────────────────────────────────────────────

/// Outcome of one explosion step for one craft.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Blast {
    Burning,
    Finished,
}

/// Play one step of the shared explosion over `craft`. Craft that are
/// off screen hold their explosion until they are visible again.
fn explode(explosion: &mut Sprite, craft: &Craft) -> Blast {
    let (cx, cy) = craft.sprite.centre();
    explosion.is_visible = true;
    explosion.x = cx - (explosion.width / 2) as f64;
    explosion.y = cy - (explosion.height / 2) as f64;

    if !craft.sprite.is_visible {
        return Blast::Burning;
    }

    if explosion.current_frame == explosion.frame_count {
        explosion.current_frame = 0;
        explosion.next_frame_time = 0;
        explosion.is_visible = false;
        return Blast::Finished;
    }

    explosion.advance_frame();
    Blast::Burning
}

/// Step every explosion in progress. A finished explosion hides its craft,
/// except the player, who loses a life instead while any remain.
///
/// Returns true when the explosion sound should start.
pub fn advance_explosions(game: &mut Game) -> bool {
    let mut cue = false;

    let (rows, cols) = (game.alien_type, game.alien_count);
    for row in 0..rows {
        for col in 0..cols {
            if game.aliens[row][col].is_exploding {
                let blast = explode(&mut game.explosion, &game.aliens[row][col]);
                cue |= finish_blast(game, blast, |g| &mut g.aliens[row][col], false);
            }
        }
    }

    if game.bigblue.is_exploding {
        let blast = explode(&mut game.explosion, &game.bigblue);
        cue |= finish_blast(game, blast, |g| &mut g.bigblue, false);
    }

    if game.asteroid.is_exploding {
        let blast = explode(&mut game.explosion, &game.asteroid);
        cue |= finish_blast(game, blast, |g| &mut g.asteroid, false);
    }

    if game.player.is_exploding {
        let blast = explode(&mut game.explosion, &game.player);
        cue |= finish_blast(game, blast, |g| &mut g.player, true);
    }

    cue
}

fn finish_blast<F>(game: &mut Game, blast: Blast, craft: F, is_player: bool) -> bool
where
    F: Fn(&mut Game) -> &mut Craft,
{
    match blast {
        Blast::Finished => {
            let spare_life = is_player && game.lives > 0;
            if spare_life {
                game.lives -= 1;
            }

            let craft = craft(game);
            craft.is_exploding = false;
            if !spare_life {
                craft.sprite.is_visible = false;
            }

            game.sound_playing = false;
            false
        }
        Blast::Burning => {
            if !game.audio_enabled || game.sound_playing {
                return false;
            }
            game.sound_playing = true;
            true
        }
    }
}

// ── Random arrivals ───────────────────────────────────────────────────────────

/// Occasionally bring on big-blue or a new asteroid.
pub fn do_irregular_actions<R: Rng>(game: &mut Game, rng: &mut R) {
    if !game.bigblue.sprite.is_visible && roll(rng, RARE_ROLL_RANGE) > BIGBLUE_SPAWN_THRESHOLD {
        game.reset_bigblue();
        game.bigblue.sprite.is_visible = true;
        log::debug!("big-blue arrives");
    }

    if !game.asteroid.sprite.is_visible
        && game.qcount == 0
        && roll(rng, RARE_ROLL_RANGE) > ASTEROID_SPAWN_THRESHOLD
    {
        game.reset_asteroid(rng);
        log::debug!("asteroid arrives");
    }
}

// ── Big-blue ──────────────────────────────────────────────────────────────────

pub fn move_bigblue(game: &mut Game) {
    if game.bigblue.sprite.is_animated {
        game.bigblue_hit_time += 1;

        if game.bigblue_hit_time == BIGBLUE_HIT_TIMEOUT {
            game.bigblue.sprite.stop_animation();
            game.bigblue_hit_time = 0;
        }
    } else {
        game.bigblue_hit_time = 0;
    }

    let sprite = &mut game.bigblue.sprite;
    sprite.x += BIGBLUE_SPEED;

    if sprite.x < -(sprite.width as f64) {
        sprite.x = WIDTH as f64;
    }
}

/// A hit arms big-blue; a hit while armed destroys it.
pub fn hit_bigblue(game: &mut Game) {
    if game.bigblue.sprite.is_animated {
        game.bigblue.sprite.stop_animation();
        game.bigblue.is_exploding = true;
        game.score.add(BIGBLUE_POINTS);
    } else {
        game.bigblue.sprite.is_animated = true;
    }
}

pub fn move_big_blue_missile<R: Rng>(game: &mut Game, rng: &mut R) {
    if game.big_blue_missile.is_visible {
        game.big_blue_missile.y += BIGBLUE_MISSILE_SPEED;

        if game.big_blue_missile.y > HEIGHT as f64 {
            game.big_blue_missile.y = 0.0;
            game.big_blue_missile.is_visible = false;
            return;
        }

        if intersects(&game.big_blue_missile, &game.player.sprite) {
            game.big_blue_missile.y = 0.0;
            game.big_blue_missile.is_visible = false;
            game.player.is_exploding = true;
        }

        return;
    }

    if roll(rng, FIRE_ROLL_RANGE) < game.level && game.bigblue.sprite.is_visible {
        game.big_blue_missile.x = game.bigblue.sprite.x;
        game.big_blue_missile.y = game.bigblue.sprite.y + BIGBLUE_MISSILE_DROP;
        game.big_blue_missile.is_visible = true;
    }
}

// ── Aliens ────────────────────────────────────────────────────────────────────

/// Move every active alien and its missile and resolve their hits.
/// Levels up when no alien is left; returns true if it did.
pub fn move_aliens<R: Rng>(game: &mut Game, rng: &mut R) -> bool {
    let mut alive = 0;

    for row in 0..game.alien_type {
        for col in 0..game.alien_count {
            move_alien_missile(game, row, col);
            check_if_alien_missile_hit_player(game, row, col);

            if game.aliens[row][col].sprite.is_visible {
                alive += 1;
                check_if_player_missile_hit_alien(game, row, col);
                check_if_quarters_hit_alien(game, row, col);
                move_alien_ship(game, row, col, rng);
                fire_alien_ship_missile(game, row, col, rng);
            }
        }
    }

    if alive == 0 {
        game.level_up();
        return true;
    }

    false
}

fn move_alien_missile(game: &mut Game, row: usize, col: usize) {
    let alien = &mut game.aliens[row][col];
    if !alien.missile_is_launched {
        return;
    }

    alien.missile_y += ALIEN_MISSILE_SPEED;

    if alien.missile_y > HEIGHT {
        alien.missile_is_launched = false;
    }
}

/// Where an alien's missile is, sized like the shared missile sprite.
pub fn alien_missile_bounds(game: &Game, alien: &Craft) -> Bounds {
    Bounds::new(
        alien.missile_x as f64,
        alien.missile_y as f64,
        game.missile.width,
        game.missile.height,
    )
}

fn check_if_alien_missile_hit_player(game: &mut Game, row: usize, col: usize) {
    let alien = &game.aliens[row][col];
    if !alien.missile_is_launched {
        return;
    }

    let missile = alien_missile_bounds(game, alien);
    if boxes_intersect(missile, game.player.sprite.bounds()) {
        game.aliens[row][col].missile_is_launched = false;
        game.player.is_exploding = true;
    }
}

fn check_if_player_missile_hit_alien(game: &mut Game, row: usize, col: usize) {
    let alien = &mut game.aliens[row][col];
    if !game.player_missile.is_visible || !alien.sprite.is_visible {
        return;
    }

    if intersects(&alien.sprite, &game.player_missile) {
        alien.is_exploding = true;
        game.player_missile.is_visible = false;
        game.score.add(ALIEN_POINTS);
    }
}

fn check_if_quarters_hit_alien(game: &mut Game, row: usize, col: usize) {
    let alien = &mut game.aliens[row][col];
    if !alien.sprite.is_visible {
        return;
    }

    for quarter in &game.quarters {
        if !quarter.sprite.is_visible || alien.is_exploding {
            continue;
        }

        if intersects(&alien.sprite, &quarter.sprite) {
            alien.is_exploding = true;
            game.score.add(ALIEN_POINTS);
        }
    }
}

fn move_alien_ship<R: Rng>(game: &mut Game, row: usize, col: usize, rng: &mut R) {
    let level = game.level;
    let sprite = &mut game.aliens[row][col].sprite;
    sprite.step();

    if sprite.x > (WIDTH - sprite.width) as f64 || sprite.x < 0.0 {
        sprite.dx = -sprite.dx;
    }

    if level <= ALIEN_TYPE as u32 {
        return;
    }

    if roll(rng, RARE_ROLL_RANGE) > ALIEN_DRIFT_THRESHOLD {
        sprite.dy = 1.0;
    }

    if sprite.y > ALIEN_BAND_BOTTOM || sprite.y < ALIEN_BAND_TOP {
        sprite.dy = -sprite.dy;
    }
}

fn fire_alien_ship_missile<R: Rng>(game: &mut Game, row: usize, col: usize, rng: &mut R) {
    let alien = &mut game.aliens[row][col];
    if roll(rng, FIRE_ROLL_RANGE) >= game.level || alien.missile_is_launched {
        return;
    }

    alien.missile_is_launched = true;
    alien.missile_x = (alien.sprite.x + (alien.sprite.width / 2) as f64) as i32;
    alien.missile_y = (alien.sprite.y + alien.sprite.height as f64) as i32;
}

// ── Player ────────────────────────────────────────────────────────────────────

/// The held key drags a target along at 2 px per tick; the ship eases
/// after it 1 px per tick and never leaves the screen.
pub fn move_player(game: &mut Game) {
    let key = game.player.key;
    let x = game.player.sprite.x;
    let target = game.player_target_x;

    if key == KeyIntent::LEFT && target as f64 >= x {
        game.player_target_x -= PLAYER_STEP;
    } else if key == KeyIntent::RIGHT && target as f64 <= x {
        game.player_target_x += PLAYER_STEP;
    }

    let target = game.player_target_x as f64;
    let sprite = &mut game.player.sprite;
    if sprite.x > target {
        if sprite.x > 0.0 {
            sprite.x -= 1.0;
        }
    } else if sprite.x < target && sprite.x < (WIDTH - sprite.width) as f64 {
        sprite.x += 1.0;
    }
}

pub fn move_player_missile(game: &mut Game) {
    if !game.player_missile.is_visible {
        return;
    }

    game.player_missile.y -= PLAYER_MISSILE_SPEED;

    if game.player_missile.y < LINE_Y as f64 {
        game.player_missile.is_visible = false;
    }

    check_if_player_missile_hit_bigblue(game);
}

fn check_if_player_missile_hit_bigblue(game: &mut Game) {
    if !game.bigblue.sprite.is_visible
        || !game.player_missile.is_visible
        || !intersects(&game.bigblue.sprite, &game.player_missile)
    {
        return;
    }

    game.player_missile.is_visible = false;
    hit_bigblue(game);
}

// ── Asteroid ──────────────────────────────────────────────────────────────────

pub fn move_asteroid(game: &mut Game) {
    if !game.asteroid.sprite.is_visible {
        return;
    }

    game.asteroid.sprite.step();
    check_if_player_missile_hit_asteroid(game);

    let sprite = &mut game.asteroid.sprite;
    if sprite.x > WIDTH as f64 || sprite.y > HEIGHT as f64 || sprite.x < -(sprite.width as f64) {
        sprite.is_visible = false;
    }
}

fn check_if_player_missile_hit_asteroid(game: &mut Game) {
    if !game.player_missile.is_visible || !game.asteroid.sprite.is_visible {
        return;
    }

    if intersects(&game.asteroid.sprite, &game.player_missile) {
        game.player_missile.is_visible = false;
        game.score.add(ASTEROID_POINTS);
        game.reset_asteroid_quarters();
        game.asteroid.is_exploding = true;
    }
}

/// Fly each fragment outwards until it has left through its own corner.
pub fn move_asteroid_quarters(game: &mut Game) {
    if game.qcount == 0 {
        return;
    }

    for corner in Corner::ALL {
        let sprite = &mut game.quarters[corner.index()].sprite;
        if !sprite.is_visible {
            continue;
        }

        sprite.step();

        let off_side = if corner.is_left() {
            sprite.x < -(sprite.width as f64)
        } else {
            sprite.x > WIDTH as f64
        };
        let off_end = if corner.is_upper() {
            sprite.y < -(sprite.height as f64)
        } else {
            sprite.y > HEIGHT as f64
        };

        if off_side || off_end {
            sprite.is_visible = false;
            game.qcount = game.qcount.saturating_sub(1);
        }
    }

    check_if_quarters_hit_bigblue(game);
}

/// Each fragment touching big-blue counts as a separate hit.
fn check_if_quarters_hit_bigblue(game: &mut Game) {
    if !game.bigblue.sprite.is_visible {
        return;
    }

    for corner in Corner::ALL {
        let quarter = &game.quarters[corner.index()].sprite;
        if quarter.is_visible && intersects(&game.bigblue.sprite, quarter) {
            hit_bigblue(game);
        }
    }
}

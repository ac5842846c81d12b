//! Frame composition. Turns a `Game` into draw calls on any `Graphics`
//! backend; nothing here changes game state.

use crate::backend::{Graphics, Rect};
use crate::config::{HEIGHT, LIVES_Y, WIDTH};
use crate::entities::Craft;
use crate::game::Game;
use crate::score::Digits;
use crate::sprite::Sprite;

pub const GAME_OVER_TEXT: &str = "Game Over! (Press n for new game)";

pub const HELP_LINES: [&str; 5] = [
    "Space or cursor up",
    "Cursor left / right",
    "P - Pause / Play",
    "N - New Game",
    "Q - Quit",
];

const SCORE_POS: (i32, i32) = (5, 1);
const HIGH_SCORE_POS: (i32, i32) = (WIDTH - 120, 1);
const LIVES_GAP: i32 = 2;
const HELP_TOP: i32 = HEIGHT / 2 - 80;
const HELP_LINE_GAP: i32 = 32;
const ICON_GAP: i32 = 16;

// ── Playing frame ─────────────────────────────────────────────────────────────

/// Draw everything for one tick of play. Does not present.
pub fn draw_scene<G: Graphics>(gfx: &mut G, game: &Game) {
    draw_background(gfx, game);

    for alien in game.active_aliens() {
        draw_alien_missile(gfx, game, alien);
        draw_sprite(gfx, &alien.sprite);
    }

    draw_sprite(gfx, &game.bigblue.sprite);
    draw_sprite(gfx, &game.asteroid.sprite);
    for quarter in &game.quarters {
        draw_sprite(gfx, &quarter.sprite);
    }

    draw_sprite(gfx, &game.explosion);
    draw_sprite(gfx, &game.player.sprite);
    draw_sprite(gfx, &game.player_missile);
    draw_sprite(gfx, &game.big_blue_missile);

    draw_hud(gfx, game);
}

/// The background scrolls down, so it goes out in two strips: the top of
/// the image below the offset and its bottom wrapped above it.
fn draw_background<G: Graphics>(gfx: &mut G, game: &Game) {
    let Some(frame) = game.background.current_handle() else {
        return;
    };
    let offset = game.background_offset.rem_euclid(HEIGHT);

    let lower = HEIGHT - offset;
    if lower > 0 {
        gfx.render_region(
            frame,
            Rect::new(0, 0, WIDTH, lower),
            Rect::new(0, offset, WIDTH, lower),
        );
    }
    if offset > 0 {
        gfx.render_region(
            frame,
            Rect::new(0, lower, WIDTH, offset),
            Rect::new(0, 0, WIDTH, offset),
        );
    }
}

fn draw_sprite<G: Graphics>(gfx: &mut G, sprite: &Sprite) {
    if !sprite.is_visible {
        return;
    }
    if let Some(frame) = sprite.current_handle() {
        gfx.render(
            frame,
            Rect::new(sprite.x as i32, sprite.y as i32, sprite.width, sprite.height),
        );
    }
}

/// Alien missiles all share one sprite, drawn at each alien's own position.
fn draw_alien_missile<G: Graphics>(gfx: &mut G, game: &Game, alien: &Craft) {
    if !alien.missile_is_launched {
        return;
    }
    if let Some(frame) = game.missile.current_handle() {
        gfx.render(
            frame,
            Rect::new(
                alien.missile_x,
                alien.missile_y,
                game.missile.width,
                game.missile.height,
            ),
        );
    }
}

// ── HUD ───────────────────────────────────────────────────────────────────────

fn draw_hud<G: Graphics>(gfx: &mut G, game: &Game) {
    draw_lives(gfx, game);

    gfx.render_text(
        &digits_text(&game.score.score_digits),
        SCORE_POS.0,
        SCORE_POS.1,
    );
    gfx.render_text(
        &digits_text(&game.score.high_digits),
        HIGH_SCORE_POS.0,
        HIGH_SCORE_POS.1,
    );

    draw_sprite(gfx, &game.line);
}

/// One player icon per life, centred across the top of the screen.
fn draw_lives<G: Graphics>(gfx: &mut G, game: &Game) {
    let Some(&icon) = game.player.sprite.frames().first() else {
        return;
    };
    let (w, h) = (game.player.sprite.width, game.player.sprite.height);
    let lives = game.lives as i32;
    if lives == 0 {
        return;
    }

    let row = lives * (w + LIVES_GAP) - LIVES_GAP;
    let left = (WIDTH - row) / 2;
    for i in 0..lives {
        gfx.render(icon, Rect::new(left + i * (w + LIVES_GAP), LIVES_Y as i32, w, h));
    }
}

pub fn digits_text(digits: &Digits) -> String {
    digits.iter().map(|d| char::from(b'0' + d)).collect()
}

// ── Pause screen ──────────────────────────────────────────────────────────────

/// The frozen frame with the help text on top, plus the game-over banner
/// once the lives are gone.
pub fn draw_pause_screen<G: Graphics>(gfx: &mut G, game: &Game, backdrop: Option<&G::Backdrop>) {
    match backdrop {
        Some(frozen) => gfx.render_backdrop(frozen),
        None => draw_background(gfx, game),
    }

    if game.lives == 0 {
        centre_text(gfx, GAME_OVER_TEXT, HELP_TOP - 2 * HELP_LINE_GAP);
    }

    let mut icon_rows = Vec::with_capacity(2);
    for (i, line) in HELP_LINES.iter().enumerate() {
        let y = HELP_TOP + i as i32 * HELP_LINE_GAP;
        let x = centre_text(gfx, line, y);
        if i < 2 {
            icon_rows.push((x, y));
        }
    }

    // Fire and steer lines get a picture of what they control.
    let icons = [&game.player_missile, &game.player.sprite];
    for (sprite, (x, y)) in icons.into_iter().zip(icon_rows) {
        if let Some(&frame) = sprite.frames().first() {
            gfx.render(
                frame,
                Rect::new(x - sprite.width - ICON_GAP, y, sprite.width, sprite.height),
            );
        }
    }
}

/// Draw `text` centred horizontally at `y`; returns its left edge.
fn centre_text<G: Graphics>(gfx: &mut G, text: &str, y: i32) -> i32 {
    let (w, _) = gfx.text_size(text);
    let x = (WIDTH - w) / 2;
    gfx.render_text(text, x, y);
    x
}

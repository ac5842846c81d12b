use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use ship_xb11::backend::{Graphics, InputEvent, Key, Rect};
use ship_xb11::display::glyphs::*;
use ship_xb11::display::input::*;
use ship_xb11::display::*;
use ship_xb11::error::StartupError;
use ship_xb11::game::SpriteSet;
use ship_xb11::sprite::SpriteFrames;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ship_xb11_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn terminal() -> TerminalGraphics<Vec<u8>> {
    TerminalGraphics::new(Vec::new(), (0, 0))
}

// ── Glyph frames ──────────────────────────────────────────────────────────────

#[test]
fn parse_frame_sizes_by_widest_line() {
    let f = parse_frame("ab \n c\n", crossterm::style::Color::White);
    assert_eq!((f.cols, f.rows), (3, 2));
    assert_eq!(f.at(0, 0).map(|c| c.ch), Some('a'));
    assert_eq!(f.at(1, 1).map(|c| c.ch), Some('c'));
    assert_eq!(f.at(2, 0), None);
    assert_eq!(f.at(0, 1), None);
    assert_eq!(f.at(9, 9), None);
    assert_eq!(f.at(-1, 0), None);
}

#[test]
fn frame_files_are_numbered_beside_the_resource() {
    let path = frame_path(Path::new("assets/ul.txt"), 3);
    assert_eq!(path, Path::new("assets/ul03.txt"));
}

#[test]
fn loading_stops_at_the_first_gap() {
    let dir = scratch_dir("gap");
    fs::write(dir.join("foo00.txt"), "###\n###\n").unwrap();
    fs::write(dir.join("foo01.txt"), "+++\n+++\n").unwrap();
    fs::write(dir.join("foo03.txt"), "...\n...\n").unwrap();

    let mut gfx = terminal();
    let frames = gfx.load_visual_resource(&dir.join("foo.txt")).unwrap();
    assert_eq!(frames.frames.len(), 2);
    assert_eq!((frames.width, frames.height), (24, 32));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn missing_first_frame_is_fatal() {
    let dir = scratch_dir("missing");
    let mut gfx = terminal();
    match gfx.load_visual_resource(&dir.join("bar.txt")) {
        Err(StartupError::MissingAsset { path }) => assert!(path.ends_with("bar00.txt")),
        other => panic!("expected MissingAsset, got {:?}", other),
    }
    let _ = fs::remove_dir_all(&dir);
}

fn same_shape(a: &SpriteFrames, b: &SpriteFrames) {
    assert_eq!((a.width, a.height), (b.width, b.height));
    assert_eq!(a.frames.len(), b.frames.len());
}

#[test]
fn shipped_assets_match_the_placeholder_set() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets");
    let mut gfx = terminal();
    let loaded = SpriteSet::load(&mut gfx, &dir).unwrap();
    let blank = SpriteSet::blank();

    same_shape(&loaded.bigblue, &blank.bigblue);
    same_shape(&loaded.player, &blank.player);
    for (a, b) in loaded.aliens.iter().zip(blank.aliens.iter()) {
        same_shape(a, b);
    }
    same_shape(&loaded.background, &blank.background);
    same_shape(&loaded.explosion, &blank.explosion);
    same_shape(&loaded.missile, &blank.missile);
    same_shape(&loaded.player_missile, &blank.player_missile);
    same_shape(&loaded.line, &blank.line);
    same_shape(&loaded.big_blue_missile, &blank.big_blue_missile);
    same_shape(&loaded.asteroid, &blank.asteroid);
    for (a, b) in loaded.quarters.iter().zip(blank.quarters.iter()) {
        same_shape(a, b);
    }
}

// ── Canvas drawing ────────────────────────────────────────────────────────────

#[test]
fn text_lands_on_the_cell_grid() {
    let mut gfx = terminal();
    gfx.render_text("HI", 17, 33);
    assert!(gfx.canvas().row_text(2).starts_with("  HI"));
    assert_eq!(gfx.text_size("HI"), (16, 16));
}

#[test]
fn sprites_snap_to_cells_and_clip() {
    let dir = scratch_dir("clip");
    fs::write(dir.join("box00.txt"), "ab\ncd\n").unwrap();
    let mut gfx = terminal();
    let frames = gfx.load_visual_resource(&dir.join("box.txt")).unwrap();
    let id = frames.frames[0];

    gfx.render(id, Rect::new(9, 17, 16, 32));
    assert_eq!(gfx.canvas().get(1, 1).map(|c| c.ch), Some('a'));
    assert_eq!(gfx.canvas().get(2, 2).map(|c| c.ch), Some('d'));

    gfx.render(id, Rect::new(-8, -16, 16, 32));
    assert_eq!(gfx.canvas().get(0, 0).map(|c| c.ch), Some('d'));

    gfx.render(id, Rect::new(598, 792, 16, 32));
    assert_eq!(gfx.canvas().get(74, 49).map(|c| c.ch), Some('a'));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn region_copies_part_of_a_frame() {
    let dir = scratch_dir("region");
    fs::write(dir.join("bg00.txt"), "1\n2\n3\n").unwrap();
    let mut gfx = terminal();
    let frames = gfx.load_visual_resource(&dir.join("bg.txt")).unwrap();

    gfx.render_region(frames.frames[0], Rect::new(0, 32, 8, 16), Rect::new(0, 0, 8, 16));
    assert_eq!(gfx.canvas().get(0, 0).map(|c| c.ch), Some('3'));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn present_sends_only_changed_cells() {
    let mut gfx = terminal();
    gfx.render_text("HI", 0, 0);
    gfx.present().unwrap();
    let first = std::mem::take(gfx.writer());
    assert!(first.len() > (Canvas::COLS * Canvas::ROWS) as usize);
    assert!(first.windows(2).any(|w| w == b"HI"));

    gfx.render_text("HI", 0, 0);
    gfx.present().unwrap();
    let second = std::mem::take(gfx.writer());
    assert!(!second.contains(&b'H'));
    assert!(!second.contains(&b'I'));

    gfx.render_text("HO", 0, 0);
    gfx.present().unwrap();
    let third = std::mem::take(gfx.writer());
    assert!(third.contains(&b'O'));
    assert!(third.len() < first.len());
}

#[test]
fn capture_freezes_the_presented_frame() {
    let mut gfx = terminal();
    gfx.render_text("PAUSED", 0, 0);
    gfx.present().unwrap();
    assert!(gfx.canvas().row_text(0).trim().is_empty());

    let frozen = gfx.capture_current_frame();
    assert!(frozen.row_text(0).starts_with("PAUSED"));

    gfx.render_backdrop(&frozen);
    assert!(gfx.canvas().row_text(0).starts_with("PAUSED"));
}

// ── Terminal checks ───────────────────────────────────────────────────────────

#[test]
fn small_screen_is_rejected() {
    let err = check_screen_size(74, 60).unwrap_err();
    assert!(matches!(
        err,
        StartupError::ScreenTooSmall {
            need_cols: 75,
            need_rows: 50,
            cols: 74,
            rows: 60
        }
    ));
    assert_eq!(err.exit_code(), 3);
    assert!(check_screen_size(75, 50).is_ok());
}

#[test]
fn playfield_is_centred() {
    assert_eq!(playfield_origin(95, 60), (10, 5));
    assert_eq!(playfield_origin(75, 50), (0, 0));
}

// ── Input ─────────────────────────────────────────────────────────────────────

fn press(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn release(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new_with_kind(
        code,
        KeyModifiers::NONE,
        KeyEventKind::Release,
    ))
}

#[test]
fn keys_map_to_game_actions() {
    assert_eq!(map_key(KeyCode::Left), Key::Left);
    assert_eq!(map_key(KeyCode::Right), Key::Right);
    assert_eq!(map_key(KeyCode::Up), Key::Fire);
    assert_eq!(map_key(KeyCode::Char(' ')), Key::Fire);
    assert_eq!(map_key(KeyCode::Char('P')), Key::Pause);
    assert_eq!(map_key(KeyCode::Char('n')), Key::NewGame);
    assert_eq!(map_key(KeyCode::Char('q')), Key::Quit);
    assert_eq!(map_key(KeyCode::Char('x')), Key::Other);
}

#[test]
fn classic_terminal_releases_after_hold_window() {
    let (tx, rx) = mpsc::channel();
    let mut input = TerminalInput::new(rx, false);
    let t0 = Instant::now();

    tx.send(press(KeyCode::Left)).unwrap();
    assert_eq!(input.poll_at(t0), Some(InputEvent::KeyDown(Key::Left)));
    assert_eq!(input.poll_at(t0 + Duration::from_millis(100)), None);
    assert_eq!(
        input.poll_at(t0 + FIRST_HOLD),
        Some(InputEvent::KeyUp(Key::Left))
    );
}

#[test]
fn key_repeat_keeps_a_direction_held() {
    let (tx, rx) = mpsc::channel();
    let mut input = TerminalInput::new(rx, false);
    let t0 = Instant::now();

    tx.send(press(KeyCode::Right)).unwrap();
    assert_eq!(input.poll_at(t0), Some(InputEvent::KeyDown(Key::Right)));

    let repeat = t0 + Duration::from_millis(500);
    tx.send(press(KeyCode::Right)).unwrap();
    assert_eq!(input.poll_at(repeat), None);
    assert_eq!(input.poll_at(repeat + REPEAT_HOLD - Duration::from_millis(10)), None);
    assert_eq!(
        input.poll_at(repeat + REPEAT_HOLD),
        Some(InputEvent::KeyUp(Key::Right))
    );
}

#[test]
fn enhanced_terminal_waits_for_release() {
    let (tx, rx) = mpsc::channel();
    let mut input = TerminalInput::new(rx, true);
    let t0 = Instant::now();

    tx.send(press(KeyCode::Left)).unwrap();
    assert_eq!(input.poll_at(t0), Some(InputEvent::KeyDown(Key::Left)));
    assert_eq!(input.poll_at(t0 + Duration::from_secs(10)), None);

    tx.send(release(KeyCode::Left)).unwrap();
    assert_eq!(
        input.poll_at(t0 + Duration::from_secs(11)),
        Some(InputEvent::KeyUp(Key::Left))
    );
}

#[test]
fn queued_events_come_out_one_per_poll() {
    let (tx, rx) = mpsc::channel();
    let mut input = TerminalInput::new(rx, false);
    let t0 = Instant::now();

    tx.send(press(KeyCode::Left)).unwrap();
    tx.send(press(KeyCode::Char(' '))).unwrap();
    tx.send(press(KeyCode::Char(' '))).unwrap();
    assert_eq!(input.poll_at(t0), Some(InputEvent::KeyDown(Key::Left)));
    assert_eq!(input.poll_at(t0), Some(InputEvent::KeyDown(Key::Fire)));
    assert_eq!(input.poll_at(t0), Some(InputEvent::KeyDown(Key::Fire)));
    assert_eq!(input.poll_at(t0), None);
}

#[test]
fn ctrl_c_and_closed_input_quit() {
    let (tx, rx) = mpsc::channel();
    let mut input = TerminalInput::new(rx, false);
    let t0 = Instant::now();

    tx.send(Event::Key(KeyEvent::new(
        KeyCode::Char('c'),
        KeyModifiers::CONTROL,
    )))
    .unwrap();
    assert_eq!(input.poll_at(t0), Some(InputEvent::Quit));

    drop(tx);
    assert_eq!(input.poll_at(t0), Some(InputEvent::Quit));
    assert_eq!(input.poll_at(t0), None);
}

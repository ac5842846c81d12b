use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use ship_xb11::audio::SoundTask;
use ship_xb11::backend::SoundPlayer;
use ship_xb11::config::*;
use ship_xb11::error::StartupError;

fn settings_from(pairs: &[(&str, &str)]) -> Settings {
    let env: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Settings::from_lookup(|key| env.get(key).cloned())
}

// ── Settings ──────────────────────────────────────────────────────────────────

#[test]
fn defaults_without_environment() {
    let s = settings_from(&[]);
    assert_eq!(s, Settings::default());
    assert_eq!(s.data_dir, PathBuf::from("assets"));
    assert_eq!(s.fps, 60);
    assert!(s.sound);
    assert_eq!(s.seed, None);
}

#[test]
fn environment_overrides_defaults() {
    let s = settings_from(&[
        ("SHIPXB11_DATADIR", "/usr/share/ship_xb11"),
        ("SHIPXB11_FPS", "30"),
        ("SHIPXB11_SOUND", "off"),
        ("SHIPXB11_SEED", "1234"),
        ("SHIPXB11_LOG", "/tmp/x.log"),
    ]);
    assert_eq!(s.data_dir, PathBuf::from("/usr/share/ship_xb11"));
    assert_eq!(s.fps, 30);
    assert!(!s.sound);
    assert_eq!(s.seed, Some(1234));
    assert_eq!(s.log_path, PathBuf::from("/tmp/x.log"));
}

#[test]
fn fps_is_clamped_and_junk_ignored() {
    assert_eq!(settings_from(&[("SHIPXB11_FPS", "1000")]).fps, 240);
    assert_eq!(settings_from(&[("SHIPXB11_FPS", "0")]).fps, 1);
    assert_eq!(settings_from(&[("SHIPXB11_FPS", "fast")]).fps, 60);
    assert_eq!(settings_from(&[("SHIPXB11_SEED", "-3")]).seed, None);
}

#[test]
fn rejected_values_leave_a_warning_for_the_log() {
    let s = settings_from(&[("SHIPXB11_FPS", "fast"), ("SHIPXB11_SEED", "x")]);
    assert_eq!(s.warnings.len(), 2);
    assert!(s.warnings[0].contains("SHIPXB11_FPS"));
    assert!(s.warnings[1].contains("SHIPXB11_SEED"));

    assert!(settings_from(&[("SHIPXB11_FPS", "30")]).warnings.is_empty());
}

#[test]
fn sound_switch_accepts_common_spellings() {
    for off in ["0", "off", "FALSE", "no"] {
        assert!(!settings_from(&[("SHIPXB11_SOUND", off)]).sound, "{}", off);
    }
    for on in ["1", "on", "yes"] {
        assert!(settings_from(&[("SHIPXB11_SOUND", on)]).sound, "{}", on);
    }
}

#[test]
fn tick_duration_follows_fps() {
    let s = Settings {
        fps: 50,
        ..Settings::default()
    };
    assert_eq!(s.tick_duration(), Duration::from_millis(20));
}

#[test]
fn terminal_grid_covers_the_world() {
    assert_eq!(TERMINAL_COLS as i32 * CELL_WIDTH, WIDTH);
    assert_eq!(TERMINAL_ROWS as i32 * CELL_HEIGHT, HEIGHT);
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[test]
fn every_startup_error_has_its_own_exit_code() {
    let errors = [
        StartupError::DisplayUnavailable,
        StartupError::ScreenTooSmall {
            need_cols: 75,
            need_rows: 50,
            cols: 10,
            rows: 10,
        },
        StartupError::MissingAsset {
            path: PathBuf::from("assets/player00.txt"),
        },
        StartupError::ResourceCreation {
            what: "input thread",
            source: io::Error::new(io::ErrorKind::Other, "no threads"),
        },
        StartupError::Terminal(io::Error::new(io::ErrorKind::Other, "gone")),
    ];
    let codes: Vec<u8> = errors.iter().map(|e| e.exit_code()).collect();
    assert_eq!(codes, vec![2, 3, 4, 5, 6]);
}

#[test]
fn missing_asset_names_the_file() {
    let err = StartupError::MissingAsset {
        path: PathBuf::from("assets/player00.txt"),
    };
    assert!(err.to_string().contains("assets/player00.txt"));
}

// ── Sound task ────────────────────────────────────────────────────────────────

fn slow_sound(plays: Arc<AtomicUsize>) -> SoundTask<impl Fn() + Send + Sync + 'static> {
    SoundTask::new(move || {
        plays.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(200));
    })
}

#[test]
fn sound_plays_one_at_a_time() {
    let plays = Arc::new(AtomicUsize::new(0));
    let mut task = slow_sound(Arc::clone(&plays));

    assert!(task.play_sound_once());
    assert!(task.is_busy());
    assert!(!task.play_sound_once());

    task.shutdown();
    assert!(!task.is_busy());
    assert_eq!(plays.load(Ordering::SeqCst), 1);

    assert!(task.play_sound_once());
    task.shutdown();
    assert_eq!(plays.load(Ordering::SeqCst), 2);
}

#[test]
fn dropping_the_task_waits_for_playback() {
    let plays = Arc::new(AtomicUsize::new(0));
    {
        let mut task = slow_sound(Arc::clone(&plays));
        task.play_sound_once();
    }
    assert_eq!(plays.load(Ordering::SeqCst), 1);
}

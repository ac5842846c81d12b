//! Fire-and-forget sound playback.
//!
//! A `SoundTask` owns at most one background thread. While that thread is
//! playing, further requests are dropped rather than queued, and the
//! thread is joined before the task goes away.

use std::io::{self, IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::backend::SoundPlayer;

pub struct SoundTask<F>
where
    F: Fn() + Send + Sync + 'static,
{
    busy: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    play: Arc<F>,
}

impl<F> SoundTask<F>
where
    F: Fn() + Send + Sync + 'static,
{
    pub fn new(play: F) -> Self {
        Self {
            busy: Arc::new(AtomicBool::new(false)),
            handle: None,
            play: Arc::new(play),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("sound thread panicked");
            }
        }
    }
}

impl<F> SoundPlayer for SoundTask<F>
where
    F: Fn() + Send + Sync + 'static,
{
    fn play_sound_once(&mut self) -> bool {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }

        // The previous thread has cleared `busy`, so this join is immediate.
        self.join();

        let busy = Arc::clone(&self.busy);
        let play = Arc::clone(&self.play);
        let spawned = thread::Builder::new()
            .name("explosion-sound".into())
            .spawn(move || {
                play();
                busy.store(false, Ordering::Release);
            });

        match spawned {
            Ok(handle) => {
                self.handle = Some(handle);
                true
            }
            Err(err) => {
                log::warn!("could not start sound thread: {}", err);
                self.busy.store(false, Ordering::Release);
                false
            }
        }
    }

    fn shutdown(&mut self) {
        self.join();
    }
}

impl<F> Drop for SoundTask<F>
where
    F: Fn() + Send + Sync + 'static,
{
    fn drop(&mut self) {
        self.join();
    }
}

// ── Terminal bell ─────────────────────────────────────────────────────────────

/// Gaps between the bell strokes of the explosion sound.
pub const EXPLOSION_PATTERN: [Duration; 3] = [
    Duration::from_millis(0),
    Duration::from_millis(90),
    Duration::from_millis(140),
];

fn ring_bell(pattern: &[Duration]) {
    let mut err = io::stderr();
    for gap in pattern {
        thread::sleep(*gap);
        let _ = err.write_all(b"\x07");
        let _ = err.flush();
    }
}

/// Explosion sound on the terminal bell, or `None` when there is no
/// terminal to ring or sound is switched off.
pub fn open_terminal_bell(enabled: bool) -> Option<SoundTask<impl Fn() + Send + Sync + 'static>> {
    if !enabled {
        log::info!("sound disabled by configuration");
        return None;
    }

    if !io::stderr().is_terminal() {
        log::warn!("no terminal for sound output; continuing without sound");
        return None;
    }

    Some(SoundTask::new(|| ring_bell(&EXPLOSION_PATTERN)))
}

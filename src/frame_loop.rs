//! The fixed-rate driver: poll one input event, advance the game one tick
//! (or hold the pause screen), draw, present, then wait out the rest of
//! the frame.

use std::io;
use std::thread;
use std::time::{Duration, Instant};

use rand::Rng;

use crate::backend::{Graphics, InputSource, SoundPlayer};
use crate::compute;
use crate::game::{Game, Response};
use crate::scene;

/// Longest single sleep while waiting for the frame deadline.
const PACER_NAP: Duration = Duration::from_micros(100);

/// Holds every frame to at least `target` of wall-clock time.
#[derive(Debug)]
pub struct FramePacer {
    target: Duration,
    frame_start: Instant,
}

impl FramePacer {
    pub fn new(target: Duration) -> Self {
        Self {
            target,
            frame_start: Instant::now(),
        }
    }

    pub fn target(&self) -> Duration {
        self.target
    }

    /// Block until `target` has passed since the previous call, napping in
    /// short steps so the deadline is not overshot by much.
    pub fn wait(&mut self) {
        loop {
            let elapsed = self.frame_start.elapsed();
            if elapsed >= self.target {
                break;
            }
            thread::sleep((self.target - elapsed).min(PACER_NAP));
        }
        self.frame_start = Instant::now();
    }
}

/// Run until the player quits. Only backend I/O can fail.
pub fn run<G, I, R>(
    game: &mut Game,
    gfx: &mut G,
    input: &mut I,
    mut sound: Option<&mut dyn SoundPlayer>,
    rng: &mut R,
    pacer: &mut FramePacer,
) -> io::Result<()>
where
    G: Graphics,
    I: InputSource,
    R: Rng,
{
    let mut backdrop: Option<G::Backdrop> = None;
    let mut frames: u64 = 0;

    loop {
        if let Some(event) = input.poll_input_event() {
            match game.handle_event(event) {
                Response::Quit => break,
                Response::CaptureBackdrop => backdrop = Some(gfx.capture_current_frame()),
                Response::Continue => {}
            }
        }

        if game.is_paused() {
            scene::draw_pause_screen(gfx, game, backdrop.as_ref());
            gfx.present()?;
            pacer.wait();
            continue;
        }

        // The last frame of play stays behind the game-over banner.
        if game.check_game_over() {
            backdrop = Some(gfx.capture_current_frame());
            continue;
        }

        let report = compute::tick(game, rng);
        frames += 1;

        if report.explosion_sound {
            if let Some(player) = sound.as_mut() {
                player.play_sound_once();
            }
        }

        scene::draw_scene(gfx, game);
        gfx.present()?;
        pacer.wait();
    }

    log::info!("quit after {} frames of play", frames);
    Ok(())
}

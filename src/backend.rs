//! Capabilities the game needs from the outside world: drawing, input and
//! sound. The simulation never sees a concrete backend; the frame loop is
//! generic over these traits.

use std::io;
use std::path::Path;

use crate::error::StartupError;
use crate::sprite::{FrameId, SpriteFrames};

/// A whole-pixel rectangle in world coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }
}

pub trait Graphics {
    /// Frozen copy of a presented frame.
    type Backdrop;

    /// File extension of this backend's frame files.
    const FRAME_EXTENSION: &'static str;

    /// Load `name.ext` as the numbered frames `name00.ext`, `name01.ext`, …
    /// Frame `00` must exist; the sequence ends at the first gap.
    fn load_visual_resource(&mut self, path: &Path) -> Result<SpriteFrames, StartupError>;

    /// Draw the `src` part of `frame` into `dest`.
    fn render_region(&mut self, frame: FrameId, src: Rect, dest: Rect);

    fn render(&mut self, frame: FrameId, dest: Rect) {
        self.render_region(frame, Rect::new(0, 0, dest.w, dest.h), dest);
    }

    /// Draw a line of text with its top-left corner at (`x`, `y`).
    fn render_text(&mut self, text: &str, x: i32, y: i32);

    /// World-pixel size `text` would occupy.
    fn text_size(&self, text: &str) -> (i32, i32);

    fn present(&mut self) -> io::Result<()>;

    fn capture_current_frame(&mut self) -> Self::Backdrop;

    fn render_backdrop(&mut self, backdrop: &Self::Backdrop);
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Keys the game reacts to, already mapped from the raw device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    /// Space or cursor up.
    Fire,
    Pause,
    NewGame,
    Quit,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// The window or terminal asked to close.
    Quit,
}

pub trait InputSource {
    /// Next pending event, without blocking.
    fn poll_input_event(&mut self) -> Option<InputEvent>;
}

// ── Sound ─────────────────────────────────────────────────────────────────────

pub trait SoundPlayer {
    /// Start the explosion sound unless one is already playing.
    /// Returns whether it started.
    fn play_sound_once(&mut self) -> bool;

    /// Wait for any sound still playing.
    fn shutdown(&mut self) {}
}

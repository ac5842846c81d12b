//! Positioned, optionally animated visual objects.
//!
//! A sprite never touches the rendering backend. It only holds opaque
//! `FrameId` handles that the backend handed out when the frames were
//! loaded, plus the bookkeeping needed to pick which one to draw.

use crate::collision::Bounds;

/// Opaque handle to one loaded frame, owned by the graphics backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameId(pub u32);

/// The ordered frames of one visual resource and their common size.
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteFrames {
    pub frames: Vec<FrameId>,
    pub width: i32,
    pub height: i32,
}

impl SpriteFrames {
    pub fn new(frames: Vec<FrameId>, width: i32, height: i32) -> Self {
        Self {
            frames,
            width,
            height,
        }
    }

    /// Frames that refer to nothing; handy when no backend is involved.
    pub fn blank(width: i32, height: i32, count: usize) -> Self {
        let frames = (0..count.max(1) as u32).map(FrameId).collect();
        Self::new(frames, width, height)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
    pub width: i32,
    pub height: i32,
    pub is_visible: bool,
    pub is_animated: bool,
    /// Index of the frame to draw, always in `0..=frame_count`.
    pub current_frame: usize,
    /// Index of the last frame.
    pub frame_count: usize,
    /// Ticks each frame is held for, minus one.
    pub frame_delay: u32,
    /// Countdown until the next frame change.
    pub next_frame_time: u32,
    frames: Vec<FrameId>,
}

impl Sprite {
    /// A hidden, motionless sprite showing the first of `frames`.
    pub fn new(frames: SpriteFrames) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            dx: 0.0,
            dy: 0.0,
            width: frames.width,
            height: frames.height,
            is_visible: false,
            is_animated: false,
            current_frame: 0,
            frame_count: frames.frames.len().saturating_sub(1),
            frame_delay: 0,
            next_frame_time: 0,
            frames: frames.frames,
        }
    }

    pub fn frames(&self) -> &[FrameId] {
        &self.frames
    }

    /// Handle of the frame currently shown.
    pub fn current_handle(&self) -> Option<FrameId> {
        self.frames.get(self.current_frame).copied()
    }

    /// One animation step. Holds each frame for `frame_delay + 1` calls
    /// and wraps back to frame 0 after the last one.
    pub fn advance_frame(&mut self) {
        if !self.is_visible || !self.is_animated {
            return;
        }

        if self.next_frame_time != 0 {
            self.next_frame_time -= 1;
            return;
        }

        self.next_frame_time = self.frame_delay;

        if self.current_frame < self.frame_count {
            self.current_frame += 1;
        } else {
            self.current_frame = 0;
        }
    }

    /// Freeze on the first frame and clear the animated flag.
    pub fn stop_animation(&mut self) {
        self.is_animated = false;
        self.current_frame = 0;
        self.next_frame_time = 0;
    }

    /// Apply one tick of velocity.
    pub fn step(&mut self) {
        self.x += self.dx;
        self.y += self.dy;
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }

    /// Centre point, with sizes halved in integer pixels.
    pub fn centre(&self) -> (f64, f64) {
        (
            self.x + (self.width / 2) as f64,
            self.y + (self.height / 2) as f64,
        )
    }
}

//! Axis-aligned bounding-box hit detection.
//!
//! Every gameplay collision reduces to `intersects` on two sprites (or
//! `boxes_intersect` on a box that borrows a sprite's size). Entity counts
//! are tiny, so callers simply test the pairs they care about.

use crate::sprite::Sprite;

/// A box with a sub-pixel origin and whole-pixel size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    fn right(&self) -> f64 {
        self.x + self.width as f64
    }

    fn bottom(&self) -> f64 {
        self.y + self.height as f64
    }
}

/// True unless one box lies wholly left, right, above or below the other.
/// Boxes whose edges touch count as intersecting.
pub fn boxes_intersect(a: Bounds, b: Bounds) -> bool {
    !(b.x > a.right() || b.right() < a.x || b.y > a.bottom() || b.bottom() < a.y)
}

pub fn intersects(a: &Sprite, b: &Sprite) -> bool {
    boxes_intersect(a.bounds(), b.bounds())
}

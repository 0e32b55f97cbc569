//! Axis-aligned boxes and the base physics body
//!
//! Positions are the top-left corner of the body's box, in screen space
//! (y grows downward).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Strict overlap test (touching edges do not count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Intersection of two rectangles
    ///
    /// Disjoint rectangles yield an empty rect anchored at `self`'s corner.
    pub fn clip(&self, other: &Rect) -> Rect {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right <= left || bottom <= top {
            return Rect::new(self.x, self.y, 0.0, 0.0);
        }
        Rect::new(left, top, right - left, bottom - top)
    }
}

/// A body with position, velocity and a box
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsObject {
    pub pos: Vec2,
    pub vel: Vec2,
    pub width: f32,
    pub height: f32,
    /// Set only while the body sits in the collision registry
    pub(crate) checks_collision: bool,
}

impl PhysicsObject {
    /// New body, detached from the collision registry
    pub fn new(pos: Vec2, width: f32, height: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            width,
            height,
            checks_collision: false,
        }
    }

    /// Advance position by velocity (no clamping at this layer)
    #[inline]
    pub fn update(&mut self) {
        self.pos += self.vel;
    }

    pub fn collider(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    pub fn checks_collision(&self) -> bool {
        self.checks_collision
    }
}

//! Monitor rectangles and the absolute/relative coordinate transforms.
//!
//! Saved window positions are stored relative to the origin of the monitor
//! they were captured on, so they can be re-anchored to wherever that monitor
//! appears when it is loaded again.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle of a monitor in absolute desktop coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonitorRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl MonitorRect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// Half-open containment test: the left/top edges are inside, the
    /// right/bottom edges are not.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        let (x, y) = (x as i64, y as i64);
        x >= self.x as i64 && y >= self.y as i64 && x < self.right() && y < self.bottom()
    }

    /// Convert an absolute point into an offset from this rect's origin.
    pub fn to_relative(&self, x: i32, y: i32) -> (i32, i32) {
        (x.wrapping_sub(self.x), y.wrapping_sub(self.y))
    }

    /// Convert an offset from this rect's origin back into absolute space.
    pub fn to_absolute(&self, x: i32, y: i32) -> (i32, i32) {
        (x.wrapping_add(self.x), y.wrapping_add(self.y))
    }
}

impl std::fmt::Display for MonitorRect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

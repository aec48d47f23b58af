//! Geometry value types.

use serde::{Deserialize, Serialize};

/// On-screen bounds of a window, in physical pixels.
///
/// `x`/`y` may be negative on multi-monitor layouts. A record is only
/// well-formed when both dimensions are positive; see [`GeometryRecord::is_well_formed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeometryRecord {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl GeometryRecord {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_well_formed(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Usable rectangle of one display (taskbars and menu bars excluded).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkArea {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl WorkArea {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// How a new window should be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialPlacement {
    /// Saved bounds that still overlap an attached display.
    Restored(GeometryRecord),
    /// Fixed size, position left to the OS.
    Default { width: u32, height: u32 },
}

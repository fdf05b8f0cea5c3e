//! Region-of-interest types and the drag state machine that produces them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rectangle in canvas pixel coordinates.
///
/// `width`/`height` keep the sign of the drag: a right-to-left or
/// bottom-to-top drag yields negative extents. On the wire it is the
/// four-element array `[x, y, width, height]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[i32; 4]", into = "[i32; 4]")]
pub struct Roi {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Roi {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle spanned from `origin` to `end`, without normalisation.
    pub fn from_drag(origin: (i32, i32), end: (i32, i32)) -> Self {
        Self::new(origin.0, origin.1, end.0 - origin.0, end.1 - origin.1)
    }

    pub fn to_array(self) -> [i32; 4] {
        [self.x, self.y, self.width, self.height]
    }

    /// Same area with non-negative extents (left, top, width, height).
    pub fn normalized(self) -> (i32, i32, u32, u32) {
        let left = self.x.min(self.x + self.width);
        let top = self.y.min(self.y + self.height);
        (left, top, self.width.unsigned_abs(), self.height.unsigned_abs())
    }
}

impl From<[i32; 4]> for Roi {
    fn from(v: [i32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<Roi> for [i32; 4] {
    fn from(roi: Roi) -> Self {
        roi.to_array()
    }
}

impl fmt::Display for Roi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{},{},{}]", self.x, self.y, self.width, self.height)
    }
}

/// Classification tag for a ROI. The valid set comes from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoiType(pub String);

impl RoiType {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoiType {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for RoiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { origin: (i32, i32) },
}

/// Pointer-driven rectangle drawing: down records the origin, up completes.
#[derive(Debug, Default)]
pub struct RoiDrawer {
    state: DragState,
}

impl RoiDrawer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Start a drag. A down while already dragging restarts from the new point.
    pub fn pointer_down(&mut self, x: i32, y: i32) {
        self.state = DragState::Dragging { origin: (x, y) };
    }

    /// Finish the drag at `(x, y)`. Returns `None` when idle.
    pub fn pointer_up(&mut self, x: i32, y: i32) -> Option<Roi> {
        let DragState::Dragging { origin } = self.state else {
            return None;
        };
        self.state = DragState::Idle;
        Some(Roi::from_drag(origin, (x, y)))
    }
}

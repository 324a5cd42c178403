use serde::{Deserialize, Serialize};

/// Vertical extent of a rendered element, in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub top: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn midpoint(&self) -> f64 {
        self.top + self.height / 2.0
    }

    /// Signed distance from `y` to the vertical midpoint.
    ///
    /// Negative when the midpoint lies below the pointer.
    pub fn offset_from(&self, y: f64) -> f64 {
        y - self.top - self.height / 2.0
    }
}

//! Layout Types
//!
//! Defines the word regions returned by the layout-detection service.

use serde::{Deserialize, Serialize};

/// Pixel-space rectangle with a top-left origin
///
/// Field names follow the layout service wire format (`w`/`h`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    #[serde(rename = "w")]
    pub width: u32,
    #[serde(rename = "h")]
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Bottom-right corner `(x + w, y + h)`
    pub fn far_corner(&self) -> (u32, u32) {
        (
            self.x.saturating_add(self.width),
            self.y.saturating_add(self.height),
        )
    }

    /// Clip to an image of the given dimensions
    ///
    /// Returns `None` when nothing of the box lies inside the image.
    pub fn clip(&self, image_width: u32, image_height: u32) -> Option<BoundingBox> {
        let (x1, y1) = self.far_corner();
        let x0 = self.x.min(image_width);
        let y0 = self.y.min(image_height);
        let x1 = x1.min(image_width);
        let y1 = y1.min(image_height);

        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        Some(BoundingBox::new(x0, y0, x1 - x0, y1 - y0))
    }
}

/// Line grouping key assigned by the layout service
///
/// Only equality is meaningful; two ids carry no ordering relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LineId {
    Number(i64),
    Text(String),
}

impl From<i64> for LineId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for LineId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// One detected word on the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub bounding_box: BoundingBox,
    pub line: LineId,
    /// Any other fields the layout service attached (labels, order, ...)
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Region {
    pub fn new(bounding_box: BoundingBox, line: impl Into<LineId>) -> Self {
        Self {
            bounding_box,
            line: line.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// Layout error types
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("Layout service request failed: {0}")]
    RequestFailed(String),

    #[error("Layout service returned {status}: {body}")]
    BadStatus { status: u16, body: String },

    #[error("Malformed layout response: {0}")]
    MalformedResponse(String),

    #[error("Layout service detected no regions")]
    NoRegions,
}

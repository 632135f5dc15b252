//! Layout Module
//!
//! Word-level layout detection for page images.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pageocr_server::layout::{HttpLayoutClient, LayoutDetector};
//!
//! let client = HttpLayoutClient::new(reqwest::Client::new(), "https://ilocr.iiit.ac.in/layout/");
//! let regions = client.detect_regions(&page, "v2_doctr").await?;
//! ```

mod client;
mod types;

pub use client::{parse_layout_response, HttpLayoutClient, LayoutDetector};
pub use types::{BoundingBox, LayoutError, LineId, Region};

//! OCR Module
//!
//! Batch word recognition against the remote OCR inference service.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pageocr_server::ocr::{HttpOcrClient, Language, Modality, WordRecognizer};
//!
//! let client = HttpOcrClient::new(reqwest::Client::new(), "https://ilocr.iiit.ac.in/ocr/infer");
//! let language: Language = "hindi".parse()?;
//! let texts = client
//!     .recognize_batch(&crops, language, "v4_robust", Modality::Printed)
//!     .await?;
//! ```

mod provider;
mod types;

pub use provider::{HttpOcrClient, WordRecognizer};
#[cfg(test)]
pub(crate) use provider::MockRecognizer;
pub use types::{Language, Modality, OcrError, OcrRequest, WordResult};

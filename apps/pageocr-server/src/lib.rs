//! Page OCR Server Library
//!
//! Word-level OCR for document page images: a remote layout service finds
//! the words, the page is cropped into one image per word, a remote OCR
//! service reads the crops, and the words are reassembled into lines.
//!
//! # Modules
//!
//! - `layout`: Region model and layout-detection client
//! - `crop`: Per-word cropping and crop storage
//! - `ocr`: Language table and batch OCR client
//! - `text`: Line reconstruction
//! - `pipeline`: Page pipeline driver and output persistence
//! - `routes`: HTTP surface over the pipeline

pub mod config;
pub mod crop;
pub mod error;
pub mod layout;
pub mod ocr;
pub mod page;
pub mod pipeline;
pub mod routes;
pub mod state;
pub mod text;

pub use error::{PageOcrError, Result};
pub use page::PageImage;
pub use pipeline::{PageOcrResponse, PagePipeline, PipelineOptions};

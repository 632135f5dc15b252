//! Pipeline error types
//!
//! Every failure is fatal to the page run that raised it.

use std::path::PathBuf;

use thiserror::Error;

use crate::crop::CropError;
use crate::layout::LayoutError;
use crate::ocr::OcrError;
use crate::text::AlignmentError;

/// Unified page OCR error type
#[derive(Debug, Error)]
pub enum PageOcrError {
    /// Layout service failed or returned nothing usable
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Cropping or crop storage failed
    #[error(transparent)]
    Crop(#[from] CropError),

    /// OCR service failed
    #[error(transparent)]
    Ocr(#[from] OcrError),

    /// Regions, crops and texts disagree in length
    #[error(transparent)]
    Alignment(#[from] AlignmentError),

    /// Page image could not be read
    #[error("Failed to read page image {path}: {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output file could not be written
    #[error("Failed to write output {path}: {message}")]
    OutputWrite { path: PathBuf, message: String },

    /// Request did not carry what the pipeline needs
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PageOcrError>;

impl PageOcrError {
    /// Whether the caller sent something the pipeline cannot work with
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRequest(_)
                | Self::Ocr(OcrError::UnsupportedLanguage(_))
                | Self::Ocr(OcrError::InvalidParameter(_))
                | Self::Crop(CropError::DecodeFailed(_))
        )
    }

    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            _ if self.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Layout(_) | Self::Ocr(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Layout(_) => "LAYOUT_SERVICE_ERROR",
            Self::Crop(_) => "CROP_ERROR",
            Self::Ocr(OcrError::UnsupportedLanguage(_)) => "UNSUPPORTED_LANGUAGE",
            Self::Ocr(_) => "OCR_SERVICE_ERROR",
            Self::Alignment(_) => "ALIGNMENT_ERROR",
            Self::ImageRead { .. } => "IMAGE_READ_ERROR",
            Self::OutputWrite { .. } => "OUTPUT_WRITE_ERROR",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_codes() {
        let err: PageOcrError = OcrError::UnsupportedLanguage("klingon".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "UNSUPPORTED_LANGUAGE");

        let err: PageOcrError = LayoutError::NoRegions.into();
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);

        let err: PageOcrError = OcrError::RequestFailed("timeout".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.code(), "OCR_SERVICE_ERROR");

        let err: PageOcrError = AlignmentError { regions: 3, texts: 2 }.into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Alignment error: 3 regions but 2 texts");
    }
}

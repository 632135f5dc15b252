//! Layout Detector
//!
//! Defines the layout-detection trait and the HTTP client for the remote
//! layout-parser service.

use async_trait::async_trait;
use serde::Deserialize;

use super::types::{LayoutError, Region};
use crate::page::PageImage;

/// Word-level layout detection backend
#[async_trait]
pub trait LayoutDetector: Send + Sync {
    /// Detect word regions on a page, in reading order
    async fn detect_regions(&self, page: &PageImage, model: &str) -> Result<Vec<Region>, LayoutError>;
}

/// One page entry of the layout response array
#[derive(Debug, Deserialize)]
struct LayoutPage {
    regions: Vec<Region>,
}

/// HTTP client for the layout-parser service
pub struct HttpLayoutClient {
    client: reqwest::Client,
    url: String,
}

impl HttpLayoutClient {
    pub fn new(client: reqwest::Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }
}

/// Extract the first page's regions from a raw layout response body
pub fn parse_layout_response(body: &str) -> Result<Vec<Region>, LayoutError> {
    let pages: Vec<LayoutPage> = serde_json::from_str(body)
        .map_err(|e| LayoutError::MalformedResponse(e.to_string()))?;

    let page = pages
        .into_iter()
        .next()
        .ok_or_else(|| LayoutError::MalformedResponse("empty response array".to_string()))?;

    if page.regions.is_empty() {
        return Err(LayoutError::NoRegions);
    }

    Ok(page.regions)
}

#[async_trait]
impl LayoutDetector for HttpLayoutClient {
    async fn detect_regions(&self, page: &PageImage, model: &str) -> Result<Vec<Region>, LayoutError> {
        use reqwest::multipart::{Form, Part};

        let part = Part::bytes(page.data().to_vec())
            .file_name(page.file_name())
            .mime_str(&page.mime_type())
            .map_err(|e| LayoutError::RequestFailed(format!("Invalid mime type: {}", e)))?;

        let form = Form::new()
            .part("images", part)
            .text("model", model.to_string());

        tracing::debug!(url = %self.url, model = model, "Calling layout service");

        let response = self
            .client
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| LayoutError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LayoutError::RequestFailed(format!("Failed to read body: {}", e)))?;

        if !status.is_success() {
            return Err(LayoutError::BadStatus {
                status: status.as_u16(),
                body,
            });
        }

        parse_layout_response(&body)
    }
}

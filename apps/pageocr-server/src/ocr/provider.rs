//! OCR Providers
//!
//! Defines the batch recognition trait and the HTTP client for the remote
//! OCR inference service.

use async_trait::async_trait;

use super::types::{Language, Modality, OcrError, OcrRequest, WordResult};

/// Batch word recognition backend
#[async_trait]
pub trait WordRecognizer: Send + Sync {
    /// Recognize a batch of word images
    ///
    /// Returns one text per image, in input order.
    async fn recognize_batch(
        &self,
        images: &[Vec<u8>],
        language: Language,
        version: &str,
        modality: Modality,
    ) -> Result<Vec<String>, OcrError>;
}

/// HTTP client for the OCR inference service
pub struct HttpOcrClient {
    client: reqwest::Client,
    url: String,
}

impl HttpOcrClient {
    pub fn new(client: reqwest::Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl WordRecognizer for HttpOcrClient {
    async fn recognize_batch(
        &self,
        images: &[Vec<u8>],
        language: Language,
        version: &str,
        modality: Modality,
    ) -> Result<Vec<String>, OcrError> {
        use base64::Engine;

        let image_content = images
            .iter()
            .map(|data| base64::engine::general_purpose::STANDARD.encode(data))
            .collect();

        let request = OcrRequest {
            image_content,
            modality,
            language: language.code(),
            version,
        };

        tracing::debug!(
            url = %self.url,
            words = images.len(),
            language = language.code(),
            version = version,
            "Calling OCR service"
        );

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| OcrError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OcrError::BadStatus {
                status: status.as_u16(),
                body,
            });
        }

        let words: Vec<WordResult> = response
            .json()
            .await
            .map_err(|e| OcrError::MalformedResponse(e.to_string()))?;

        Ok(words.into_iter().map(|word| word.text).collect())
    }
}

/// Mock recognizer for testing
#[cfg(test)]
pub struct MockRecognizer {
    pub texts: Vec<String>,
}

#[cfg(test)]
#[async_trait]
impl WordRecognizer for MockRecognizer {
    async fn recognize_batch(
        &self,
        _images: &[Vec<u8>],
        _language: Language,
        _version: &str,
        _modality: Modality,
    ) -> Result<Vec<String>, OcrError> {
        Ok(self.texts.clone())
    }
}

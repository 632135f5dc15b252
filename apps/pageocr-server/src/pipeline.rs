//! Page Pipeline
//!
//! Runs layout detection, cropping, OCR and line reconstruction for one
//! page image. Stages run strictly one after another and the first failure
//! aborts the run.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError, DEFAULT_LAYOUT_MODEL, DEFAULT_OCR_VERSION};
use crate::crop;
use crate::error::{PageOcrError, Result};
use crate::layout::{HttpLayoutClient, LayoutDetector, LayoutError, Region};
use crate::ocr::{HttpOcrClient, Language, Modality, WordRecognizer};
use crate::page::PageImage;
use crate::text::{check_alignment, format_page};

/// Per-run model and language selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Layout-detection backend
    pub layout_model: String,
    pub language: Language,
    /// OCR model version
    pub version: String,
    pub modality: Modality,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            layout_model: DEFAULT_LAYOUT_MODEL.to_string(),
            language: Language::default(),
            version: DEFAULT_OCR_VERSION.to_string(),
            modality: Modality::default(),
        }
    }
}

/// Page-level OCR result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageOcrResponse {
    pub text: String,
    pub regions: Vec<Region>,
}

/// Page OCR pipeline over pluggable layout and OCR backends
#[derive(Clone)]
pub struct PagePipeline {
    layout: Arc<dyn LayoutDetector>,
    recognizer: Arc<dyn WordRecognizer>,
}

impl PagePipeline {
    pub fn new(layout: Arc<dyn LayoutDetector>, recognizer: Arc<dyn WordRecognizer>) -> Self {
        Self { layout, recognizer }
    }

    /// Pipeline backed by the HTTP services named in the configuration
    pub fn from_config(config: &Config) -> std::result::Result<Self, ConfigError> {
        let client = config.http_client()?;
        Ok(Self::new(
            Arc::new(HttpLayoutClient::new(client.clone(), &config.services.layout_url)),
            Arc::new(HttpOcrClient::new(client, &config.services.ocr_url)),
        ))
    }

    /// Run the pipeline on a page image file
    pub async fn run(&self, image_path: &Path, options: &PipelineOptions) -> Result<PageOcrResponse> {
        let page = PageImage::load(image_path)
            .await
            .map_err(|source| PageOcrError::ImageRead {
                path: image_path.to_path_buf(),
                source,
            })?;

        self.run_page(&page, options).await
    }

    /// Run the pipeline on an already loaded page image
    pub async fn run_page(&self, page: &PageImage, options: &PipelineOptions) -> Result<PageOcrResponse> {
        let path = page.path().display().to_string();

        let regions = self
            .layout
            .detect_regions(page, &options.layout_model)
            .await?;
        if regions.is_empty() {
            return Err(LayoutError::NoRegions.into());
        }
        tracing::info!(page = %path, regions = regions.len(), "Completed layout detection");

        let crops = crop::crop_regions(page, &regions).await?;
        tracing::info!(page = %path, dir = %crops.dir().display(), "Completed cropping");

        let images = crop::load_crops(crops.dir()).await?;
        check_alignment(regions.len(), images.len())?;

        let texts = self
            .recognizer
            .recognize_batch(&images, options.language, &options.version, options.modality)
            .await?;
        tracing::info!(
            page = %path,
            words = texts.len(),
            language = %options.language,
            version = %options.version,
            "Completed OCR"
        );

        let text = format_page(&regions, &texts)?;

        Ok(PageOcrResponse { text, regions })
    }
}

/// Serialize a page result as JSON with four-space indentation
pub fn to_json(response: &PageOcrResponse) -> std::result::Result<Vec<u8>, serde_json::Error> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    response.serialize(&mut serializer)?;
    Ok(buffer)
}

/// Persist a page result
pub async fn write_output(path: &Path, response: &PageOcrResponse) -> Result<()> {
    let data = to_json(response).map_err(|e| PageOcrError::OutputWrite {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    tokio::fs::write(path, data)
        .await
        .map_err(|e| PageOcrError::OutputWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    tracing::info!(output = %path.display(), "Wrote page output");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::BoundingBox;
    use crate::ocr::MockRecognizer;
    use async_trait::async_trait;
    use std::io::Cursor;
    use tempfile::TempDir;

    struct FixedLayout {
        regions: Vec<Region>,
    }

    #[async_trait]
    impl LayoutDetector for FixedLayout {
        async fn detect_regions(&self, _page: &PageImage, _model: &str) -> std::result::Result<Vec<Region>, LayoutError> {
            Ok(self.regions.clone())
        }
    }

    fn write_page(dir: &Path) -> std::path::PathBuf {
        let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(100, 40));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
            .unwrap();
        let path = dir.join("page.png");
        std::fs::write(&path, buffer).unwrap();
        path
    }

    fn pipeline(regions: Vec<Region>, texts: &[&str]) -> PagePipeline {
        PagePipeline::new(
            Arc::new(FixedLayout { regions }),
            Arc::new(MockRecognizer {
                texts: texts.iter().map(|t| t.to_string()).collect(),
            }),
        )
    }

    fn word(x: u32, line: i64) -> Region {
        Region::new(BoundingBox::new(x, 5, 10, 10), line)
    }

    #[tokio::test]
    async fn test_run_reconstructs_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_page(temp_dir.path());

        let regions = vec![word(0, 1), word(20, 1), word(40, 2)];
        let result = pipeline(regions.clone(), &["hello", "there", "world"])
            .run(&path, &PipelineOptions::default())
            .await
            .unwrap();

        assert_eq!(result.text, "hello there\nworld");
        assert_eq!(result.regions, regions);
        assert!(temp_dir.path().join("page").join("2.jpg").exists());
    }

    #[tokio::test]
    async fn test_ocr_length_mismatch() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_page(temp_dir.path());

        let result = pipeline(vec![word(0, 1), word(20, 1)], &["one"])
            .run(&path, &PipelineOptions::default())
            .await;

        assert!(matches!(result, Err(PageOcrError::Alignment(_))));
    }

    #[tokio::test]
    async fn test_empty_layout_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_page(temp_dir.path());

        let result = pipeline(vec![], &[])
            .run(&path, &PipelineOptions::default())
            .await;

        assert!(matches!(result, Err(PageOcrError::Layout(LayoutError::NoRegions))));
        assert!(!temp_dir.path().join("page").exists());
    }

    #[tokio::test]
    async fn test_missing_image() {
        let temp_dir = TempDir::new().unwrap();
        let result = pipeline(vec![word(0, 1)], &["x"])
            .run(&temp_dir.path().join("absent.jpg"), &PipelineOptions::default())
            .await;

        assert!(matches!(result, Err(PageOcrError::ImageRead { .. })));
    }

    #[tokio::test]
    async fn test_second_run_on_same_page_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_page(temp_dir.path());
        let pipeline = pipeline(vec![word(0, 1)], &["x"]);

        pipeline.run(&path, &PipelineOptions::default()).await.unwrap();
        let second = pipeline.run(&path, &PipelineOptions::default()).await;

        assert!(matches!(second, Err(PageOcrError::Crop(crop::CropError::DirectoryExists(_)))));
    }

    #[tokio::test]
    async fn test_write_output() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("out.json");
        let response = PageOcrResponse {
            text: "नमस्ते दुनिया".to_string(),
            regions: vec![word(0, 1)],
        };

        write_output(&output, &response).await.unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.starts_with("{\n    \"text\""));
        let parsed: PageOcrResponse = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, response);
    }
}

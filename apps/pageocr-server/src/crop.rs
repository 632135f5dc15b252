//! Word Cropper
//!
//! Cuts a page image into one JPEG per detected region and reloads the
//! crops in region order.
//!
//! Crops live in a directory named after the page image, next to it:
//!
//! ```text
//! scans/page.jpg
//! scans/page/0.jpg
//! scans/page/1.jpg
//! ...
//! ```

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};
use tokio::io::AsyncWriteExt;

use crate::layout::{BoundingBox, Region};
use crate::page::PageImage;

/// Extension of persisted crops
pub const CROP_EXTENSION: &str = "jpg";

/// Crop error types
#[derive(Debug, thiserror::Error)]
pub enum CropError {
    #[error("Invalid page image path: {0}")]
    InvalidPath(String),

    #[error("Failed to decode page image: {0}")]
    DecodeFailed(String),

    #[error("Region {index} ({bbox:?}) lies outside the {width}x{height} page")]
    EmptyRegion {
        index: usize,
        bbox: BoundingBox,
        width: u32,
        height: u32,
    },

    #[error("Crop directory already exists: {0}")]
    DirectoryExists(PathBuf),

    #[error("Failed to encode crop {index}: {message}")]
    EncodeFailed { index: usize, message: String },

    #[error("Crop storage error: {0}")]
    Storage(String),

    #[error("Missing crop {expected} (found {found})")]
    MissingCrop { expected: usize, found: usize },
}

/// Crops written for one page
#[derive(Debug, Clone)]
pub struct CropSet {
    dir: PathBuf,
    count: usize,
}

impl CropSet {
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Path of the crop for region `index`
    pub fn crop_path(&self, index: usize) -> PathBuf {
        crop_file(&self.dir, index)
    }
}

fn crop_file(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("{}.{}", index, CROP_EXTENSION))
}

/// Crop directory for a page image: its base name up to the first `.`
pub fn crop_dir_for(image_path: &Path) -> Result<PathBuf, CropError> {
    let file_name = image_path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .ok_or_else(|| CropError::InvalidPath(image_path.display().to_string()))?;

    let stem = file_name.trim().split('.').next().unwrap_or_default();
    if stem.is_empty() {
        return Err(CropError::InvalidPath(image_path.display().to_string()));
    }

    let parent = image_path.parent().unwrap_or_else(|| Path::new(""));
    Ok(parent.join(stem))
}

/// Parse the region index out of a crop file name (`"12.jpg"` -> `12`)
pub fn crop_index(file_name: &str) -> Option<usize> {
    let (stem, extension) = file_name.trim().rsplit_once('.')?;
    if !extension.eq_ignore_ascii_case(CROP_EXTENSION) {
        return None;
    }
    // Only canonical names: "03.jpg" or "+3.jpg" would alias index 3
    stem.parse::<usize>()
        .ok()
        .filter(|index| index.to_string() == stem)
}

/// Crop every region out of the page and persist it as `<index>.jpg`
///
/// The crop directory must not exist yet; a second run on the same page
/// fails instead of mixing crops from both runs.
pub async fn crop_regions(page: &PageImage, regions: &[Region]) -> Result<CropSet, CropError> {
    let dir = crop_dir_for(page.path())?;

    let img = image::load_from_memory(page.data())
        .map_err(|e| CropError::DecodeFailed(e.to_string()))?;
    let (width, height) = (img.width(), img.height());

    // Validate before touching the filesystem
    let boxes = regions
        .iter()
        .enumerate()
        .map(|(index, region)| {
            region
                .bounding_box
                .clip(width, height)
                .ok_or_else(|| CropError::EmptyRegion {
                    index,
                    bbox: region.bounding_box,
                    width,
                    height,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    tokio::fs::create_dir(&dir).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::AlreadyExists {
            CropError::DirectoryExists(dir.clone())
        } else {
            CropError::Storage(format!("Failed to create {}: {}", dir.display(), e))
        }
    })?;

    for (index, bbox) in boxes.iter().enumerate() {
        let data = encode_crop(&img, bbox).map_err(|e| CropError::EncodeFailed {
            index,
            message: e.to_string(),
        })?;

        let path = crop_file(&dir, index);
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| CropError::Storage(format!("Failed to create {}: {}", path.display(), e)))?;

        file.write_all(&data)
            .await
            .map_err(|e| CropError::Storage(format!("Failed to write {}: {}", path.display(), e)))?;
    }

    tracing::debug!(dir = %dir.display(), crops = boxes.len(), "Cropped page regions");

    Ok(CropSet {
        dir,
        count: boxes.len(),
    })
}

/// Encode one clipped region as JPEG
fn encode_crop(img: &DynamicImage, bbox: &BoundingBox) -> image::ImageResult<Vec<u8>> {
    // JPEG has no alpha channel
    let cropped = DynamicImage::ImageRgb8(
        img.crop_imm(bbox.x, bbox.y, bbox.width, bbox.height).to_rgb8(),
    );

    let mut buffer = Vec::new();
    cropped.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Jpeg)?;
    Ok(buffer)
}

/// Reload the crops of a directory in numeric index order
///
/// Entries that are not `<integer>.jpg` are ignored. The remaining indices
/// must be exactly `0..N`.
pub async fn load_crops(dir: &Path) -> Result<Vec<Vec<u8>>, CropError> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| CropError::Storage(format!("Failed to read {}: {}", dir.display(), e)))?;

    let mut indexed = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| CropError::Storage(e.to_string()))?
    {
        let name = entry.file_name().to_string_lossy().to_string();
        if let Some(index) = crop_index(&name) {
            indexed.push((index, entry.path()));
        }
    }

    // Numeric, not lexical: "10.jpg" sorts after "2.jpg"
    indexed.sort_by_key(|(index, _)| *index);

    let mut crops = Vec::with_capacity(indexed.len());
    for (position, (index, path)) in indexed.into_iter().enumerate() {
        if index != position {
            return Err(CropError::MissingCrop {
                expected: position,
                found: index,
            });
        }
        let data = tokio::fs::read(&path)
            .await
            .map_err(|e| CropError::Storage(format!("Failed to read {}: {}", path.display(), e)))?;
        crops.push(data);
    }

    Ok(crops)
}

//! Page image handle threaded through every pipeline stage

use std::path::{Path, PathBuf};

/// A page image loaded from disk
///
/// The path determines where crops are stored; the bytes are sent to the
/// layout service and decoded by the cropper.
#[derive(Debug, Clone)]
pub struct PageImage {
    path: PathBuf,
    data: Vec<u8>,
}

impl PageImage {
    pub fn new(path: impl AsRef<Path>, data: Vec<u8>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            data,
        }
    }

    /// Read a page image from disk
    pub async fn load(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        Ok(Self::new(path, data))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// File name sent with the multipart upload
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "page.jpg".to_string())
    }

    /// Mime type guessed from the extension, `image/jpeg` when unknown
    pub fn mime_type(&self) -> String {
        mime_guess::from_path(&self.path)
            .first()
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_else(|| "image/jpeg".to_string())
    }
}

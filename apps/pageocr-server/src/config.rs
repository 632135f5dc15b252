//! Configuration loaded from environment variables
//!
//! `.env` files are picked up through `dotenvy` before `Config::from_env`
//! is called.

use std::path::PathBuf;
use std::time::Duration;

use crate::ocr::{Language, Modality};
use crate::pipeline::PipelineOptions;

pub const DEFAULT_LAYOUT_URL: &str = "https://ilocr.iiit.ac.in/layout/";
pub const DEFAULT_OCR_URL: &str = "https://ilocr.iiit.ac.in/ocr/infer";
pub const DEFAULT_LAYOUT_MODEL: &str = "v2_doctr";
pub const DEFAULT_OCR_VERSION: &str = "v4_robust";
pub const DEFAULT_PORT: u16 = 3000;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Remote service endpoints
#[derive(Debug, Clone)]
pub struct ServicesConfig {
    pub layout_url: String,
    pub ocr_url: String,
    /// Transport timeout per request; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

/// HTTP server settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Uploaded pages and their crops live here during a request
    pub work_dir: PathBuf,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub services: ServicesConfig,
    pub server: ServerConfig,
    pub pipeline: PipelineOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            services: ServicesConfig {
                layout_url: DEFAULT_LAYOUT_URL.to_string(),
                ocr_url: DEFAULT_OCR_URL.to_string(),
                timeout: None,
            },
            server: ServerConfig {
                port: DEFAULT_PORT,
                work_dir: std::env::temp_dir().join("pageocr"),
            },
            pipeline: PipelineOptions::default(),
        }
    }
}

impl Config {
    /// Load configuration from `PAGEOCR_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let timeout = match get("PAGEOCR_HTTP_TIMEOUT_SECS") {
            Some(value) => Some(Duration::from_secs(value.trim().parse().map_err(|e| {
                ConfigError::InvalidValue {
                    key: "PAGEOCR_HTTP_TIMEOUT_SECS",
                    message: format!("{}", e),
                }
            })?)),
            None => None,
        };

        let port = match get("PAGEOCR_PORT") {
            Some(value) => value.trim().parse().map_err(|e| ConfigError::InvalidValue {
                key: "PAGEOCR_PORT",
                message: format!("{}", e),
            })?,
            None => defaults.server.port,
        };

        let language = match get("PAGEOCR_LANGUAGE") {
            Some(value) => value.parse::<Language>().map_err(|e| ConfigError::InvalidValue {
                key: "PAGEOCR_LANGUAGE",
                message: e.to_string(),
            })?,
            None => defaults.pipeline.language,
        };

        let modality = match get("PAGEOCR_MODALITY") {
            Some(value) => value.parse::<Modality>().map_err(|e| ConfigError::InvalidValue {
                key: "PAGEOCR_MODALITY",
                message: e.to_string(),
            })?,
            None => defaults.pipeline.modality,
        };

        Ok(Self {
            services: ServicesConfig {
                layout_url: get("PAGEOCR_LAYOUT_URL").unwrap_or(defaults.services.layout_url),
                ocr_url: get("PAGEOCR_OCR_URL").unwrap_or(defaults.services.ocr_url),
                timeout,
            },
            server: ServerConfig {
                port,
                work_dir: get("PAGEOCR_WORK_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.server.work_dir),
            },
            pipeline: PipelineOptions {
                layout_model: get("PAGEOCR_LAYOUT_MODEL").unwrap_or(defaults.pipeline.layout_model),
                language,
                version: get("PAGEOCR_OCR_VERSION").unwrap_or(defaults.pipeline.version),
                modality,
            },
        })
    }

    /// HTTP client shared by both service clients
    pub fn http_client(&self) -> Result<reqwest::Client, ConfigError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.services.timeout {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))
    }
}

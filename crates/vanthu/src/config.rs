//! Service configuration.
//!
//! All tunables live here, loadable from a TOML file with per-field
//! defaults matching the production deployment. Deployment secrets
//! (Drive token, folder id, tessdata location) may be overridden through
//! environment variables so the config file can be committed.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, VanthuError};

fn default_min_direct_text_chars() -> usize {
    100
}

fn default_scale() -> f32 {
    2.0
}

fn default_max_dimension() -> u32 {
    8192
}

fn default_language() -> String {
    "vie".to_string()
}

fn default_tessdata_dir() -> PathBuf {
    PathBuf::from("./tessdata")
}

fn default_psm() -> u8 {
    3
}

fn default_api_base() -> String {
    "https://www.googleapis.com".to_string()
}

/// Knobs for the extraction orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionOptions {
    /// Minimum trimmed character count for directly extracted text to be
    /// accepted without OCR. Below this, the document is treated as a
    /// scanned image. The default of 100 was tuned against scanned
    /// government paperwork; it is a heuristic, not a hard rule.
    #[serde(default = "default_min_direct_text_chars")]
    pub min_direct_text_chars: usize,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            min_direct_text_chars: default_min_direct_text_chars(),
        }
    }
}

/// Page rasterization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Multiplier applied to the page's native point dimensions. Higher
    /// values trade rendering time for OCR accuracy; 2.0 works well for
    /// scanned A4 paperwork.
    #[serde(default = "default_scale")]
    pub scale: f32,

    /// Upper bound on either output edge, in pixels. The scale is reduced
    /// for pages that would exceed it.
    #[serde(default = "default_max_dimension")]
    pub max_dimension: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            max_dimension: default_max_dimension(),
        }
    }
}

/// OCR engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Tesseract language code. Multiple packs may be joined with '+'.
    #[serde(default = "default_language")]
    pub language: String,

    /// Directory holding the `<language>.traineddata` assets.
    #[serde(default = "default_tessdata_dir")]
    pub tessdata_dir: PathBuf,

    /// Page segmentation mode passed to the engine.
    #[serde(default = "default_psm")]
    pub psm: u8,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            tessdata_dir: default_tessdata_dir(),
            psm: default_psm(),
        }
    }
}

impl OcrConfig {
    /// Verify the language assets exist.
    ///
    /// Called at server startup: a missing language pack is a deployment
    /// error, not something to discover one request at a time.
    pub fn validate(&self) -> Result<()> {
        if self.language.trim().is_empty() {
            return Err(VanthuError::validation("OCR language must not be empty"));
        }
        if !self.tessdata_dir.is_dir() {
            return Err(VanthuError::MissingDependency(format!(
                "tessdata directory not found: {}",
                self.tessdata_dir.display()
            )));
        }
        for lang in self.language.split('+').map(str::trim).filter(|l| !l.is_empty()) {
            let traineddata = self.tessdata_dir.join(format!("{lang}.traineddata"));
            if !traineddata.exists() {
                return Err(VanthuError::MissingDependency(format!(
                    "language '{}' not found: {}",
                    lang,
                    traineddata.display()
                )));
            }
        }
        Ok(())
    }
}

/// Blob store (Google Drive) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Parent folder under which per-module subfolders are created.
    #[serde(default)]
    pub root_folder_id: String,

    /// OAuth bearer token for the service account. Usually supplied via
    /// the `VANTHU_DRIVE_TOKEN` environment variable rather than the file.
    #[serde(default)]
    pub access_token: String,

    /// API host, overridable so tests can point at a local stub.
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_folder_id: String::new(),
            access_token: String::new(),
            api_base: default_api_base(),
        }
    }
}

/// Aggregate service configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub extraction: ExtractionOptions,
    #[serde(default)]
    pub render: RenderOptions,
    #[serde(default)]
    pub ocr: OcrConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| {
            VanthuError::validation(format!("invalid config file {}: {}", path.display(), e))
        })
    }

    /// Apply environment-variable overrides for deployment secrets.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var("VANTHU_DRIVE_TOKEN") {
            self.storage.access_token = token;
        }
        if let Ok(folder) = std::env::var("VANTHU_DRIVE_FOLDER_ID") {
            self.storage.root_folder_id = folder;
        }
        if let Ok(dir) = std::env::var("VANTHU_TESSDATA_DIR") {
            self.ocr.tessdata_dir = PathBuf::from(dir);
        }
    }
}

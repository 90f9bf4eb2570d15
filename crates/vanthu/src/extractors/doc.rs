//! Legacy binary Word (.doc) extractor.
//!
//! There is no maintained pure-Rust parser for the pre-2007 binary format,
//! so the body is recovered by converting to .docx with LibreOffice's
//! headless mode and extracting from the converted archive. LibreOffice is
//! an optional system dependency: when `soffice` is absent, extraction
//! reports a missing dependency and the pipeline surfaces that as a
//! document-level failure (there is no OCR fallback for Word containers).

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::{Duration, timeout};

use super::{DOC_MIME_TYPE, FormatExtractor};
use crate::error::{Result, VanthuError};

/// Upper bound on one headless conversion.
const CONVERSION_TIMEOUT_SECS: u64 = 300;

static SCRATCH_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Working directory for one conversion, removed on drop.
struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    fn create() -> Result<Self> {
        let path = std::env::temp_dir().join(format!(
            "vanthu-doc-{}-{}",
            std::process::id(),
            SCRATCH_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        std::fs::create_dir_all(&path)?;
        Ok(Self { path })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

fn soffice_command() -> String {
    std::env::var("VANTHU_SOFFICE_PATH").unwrap_or_else(|_| "soffice".to_string())
}

async fn convert_to_docx(bytes: &[u8]) -> Result<Vec<u8>> {
    convert_to_docx_with(&soffice_command(), bytes).await
}

async fn convert_to_docx_with(soffice: &str, bytes: &[u8]) -> Result<Vec<u8>> {
    let workdir = ScratchDir::create()?;
    let input = workdir.path().join("input.doc");
    tokio::fs::write(&input, bytes).await?;

    let run = Command::new(soffice)
        .arg("--headless")
        .arg("--convert-to")
        .arg("docx")
        .arg("--outdir")
        .arg(workdir.path())
        .arg(&input)
        .output();

    let output = match timeout(Duration::from_secs(CONVERSION_TIMEOUT_SECS), run).await {
        Ok(Ok(output)) => output,
        Ok(Err(err)) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(VanthuError::MissingDependency(format!(
                "LibreOffice ('{soffice}') is required for legacy .doc support; install it or set VANTHU_SOFFICE_PATH"
            )));
        }
        Ok(Err(err)) => return Err(err.into()),
        Err(_) => {
            return Err(VanthuError::parsing(format!(
                ".doc conversion timed out after {CONVERSION_TIMEOUT_SECS}s"
            )));
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(VanthuError::parsing(format!(
            ".doc conversion failed ({}): {}",
            output.status,
            stderr.trim()
        )));
    }

    let converted = workdir.path().join("input.docx");
    tokio::fs::read(&converted)
        .await
        .map_err(|_| VanthuError::parsing("LibreOffice reported success but produced no .docx output"))
}

pub struct LegacyDocExtractor;

impl LegacyDocExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LegacyDocExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FormatExtractor for LegacyDocExtractor {
    fn name(&self) -> &str {
        "legacy-doc"
    }

    fn supported_mime_types(&self) -> &[&'static str] {
        &[DOC_MIME_TYPE]
    }

    async fn extract(&self, bytes: &[u8]) -> Result<String> {
        let docx = convert_to_docx(bytes).await?;
        docx_lite::extract_text_from_bytes(&docx)
            .map_err(|e| VanthuError::parsing(format!("converted .doc body extraction failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_type_and_fallback() {
        let extractor = LegacyDocExtractor::new();
        assert_eq!(extractor.supported_mime_types(), &[DOC_MIME_TYPE]);
        assert!(!extractor.supports_ocr_fallback());
    }

    #[tokio::test]
    async fn test_missing_soffice_is_missing_dependency() {
        // Point at a binary that cannot exist so the test is independent of
        // whether LibreOffice is installed on the machine.
        let result = convert_to_docx_with("/nonexistent/soffice-for-test", b"\xD0\xCF\x11\xE0stub").await;
        assert!(matches!(result, Err(VanthuError::MissingDependency(_))));
    }

    #[test]
    fn test_scratch_dir_removed_on_drop() {
        let path = {
            let dir = ScratchDir::create().unwrap();
            assert!(dir.path().is_dir());
            dir.path().to_path_buf()
        };
        assert!(!path.exists());
    }
}

//! The ingestion service: the one entry point every transport adapter uses.
//!
//! Ordering matters: the blob upload happens before extraction, and a
//! storage failure aborts the request without running the pipeline —
//! extracted text must never be returned detached from a storage
//! reference. Extraction failures, by contrast, do not fail the request;
//! the blob reference is valid and the failure travels in the response.

use std::sync::Arc;

use crate::error::Result;
use crate::pipeline::Orchestrator;
use crate::storage::BlobStore;
use crate::types::{ExtractionOutcome, IngestResponse, IngestedFile};

pub struct IngestService {
    store: Arc<dyn BlobStore>,
    orchestrator: Orchestrator,
}

impl IngestService {
    pub fn new(store: Arc<dyn BlobStore>, orchestrator: Orchestrator) -> Self {
        Self { store, orchestrator }
    }

    /// Persist the upload, run extraction over the same bytes, and combine
    /// both results.
    pub async fn ingest(&self, file: IngestedFile) -> Result<IngestResponse> {
        let handle = self
            .store
            .upload(&file.bytes, &file.module_tag, &file.file_name, &file.mime_type)
            .await?;

        let outcome = self.orchestrator.extract(&file).await;
        if let ExtractionOutcome::Failed(reason) = &outcome {
            tracing::warn!(file_name = %file.file_name, blob_id = %handle.id, reason = %reason, "extraction failed, upload kept");
        }

        Ok(IngestResponse::assemble(handle, &outcome))
    }

    /// Fetch a stored blob and re-run extraction over it. Used when text is
    /// needed again after ingestion (the stored blob is the only copy of
    /// the bytes).
    pub async fn read_back(&self, file_id: &str) -> Result<String> {
        let (bytes, mime_type) = self.store.read_bytes(file_id).await?;
        let file = IngestedFile::new(bytes, mime_type, "", String::new());
        let outcome = self.orchestrator.extract(&file).await;
        Ok(outcome.text().unwrap_or_default().to_string())
    }

    pub async fn delete(&self, file_id: &str) -> Result<()> {
        self.store.delete(file_id).await
    }
}

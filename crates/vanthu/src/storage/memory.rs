//! In-memory blob store for tests and local development.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::BlobStore;
use crate::error::{Result, VanthuError};
use crate::types::BlobHandle;

struct StoredBlob {
    bytes: Vec<u8>,
    name: String,
    mime_type: String,
    module_tag: String,
}

/// Process-local [`BlobStore`] with the same observable contract as the
/// Drive client: ids are opaque, deletes of unknown ids fail, reads return
/// the stored bytes and MIME type.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, StoredBlob>>,
    next_id: AtomicU64,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blobs.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Module tag a blob was routed to, for assertions.
    pub fn module_tag_of(&self, file_id: &str) -> Option<String> {
        self.blobs.lock().get(file_id).map(|b| b.module_tag.clone())
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(&self, bytes: &[u8], module_tag: &str, file_name: &str, mime_type: &str) -> Result<BlobHandle> {
        let id = format!("mem-{}", self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        self.blobs.lock().insert(
            id.clone(),
            StoredBlob {
                bytes: bytes.to_vec(),
                name: file_name.to_string(),
                mime_type: mime_type.to_string(),
                module_tag: module_tag.to_string(),
            },
        );

        Ok(BlobHandle {
            id: id.clone(),
            name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            size_bytes: bytes.len() as u64,
            view_link: format!("memory://{id}"),
            download_link: None,
        })
    }

    async fn delete(&self, file_id: &str) -> Result<()> {
        self.blobs
            .lock()
            .remove(file_id)
            .map(|_| ())
            .ok_or_else(|| VanthuError::storage(format!("unknown blob id: {file_id}")))
    }

    async fn read_bytes(&self, file_id: &str) -> Result<(Vec<u8>, String)> {
        let blobs = self.blobs.lock();
        let blob = blobs
            .get(file_id)
            .ok_or_else(|| VanthuError::storage(format!("unknown blob id: {file_id}")))?;
        Ok((blob.bytes.clone(), blob.mime_type.clone()))
    }
}

//! Blob storage: the interface the pipeline needs from the cloud drive.
//!
//! The service only ever uploads, deletes, or reads back whole blobs. The
//! production implementation talks to Google Drive; tests use the
//! in-memory store. Both are constructed explicitly and passed in — there
//! is no module-level client.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::BlobHandle;

pub mod drive;
pub mod memory;

pub use drive::DriveClient;
pub use memory::MemoryBlobStore;

/// Opaque blob store addressed by ids.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store the bytes under the module tag's folder and return a handle
    /// usable for later `read_bytes`/`delete` calls.
    async fn upload(&self, bytes: &[u8], module_tag: &str, file_name: &str, mime_type: &str) -> Result<BlobHandle>;

    async fn delete(&self, file_id: &str) -> Result<()>;

    /// The stored bytes and their MIME type.
    async fn read_bytes(&self, file_id: &str) -> Result<(Vec<u8>, String)>;
}

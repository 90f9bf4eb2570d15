//! Google Drive v3 blob store client.
//!
//! Files land in a per-module subfolder under the configured root folder.
//! Folder ids are cached per process; the lookup-then-create sequence is
//! safe to race — a lost race at worst creates a sibling folder with the
//! same name, which Drive permits and the application treats as a
//! non-fatal anomaly.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Deserialize;

use super::BlobStore;
use crate::config::StorageConfig;
use crate::error::{Result, VanthuError};
use crate::types::BlobHandle;

const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";
const UPLOAD_BOUNDARY: &str = "vanthu_related_c4f9d2";
const FILE_FIELDS: &str = "id,name,mimeType,size,webViewLink,webContentLink";

/// Drive `files` resource, as returned by create/list.
#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(rename = "mimeType", default)]
    mime_type: String,
    /// Drive serializes int64 fields as strings.
    #[serde(default)]
    size: Option<String>,
    #[serde(rename = "webViewLink", default)]
    web_view_link: Option<String>,
    #[serde(rename = "webContentLink", default)]
    web_content_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DriveFileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

/// Explicitly constructed Drive client; the `reqwest::Client` is injected
/// so transports share one connection pool.
pub struct DriveClient {
    http: reqwest::Client,
    config: StorageConfig,
    folders: RwLock<HashMap<String, String>>,
}

impl DriveClient {
    pub fn new(http: reqwest::Client, config: StorageConfig) -> Self {
        Self {
            http,
            config,
            folders: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve (or create) the subfolder for a module tag.
    async fn resolve_folder(&self, module_tag: &str) -> Result<String> {
        if let Some(id) = self.folders.read().get(module_tag) {
            return Ok(id.clone());
        }

        let id = match self.lookup_folder(module_tag).await? {
            Some(id) => id,
            None => self.create_folder(module_tag).await?,
        };

        // First resolution wins so every upload for a tag in this process
        // goes to the same folder even if two requests raced the create.
        let mut cache = self.folders.write();
        Ok(cache.entry(module_tag.to_string()).or_insert(id).clone())
    }

    async fn lookup_folder(&self, name: &str) -> Result<Option<String>> {
        let query = format!(
            "name='{}' and mimeType='{}' and '{}' in parents and trashed=false",
            escape_query_value(name),
            FOLDER_MIME_TYPE,
            escape_query_value(&self.config.root_folder_id),
        );

        let response = self
            .http
            .get(format!("{}/drive/v3/files", self.config.api_base))
            .query(&[("q", query.as_str()), ("fields", "files(id,name)"), ("spaces", "drive")])
            .bearer_auth(&self.config.access_token)
            .send()
            .await?;

        let response = check_status(response, "folder lookup").await?;
        let list: DriveFileList = response
            .json()
            .await
            .map_err(|e| VanthuError::storage_with_source("folder lookup returned invalid JSON", e))?;

        Ok(list.files.into_iter().next().map(|f| f.id))
    }

    async fn create_folder(&self, name: &str) -> Result<String> {
        let metadata = serde_json::json!({
            "name": name,
            "mimeType": FOLDER_MIME_TYPE,
            "parents": [self.config.root_folder_id],
        });

        let response = self
            .http
            .post(format!("{}/drive/v3/files", self.config.api_base))
            .query(&[("fields", "id")])
            .bearer_auth(&self.config.access_token)
            .json(&metadata)
            .send()
            .await?;

        let response = check_status(response, "folder creation").await?;
        let folder: DriveFile = response
            .json()
            .await
            .map_err(|e| VanthuError::storage_with_source("folder creation returned invalid JSON", e))?;

        tracing::info!(folder = name, id = %folder.id, "created module folder");
        Ok(folder.id)
    }
}

#[async_trait]
impl BlobStore for DriveClient {
    async fn upload(&self, bytes: &[u8], module_tag: &str, file_name: &str, mime_type: &str) -> Result<BlobHandle> {
        let folder_id = self.resolve_folder(module_tag).await?;

        let metadata = serde_json::json!({
            "name": file_name,
            "parents": [folder_id],
        });
        let body = related_body(&metadata, mime_type, bytes);

        let response = self
            .http
            .post(format!("{}/upload/drive/v3/files", self.config.api_base))
            .query(&[("uploadType", "multipart"), ("fields", FILE_FIELDS)])
            .bearer_auth(&self.config.access_token)
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("multipart/related; boundary={UPLOAD_BOUNDARY}"),
            )
            .body(body)
            .send()
            .await?;

        let response = check_status(response, "upload").await?;
        let file: DriveFile = response
            .json()
            .await
            .map_err(|e| VanthuError::storage_with_source("upload returned invalid JSON", e))?;

        Ok(to_handle(file, bytes.len() as u64))
    }

    async fn delete(&self, file_id: &str) -> Result<()> {
        let response = self
            .http
            .delete(format!("{}/drive/v3/files/{file_id}", self.config.api_base))
            .bearer_auth(&self.config.access_token)
            .send()
            .await?;

        check_status(response, "delete").await?;
        Ok(())
    }

    async fn read_bytes(&self, file_id: &str) -> Result<(Vec<u8>, String)> {
        let response = self
            .http
            .get(format!("{}/drive/v3/files/{file_id}", self.config.api_base))
            .query(&[("fields", "mimeType")])
            .bearer_auth(&self.config.access_token)
            .send()
            .await?;
        let response = check_status(response, "metadata read").await?;
        let metadata: DriveFile = response
            .json()
            .await
            .map_err(|e| VanthuError::storage_with_source("metadata read returned invalid JSON", e))?;

        let response = self
            .http
            .get(format!("{}/drive/v3/files/{file_id}", self.config.api_base))
            .query(&[("alt", "media")])
            .bearer_auth(&self.config.access_token)
            .send()
            .await?;
        let response = check_status(response, "content read").await?;
        let bytes = response.bytes().await?;

        Ok((bytes.to_vec(), metadata.mime_type))
    }
}

/// Fail with the response body attached; Drive error payloads carry the
/// actionable message.
async fn check_status(response: reqwest::Response, operation: &str) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(VanthuError::storage(format!(
        "Drive {operation} failed with {status}: {}",
        body.trim()
    )))
}

/// Single quotes and backslashes must be escaped inside Drive query strings.
fn escape_query_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Drive's multipart upload wants `multipart/related`: a JSON metadata part
/// followed by the media part.
fn related_body(metadata: &serde_json::Value, mime_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(bytes.len() + 512);
    body.extend_from_slice(
        format!("--{UPLOAD_BOUNDARY}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{metadata}\r\n").as_bytes(),
    );
    body.extend_from_slice(format!("--{UPLOAD_BOUNDARY}\r\nContent-Type: {mime_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{UPLOAD_BOUNDARY}--\r\n").as_bytes());
    body
}

fn to_handle(file: DriveFile, fallback_size: u64) -> BlobHandle {
    let size_bytes = file
        .size
        .as_deref()
        .and_then(|s| s.parse().ok())
        .unwrap_or(fallback_size);

    BlobHandle {
        id: file.id,
        name: file.name,
        mime_type: file.mime_type,
        size_bytes,
        view_link: file.web_view_link.unwrap_or_default(),
        download_link: file.web_content_link,
    }
}

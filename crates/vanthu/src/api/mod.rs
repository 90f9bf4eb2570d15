//! HTTP ingestion surface.
//!
//! One thin transport over [`IngestService`](crate::ingest::IngestService):
//!
//! - `POST /upload` — multipart upload (`file` + optional `module`),
//!   returns blob metadata plus extracted text when present
//! - `POST /delete` — remove a stored blob by id
//! - `POST /read` — re-extract text from a stored blob
//! - `GET /health` — liveness check
//!
//! ```bash
//! curl -F "file=@congvan.pdf;type=application/pdf" -F "module=vanban" \
//!      http://localhost:3001/upload
//! ```

mod error;
mod handlers;
mod server;
mod types;

pub use error::ApiError;
pub use handlers::DEFAULT_MODULE_TAG;
pub use server::{create_router, create_router_with_limits, serve};
pub use types::{
    ApiSizeLimits, ApiState, DeleteRequest, DeleteResponse, ErrorResponse, HealthResponse, ReadRequest, ReadResponse,
};

//! vanthu — document text-extraction and OCR ingestion pipeline.
//!
//! The ingestion side of a Vietnamese record-management service: uploaded
//! PDF and Word documents are persisted to a cloud drive and their text is
//! recovered, either from the native text layer or, for scanned paperwork,
//! by rasterizing each page and running Vietnamese OCR over it.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vanthu::{
//!     Config, ExtractionOutcome, IngestedFile, Orchestrator, PdfOcrEngine,
//! };
//!
//! # async fn example() {
//! let config = Config::default();
//! let ocr = Arc::new(PdfOcrEngine::new(config.render, config.ocr));
//! let orchestrator = Orchestrator::new(config.extraction, ocr);
//!
//! let file = IngestedFile::new(
//!     std::fs::read("congvan.pdf").unwrap(),
//!     "application/pdf".to_string(),
//!     "congvan.pdf",
//!     "vanban".to_string(),
//! );
//! match orchestrator.extract(&file).await {
//!     ExtractionOutcome::DirectText(text) | ExtractionOutcome::OcrText(text) => println!("{text}"),
//!     ExtractionOutcome::Unsupported => println!("no extractor for this type"),
//!     ExtractionOutcome::Failed(reason) => eprintln!("extraction failed: {reason}"),
//! }
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`extractors`] — per-format direct text extraction behind a MIME
//!   dispatch table
//! - [`pdf`] — PDF structure access: native text layer, page rasterization
//! - [`ocr`] — page normalization and Tesseract recognition with a scoped
//!   worker lifecycle
//! - [`pipeline`] — the orchestrator deciding between direct text and OCR
//! - [`storage`] — blob store clients (Google Drive, in-memory)
//! - [`ingest`] — the service every transport adapter consumes
//! - [`api`] — the axum HTTP surface (feature `api`)

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod ingest;
pub mod ocr;
pub mod pdf;
pub mod pipeline;
pub mod storage;
pub mod text;
pub mod types;

#[cfg(feature = "api")]
pub mod api;

pub use config::{Config, ExtractionOptions, OcrConfig, RenderOptions, StorageConfig};
pub use error::{Result, VanthuError};
pub use ingest::IngestService;
pub use ocr::{DocumentOcr, OcrWorker, PdfOcrEngine, with_worker};
pub use pipeline::Orchestrator;
pub use storage::{BlobStore, DriveClient, MemoryBlobStore};
pub use text::normalize_file_name;
pub use types::{BlobHandle, ExtractionOutcome, IngestResponse, IngestedFile, PageImage};

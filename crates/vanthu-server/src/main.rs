//! Standalone ingestion server.
//!
//! Thin transport over the `vanthu` library: parse arguments, load
//! configuration, wire the Drive client and the OCR engine into an
//! [`IngestService`], and serve the router.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use vanthu::api::{ApiState, serve};
use vanthu::{BlobStore, Config, DriveClient, IngestService, Orchestrator, PdfOcrEngine};

#[derive(Parser, Debug)]
#[command(name = "vanthu-server", version, about = "Document ingestion and text-extraction server")]
struct Args {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind.
    #[arg(long, default_value_t = 3001)]
    port: u16,

    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_toml_file(path).with_context(|| format!("loading {}", path.display()))?,
        None => Config::default(),
    };
    config.apply_env_overrides();

    // A missing language pack is a deployment error; fail now, not on the
    // first scanned upload.
    config.ocr.validate().context("OCR language assets")?;

    if config.storage.root_folder_id.trim().is_empty() {
        anyhow::bail!("storage.root_folder_id is not set (config file or VANTHU_DRIVE_FOLDER_ID)");
    }
    if config.storage.access_token.trim().is_empty() {
        anyhow::bail!("storage.access_token is not set (config file or VANTHU_DRIVE_TOKEN)");
    }

    let http = reqwest::Client::new();
    let store: Arc<dyn BlobStore> = Arc::new(DriveClient::new(http, config.storage.clone()));

    let ocr = Arc::new(PdfOcrEngine::new(config.render.clone(), config.ocr.clone()));
    let orchestrator = Orchestrator::new(config.extraction.clone(), ocr);
    let service = Arc::new(IngestService::new(store, orchestrator));

    tracing::info!(
        language = %config.ocr.language,
        tessdata = %config.ocr.tessdata_dir.display(),
        threshold = config.extraction.min_direct_text_chars,
        "starting ingestion server"
    );

    serve(&args.host, args.port, ApiState { service }).await?;
    Ok(())
}

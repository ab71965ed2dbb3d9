//! # Reality Defender SDK
//!
//! The Reality Defender SDK provides tools for detecting deepfakes and manipulated media
//! through the Reality Defender API.
//!
//! ## Basic Usage Example
//!
//! ```no_run
//! use realitydefender::{Client, Config, UploadOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Initialize with API key
//!     let client = Client::new(Config {
//!         api_key: std::env::var("REALITY_DEFENDER_API_KEY")?,
//!         ..Default::default()
//!     })?;
//!
//!     // Upload a file for analysis
//!     let upload_result = client.upload(UploadOptions {
//!         file_path: "./image.jpg".to_string(),
//!     }).await?;
//!
//!     // Fetch until the analysis is final (30 attempts, 2 seconds apart)
//!     let result = client.get_result(&upload_result.request_id, None).await?;
//!
//!     println!("Status: {}", result.status);
//!     if let Some(score) = result.score {
//!         println!("Score: {:.4} ({:.1}%)", score, score * 100.0);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Event-Based Polling
//!
//! ```no_run
//! use realitydefender::{Client, Config, PollEvent, PollOptions, ERROR_EVENT, RESULT_EVENT};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new(Config {
//!         api_key: std::env::var("REALITY_DEFENDER_API_KEY")?,
//!         ..Default::default()
//!     })?;
//!
//!     client.on(RESULT_EVENT, |event| {
//!         if let PollEvent::Result(result) = event {
//!             println!("{}: {}", result.request_id, result.status);
//!         }
//!     });
//!     client.on(ERROR_EVENT, |event| {
//!         if let PollEvent::Error(err) = event {
//!             eprintln!("polling failed: {err}");
//!         }
//!     });
//!
//!     let options = PollOptions {
//!         polling_interval: Some(2000),
//!         timeout: Some(60000),
//!         ..Default::default()
//!     };
//!     client.poll_for_results("request-id", Some(options)).await?;
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod events;
mod file;
mod formatter;
mod http;
mod models;
mod poll;
pub mod utils;

// Re-exports
pub use client::Client;
pub use config::{
    Config, DEFAULT_BASE_URL, DEFAULT_MANIPULATED_LABEL, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_POLLING_INTERVAL_MS, DEFAULT_POLL_TIMEOUT_MS,
};
pub use error::{Error, ErrorCode, Result};
pub use events::{EventHandler, EventRegistry, PollEvent, ERROR_EVENT, RESULT_EVENT};
pub use file::{size_limit_for, FileTypeConfig, SUPPORTED_FILE_TYPES};
pub use formatter::{format_result, normalize_score, ResultFormatter};
pub use models::{
    status, AllMediaResponse, BatchOptions, DetectionResult, DetectionResultList,
    GetResultOptions, GetResultsOptions, MediaModel, MediaResponse, ModelResult, PollOptions,
    ResultsMetadata, ResultsSummary, UploadOptions, UploadResult,
};
pub use poll::{AttemptPolicy, CancelSignal, PollEngine, ResultFetcher, WatchPolicy};
pub use tokio_util::sync::CancellationToken;

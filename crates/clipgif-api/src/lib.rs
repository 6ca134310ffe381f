//! Axum HTTP API server.
//!
//! This crate provides:
//! - Video ingest (multipart upload and URL download) with transcription
//! - Theme-driven GIF clip generation backed by a local Ollama model
//! - Static delivery of rendered artifacts under `/output`
//! - Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;

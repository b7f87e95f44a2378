//! Error types for the ptcloud binary.

use ptcloud_data::{LoadError, PlyError};
use thiserror::Error;

/// Errors that can occur while inspecting a point cloud.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Header error: {0}")]
    Header(#[from] PlyError),

    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

//! Error types for PLY decoding.

use crate::mesh::MeshData;
use thiserror::Error;

/// Errors that can occur while decoding a point-cloud file.
#[derive(Debug, Error)]
pub enum PlyError {
    #[error("Truncated input at byte {offset}: needed {needed} bytes, {remaining} remaining")]
    Truncated {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("Malformed header line {line:?}: {reason}")]
    MalformedHeader { line: String, reason: String },

    #[error("Cannot allocate {vertices} vertices: {source}")]
    Allocation {
        vertices: usize,
        source: std::collections::TryReserveError,
    },

    #[error("Vertex budget must be at least 1")]
    InvalidBudget,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A fatal decode error paired with whatever was decoded before it.
///
/// `mesh` keeps its full allocated size; only the first `decoded` slots hold
/// vertices read from the file.
#[derive(Debug, Error)]
#[error("{error} ({decoded} of {} vertices decoded)", .mesh.len())]
pub struct LoadError {
    #[source]
    pub error: PlyError,
    pub mesh: MeshData,
    pub decoded: usize,
}

impl LoadError {
    /// Wrap an error raised before any mesh was allocated.
    pub fn without_mesh(error: PlyError) -> Self {
        Self {
            error,
            mesh: MeshData::empty(),
            decoded: 0,
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        LoadError::without_mesh(PlyError::Io(err))
    }
}

//! Load driver: runs the header tokenizer, then the body decoder, over one file.

use crate::cursor::ByteCursor;
use crate::error::{LoadError, PlyError};
use crate::mesh::MeshData;
use crate::ply::layout::{HeaderLayout, ParserState};
use crate::ply::{body, header};
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Vertex budget used when the caller does not supply one.
pub const DEFAULT_VERTEX_BUDGET: usize = 65_000;

/// Summary of a completed decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DecodeStats {
    pub declared_vertices: usize,
    pub output_vertices: usize,
    /// Output slots actually filled from the file.
    pub vertices_decoded: usize,
    pub decimation_factor: usize,
    pub color_channels: usize,
    pub normal_channels: usize,
    pub header_bytes: usize,
    pub bytes_consumed: usize,
    pub source_bytes: usize,
}

/// A decoded mesh together with its decode summary.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub mesh: MeshData,
    pub stats: DecodeStats,
}

/// Binary PLY point-cloud decoder.
///
/// Holds configuration only; every load gets its own parser state, so one
/// decoder can be shared freely across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoder {
    budget: usize,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    pub fn new() -> Self {
        Self {
            budget: DEFAULT_VERTEX_BUDGET,
        }
    }

    /// Set the maximum number of vertices kept in the output mesh.
    pub fn with_budget(mut self, budget: usize) -> Self {
        self.budget = budget;
        self
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Load a point cloud from disk.
    ///
    /// A path that does not exist yields an empty mesh rather than an error.
    /// The file is read fully and closed before decoding starts.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display(), budget = self.budget))]
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Decoded, LoadError> {
        let path = path.as_ref();
        debug!("Loading point cloud from: {}", path.display());
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Point cloud file not found: {}", path.display());
                return Ok(Decoded {
                    mesh: MeshData::empty(),
                    stats: stats_for(&ParserState::new(self.budget), 0, 0),
                });
            }
            Err(e) => return Err(e.into()),
        };
        self.decode(&bytes)
    }

    /// Decode everything produced by `reader`.
    pub fn decode_reader<R: Read>(&self, mut reader: R) -> Result<Decoded, LoadError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.decode(&bytes)
    }

    /// Decode an in-memory file.
    ///
    /// On a fatal error after the mesh was allocated, the returned [`LoadError`]
    /// carries the vertices decoded so far.
    #[tracing::instrument(skip_all, fields(budget = self.budget, len = data.len()))]
    pub fn decode(&self, data: &[u8]) -> Result<Decoded, LoadError> {
        if self.budget == 0 {
            return Err(LoadError::without_mesh(PlyError::InvalidBudget));
        }

        let mut cursor = ByteCursor::new(data);
        let mut state = ParserState::new(self.budget);

        if let Err(error) = drive(&mut cursor, &mut state) {
            warn!(
                "Decode failed after {} of {} vertices: {}",
                state.next_write_index,
                state.mesh.len(),
                error
            );
            return Err(LoadError {
                error,
                decoded: state.next_write_index,
                mesh: state.mesh,
            });
        }

        let stats = stats_for(&state, cursor.position(), cursor.len());
        info!(
            "Point cloud decoded: {} declared, {} kept, decimation factor {}",
            stats.declared_vertices, stats.vertices_decoded, stats.decimation_factor
        );
        Ok(Decoded {
            mesh: state.mesh,
            stats,
        })
    }

    /// Run only the header phase and report the declared layout.
    #[tracing::instrument(skip_all, fields(budget = self.budget, len = data.len()))]
    pub fn read_header(&self, data: &[u8]) -> Result<HeaderLayout, PlyError> {
        if self.budget == 0 {
            return Err(PlyError::InvalidBudget);
        }
        let mut cursor = ByteCursor::new(data);
        let mut state = ParserState::new(self.budget);
        run_header(&mut cursor, &mut state)?;
        Ok(state.layout)
    }
}

/// Load `path` with the given vertex budget, returning only the mesh.
pub fn load(path: impl AsRef<Path>, budget: usize) -> Result<MeshData, LoadError> {
    Decoder::new()
        .with_budget(budget)
        .load(path)
        .map(|decoded| decoded.mesh)
}

fn run_header(cursor: &mut ByteCursor<'_>, state: &mut ParserState) -> Result<(), PlyError> {
    while state.in_header && !cursor.is_exhausted() {
        header::step(cursor, state)?;
    }
    Ok(())
}

fn drive(cursor: &mut ByteCursor<'_>, state: &mut ParserState) -> Result<(), PlyError> {
    run_header(cursor, state)?;
    if state.in_header {
        if !cursor.is_empty() {
            warn!("Input ended before 'end_header'");
        }
        return Ok(());
    }

    while !state.body_complete() {
        // Running out exactly on a record boundary is a normal end: the
        // decimation stride can reach past the last declared record.
        if cursor.is_exhausted() {
            warn!(
                "Body ended after {} of {} vertices",
                state.next_write_index, state.layout.output_vertices
            );
            break;
        }
        body::step(cursor, state)?;
        if state.last_step == 0 {
            break;
        }
    }
    Ok(())
}

fn stats_for(state: &ParserState, bytes_consumed: usize, source_bytes: usize) -> DecodeStats {
    DecodeStats {
        declared_vertices: state.layout.declared_vertices.unwrap_or(0),
        output_vertices: state.layout.output_vertices,
        vertices_decoded: state.next_write_index,
        decimation_factor: state.layout.decimation_factor,
        color_channels: state.layout.color_channels,
        normal_channels: state.layout.normal_channels,
        header_bytes: state.layout.header_bytes,
        bytes_consumed,
        source_bytes,
    }
}

//! Record layout discovered from the header, and the per-load parser state.

use crate::mesh::MeshData;
use serde::Serialize;

/// Color channels when no alpha property is declared.
pub const RGB_CHANNELS: usize = 3;
/// Color channels when `property uchar alpha` is declared.
pub const RGBA_CHANNELS: usize = 4;
/// Normal property lines required before normals are read from the body.
pub const NORMAL_AXES: usize = 3;

/// Vertex record layout as declared by the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeaderLayout {
    /// Count from the `element vertex` line, if one was seen.
    pub declared_vertices: Option<usize>,
    /// Vertices the output mesh holds after budget clamping.
    pub output_vertices: usize,
    /// Records consumed per output vertex. 1 means no decimation.
    pub decimation_factor: usize,
    pub color_channels: usize,
    /// Number of `property float n*` lines seen.
    pub normal_channels: usize,
    /// Bytes up to and including the `end_header` line.
    pub header_bytes: usize,
    /// Whether the `end_header` line was reached.
    pub complete: bool,
}

impl Default for HeaderLayout {
    fn default() -> Self {
        Self {
            declared_vertices: None,
            output_vertices: 0,
            decimation_factor: 1,
            color_channels: RGB_CHANNELS,
            normal_channels: 0,
            header_bytes: 0,
            complete: false,
        }
    }
}

impl HeaderLayout {
    /// Normals are only decoded when exactly three axis lines were declared.
    pub fn reads_normals(&self) -> bool {
        self.normal_channels == NORMAL_AXES
    }

    /// Byte width of one vertex record in the body.
    pub fn record_size(&self) -> usize {
        (3 + self.normal_channels) * std::mem::size_of::<f32>() + self.color_channels
    }

    /// Apply the vertex budget to a declared count, setting the output size and stride.
    ///
    /// Returns `None` and leaves the layout unchanged when the stride does not fit
    /// in a `usize`.
    pub(crate) fn apply_budget(&mut self, declared: usize, budget: usize) -> Option<()> {
        let (factor, output) = if declared > budget {
            ((declared / budget).checked_add(1)?, budget)
        } else {
            (1, declared)
        };
        self.declared_vertices = Some(declared);
        self.decimation_factor = factor;
        self.output_vertices = output;
        Some(())
    }
}

/// Mutable state for a single load. Never shared between loads.
#[derive(Debug)]
pub(crate) struct ParserState {
    pub budget: usize,
    pub in_header: bool,
    pub layout: HeaderLayout,
    pub mesh: MeshData,
    pub next_write_index: usize,
    /// Bytes consumed by the most recent header or body step.
    pub last_step: usize,
}

impl ParserState {
    pub fn new(budget: usize) -> Self {
        Self {
            budget,
            in_header: true,
            layout: HeaderLayout::default(),
            mesh: MeshData::empty(),
            next_write_index: 0,
            last_step: 0,
        }
    }

    pub fn body_complete(&self) -> bool {
        self.next_write_index >= self.layout.output_vertices
    }
}

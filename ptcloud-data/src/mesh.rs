//! Decoded point-cloud mesh storage.

use glam::{Vec3, Vec4};
use std::collections::TryReserveError;

/// Normal written when the file carries no per-vertex normals.
pub const PLACEHOLDER_NORMAL: Vec3 = Vec3::ONE;

/// A single decoded vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshVertex {
    pub position: Vec3,
    pub normal: Vec3,
    /// RGBA color (0-1 range). Alpha is always 1.
    pub color: Vec4,
}

impl Default for MeshVertex {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            normal: Vec3::ZERO,
            color: Vec4::ZERO,
        }
    }
}

/// Index-aligned vertex arrays for one decoded point cloud.
///
/// The arrays are sized once when the vertex count is known and never resized;
/// `positions[i]`, `normals[i]` and `colors[i]` describe the same vertex.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    colors: Vec<Vec4>,
}

impl MeshData {
    /// A mesh with no vertices, returned when there is nothing to load.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Allocate `vertex_count` zeroed slots in every array.
    pub fn allocate(vertex_count: usize) -> Self {
        Self {
            positions: vec![Vec3::ZERO; vertex_count],
            normals: vec![Vec3::ZERO; vertex_count],
            colors: vec![Vec4::ZERO; vertex_count],
        }
    }

    /// Like [`MeshData::allocate`], but reports a failed allocation instead of aborting.
    pub fn try_allocate(vertex_count: usize) -> Result<Self, TryReserveError> {
        let mut positions = Vec::new();
        positions.try_reserve_exact(vertex_count)?;
        let mut normals = Vec::new();
        normals.try_reserve_exact(vertex_count)?;
        let mut colors = Vec::new();
        colors.try_reserve_exact(vertex_count)?;

        positions.resize(vertex_count, Vec3::ZERO);
        normals.resize(vertex_count, Vec3::ZERO);
        colors.resize(vertex_count, Vec4::ZERO);
        Ok(Self {
            positions,
            normals,
            colors,
        })
    }

    /// Number of output vertices (the allocated size).
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn colors(&self) -> &[Vec4] {
        &self.colors
    }

    /// Store a vertex at `index`. Returns `false` if `index` is out of range.
    pub fn write(&mut self, index: usize, vertex: MeshVertex) -> bool {
        if index >= self.positions.len() {
            return false;
        }
        self.positions[index] = vertex.position;
        self.normals[index] = vertex.normal;
        self.colors[index] = vertex.color;
        true
    }

    pub fn vertex(&self, index: usize) -> Option<MeshVertex> {
        Some(MeshVertex {
            position: *self.positions.get(index)?,
            normal: *self.normals.get(index)?,
            color: *self.colors.get(index)?,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = MeshVertex> + '_ {
        self.positions
            .iter()
            .zip(&self.normals)
            .zip(&self.colors)
            .map(|((&position, &normal), &color)| MeshVertex {
                position,
                normal,
                color,
            })
    }

    /// Axis-aligned bounds of the first `count` positions, or `None` if there are none.
    pub fn bounds(&self, count: usize) -> Option<(Vec3, Vec3)> {
        let positions = &self.positions[..count.min(self.positions.len())];
        let first = *positions.first()?;
        Some(
            positions
                .iter()
                .fold((first, first), |(min, max), &p| (min.min(p), max.max(p))),
        )
    }

    /// Raw position bytes (tightly packed `[f32; 3]`) for buffer upload.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Raw normal bytes (tightly packed `[f32; 3]`).
    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }

    /// Raw color bytes (tightly packed `[f32; 4]`).
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }
}

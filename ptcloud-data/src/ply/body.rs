//! Body decoder: one output vertex per decimation stride.

use crate::cursor::ByteCursor;
use crate::error::PlyError;
use crate::mesh::{MeshVertex, PLACEHOLDER_NORMAL};
use crate::ply::layout::{HeaderLayout, ParserState};
use glam::{Vec3, Vec4};

/// Flip the X axis into the output coordinate system.
#[inline]
fn flip_x(v: Vec3) -> Vec3 {
    Vec3::new(-v.x, v.y, v.z)
}

/// Read one full vertex record.
///
/// Only the first three color bytes are used. A fourth (alpha) byte is consumed
/// but discarded and alpha is always 1.
pub(crate) fn read_vertex(
    cursor: &mut ByteCursor<'_>,
    layout: &HeaderLayout,
) -> Result<MeshVertex, PlyError> {
    let position = flip_x(cursor.read_vec3_le()?);
    let normal = if layout.reads_normals() {
        flip_x(cursor.read_vec3_le()?)
    } else {
        PLACEHOLDER_NORMAL
    };

    let r = cursor.read_u8()?;
    let g = cursor.read_u8()?;
    let b = cursor.read_u8()?;
    for _ in 3..layout.color_channels {
        cursor.read_u8()?;
    }

    Ok(MeshVertex {
        position,
        normal,
        color: Vec4::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0),
    })
}

/// Skip the records dropped by decimation. Stops quietly at the end of input,
/// since skipped records are never used.
pub(crate) fn skip_decimated(cursor: &mut ByteCursor<'_>, layout: &HeaderLayout) -> usize {
    let records = layout.decimation_factor.saturating_sub(1);
    cursor.skip_up_to(records.saturating_mul(layout.record_size()))
}

/// Decode the next output vertex and write it into the mesh.
pub(crate) fn step(cursor: &mut ByteCursor<'_>, state: &mut ParserState) -> Result<(), PlyError> {
    if state.body_complete() {
        state.last_step = 0;
        return Ok(());
    }

    let start = cursor.position();
    let vertex = read_vertex(cursor, &state.layout)?;
    skip_decimated(cursor, &state.layout);

    state.mesh.write(state.next_write_index, vertex);
    state.next_write_index += 1;
    state.last_step = cursor.position() - start;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::MeshData;
    use crate::ply::layout::RGBA_CHANNELS;

    fn record(position: [f32; 3], normal: Option<[f32; 3]>, color: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        for v in position.iter().chain(normal.iter().flatten()) {
            out.extend_from_slice(&v.to_le_bytes());
        }
        out.extend_from_slice(color);
        out
    }

    fn body_state(layout: HeaderLayout) -> ParserState {
        let mut state = ParserState::new(layout.output_vertices.max(1));
        state.in_header = false;
        state.mesh = MeshData::allocate(layout.output_vertices);
        state.layout = layout;
        state
    }

    #[test]
    fn test_position_x_is_flipped() {
        let data = record([1.5, 2.0, -3.0], None, &[0, 0, 0]);
        let mut cursor = ByteCursor::new(&data);
        let vertex = read_vertex(&mut cursor, &HeaderLayout::default()).unwrap();
        assert_eq!(vertex.position, Vec3::new(-1.5, 2.0, -3.0));
        assert_eq!(vertex.normal, Vec3::ONE);
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn test_normals_read_and_flipped_with_three_axes() {
        let data = record([0.0, 0.0, 0.0], Some([0.25, -0.5, 1.0]), &[0, 0, 0]);
        let layout = HeaderLayout {
            normal_channels: 3,
            ..HeaderLayout::default()
        };
        let mut cursor = ByteCursor::new(&data);
        let vertex = read_vertex(&mut cursor, &layout).unwrap();
        assert_eq!(vertex.normal, Vec3::new(-0.25, -0.5, 1.0));
    }

    #[test]
    fn test_color_scaling_exact_for_all_bytes() {
        for byte in 0..=255u8 {
            let data = record([0.0; 3], None, &[byte, 255 - byte, byte / 2]);
            let mut cursor = ByteCursor::new(&data);
            let vertex = read_vertex(&mut cursor, &HeaderLayout::default()).unwrap();
            assert_eq!(vertex.color.x, byte as f32 / 255.0);
            assert_eq!(vertex.color.y, (255 - byte) as f32 / 255.0);
            assert_eq!(vertex.color.z, (byte / 2) as f32 / 255.0);
            assert_eq!(vertex.color.w, 1.0);
        }
    }

    #[test]
    fn test_alpha_byte_consumed_but_ignored() {
        let data = record([0.0; 3], None, &[10, 20, 30, 0]);
        let layout = HeaderLayout {
            color_channels: RGBA_CHANNELS,
            ..HeaderLayout::default()
        };
        let mut cursor = ByteCursor::new(&data);
        let vertex = read_vertex(&mut cursor, &layout).unwrap();
        assert_eq!(vertex.color.w, 1.0);
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn test_step_skips_decimated_records() {
        let mut data = Vec::new();
        for i in 0..4 {
            data.extend(record([i as f32, 0.0, 0.0], None, &[i as u8, 0, 0]));
        }
        let layout = HeaderLayout {
            declared_vertices: Some(4),
            output_vertices: 2,
            decimation_factor: 2,
            ..HeaderLayout::default()
        };
        let mut state = body_state(layout);
        let mut cursor = ByteCursor::new(&data);

        step(&mut cursor, &mut state).unwrap();
        assert_eq!(state.last_step, 30);
        step(&mut cursor, &mut state).unwrap();
        assert!(state.body_complete());
        assert_eq!(state.mesh.positions()[1].x, -2.0);
        assert!(cursor.is_exhausted());

        // Further steps are no-ops once the output is full.
        step(&mut cursor, &mut state).unwrap();
        assert_eq!(state.next_write_index, 2);
    }

    #[test]
    fn test_partial_record_is_truncated() {
        let data = record([1.0, 2.0, 3.0], None, &[1]);
        let layout = HeaderLayout {
            output_vertices: 1,
            ..HeaderLayout::default()
        };
        let mut state = body_state(layout);
        let mut cursor = ByteCursor::new(&data);
        assert!(matches!(
            step(&mut cursor, &mut state),
            Err(PlyError::Truncated { .. })
        ));
        assert_eq!(state.next_write_index, 0);
    }
}

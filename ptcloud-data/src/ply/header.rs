//! Header tokenizer.
//!
//! Scans the header one line at a time and turns each recognized line into a
//! layout decision. Matching is by case-sensitive substring and the first
//! matching pattern wins, in the order of [`HeaderLine`]'s variants.

use crate::cursor::ByteCursor;
use crate::error::PlyError;
use crate::mesh::MeshData;
use crate::ply::layout::{ParserState, RGBA_CHANNELS};
use tracing::{debug, warn};

/// Classification of a single header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderLine<'a> {
    EndHeader,
    ElementVertex(&'a str),
    Alpha,
    NormalAxis,
    Other,
}

impl<'a> HeaderLine<'a> {
    pub fn classify(line: &'a str) -> Self {
        if line.contains("end_header") {
            HeaderLine::EndHeader
        } else if line.contains("element vertex") {
            HeaderLine::ElementVertex(line)
        } else if line.contains("property uchar alpha") {
            HeaderLine::Alpha
        } else if line.contains("property float n") {
            HeaderLine::NormalAxis
        } else {
            HeaderLine::Other
        }
    }
}

/// Parse the vertex count from the third whitespace-separated token.
fn parse_vertex_count(line: &str) -> Result<usize, PlyError> {
    let token = line
        .split_whitespace()
        .nth(2)
        .ok_or_else(|| PlyError::MalformedHeader {
            line: line.to_string(),
            reason: "missing vertex count".to_string(),
        })?;
    token.parse().map_err(|e| PlyError::MalformedHeader {
        line: line.to_string(),
        reason: format!("invalid vertex count {:?}: {}", token, e),
    })
}

/// Consume and classify one header line.
///
/// A trailing fragment with no line terminator is consumed but never classified.
pub(crate) fn step(cursor: &mut ByteCursor<'_>, state: &mut ParserState) -> Result<(), PlyError> {
    let start = cursor.position();
    let Some(raw) = cursor.next_line() else {
        let dropped = cursor.skip_up_to(cursor.remaining());
        warn!("Header ended without a line terminator ({} bytes ignored)", dropped);
        state.last_step = dropped;
        return Ok(());
    };
    state.last_step = cursor.position() - start;

    let line = String::from_utf8_lossy(raw);
    match HeaderLine::classify(&line) {
        HeaderLine::EndHeader => {
            state.in_header = false;
            state.layout.complete = true;
            state.layout.header_bytes = cursor.position();
            if state.layout.normal_channels != 0 && !state.layout.reads_normals() {
                warn!(
                    "Header declares {} normal properties, expected 3; normals will not be read",
                    state.layout.normal_channels
                );
            }
            debug!("Header complete after {} bytes", cursor.position());
        }
        HeaderLine::ElementVertex(line) => {
            let declared = parse_vertex_count(line)?;
            if state.layout.declared_vertices.is_some() {
                warn!("Repeated 'element vertex' line, replacing earlier vertex count");
            }
            state
                .layout
                .apply_budget(declared, state.budget)
                .ok_or_else(|| PlyError::MalformedHeader {
                    line: line.to_string(),
                    reason: format!("vertex count {} overflows the decimation stride", declared),
                })?;
            let vertices = state.layout.output_vertices;
            state.mesh = MeshData::try_allocate(vertices)
                .map_err(|source| PlyError::Allocation { vertices, source })?;
            debug!(
                "Declared {} vertices, keeping {} (decimation factor {})",
                declared, state.layout.output_vertices, state.layout.decimation_factor
            );
        }
        HeaderLine::Alpha => {
            state.layout.color_channels = RGBA_CHANNELS;
            debug!("Alpha channel present");
        }
        HeaderLine::NormalAxis => {
            state.layout.normal_channels += 1;
            debug!("Normal property {}", state.layout.normal_channels);
        }
        HeaderLine::Other => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_header(text: &str, budget: usize) -> Result<ParserState, PlyError> {
        let mut cursor = ByteCursor::new(text.as_bytes());
        let mut state = ParserState::new(budget);
        while state.in_header && !cursor.is_exhausted() {
            step(&mut cursor, &mut state)?;
        }
        Ok(state)
    }

    #[test]
    fn test_classify_priority() {
        assert_eq!(HeaderLine::classify("end_header"), HeaderLine::EndHeader);
        assert_eq!(
            HeaderLine::classify("element vertex 5"),
            HeaderLine::ElementVertex("element vertex 5")
        );
        assert_eq!(HeaderLine::classify("property uchar alpha"), HeaderLine::Alpha);
        assert_eq!(HeaderLine::classify("property float nx"), HeaderLine::NormalAxis);
        assert_eq!(HeaderLine::classify("property float x"), HeaderLine::Other);
        assert_eq!(HeaderLine::classify("property uchar red"), HeaderLine::Other);
        // First match wins when a line contains more than one pattern.
        assert_eq!(
            HeaderLine::classify("comment element vertex end_header"),
            HeaderLine::EndHeader
        );
    }

    #[test]
    fn test_full_header_layout() {
        let header = "ply\nformat binary_little_endian 1.0\nelement vertex 4\n\
                      property float x\nproperty float y\nproperty float z\n\
                      property float nx\nproperty float ny\nproperty float nz\n\
                      property uchar red\nproperty uchar green\nproperty uchar blue\n\
                      property uchar alpha\nend_header\n";
        let state = run_header(header, 100).unwrap();

        assert!(!state.in_header);
        assert!(state.layout.complete);
        assert_eq!(state.layout.header_bytes, header.len());
        assert_eq!(state.layout.declared_vertices, Some(4));
        assert_eq!(state.layout.output_vertices, 4);
        assert_eq!(state.layout.color_channels, 4);
        assert_eq!(state.layout.normal_channels, 3);
        assert_eq!(state.mesh.vertex_count(), 4);
    }

    #[test]
    fn test_header_stops_at_end_header() {
        let text = "element vertex 2\nend_header\nproperty uchar alpha\n";
        let mut cursor = ByteCursor::new(text.as_bytes());
        let mut state = ParserState::new(10);
        while state.in_header && !cursor.is_exhausted() {
            step(&mut cursor, &mut state).unwrap();
        }
        assert_eq!(cursor.position(), "element vertex 2\nend_header\n".len());
        assert_eq!(state.layout.color_channels, 3);
    }

    #[test]
    fn test_vertex_count_tolerates_carriage_return() {
        let state = run_header("element vertex 7\r\nend_header\r\n", 10).unwrap();
        assert_eq!(state.layout.declared_vertices, Some(7));
        assert!(state.layout.complete);
    }

    #[test]
    fn test_malformed_vertex_count() {
        for header in ["element vertex abc\n", "element vertex\n", "element vertex -3\n"] {
            match run_header(header, 10) {
                Err(PlyError::MalformedHeader { .. }) => {}
                other => panic!("expected malformed header for {:?}, got {:?}", header, other),
            }
        }
    }

    #[test]
    fn test_unterminated_fragment_is_not_classified() {
        let state = run_header("element vertex 3\nend_header", 10).unwrap();
        assert!(state.in_header);
        assert!(!state.layout.complete);
        assert_eq!(state.layout.declared_vertices, Some(3));
    }

    #[test]
    fn test_stride_overflow_is_malformed() {
        match run_header("ply\nelement vertex 18446744073709551615\nend_header\n", 1) {
            Err(PlyError::MalformedHeader { reason, .. }) => assert!(reason.contains("overflows")),
            other => panic!("expected malformed header, got {:?}", other),
        }
    }

    #[test]
    fn test_oversized_allocation_is_an_error() {
        let header = format!("element vertex {}\nend_header\n", usize::MAX / 8);
        assert!(matches!(
            run_header(&header, usize::MAX),
            Err(PlyError::Allocation { .. })
        ));
    }

    #[test]
    fn test_decimation_set_from_budget() {
        let state = run_header("element vertex 10\nend_header\n", 3).unwrap();
        assert_eq!(state.layout.output_vertices, 3);
        assert_eq!(state.layout.decimation_factor, 4);
        assert_eq!(state.mesh.vertex_count(), 3);
    }
}

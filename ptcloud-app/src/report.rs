//! Human-readable and JSON summaries of a decoded point cloud.

use glam::Vec3;
use ptcloud_data::{DecodeStats, Decoded, HeaderLayout};
use serde::Serialize;
use std::io::Write;

/// One vertex as printed in a preview listing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PreviewVertex {
    pub index: usize,
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

/// Axis-aligned bounds of the decoded positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl Bounds {
    fn size(&self) -> Vec3 {
        Vec3::from(self.max) - Vec3::from(self.min)
    }
}

/// Summary of a full decode.
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub path: String,
    pub stats: DecodeStats,
    pub bounds: Option<Bounds>,
    pub preview: Vec<PreviewVertex>,
}

impl LoadReport {
    pub fn new(path: impl Into<String>, decoded: &Decoded, preview: usize) -> Self {
        let filled = decoded.stats.vertices_decoded;
        let bounds = decoded.mesh.bounds(filled).map(|(min, max)| Bounds {
            min: min.to_array(),
            max: max.to_array(),
        });
        let preview = decoded
            .mesh
            .iter()
            .take(preview.min(filled))
            .enumerate()
            .map(|(index, v)| PreviewVertex {
                index,
                position: v.position.to_array(),
                normal: v.normal.to_array(),
                color: v.color.to_array(),
            })
            .collect();

        Self {
            path: path.into(),
            stats: decoded.stats,
            bounds,
            preview,
        }
    }

    pub fn write_text(&self, out: &mut impl Write) -> std::io::Result<()> {
        let s = &self.stats;
        writeln!(out, "File:               {}", self.path)?;
        writeln!(out, "Declared vertices:  {}", s.declared_vertices)?;
        writeln!(out, "Output vertices:    {}", s.output_vertices)?;
        writeln!(out, "Decoded vertices:   {}", s.vertices_decoded)?;
        writeln!(out, "Decimation factor:  {}", s.decimation_factor)?;
        writeln!(out, "Color channels:     {}", s.color_channels)?;
        writeln!(out, "Normal properties:  {}", s.normal_channels)?;
        writeln!(
            out,
            "Bytes consumed:     {} of {} (header {})",
            s.bytes_consumed, s.source_bytes, s.header_bytes
        )?;
        match &self.bounds {
            Some(b) => {
                let size = b.size();
                writeln!(
                    out,
                    "Bounds:             ({:.3}, {:.3}, {:.3}) .. ({:.3}, {:.3}, {:.3}), size {:.3} x {:.3} x {:.3}",
                    b.min[0], b.min[1], b.min[2], b.max[0], b.max[1], b.max[2], size.x, size.y, size.z
                )?;
            }
            None => writeln!(out, "Bounds:             none")?,
        }
        for v in &self.preview {
            writeln!(
                out,
                "  [{}] pos=({:.3}, {:.3}, {:.3}) normal=({:.3}, {:.3}, {:.3}) color=({:.3}, {:.3}, {:.3})",
                v.index,
                v.position[0],
                v.position[1],
                v.position[2],
                v.normal[0],
                v.normal[1],
                v.normal[2],
                v.color[0],
                v.color[1],
                v.color[2]
            )?;
        }
        Ok(())
    }
}

/// Summary of a header-only inspection.
#[derive(Debug, Clone, Serialize)]
pub struct HeaderReport {
    pub path: String,
    pub layout: HeaderLayout,
    pub record_size: usize,
}

impl HeaderReport {
    pub fn new(path: impl Into<String>, layout: HeaderLayout) -> Self {
        Self {
            path: path.into(),
            record_size: layout.record_size(),
            layout,
        }
    }

    pub fn write_text(&self, out: &mut impl Write) -> std::io::Result<()> {
        let l = &self.layout;
        writeln!(out, "File:               {}", self.path)?;
        match l.declared_vertices {
            Some(n) => writeln!(out, "Declared vertices:  {}", n)?,
            None => writeln!(out, "Declared vertices:  none")?,
        }
        writeln!(out, "Output vertices:    {}", l.output_vertices)?;
        writeln!(out, "Decimation factor:  {}", l.decimation_factor)?;
        writeln!(out, "Color channels:     {}", l.color_channels)?;
        writeln!(out, "Normal properties:  {}", l.normal_channels)?;
        writeln!(out, "Record size:        {} bytes", self.record_size)?;
        if l.complete {
            writeln!(out, "Header size:        {} bytes", l.header_bytes)?;
        } else {
            writeln!(out, "Header size:        incomplete (no end_header)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ptcloud_data::Decoder;

    fn sample_ply() -> Vec<u8> {
        let mut out = b"ply\nelement vertex 2\nend_header\n".to_vec();
        for (pos, color) in [([1.0f32, 2.0, 3.0], [255u8, 0, 0]), ([-1.0, 0.0, 5.0], [0, 0, 255])] {
            for v in pos {
                out.extend_from_slice(&v.to_le_bytes());
            }
            out.extend_from_slice(&color);
        }
        out
    }

    #[test]
    fn test_load_report_bounds_and_preview() {
        let decoded = Decoder::new().decode(&sample_ply()).unwrap();
        let report = LoadReport::new("sample.ply", &decoded, 5);

        assert_eq!(report.preview.len(), 2);
        assert_eq!(report.preview[0].position, [-1.0, 2.0, 3.0]);
        let bounds = report.bounds.unwrap();
        assert_eq!(bounds.min, [-1.0, 0.0, 3.0]);
        assert_eq!(bounds.max, [1.0, 2.0, 5.0]);
    }

    #[test]
    fn test_load_report_text() {
        let decoded = Decoder::new().decode(&sample_ply()).unwrap();
        let report = LoadReport::new("sample.ply", &decoded, 0);
        let mut out = Vec::new();
        report.write_text(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Declared vertices:  2"));
        assert!(text.contains("Decimation factor:  1"));
        assert!(!text.contains("pos="));
    }

    #[test]
    fn test_load_report_json() {
        let decoded = Decoder::new().with_budget(1).decode(&sample_ply()).unwrap();
        let report = LoadReport::new("sample.ply", &decoded, 1);
        let json: serde_json::Value = serde_json::to_value(&report).unwrap();

        assert_eq!(json["stats"]["decimation_factor"], 3);
        assert_eq!(json["stats"]["output_vertices"], 1);
        assert_eq!(json["preview"][0]["index"], 0);
    }

    #[test]
    fn test_header_report_text() {
        let layout = Decoder::new().read_header(&sample_ply()).unwrap();
        let report = HeaderReport::new("sample.ply", layout);
        let mut out = Vec::new();
        report.write_text(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Record size:        15 bytes"));
        assert!(text.contains("Header size:        32 bytes"));
    }
}

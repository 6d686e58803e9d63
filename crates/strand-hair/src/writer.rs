//! HAIR file writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use strand_curves::{CurveSet, NodeColors};
use strand_math::Vec3;

use crate::error::{HairError, Result};
use crate::format::{Descriptor, INFO_LEN, MAGIC};

/// What to store besides the required points and segment counts.
#[derive(Debug, Clone)]
pub struct HairWriteOptions {
    /// Store per-node thickness. When false, every node is given the
    /// radius of the first node on load.
    pub thickness: bool,
    /// Per-node transparency to store.
    pub transparency: Option<Vec<f32>>,
    /// Free-form description, truncated to 88 bytes.
    pub info: String,
}

impl Default for HairWriteOptions {
    fn default() -> Self {
        Self {
            thickness: true,
            transparency: None,
            info: String::new(),
        }
    }
}

/// Write curves to a HAIR file at `path` with default options.
pub fn write_hair_file(path: impl AsRef<Path>, curves: &CurveSet) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| HairError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut out = BufWriter::new(file);
    write_hair(&mut out, curves, &HairWriteOptions::default()).map_err(|e| e.in_file(path))?;
    out.flush()?;
    Ok(())
}

/// Write curves as a HAIR stream.
///
/// Positions, radii and colors are narrowed to `f32`.
pub fn write_hair<W: Write>(out: &mut W, curves: &CurveSet, options: &HairWriteOptions) -> Result<()> {
    let node_count = curves.node_count();

    let segments = (0..curves.curve_count())
        .map(|i| {
            let nodes = curves.curve_range(i).len();
            nodes
                .checked_sub(1)
                .and_then(|n| u16::try_from(n).ok())
                .ok_or_else(|| HairError::UnrepresentableCurve { curve: i, nodes })
        })
        .collect::<Result<Vec<u16>>>()?;

    if let Some(values) = &options.transparency {
        if values.len() != node_count {
            return Err(HairError::TransparencyCountMismatch {
                values: values.len(),
                nodes: node_count,
            });
        }
    }

    let mut descriptor = Descriptor::SEGMENTS | Descriptor::POINTS;
    if options.thickness {
        descriptor |= Descriptor::THICKNESS;
    }
    if options.transparency.is_some() {
        descriptor |= Descriptor::TRANSPARENCY;
    }
    let default_color = match curves.colors() {
        NodeColors::Uniform(c) => *c,
        NodeColors::PerNode(_) => {
            descriptor |= Descriptor::COLOR;
            Vec3::zeros()
        }
    };
    let default_thickness = curves.nodes().first().map_or(1.0, |n| n.w);

    out.write_all(MAGIC)?;
    out.write_all(&(curves.curve_count() as u32).to_le_bytes())?;
    out.write_all(&(node_count as u32).to_le_bytes())?;
    out.write_all(&descriptor.bits().to_le_bytes())?;
    out.write_all(&0u32.to_le_bytes())?;
    write_f32(out, default_thickness)?;
    write_f32(out, 1.0)?;
    write_vec3(out, &default_color)?;

    let mut info = [0u8; INFO_LEN];
    let bytes = options.info.as_bytes();
    let len = bytes.len().min(INFO_LEN);
    info[..len].copy_from_slice(&bytes[..len]);
    out.write_all(&info)?;

    for n in &segments {
        out.write_all(&n.to_le_bytes())?;
    }
    for node in curves.nodes() {
        write_vec3(out, &node.xyz())?;
    }
    if options.thickness {
        for node in curves.nodes() {
            write_f32(out, node.w)?;
        }
    }
    if let Some(values) = &options.transparency {
        for v in values {
            out.write_all(&v.to_le_bytes())?;
        }
    }
    if let NodeColors::PerNode(colors) = curves.colors() {
        for c in colors {
            write_vec3(out, c)?;
        }
    }

    Ok(())
}

fn write_f32<W: Write>(out: &mut W, v: f64) -> Result<()> {
    out.write_all(&(v as f32).to_le_bytes())?;
    Ok(())
}

fn write_vec3<W: Write>(out: &mut W, v: &Vec3) -> Result<()> {
    write_f32(out, v.x)?;
    write_f32(out, v.y)?;
    write_f32(out, v.z)
}

//! HAIR file reader: converts a HAIR stream into a [`CurveSet`].

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use log::debug;
use strand_curves::{CurveSet, NodeColors};
use strand_math::{Vec3, Vec4};

use crate::error::{HairError, Result};
use crate::format::{
    boundaries_from_default, boundaries_from_segments, Descriptor, HairHeader, INFO_LEN, MAGIC,
};

/// A loaded HAIR file.
#[derive(Debug, Clone, PartialEq)]
pub struct HairFile {
    /// Header as stored in the file.
    pub header: HairHeader,
    /// Curves built from the file's arrays.
    pub curves: CurveSet,
}

/// Read a HAIR file from a path.
///
/// Every failure after the file is opened names the path.
pub fn read_hair(path: impl AsRef<Path>) -> Result<HairFile> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| HairError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let hair = read_hair_from(BufReader::new(file)).map_err(|e| e.in_file(path))?;
    debug!(
        "loaded '{}': {} curves, {} nodes",
        path.display(),
        hair.header.curve_count,
        hair.header.node_count
    );
    Ok(hair)
}

/// Read a HAIR file from a byte buffer.
pub fn read_hair_from_buffer(data: &[u8]) -> Result<HairFile> {
    read_hair_from(data)
}

/// Read a HAIR file from any byte stream.
pub fn read_hair_from<R: Read>(input: R) -> Result<HairFile> {
    let mut r = LeReader { inner: input };

    let header = read_header(&mut r)?;
    let curve_count = header.curve_count as usize;
    let node_count = header.node_count as usize;
    let descriptor = header.descriptor;

    let curve_ends = if descriptor.contains(Descriptor::SEGMENTS) {
        let segments = (0..curve_count)
            .map(|_| r.u16())
            .collect::<io::Result<Vec<_>>>()?;
        boundaries_from_segments(&segments)
    } else {
        boundaries_from_default(header.curve_count, header.default_segments)
    };

    if !descriptor.contains(Descriptor::POINTS) {
        return Err(HairError::MissingPoints);
    }
    let thickness = f64::from(header.default_thickness);
    let mut nodes = (0..node_count)
        .map(|_| r.vec3().map(|p| Vec4::new(p.x, p.y, p.z, thickness)))
        .collect::<io::Result<Vec<_>>>()?;

    if descriptor.contains(Descriptor::THICKNESS) {
        for node in &mut nodes {
            node.w = f64::from(r.f32()?);
        }
    }

    if descriptor.contains(Descriptor::TRANSPARENCY) {
        r.skip(4 * node_count as u64)?;
    }

    let colors = if descriptor.contains(Descriptor::COLOR) {
        NodeColors::PerNode(
            (0..node_count)
                .map(|_| r.vec3())
                .collect::<io::Result<Vec<_>>>()?,
        )
    } else {
        NodeColors::Uniform(header.default_color)
    };

    let curves = CurveSet::new(nodes, curve_ends, colors)?;
    Ok(HairFile { header, curves })
}

fn read_header<R: Read>(r: &mut LeReader<R>) -> Result<HairHeader> {
    let mut magic = [0u8; 4];
    r.inner.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(HairError::BadMagic);
    }

    let curve_count = r.u32()?;
    let node_count = r.u32()?;
    let descriptor = Descriptor::from_bits_retain(r.u32()?);
    let default_segments = r.u32()?;
    let default_thickness = r.f32()?;
    let default_transparency = r.f32()?;
    let default_color = r.vec3()?;

    let mut info = [0u8; INFO_LEN];
    r.inner.read_exact(&mut info)?;
    let info_end = info.iter().position(|&b| b == 0).unwrap_or(INFO_LEN);
    let info = String::from_utf8_lossy(&info[..info_end]).into_owned();
    debug!("file info: '{}'", info);

    Ok(HairHeader {
        curve_count,
        node_count,
        descriptor,
        default_segments,
        default_thickness,
        default_transparency,
        default_color,
        info,
    })
}

/// Little-endian primitive reads over a byte stream.
struct LeReader<R> {
    inner: R,
}

impl<R: Read> LeReader<R> {
    fn bytes<const N: usize>(&mut self) -> io::Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    fn u16(&mut self) -> io::Result<u16> {
        self.bytes().map(u16::from_le_bytes)
    }

    fn u32(&mut self) -> io::Result<u32> {
        self.bytes().map(u32::from_le_bytes)
    }

    fn f32(&mut self) -> io::Result<f32> {
        self.bytes().map(f32::from_le_bytes)
    }

    fn vec3(&mut self) -> io::Result<Vec3> {
        Ok(Vec3::new(
            f64::from(self.f32()?),
            f64::from(self.f32()?),
            f64::from(self.f32()?),
        ))
    }

    fn skip(&mut self, len: u64) -> io::Result<()> {
        let skipped = io::copy(&mut (&mut self.inner).take(len), &mut io::sink())?;
        if skipped < len {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stream ended inside a skipped array",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hand-assembled HAIR bytes.
    struct Builder {
        bytes: Vec<u8>,
    }

    impl Builder {
        fn header(curves: u32, nodes: u32, descriptor: u32, default_segments: u32) -> Self {
            let mut bytes = b"HAIR".to_vec();
            for v in [curves, nodes, descriptor, default_segments] {
                bytes.extend(v.to_le_bytes());
            }
            // thickness, transparency, rgb
            for v in [0.5f32, 1.0, 0.1, 0.2, 0.3] {
                bytes.extend(v.to_le_bytes());
            }
            let mut info = [0u8; INFO_LEN];
            info[..5].copy_from_slice(b"hello");
            bytes.extend(info);
            Self { bytes }
        }

        fn u16s(mut self, values: &[u16]) -> Self {
            for v in values {
                self.bytes.extend(v.to_le_bytes());
            }
            self
        }

        fn f32s(mut self, values: &[f32]) -> Self {
            for v in values {
                self.bytes.extend(v.to_le_bytes());
            }
            self
        }

        fn points(self, count: usize) -> Self {
            let values: Vec<f32> = (0..count * 3).map(|i| i as f32).collect();
            self.f32s(&values)
        }
    }

    #[test]
    fn test_boundaries_from_segment_counts() {
        let data = Builder::header(2, 10, 0x01 | 0x02, 0).u16s(&[3, 5]).points(10).bytes;
        let hair = read_hair_from_buffer(&data).unwrap();
        assert_eq!(hair.curves.curve_ends(), &[4, 10]);
        assert_eq!(hair.header.info, "hello");
    }

    #[test]
    fn test_boundaries_from_default_segments() {
        let data = Builder::header(2, 6, 0x02, 3).points(6).bytes;
        let hair = read_hair_from_buffer(&data).unwrap();
        assert_eq!(hair.curves.curve_ends(), &[3, 6]);
    }

    #[test]
    fn test_defaults_apply_without_arrays() {
        let data = Builder::header(1, 3, 0x02, 3).points(3).bytes;
        let hair = read_hair_from_buffer(&data).unwrap();
        let nodes = hair.curves.nodes();
        assert_eq!(nodes[1], Vec4::new(3.0, 4.0, 5.0, 0.5));
        assert_eq!(
            hair.curves.colors(),
            &NodeColors::Uniform(Vec3::new(0.1f32 as f64, 0.2f32 as f64, 0.3f32 as f64))
        );
    }

    #[test]
    fn test_transparency_is_skipped() {
        let data = Builder::header(1, 3, 0x02 | 0x04 | 0x08 | 0x10, 3)
            .points(3)
            .f32s(&[0.25, 0.5, 0.75])
            .f32s(&[9.0, 9.0, 9.0])
            .f32s(&[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0])
            .bytes;
        let hair = read_hair_from_buffer(&data).unwrap();
        let radii: Vec<f64> = hair.curves.nodes().iter().map(|n| n.w).collect();
        assert_eq!(radii, vec![0.25, 0.5, 0.75]);
        assert_eq!(hair.curves.node_color(1), Vec3::y());
        assert_eq!(hair.curves.node_color(2), Vec3::z());
    }

    #[test]
    fn test_bad_magic() {
        let mut data = Builder::header(1, 3, 0x02, 3).points(3).bytes;
        data[0] = b'J';
        assert!(matches!(read_hair_from_buffer(&data), Err(HairError::BadMagic)));
    }

    #[test]
    fn test_missing_points() {
        let data = Builder::header(1, 3, 0x04, 3).f32s(&[1.0; 3]).bytes;
        assert!(matches!(read_hair_from_buffer(&data), Err(HairError::MissingPoints)));
    }

    #[test]
    fn test_truncated_points() {
        let data = Builder::header(1, 3, 0x02, 3).points(2).bytes;
        match read_hair_from_buffer(&data) {
            Err(HairError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("expected EOF, got {:?}", other),
        }
    }

    #[test]
    fn test_truncated_transparency() {
        let data = Builder::header(1, 3, 0x02 | 0x08, 3).points(3).f32s(&[1.0]).bytes;
        assert!(matches!(read_hair_from_buffer(&data), Err(HairError::Io(_))));
    }

    #[test]
    fn test_curves_past_node_array() {
        let data = Builder::header(2, 6, 0x01 | 0x02, 0).u16s(&[3, 5]).points(6).bytes;
        assert!(matches!(
            read_hair_from_buffer(&data),
            Err(HairError::InvalidCurves(_))
        ));
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = read_hair("/nonexistent/strand/fur.hair").unwrap_err();
        assert!(matches!(err, HairError::Open { .. }));
        assert!(err.to_string().contains("/nonexistent/strand/fur.hair"));
    }
}

//! On-disk layout of HAIR files.
//!
//! All values are little-endian. The 128-byte header is followed by the
//! optional arrays in a fixed order: segment counts, points, thickness,
//! transparency, colors.

use bitflags::bitflags;
use strand_math::Vec3;

/// File identifier.
pub const MAGIC: &[u8; 4] = b"HAIR";

/// Length of the free-form info block in the header.
pub const INFO_LEN: usize = 88;

/// Total header length in bytes.
pub const HEADER_LEN: usize = 128;

bitflags! {
    /// Which optional arrays a file contains.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Descriptor: u32 {
        /// Per-curve `u16` segment counts.
        const SEGMENTS = 0x01;
        /// Per-node positions. Required.
        const POINTS = 0x02;
        /// Per-node thickness.
        const THICKNESS = 0x04;
        /// Per-node transparency. Read past and discarded.
        const TRANSPARENCY = 0x08;
        /// Per-node RGB color.
        const COLOR = 0x10;
    }
}

/// Header fields of a HAIR file.
#[derive(Debug, Clone, PartialEq)]
pub struct HairHeader {
    /// Number of curves.
    pub curve_count: u32,
    /// Number of nodes across all curves.
    pub node_count: u32,
    /// Optional arrays present in the file.
    pub descriptor: Descriptor,
    /// Segments per curve when no per-curve counts are stored.
    pub default_segments: u32,
    /// Thickness of every node when no per-node thickness is stored.
    pub default_thickness: f32,
    /// Transparency of every node when none is stored.
    pub default_transparency: f32,
    /// Color of every node when no per-node colors are stored.
    pub default_color: Vec3,
    /// Free-form description, trailing NULs removed.
    pub info: String,
}

/// Curve end indices from per-curve segment counts.
///
/// A curve with `n` segments holds `n + 1` nodes.
pub fn boundaries_from_segments(segments: &[u16]) -> Vec<u32> {
    segments
        .iter()
        .scan(0u32, |end, &n| {
            *end = end.saturating_add(u32::from(n) + 1);
            Some(*end)
        })
        .collect()
}

/// Curve end indices when every curve uses the header's default count.
pub fn boundaries_from_default(curve_count: u32, default_segments: u32) -> Vec<u32> {
    (1..=curve_count)
        .map(|i| i.saturating_mul(default_segments))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_from_segments() {
        assert_eq!(boundaries_from_segments(&[3, 5]), vec![4, 10]);
        assert_eq!(boundaries_from_segments(&[0, 0, 1]), vec![1, 2, 4]);
        assert!(boundaries_from_segments(&[]).is_empty());
    }

    #[test]
    fn test_boundaries_from_default() {
        assert_eq!(boundaries_from_default(3, 4), vec![4, 8, 12]);
        assert_eq!(boundaries_from_default(2, u32::MAX), vec![u32::MAX, u32::MAX]);
    }

    #[test]
    fn test_header_layout_adds_up() {
        // magic + 3 counts + default segments/thickness/transparency + rgb + info
        assert_eq!(4 + 3 * 4 + 3 * 4 + 3 * 4 + INFO_LEN, HEADER_LEN);
    }

    #[test]
    fn test_descriptor_bits() {
        let d = Descriptor::from_bits_retain(0x02 | 0x10 | 0x80);
        assert!(d.contains(Descriptor::POINTS | Descriptor::COLOR));
        assert!(!d.contains(Descriptor::THICKNESS));
    }
}

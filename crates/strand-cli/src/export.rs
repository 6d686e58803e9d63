//! Binary STL export of proxy meshes.

use strand_curves::TriangleMesh;

/// Encode a mesh as binary STL with per-face normals.
pub fn export_stl_bytes(mesh: &TriangleMesh) -> Vec<u8> {
    let vertices = &mesh.vertices;
    let num_triangles = mesh.num_triangles();
    let mut data = Vec::with_capacity(84 + num_triangles * 50);

    // 80-byte header
    let mut header = [b' '; 80];
    let label = b"strand proxy mesh";
    header[..label.len()].copy_from_slice(label);
    data.extend_from_slice(&header);
    data.extend_from_slice(&(num_triangles as u32).to_le_bytes());

    for tri in mesh.indices.chunks_exact(3) {
        let corner = |i: u32| {
            let i = i as usize * 3;
            [vertices[i], vertices[i + 1], vertices[i + 2]]
        };
        let (v0, v1, v2) = (corner(tri[0]), corner(tri[1]), corner(tri[2]));

        let e1 = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
        let e2 = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];
        let n = [
            e1[1] * e2[2] - e1[2] * e2[1],
            e1[2] * e2[0] - e1[0] * e2[2],
            e1[0] * e2[1] - e1[1] * e2[0],
        ];
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        let n = if len > 1e-10 {
            [n[0] / len, n[1] / len, n[2] / len]
        } else {
            [0.0, 0.0, 1.0]
        };

        for v in [n, v0, v1, v2] {
            for c in v {
                data.extend_from_slice(&c.to_le_bytes());
            }
        }
        // Attribute byte count
        data.extend_from_slice(&0u16.to_le_bytes());
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_f32(data: &[u8], at: usize) -> f32 {
        f32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
    }

    #[test]
    fn test_single_triangle() {
        let mesh = TriangleMesh {
            vertices: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            indices: vec![0, 1, 2],
            normals: vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
        };
        let data = export_stl_bytes(&mesh);
        assert_eq!(data.len(), 84 + 50);
        assert!(data.starts_with(b"strand proxy mesh"));
        assert_eq!(u32::from_le_bytes([data[80], data[81], data[82], data[83]]), 1);
        // Face normal
        assert_eq!(read_f32(&data, 84 + 8), 1.0);
        // Second vertex x
        assert_eq!(read_f32(&data, 84 + 24), 1.0);
    }

    #[test]
    fn test_degenerate_triangle_normal() {
        let mesh = TriangleMesh {
            vertices: vec![0.0; 9],
            indices: vec![0, 1, 2],
            normals: vec![0.0; 9],
        };
        let data = export_stl_bytes(&mesh);
        assert_eq!(read_f32(&data, 84 + 8), 1.0);
    }

    #[test]
    fn test_empty_mesh() {
        let data = export_stl_bytes(&TriangleMesh::new());
        assert_eq!(data.len(), 84);
    }
}

//! Test data generators for synthetic source estimates and surfaces.
//!
//! These generators create predictable, verifiable data patterns that can be
//! used across the test suite. The binary encoders emit exactly the layouts
//! the workspace parsers decode, so tests can round-trip through real bytes.

use std::collections::HashMap;

/// Encode an `.stc` payload (big-endian, times in milliseconds).
///
/// `data` is laid out time-major: one full vertex slice per time point.
/// Panics when `data.len()` is not a multiple of `vertices.len()`.
pub fn encode_stc(tmin_ms: f32, tstep_ms: f32, vertices: &[u32], data: &[f32]) -> Vec<u8> {
    let n_times = if vertices.is_empty() {
        0
    } else {
        assert_eq!(
            data.len() % vertices.len(),
            0,
            "data length must be a multiple of the vertex count"
        );
        data.len() / vertices.len()
    };

    let mut buf = Vec::with_capacity(16 + vertices.len() * 4 + data.len() * 4);
    buf.extend_from_slice(&tmin_ms.to_be_bytes());
    buf.extend_from_slice(&tstep_ms.to_be_bytes());
    buf.extend_from_slice(&(vertices.len() as i32).to_be_bytes());
    for v in vertices {
        buf.extend_from_slice(&(*v as i32).to_be_bytes());
    }
    buf.extend_from_slice(&(n_times as i32).to_be_bytes());
    for value in data {
        buf.extend_from_slice(&value.to_be_bytes());
    }
    buf
}

/// Create an `.stc` payload with predictable values.
///
/// Vertex indices are `0..n_vertices`; the value at vertex `v`, time `t` is
/// `v * 1000 + t`, which makes misread offsets easy to spot. The header uses
/// tmin 0 ms and tstep 1 ms.
pub fn create_test_stc(n_vertices: usize, n_times: usize) -> Vec<u8> {
    let vertices: Vec<u32> = (0..n_vertices as u32).collect();
    let mut data = Vec::with_capacity(n_vertices * n_times);
    for t in 0..n_times {
        for v in 0..n_vertices {
            data.push((v * 1000 + t) as f32);
        }
    }
    encode_stc(0.0, 1.0, &vertices, &data)
}

/// Encode a `.w` payload (2 pad bytes, 3-byte count, 3-byte index + f32 value
/// per vertex).
pub fn encode_w(vertices: &[u32], values: &[f32]) -> Vec<u8> {
    assert_eq!(vertices.len(), values.len());
    let mut buf = vec![0u8, 0u8];
    buf.extend_from_slice(&(vertices.len() as u32).to_be_bytes()[1..]);
    for (v, value) in vertices.iter().zip(values) {
        buf.extend_from_slice(&v.to_be_bytes()[1..]);
        buf.extend_from_slice(&value.to_be_bytes());
    }
    buf
}

/// Create a `.w` payload with value `v * 1000` at vertex `v`.
pub fn create_test_w(n_vertices: usize) -> Vec<u8> {
    let vertices: Vec<u32> = (0..n_vertices as u32).collect();
    let values: Vec<f32> = (0..n_vertices).map(|v| (v * 1000) as f32).collect();
    encode_w(&vertices, &values)
}

/// A small triangle mesh with a known layout.
#[derive(Debug, Clone)]
pub struct TestMesh {
    pub vertices: Vec<[f32; 3]>,
    pub faces: Vec<[u32; 3]>,
}

impl TestMesh {
    pub fn n_vertices(&self) -> usize {
        self.vertices.len()
    }
}

/// A regular octahedron: 6 vertices on the axes, 8 faces, every vertex has
/// exactly 4 neighbors.
pub fn octahedron(radius: f32) -> TestMesh {
    let r = radius;
    TestMesh {
        vertices: vec![
            [r, 0.0, 0.0],
            [-r, 0.0, 0.0],
            [0.0, r, 0.0],
            [0.0, -r, 0.0],
            [0.0, 0.0, r],
            [0.0, 0.0, -r],
        ],
        faces: vec![
            [0, 2, 4],
            [2, 1, 4],
            [1, 3, 4],
            [3, 0, 4],
            [2, 0, 5],
            [1, 2, 5],
            [3, 1, 5],
            [0, 3, 5],
        ],
    }
}

/// An octahedron with `levels` rounds of midpoint subdivision, vertices
/// re-projected onto the sphere. Level 0 is the plain octahedron; each level
/// quadruples the face count (level 3: 258 vertices, 512 faces).
pub fn subdivided_octahedron(radius: f32, levels: u32) -> TestMesh {
    let mut mesh = octahedron(radius);
    for _ in 0..levels {
        mesh = subdivide_once(&mesh, radius);
    }
    mesh
}

fn subdivide_once(mesh: &TestMesh, radius: f32) -> TestMesh {
    let mut vertices = mesh.vertices.clone();
    let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
    let mut faces = Vec::with_capacity(mesh.faces.len() * 4);

    let mut midpoint = |a: u32, b: u32, vertices: &mut Vec<[f32; 3]>| -> u32 {
        let key = (a.min(b), a.max(b));
        if let Some(&idx) = midpoints.get(&key) {
            return idx;
        }
        let pa = vertices[a as usize];
        let pb = vertices[b as usize];
        let mid = [
            (pa[0] + pb[0]) / 2.0,
            (pa[1] + pb[1]) / 2.0,
            (pa[2] + pb[2]) / 2.0,
        ];
        let len = (mid[0] * mid[0] + mid[1] * mid[1] + mid[2] * mid[2]).sqrt();
        let scaled = [
            mid[0] / len * radius,
            mid[1] / len * radius,
            mid[2] / len * radius,
        ];
        let idx = vertices.len() as u32;
        vertices.push(scaled);
        midpoints.insert(key, idx);
        idx
    };

    for face in &mesh.faces {
        let [a, b, c] = *face;
        let ab = midpoint(a, b, &mut vertices);
        let bc = midpoint(b, c, &mut vertices);
        let ca = midpoint(c, a, &mut vertices);
        faces.push([a, ab, ca]);
        faces.push([b, bc, ab]);
        faces.push([c, ca, bc]);
        faces.push([ab, bc, ca]);
    }

    TestMesh { vertices, faces }
}

/// A flat strip of `n_quads` quads split into triangles. Vertices are laid
/// out in column order, two per column (`2 * col` bottom, `2 * col + 1` top),
/// which gives a path-like adjacency useful for smoothing frontier tests.
pub fn strip_mesh(n_quads: usize) -> TestMesh {
    let mut vertices = Vec::with_capacity((n_quads + 1) * 2);
    for col in 0..=n_quads {
        vertices.push([col as f32, 0.0, 0.0]);
        vertices.push([col as f32, 1.0, 0.0]);
    }
    let mut faces = Vec::with_capacity(n_quads * 2);
    for col in 0..n_quads as u32 {
        let base = col * 2;
        faces.push([base, base + 2, base + 1]);
        faces.push([base + 1, base + 2, base + 3]);
    }
    TestMesh { vertices, faces }
}

/// Create curvature values with alternating sign: even vertices are gyral
/// (negative), odd vertices sulcal (positive).
pub fn create_test_curv(n_vertices: usize) -> Vec<f32> {
    (0..n_vertices)
        .map(|v| if v % 2 == 0 { -0.25 } else { 0.25 })
        .collect()
}

/// Encode a FreeSurfer triangle surface file (3-byte magic 0xFFFFFE, comment
/// terminated by a blank line, counts, vertex and face data, big-endian).
pub fn encode_surface(mesh: &TestMesh) -> Vec<u8> {
    let mut buf = vec![0xFF, 0xFF, 0xFE];
    buf.extend_from_slice(b"created by test-utils\n\n");
    buf.extend_from_slice(&(mesh.vertices.len() as i32).to_be_bytes());
    buf.extend_from_slice(&(mesh.faces.len() as i32).to_be_bytes());
    for v in &mesh.vertices {
        for coord in v {
            buf.extend_from_slice(&coord.to_be_bytes());
        }
    }
    for f in &mesh.faces {
        for idx in f {
            buf.extend_from_slice(&(*idx as i32).to_be_bytes());
        }
    }
    buf
}

/// Encode a FreeSurfer new-format curvature file (3-byte magic 0xFFFFFF,
/// vertex/face counts, values-per-vertex of 1, f32 values, big-endian).
pub fn encode_curv(values: &[f32], n_faces: usize) -> Vec<u8> {
    let mut buf = vec![0xFF, 0xFF, 0xFF];
    buf.extend_from_slice(&(values.len() as i32).to_be_bytes());
    buf.extend_from_slice(&(n_faces as i32).to_be_bytes());
    buf.extend_from_slice(&1i32.to_be_bytes());
    for v in values {
        buf.extend_from_slice(&v.to_be_bytes());
    }
    buf
}

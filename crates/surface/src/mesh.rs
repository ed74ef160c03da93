//! Vertex adjacency and normals derived from the triangle mesh.

use crate::freesurfer::SurfaceGeometry;

/// Per-vertex neighbor lists in compressed sparse row form.
#[derive(Debug, Clone)]
pub struct Adjacency {
    offsets: Vec<u32>,
    neighbors: Vec<u32>,
}

impl Adjacency {
    /// Build adjacency from triangle faces. Neighbor lists are sorted and
    /// deduplicated.
    pub fn from_faces(n_vertices: usize, faces: &[[u32; 3]]) -> Self {
        let mut lists: Vec<Vec<u32>> = vec![Vec::new(); n_vertices];
        for face in faces {
            let [a, b, c] = *face;
            lists[a as usize].push(b);
            lists[a as usize].push(c);
            lists[b as usize].push(a);
            lists[b as usize].push(c);
            lists[c as usize].push(a);
            lists[c as usize].push(b);
        }

        let mut offsets = Vec::with_capacity(n_vertices + 1);
        let mut neighbors = Vec::new();
        offsets.push(0);
        for list in &mut lists {
            list.sort_unstable();
            list.dedup();
            neighbors.extend_from_slice(list);
            offsets.push(neighbors.len() as u32);
        }

        Self { offsets, neighbors }
    }

    pub fn n_vertices(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn neighbors(&self, vertex: usize) -> &[u32] {
        let start = self.offsets[vertex] as usize;
        let end = self.offsets[vertex + 1] as usize;
        &self.neighbors[start..end]
    }
}

/// Per-vertex normals from area-weighted face normal accumulation.
/// Vertices without any incident face get an arbitrary unit normal.
pub fn vertex_normals(geometry: &SurfaceGeometry) -> Vec<[f32; 3]> {
    let mut normals = vec![[0.0f32; 3]; geometry.n_vertices()];

    for face in &geometry.faces {
        let p0 = geometry.vertices[face[0] as usize];
        let p1 = geometry.vertices[face[1] as usize];
        let p2 = geometry.vertices[face[2] as usize];
        let e1 = [p1[0] - p0[0], p1[1] - p0[1], p1[2] - p0[2]];
        let e2 = [p2[0] - p0[0], p2[1] - p0[1], p2[2] - p0[2]];
        // Cross product length is twice the face area, so summing raw cross
        // products weights by area.
        let cross = [
            e1[1] * e2[2] - e1[2] * e2[1],
            e1[2] * e2[0] - e1[0] * e2[2],
            e1[0] * e2[1] - e1[1] * e2[0],
        ];
        for &idx in face {
            let n = &mut normals[idx as usize];
            n[0] += cross[0];
            n[1] += cross[1];
            n[2] += cross[2];
        }
    }

    for n in &mut normals {
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        if len > 1e-12 {
            n[0] /= len;
            n[1] /= len;
            n[2] /= len;
        } else {
            *n = [0.0, 0.0, 1.0];
        }
    }
    normals
}

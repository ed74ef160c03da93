//! Scattering sparse source activity onto the full mesh.
//!
//! Source estimates carry values for a subset of surface vertices. Each
//! smoothing step replaces every vertex value with the mean of the defined
//! values in its closed neighborhood, and a vertex becomes defined once at
//! least one neighbor is. Vertices still undefined after the final step keep
//! zero activity.

use rayon::prelude::*;

use crate::error::{SurfaceError, SurfaceResult};
use crate::mesh::Adjacency;

/// Spread `source_values` (one per entry of `sources`) over the mesh with
/// the given number of smoothing steps. Returns one value per mesh vertex.
pub fn spread_activity(
    adjacency: &Adjacency,
    sources: &[u32],
    source_values: &[f32],
    steps: u32,
) -> SurfaceResult<Vec<f32>> {
    let n = adjacency.n_vertices();
    if sources.len() != source_values.len() {
        return Err(SurfaceError::InvalidFormat(format!(
            "{} source vertices with {} values",
            sources.len(),
            source_values.len()
        )));
    }

    let mut values = vec![0.0f32; n];
    let mut defined = vec![false; n];
    for (&vertex, &value) in sources.iter().zip(source_values) {
        let idx = vertex as usize;
        if idx >= n {
            return Err(SurfaceError::VertexOutOfRange {
                index: idx,
                vertex_count: n,
            });
        }
        values[idx] = value;
        defined[idx] = true;
    }

    for _ in 0..steps {
        let stepped: Vec<(f32, bool)> = (0..n)
            .into_par_iter()
            .map(|u| {
                let mut sum = 0.0f32;
                let mut count = 0u32;
                if defined[u] {
                    sum += values[u];
                    count += 1;
                }
                for &nb in adjacency.neighbors(u) {
                    let nb = nb as usize;
                    if defined[nb] {
                        sum += values[nb];
                        count += 1;
                    }
                }
                if count > 0 {
                    (sum / count as f32, true)
                } else {
                    (0.0, false)
                }
            })
            .collect();
        for (u, (value, is_defined)) in stepped.into_iter().enumerate() {
            values[u] = value;
            defined[u] = is_defined;
        }
    }

    Ok(values)
}

//! On-disk fixtures for integration tests.
//!
//! Surface-loading and service tests need a directory that looks like a
//! FreeSurfer `surf/` directory. These helpers write one from the synthetic
//! meshes in [`crate::generators`].

use std::fs;
use std::io;
use std::path::Path;

use crate::generators::{
    create_test_curv, encode_curv, encode_surface, subdivided_octahedron, TestMesh,
};

/// Write `lh.inflated`, `rh.inflated`, `lh.curv`, and `rh.curv` under `dir`
/// from the given meshes and curvature vectors.
pub fn write_surface_pair(
    dir: &Path,
    left: (&TestMesh, &[f32]),
    right: (&TestMesh, &[f32]),
) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    for (side, (mesh, curv)) in [("lh", left), ("rh", right)] {
        assert_eq!(
            mesh.vertices.len(),
            curv.len(),
            "curvature length must match the vertex count"
        );
        fs::write(dir.join(format!("{}.inflated", side)), encode_surface(mesh))?;
        fs::write(
            dir.join(format!("{}.curv", side)),
            encode_curv(curv, mesh.faces.len()),
        )?;
    }
    Ok(())
}

/// Write a complete surface directory from level-3 subdivided octahedra
/// (258 vertices, 512 faces per hemisphere). Returns the vertex count per
/// hemisphere so callers can build matching estimates.
pub fn write_default_surfaces(dir: &Path) -> io::Result<usize> {
    let mesh = subdivided_octahedron(50.0, 3);
    let curv = create_test_curv(mesh.vertices.len());
    write_surface_pair(dir, (&mesh, &curv), (&mesh, &curv))?;
    Ok(mesh.vertices.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_surface_fixture_files_exist() {
        let dir = tempfile::tempdir().unwrap();
        let n = write_default_surfaces(dir.path()).unwrap();
        assert_eq!(n, 258);
        for name in ["lh.inflated", "rh.inflated", "lh.curv", "rh.curv"] {
            assert!(dir.path().join(name).exists(), "missing {}", name);
        }
    }
}

//! Restriction of brain meshes to the cortex, and translation between full and restricted index spaces.
//!
//! Removing the medial wall from a surface ensures that shortest paths along the mesh are only
//! computed through the cortex. The restricted mesh contains the cortex vertices in label order,
//! so restricted vertex `i` is full mesh vertex `cortex[i]`. This also works for non-monotonic
//! labels, e.g., those of spun surfaces.

use ahash::{AHashMap, AHashSet};
use tracing::debug;

use crate::label::CortexLabel;
use crate::mesh::BrainMesh;
use crate::error::{CortexMeshError, Result};


/// Remove the medial wall from a brain mesh: keep only the cortex vertices and the faces built entirely from them.
///
/// The vertices of the result are the cortex vertices in the order of the label, and its faces are
/// re-indexed into that order.
///
/// # Errors
///
/// If the cortex label contains a vertex index which is not valid for the mesh.
///
/// # Examples
///
/// ```
/// use cortexmesh::{BrainMesh, CortexLabel, restrict_mesh_to_cortex};
/// let surf = BrainMesh::from_triangles(
///     &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
///     &[[0, 1, 2], [0, 1, 3]],
/// ).unwrap();
/// let cortex = CortexLabel::new(vec![0, 1, 2]).unwrap();
/// let cortex_surf = restrict_mesh_to_cortex(&surf, &cortex).unwrap();
/// assert_eq!(3, cortex_surf.num_vertices());
/// assert_eq!(vec![0, 1, 2], cortex_surf.faces);
/// ```
pub fn restrict_mesh_to_cortex(surf: &BrainMesh, cortex: &CortexLabel) -> Result<BrainMesh> {
    cortex.validate_for(surf.num_vertices())?;

    let mut vertices: Vec<f32> = Vec::with_capacity(cortex.len() * 3);
    for idx in cortex.indices() {
        vertices.extend_from_slice(&surf.vertices[idx * 3..idx * 3 + 3]);
    }

    let faces = triangles_keep_cortex(&surf.faces, cortex);

    Ok(BrainMesh {
        vertices: vertices,
        faces: faces,
    })
}


/// Remove faces with vertices not contained in the cortex label, and re-index the remaining ones into the restricted index space.
///
/// Both `faces` and the result are flat, 3 vertex indices per face. Faces are dropped as a whole, never clipped.
pub fn triangles_keep_cortex(faces: &[i32], cortex: &CortexLabel) -> Vec<i32> {
    let in_cortex: AHashSet<usize> = cortex.indices().iter().copied().collect();
    let index_mapping: AHashMap<usize, usize> = cortex.full_to_restricted();

    let num_faces = faces.len() / 3;
    let mut cortex_faces: Vec<i32> = Vec::with_capacity(faces.len());
    for tri in faces.chunks_exact(3) {
        let keep = tri.iter().all(|v| *v >= 0 && in_cortex.contains(&(*v as usize)));
        if keep {
            cortex_faces.extend(tri.iter().map(|v| index_mapping[&(*v as usize)] as i32));
        }
    }

    debug!(
        "Kept {} of {} faces within the cortex label of {} vertices.",
        cortex_faces.len() / 3,
        num_faces,
        cortex.len()
    );
    cortex_faces
}


/// Convert source vertices of the full mesh into the index space of the cortex-restricted mesh.
///
/// Returns the restricted indices of all cortex vertices listed in `src`, in ascending order. Source
/// vertices outside the cortex are dropped, and duplicates in `src` are collapsed, so the result may be
/// shorter than `src`. It is empty if no source vertex is in the cortex.
///
/// # Examples
///
/// ```
/// let cortex = cortexmesh::CortexLabel::new(vec![5, 1, 9, 0]).unwrap();
/// assert_eq!(vec![1, 2], cortexmesh::translate_to_restricted(&[9, 1, 3], &cortex));
/// ```
pub fn translate_to_restricted(src: &[usize], cortex: &CortexLabel) -> Vec<usize> {
    let src: AHashSet<usize> = src.iter().copied().collect();
    cortex.indices().iter()
        .enumerate()
        .filter(|(_, full_idx)| src.contains(*full_idx))
        .map(|(restricted_idx, _)| restricted_idx)
        .collect()
}


/// Return per-vertex data of the cortex-restricted mesh to the full mesh, with the medial wall set to zero.
///
/// Every vertex not in the cortex receives exactly `0.0`.
///
/// # Errors
///
/// If `restricted_data` does not contain one value per cortex vertex, or if the cortex label contains an
/// index which is not valid for a full mesh with `full_size` vertices.
///
/// # Examples
///
/// ```
/// let cortex = cortexmesh::CortexLabel::new(vec![1, 3]).unwrap();
/// let full = cortexmesh::expand_to_full(&[7.0, 9.0], 5, &cortex).unwrap();
/// assert_eq!(vec![0.0, 7.0, 0.0, 9.0, 0.0], full);
/// ```
pub fn expand_to_full(restricted_data: &[f32], full_size: usize, cortex: &CortexLabel) -> Result<Vec<f32>> {
    if restricted_data.len() != cortex.len() {
        return Err(CortexMeshError::FieldLengthMismatch(restricted_data.len(), cortex.len()));
    }
    cortex.validate_for(full_size)?;

    let mut data: Vec<f32> = vec![0.0; full_size];
    for (value, full_idx) in restricted_data.iter().zip(cortex.indices()) {
        data[*full_idx] = *value;
    }
    Ok(data)
}

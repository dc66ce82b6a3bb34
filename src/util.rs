//! Utility functions used in all other cortexmesh modules.

use ahash::AHashSet;

/// Squared euclidean distance between two points in 3D.
pub fn squared_distance(a: &[f32; 3], b: &[f32; 3]) -> f32 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    dx * dx + dy * dy + dz * dz
}


/// Euclidean distance between two points in 3D.
pub fn distance(a: &[f32; 3], b: &[f32; 3]) -> f32 {
    squared_distance(a, b).sqrt()
}


/// Group a flat x,y,z coordinate vector into points. A trailing incomplete triple is ignored.
pub fn flat_to_points(flat: &[f32]) -> Vec<[f32; 3]> {
    flat.chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .collect()
}


/// Return the first value that occurs more than once in the input, if any.
pub fn first_duplicate(values: &[usize]) -> Option<usize> {
    let mut seen: AHashSet<usize> = AHashSet::with_capacity(values.len());
    values.iter().copied().find(|v| !seen.insert(*v))
}

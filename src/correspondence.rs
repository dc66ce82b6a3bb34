//! One-to-one vertex correspondence between two meshes of the same surface.
//!
//! Finds those points on the complex (denser) mesh that correspond best to the vertices of the simple
//! mesh, while forcing a one-to-one mapping. Each simple vertex claims its nearest complex vertex. If a
//! complex vertex is claimed several times, the simple vertex with the lowest index keeps it and the
//! others move on to their next nearest neighbor. When the neighbor ranks fetched so far are used up,
//! the query is widened by another `neighbour_step` neighbors.

use ahash::AHashSet;
use ndarray::Array1;
use ndarray_stats::QuantileExt;
use tracing::{debug, trace, warn};

use std::fmt;

use crate::kdtree::KdTree;
use crate::mesh::BrainMesh;
use crate::util::distance;
use crate::error::{CortexMeshError, Result};

pub const DEFAULT_NEIGHBOUR_STEP: usize = 100;


/// Settings for [`match_nodes_with`].
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOptions {
    /// Number of neighbors by which the nearest neighbor query is widened whenever all fetched ranks are used up.
    pub neighbour_step: usize,
}

impl Default for MatchOptions {
    fn default() -> MatchOptions {
        MatchOptions {
            neighbour_step: DEFAULT_NEIGHBOUR_STEP,
        }
    }
}


/// Result of matching the vertices of a simple mesh to those of a complex mesh.
///
/// `mapping[i]` is the complex vertex assigned to simple vertex `i`, no complex vertex is used twice.
/// `inaccuracy[i]` is the distance from simple vertex `i` to its nearest complex vertex, taken from the last
/// neighbor query. This is not the distance to the assigned vertex if that one was not the nearest; use
/// [`NodeMatch::matched_distances`] for those.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeMatch {
    pub mapping: Vec<usize>,
    pub inaccuracy: Vec<f32>,
}

impl NodeMatch {

    pub fn len(&self) -> usize {
        self.mapping.len()
    }


    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }


    /// The distance between each simple vertex and the complex vertex it was assigned to.
    ///
    /// # Panics
    ///
    /// If the vertices are not the ones this match was computed from.
    pub fn matched_distances(&self, simple_vertices: &[[f32; 3]], complex_vertices: &[[f32; 3]]) -> Vec<f32> {
        self.mapping.iter()
            .enumerate()
            .map(|(simple_idx, complex_idx)| distance(&simple_vertices[simple_idx], &complex_vertices[*complex_idx]))
            .collect()
    }


    /// The largest nearest neighbor distance, or `None` for an empty match.
    pub fn max_inaccuracy(&self) -> Option<f32> {
        let inaccuracy = Array1::from(self.inaccuracy.clone());
        let max = inaccuracy.max().ok().copied();
        max
    }


    /// The mean nearest neighbor distance, or `None` for an empty match.
    pub fn mean_inaccuracy(&self) -> Option<f32> {
        Array1::from(self.inaccuracy.clone()).mean()
    }
}


impl fmt::Display for NodeMatch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "One-to-one match of {} simple mesh vertices.", self.mapping.len())
    }
}


/// Match the vertices of a simple mesh one-to-one to their nearest vertices on a complex mesh, using the default [`MatchOptions`].
///
/// The simple mesh must not have more vertices than the complex mesh.
///
/// # Examples
///
/// ```
/// let simple = [[0.0, 0.0, 0.0], [0.0, 0.0, 0.0]];
/// let complex = [[1.0, 0.0, 0.0], [1.0, 0.0, 0.0], [4.0, 0.0, 0.0]];
/// let node_match = cortexmesh::match_nodes(&simple, &complex).unwrap();
/// assert_eq!(vec![0, 1], node_match.mapping);
/// ```
pub fn match_nodes(simple_vertices: &[[f32; 3]], complex_vertices: &[[f32; 3]]) -> Result<NodeMatch> {
    match_nodes_with(simple_vertices, complex_vertices, &MatchOptions::default())
}


/// Match the vertices of the `simple` mesh one-to-one to their nearest vertices on the `complex` mesh.
pub fn match_meshes(simple: &BrainMesh, complex: &BrainMesh) -> Result<NodeMatch> {
    match_nodes(&simple.vertex_coords(), &complex.vertex_coords())
}


/// Match the vertices of a simple mesh one-to-one to their nearest vertices on a complex mesh.
///
/// # Errors
///
/// * If `options.neighbour_step` is zero.
/// * If vertices are still unassigned after every complex vertex rank has been tried. This happens if
///   the simple mesh has more vertices than the complex mesh, which callers must avoid.
pub fn match_nodes_with(simple_vertices: &[[f32; 3]], complex_vertices: &[[f32; 3]], options: &MatchOptions) -> Result<NodeMatch> {
    if options.neighbour_step == 0 {
        return Err(CortexMeshError::InvalidOptions(String::from("neighbour_step must be at least 1")));
    }

    let num_complex = complex_vertices.len();
    let tree = KdTree::new(complex_vertices);

    let mut assignment: Vec<Option<usize>> = vec![None; simple_vertices.len()];
    let mut claims: Vec<usize> = vec![0; simple_vertices.len()];
    let mut inaccuracy: Vec<f32> = vec![0.0; simple_vertices.len()];

    let mut neighbours: usize = 0;
    let mut col: usize = 0;

    while num_unassigned(&assignment) > 0 {
        if col >= num_complex {
            let unassigned = num_unassigned(&assignment);
            warn!("Node matching gave up with {} of {} vertices unassigned.", unassigned, assignment.len());
            return Err(CortexMeshError::NeighbourRanksExhausted(unassigned, num_complex));
        }

        neighbours += options.neighbour_step;
        let width = neighbours.min(num_complex);
        let nearest: Vec<Vec<(usize, f32)>> = simple_vertices.iter()
            .map(|v| tree.nearest(v, width))
            .collect();
        inaccuracy = nearest.iter().map(|row| row[0].1).collect();

        debug!(
            "Querying {} nearest neighbours, {} of {} vertices unassigned at rank {}.",
            width, num_unassigned(&assignment), assignment.len(), col
        );

        while col < width && num_unassigned(&assignment) > 0 {
            claims = next_claims(&assignment, &claims, &nearest, col);
            assignment = resolve_claims(&claims);
            col += 1;
            trace!("After rank {}: {} vertices unassigned.", col - 1, num_unassigned(&assignment));
        }
    }

    Ok(NodeMatch {
        mapping: assignment.into_iter().flatten().collect(),
        inaccuracy: inaccuracy,
    })
}


fn num_unassigned(assignment: &[Option<usize>]) -> usize {
    assignment.iter().filter(|a| a.is_none()).count()
}


/// Every unassigned vertex claims its neighbor of the given rank, assigned vertices keep their claim.
fn next_claims(assignment: &[Option<usize>], claims: &[usize], nearest: &[Vec<(usize, f32)>], rank: usize) -> Vec<usize> {
    assignment.iter()
        .zip(claims.iter())
        .zip(nearest.iter())
        .map(|((assigned, claim), row)| match assigned {
            Some(_) => *claim,
            None => row[rank].0,
        })
        .collect()
}


/// Each claimed complex vertex goes to the lowest simple vertex index claiming it, all other claimants are unassigned.
fn resolve_claims(claims: &[usize]) -> Vec<Option<usize>> {
    let mut taken: AHashSet<usize> = AHashSet::with_capacity(claims.len());
    claims.iter()
        .map(|claim| if taken.insert(*claim) { Some(*claim) } else { None })
        .collect()
}


#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn assert_injective(mapping: &[usize]) {
        let unique: AHashSet<usize> = mapping.iter().copied().collect();
        assert_eq!(mapping.len(), unique.len());
    }

    fn wavy_grid(n: usize, spacing: f32, shift: f32) -> Vec<[f32; 3]> {
        let mut points = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..n {
                let x = i as f32 * spacing + shift;
                let y = j as f32 * spacing + shift * 0.5;
                points.push([x, y, (x * 0.7).sin() + (y * 0.3).cos()]);
            }
        }
        points
    }

    #[test]
    fn tied_nearest_neighbors_are_resolved() {
        let simple = vec![[0.0, 0.0, 0.0], [0.0, 0.0, 0.0]];
        let complex = vec![[1.0, 0.0, 0.0], [1.0, 0.0, 0.0], [5.0, 5.0, 5.0], [6.0, 6.0, 6.0], [7.0, 7.0, 7.0]];
        let node_match = match_nodes(&simple, &complex).unwrap();

        assert_eq!(vec![0, 1], node_match.mapping);
        assert_eq!(2, node_match.inaccuracy.len());
        assert_abs_diff_eq!(1.0, node_match.inaccuracy[0], epsilon = 1e-6);
        assert_abs_diff_eq!(1.0, node_match.inaccuracy[1], epsilon = 1e-6);
    }

    #[test]
    fn the_lowest_simple_index_wins_a_conflict() {
        let simple = vec![[0.1, 0.0, 0.0], [0.0, 0.0, 0.0]];
        let complex = vec![[0.0, 0.0, 0.0], [10.0, 0.0, 0.0]];
        let node_match = match_nodes(&simple, &complex).unwrap();

        assert_eq!(vec![0, 1], node_match.mapping);

        // The reported inaccuracy is the nearest neighbor distance, not the distance to the assigned vertex.
        assert_abs_diff_eq!(0.1, node_match.inaccuracy[0], epsilon = 1e-6);
        assert_abs_diff_eq!(0.0, node_match.inaccuracy[1], epsilon = 1e-6);
        let matched = node_match.matched_distances(&simple, &complex);
        assert_abs_diff_eq!(0.1, matched[0], epsilon = 1e-6);
        assert_abs_diff_eq!(10.0, matched[1], epsilon = 1e-6);
    }

    #[test]
    fn a_confirmed_vertex_can_be_displaced_by_a_lower_index() {
        let simple = vec![[0.0, 0.0, 0.0], [0.1, 0.0, 0.0], [1.2, 0.0, 0.0]];
        let complex = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [3.0, 0.0, 0.0]];

        // Rank 0: vertex 2 gets complex 1, vertex 1 loses complex 0 to vertex 0.
        // Rank 1: vertex 1 claims complex 1 and displaces vertex 2, which then ends up with complex 2.
        let node_match = match_nodes(&simple, &complex).unwrap();
        assert_eq!(vec![0, 1, 2], node_match.mapping);
    }

    #[test]
    fn identical_meshes_match_onto_themselves() {
        let points = wavy_grid(12, 1.0, 0.0);
        let node_match = match_nodes(&points, &points).unwrap();

        assert_eq!((0..points.len()).collect::<Vec<usize>>(), node_match.mapping);
        assert_abs_diff_eq!(0.0, node_match.max_inaccuracy().unwrap(), epsilon = 1e-6);
    }

    #[test]
    fn a_sparse_mesh_matches_injectively_onto_a_dense_one() {
        let simple = wavy_grid(8, 2.0, 0.3);
        let complex = wavy_grid(16, 1.0, 0.0);
        let node_match = match_nodes(&simple, &complex).unwrap();

        assert_eq!(simple.len(), node_match.len());
        assert_eq!(simple.len(), node_match.inaccuracy.len());
        assert_injective(&node_match.mapping);
        assert!(node_match.mapping.iter().all(|idx| *idx < complex.len()));

        let matched = node_match.matched_distances(&simple, &complex);
        for (nearest, assigned) in node_match.inaccuracy.iter().zip(matched.iter()) {
            assert!(*nearest <= *assigned + 1e-6);
        }
        assert!(node_match.mean_inaccuracy().unwrap() <= node_match.max_inaccuracy().unwrap());
    }

    #[test]
    fn crowded_simple_vertices_need_wider_queries() {
        let simple = vec![[0.0, 0.0, 0.0]; 6];
        let complex = wavy_grid(3, 1.0, 0.0);
        let options = MatchOptions { neighbour_step: 2 };
        let node_match = match_nodes_with(&simple, &complex, &options).unwrap();

        assert_eq!(6, node_match.len());
        assert_injective(&node_match.mapping);
        assert_eq!(node_match.mapping, match_nodes(&simple, &complex).unwrap().mapping);
    }

    #[test]
    fn more_simple_than_complex_vertices_is_an_error() {
        let simple = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]];
        let complex = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]];

        let result = match_nodes(&simple, &complex);
        assert!(matches!(result, Err(CortexMeshError::NeighbourRanksExhausted(1, 2))));
        assert!(matches!(match_nodes(&simple, &[]), Err(CortexMeshError::NeighbourRanksExhausted(3, 0))));
    }

    #[test]
    fn empty_inputs_and_invalid_options() {
        let node_match = match_nodes(&[], &[[0.0, 0.0, 0.0]]).unwrap();
        assert!(node_match.is_empty());
        assert_eq!(None, node_match.max_inaccuracy());
        assert_eq!(None, node_match.mean_inaccuracy());

        let options = MatchOptions { neighbour_step: 0 };
        assert!(matches!(match_nodes_with(&[[0.0, 0.0, 0.0]], &[[0.0, 0.0, 0.0]], &options), Err(CortexMeshError::InvalidOptions(_))));
    }

    #[test]
    fn meshes_can_be_matched_directly() {
        let simple = BrainMesh::from_triangles(&[[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]], &[[0, 1, 2]]).unwrap();
        let complex = BrainMesh::from_triangles(
            &[[0.0, 2.1, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 0.1], [2.0, 0.1, 0.0]],
            &[[0, 1, 2], [1, 2, 3]],
        ).unwrap();
        let node_match = match_meshes(&simple, &complex).unwrap();

        assert_eq!(vec![2, 3, 0], node_match.mapping);
        assert_eq!("One-to-one match of 3 simple mesh vertices.", format!("{}", node_match));
    }
}

// Triangular brain surface meshes.
// Each vertex is defined by its x,y,z coord and each face is defined by 3 vertices,
// stored as 3 indices into the vertices. Both are kept in flat vectors, FreeSurfer style.


use ndarray::{Array2};
use ahash::AHashSet;

use std::fmt;

use crate::util::flat_to_points;
use crate::error::{CortexMeshError, Result};


/// A brain mesh, e.g., the white surface of one hemisphere.
#[derive(Debug, PartialEq, Clone)]
pub struct BrainMesh {
    pub vertices: Vec<f32>,
    pub faces: Vec<i32>,
}


impl BrainMesh {

    /// Create a mesh from flat vertex coordinates (x,y,z per vertex) and flat faces (3 vertex indices per face).
    ///
    /// # Errors
    ///
    /// If either vector does not hold whole triples, or if a face references a vertex which does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// let mesh = cortexmesh::BrainMesh::new(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0], vec![0, 1, 2]).unwrap();
    /// assert_eq!(3, mesh.num_vertices());
    /// assert_eq!(1, mesh.num_faces());
    /// ```
    pub fn new(vertices: Vec<f32>, faces: Vec<i32>) -> Result<BrainMesh> {
        if vertices.len() % 3 != 0 {
            return Err(CortexMeshError::InvalidMesh(format!("{} vertex coordinates are not a multiple of 3", vertices.len())));
        }
        if faces.len() % 3 != 0 {
            return Err(CortexMeshError::InvalidMesh(format!("{} face indices are not a multiple of 3", faces.len())));
        }

        let mesh = BrainMesh {
            vertices: vertices,
            faces: faces,
        };
        mesh.validate()?;
        Ok(mesh)
    }


    /// Create a mesh from points and triangles.
    pub fn from_triangles(vertices: &[[f32; 3]], triangles: &[[i32; 3]]) -> Result<BrainMesh> {
        BrainMesh::new(
            vertices.iter().flatten().copied().collect(),
            triangles.iter().flatten().copied().collect(),
        )
    }


    /// Check that every face index is a valid vertex index.
    pub fn validate(&self) -> Result<()> {
        let num_vertices = self.num_vertices();
        for (idx, vertex) in self.faces.iter().enumerate() {
            if *vertex < 0 || *vertex as usize >= num_vertices {
                return Err(CortexMeshError::FaceIndexOutOfRange(idx / 3, *vertex, num_vertices));
            }
        }
        Ok(())
    }


    pub fn num_vertices(&self) -> usize {
        self.vertices.len() / 3
    }


    pub fn num_faces(&self) -> usize {
        self.faces.len() / 3
    }


    /// Get the coordinates of the vertex at the given index.
    ///
    /// # Panics
    ///
    /// If `idx` is not a valid vertex index.
    pub fn vertex(&self, idx: usize) -> [f32; 3] {
        [self.vertices[idx * 3], self.vertices[idx * 3 + 1], self.vertices[idx * 3 + 2]]
    }


    /// Get the 3 vertex indices of the face at the given index.
    ///
    /// # Panics
    ///
    /// If `idx` is not a valid face index.
    pub fn face(&self, idx: usize) -> [i32; 3] {
        [self.faces[idx * 3], self.faces[idx * 3 + 1], self.faces[idx * 3 + 2]]
    }


    /// All vertex coordinates, one point per vertex.
    pub fn vertex_coords(&self) -> Vec<[f32; 3]> {
        flat_to_points(&self.vertices)
    }


    /// The vertex coordinates as an (num_vertices, 3) matrix.
    pub fn vertices_2d(&self) -> Result<Array2<f32>> {
        let coords = Array2::from_shape_vec((self.num_vertices(), 3), self.vertices.clone())?;
        Ok(coords)
    }


    /// The faces as an (num_faces, 3) matrix of vertex indices.
    pub fn faces_2d(&self) -> Result<Array2<i32>> {
        let faces = Array2::from_shape_vec((self.num_faces(), 3), self.faces.clone())?;
        Ok(faces)
    }


    /// Unique undirected edges of the mesh, each given as `(lower index, higher index)`, sorted.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let mut edges: AHashSet<(usize, usize)> = AHashSet::with_capacity(self.faces.len());
        for tri in self.faces.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            for (u, v) in [(a, b), (b, c), (a, c)].iter() {
                if u < v { edges.insert((*u, *v)); } else if v < u { edges.insert((*v, *u)); }
            }
        }
        let mut edges: Vec<(usize, usize)> = edges.into_iter().collect();
        edges.sort_unstable();
        edges
    }


    /// Vertex adjacency of the mesh graph: for each vertex, the sorted indices of all vertices sharing an edge with it.
    ///
    /// Vertices which are not part of any face have no neighbors.
    pub fn vertex_neighbors(&self) -> Vec<Vec<usize>> {
        let mut neighbors: Vec<Vec<usize>> = vec![Vec::new(); self.num_vertices()];
        for (u, v) in self.edges() {
            neighbors[u].push(v);
            neighbors[v].push(u);
        }
        for adj in neighbors.iter_mut() {
            adj.sort_unstable();
        }
        neighbors
    }
}


impl fmt::Display for BrainMesh {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Brain mesh with {} vertices and {} faces.", self.num_vertices(), self.num_faces())
    }
}

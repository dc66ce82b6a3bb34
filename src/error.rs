use quick_error::quick_error;
use ndarray::ShapeError;

quick_error! {
    /// Error type for all error variants originated by this crate.
    #[derive(Debug)]
    pub enum CortexMeshError {
        /// Vertex or face array does not hold whole triples.
        InvalidMesh(reason: String) {
            display("Invalid brain mesh: {}", reason)
        }

        FaceIndexOutOfRange(face: usize, vertex: i32, num_vertices: usize) {
            display("Face {} references vertex {}, but the mesh has only {} vertices", face, vertex, num_vertices)
        }

        /// A cortex label must not list a vertex twice, the position of each index defines the restricted space.
        DuplicateCortexIndex(vertex: usize) {
            display("Vertex {} occurs more than once in the cortex label", vertex)
        }

        CortexIndexOutOfRange(vertex: usize, num_vertices: usize) {
            display("Cortex label contains vertex {}, but the full mesh has only {} vertices", vertex, num_vertices)
        }

        FieldLengthMismatch(field_len: usize, cortex_len: usize) {
            display("Restricted data has {} values, but the cortex label has {} vertices", field_len, cortex_len)
        }

        NoSuchRegion(region: String) {
            display("No region named '{}' in the parcellation", region)
        }

        InvalidOptions(reason: String) {
            display("Invalid node matching options: {}", reason)
        }

        /// The one-to-one matching ran out of neighbour ranks, typically because the simple mesh has more vertices than the complex one.
        NeighbourRanksExhausted(unassigned: usize, num_complex: usize) {
            display("Node matching left {} vertices unassigned after trying all {} complex vertices", unassigned, num_complex)
        }

        /// Array shape error from ndarray.
        Shape(err: ShapeError) {
            from()
            source(err)
        }
    }
}

/// Alias type for results originated from this crate.
pub type Result<T> = ::std::result::Result<T, CortexMeshError>;

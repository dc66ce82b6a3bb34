//! Rust implementation of cortex-restricted brain surface meshes.
//!
//! The focus of this package is on preparing surface meshes as produced by FreeSurfer for geodesic distance
//! computation: removing the medial wall, translating vertex indices and per-vertex data between the full
//! and the cortex-restricted mesh, and finding one-to-one vertex correspondences between two meshes of
//! different resolution.

pub mod error;
pub mod util;
pub mod mesh;
pub mod label;
pub mod cortex;
pub mod kdtree;
pub mod correspondence;

pub use error::{CortexMeshError, Result};
pub use mesh::BrainMesh;
pub use label::{CortexLabel, LabelSet, Parcellation, UNKNOWN_REGION};
pub use cortex::{expand_to_full, restrict_mesh_to_cortex, translate_to_restricted, triangles_keep_cortex};
pub use kdtree::KdTree;
pub use correspondence::{match_meshes, match_nodes, match_nodes_with, MatchOptions, NodeMatch, DEFAULT_NEIGHBOUR_STEP};

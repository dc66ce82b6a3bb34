//! Cortex labels and surface parcellations.
//!
//! A cortex label lists the vertices of a full brain mesh that belong to the cortex, i.e., all
//! vertices except the medial wall. The order of the label defines the restricted index space:
//! vertex `i` of the restricted mesh is vertex `label[i]` of the full mesh.
//!
//! A parcellation assigns each vertex of a brain surface mesh to exactly one brain region. It is the
//! in-memory form of an annotation, from which the medial wall and a cortex label can be derived.

use ahash::{AHashMap, AHashSet};

use std::collections::BTreeMap;
use std::fmt;

use crate::util::first_duplicate;
use crate::error::{CortexMeshError, Result};

/// Region name used for the medial wall in gifti and cifti dense label files.
pub const UNKNOWN_REGION: &str = "???";


/// An ordered set of full mesh vertex indices that belong to the cortex.
#[derive(Debug, Clone, PartialEq)]
pub struct CortexLabel {
    vertex_index: Vec<usize>,
}

impl CortexLabel {

    /// Create a cortex label from vertex indices. The order is kept, it need not be monotonic.
    ///
    /// # Errors
    ///
    /// If an index occurs more than once.
    ///
    /// # Examples
    ///
    /// ```
    /// let cortex = cortexmesh::CortexLabel::new(vec![5, 1, 9, 0]).unwrap();
    /// assert_eq!(4, cortex.len());
    /// assert!(cortexmesh::CortexLabel::new(vec![1, 2, 1]).is_err());
    /// ```
    pub fn new(vertex_index: Vec<usize>) -> Result<CortexLabel> {
        if let Some(dup) = first_duplicate(&vertex_index) {
            return Err(CortexMeshError::DuplicateCortexIndex(dup));
        }
        Ok(CortexLabel { vertex_index: vertex_index })
    }


    /// Create the cortex label of a mesh with `num_vertices` vertices from its medial wall: all vertices not in the medial wall, in ascending order.
    pub fn from_medial_wall(num_vertices: usize, medial_wall: &[usize]) -> CortexLabel {
        let wall: AHashSet<usize> = medial_wall.iter().copied().collect();
        CortexLabel {
            vertex_index: (0..num_vertices).filter(|v| !wall.contains(v)).collect(),
        }
    }


    pub fn len(&self) -> usize {
        self.vertex_index.len()
    }


    pub fn is_empty(&self) -> bool {
        self.vertex_index.is_empty()
    }


    /// The full mesh vertex indices, in label order.
    pub fn indices(&self) -> &[usize] {
        &self.vertex_index
    }


    pub fn contains(&self, vertex: usize) -> bool {
        self.vertex_index.contains(&vertex)
    }


    /// Map each full mesh vertex index in the label to its restricted index, i.e., its position in the label.
    pub fn full_to_restricted(&self) -> AHashMap<usize, usize> {
        self.vertex_index.iter()
            .enumerate()
            .map(|(new_index, old_index)| (*old_index, new_index))
            .collect()
    }


    /// Check that all indices are valid for a full mesh with `num_vertices` vertices.
    pub fn validate_for(&self, num_vertices: usize) -> Result<()> {
        match self.vertex_index.iter().find(|v| **v >= num_vertices) {
            Some(v) => Err(CortexMeshError::CortexIndexOutOfRange(*v, num_vertices)),
            None => Ok(()),
        }
    }
}


impl fmt::Display for CortexLabel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Cortex label containing {} vertices.", self.vertex_index.len())
    }
}


/// Regions of a parcellation with the medial wall split off.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelSet {
    pub regions: BTreeMap<String, Vec<usize>>,
    pub medial_wall: Vec<usize>,
}

impl LabelSet {

    /// Split the region named `medial_wall_region` off the given regions. If no medial wall region is given, the medial wall is empty.
    ///
    /// # Errors
    ///
    /// If the named medial wall region is not among the regions.
    pub fn from_regions(mut regions: BTreeMap<String, Vec<usize>>, medial_wall_region: Option<&str>) -> Result<LabelSet> {
        let medial_wall = match medial_wall_region {
            Some(name) => regions.remove(name).ok_or_else(|| CortexMeshError::NoSuchRegion(name.to_string()))?,
            None => Vec::new(),
        };
        Ok(LabelSet {
            regions: regions,
            medial_wall: medial_wall,
        })
    }


    /// The cortex label of a mesh with `num_vertices` vertices: everything except the medial wall.
    pub fn cortex(&self, num_vertices: usize) -> CortexLabel {
        CortexLabel::from_medial_wall(num_vertices, &self.medial_wall)
    }
}


/// A brain surface parcellation. The `vertex_labels` field contains one entry per mesh vertex, in order, and assigns
/// to each vertex a brain region via the `region_labels` field. Region `i` is named `region_names[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Parcellation {
    pub vertex_labels: Vec<i32>,
    pub region_names: Vec<String>,
    pub region_labels: Vec<i32>,
}

impl Parcellation {

    /// Get the region names contained in the [`Parcellation`].
    pub fn regions(&self) -> Vec<String> {
        self.region_names.clone()
    }


    pub fn num_regions(&self) -> usize {
        self.region_names.len()
    }


    /// Get the indices of all vertices which are part of the given brain region.
    ///
    /// Note that it can happen that no vertices are assigned to the region, in which case the result vector is empty.
    ///
    /// # Errors
    ///
    /// If the given `region` is not a valid region name for the [`Parcellation`].
    pub fn region_vertices(&self, region: &str) -> Result<Vec<usize>> {
        let region_idx = self.region_names.iter()
            .position(|x| x == region)
            .ok_or_else(|| CortexMeshError::NoSuchRegion(region.to_string()))?;
        let region_label = self.region_labels[region_idx];

        let region_verts: Vec<usize> = self.vertex_labels.iter()
            .enumerate()
            .filter(|(_, vlabel)| **vlabel == region_label)
            .map(|(idx, _)| idx)
            .collect();
        Ok(region_verts)
    }


    /// Group all vertices by region and split off the medial wall region, if any.
    ///
    /// Gifti and cifti label files name the medial wall [`UNKNOWN_REGION`], for annotations the caller has to name it.
    ///
    /// # Examples
    ///
    /// ```
    /// let parc = cortexmesh::Parcellation {
    ///     vertex_labels: vec![7, 3, 3, 7],
    ///     region_names: vec![String::from("???"), String::from("precuneus")],
    ///     region_labels: vec![7, 3],
    /// };
    /// let labels = parc.label_set(Some(cortexmesh::UNKNOWN_REGION)).unwrap();
    /// assert_eq!(vec![0, 3], labels.medial_wall);
    /// assert_eq!(vec![1, 2], labels.cortex(4).indices());
    /// ```
    pub fn label_set(&self, medial_wall_region: Option<&str>) -> Result<LabelSet> {
        let mut regions: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for name in self.region_names.iter() {
            regions.insert(name.clone(), self.region_vertices(name)?);
        }
        LabelSet::from_regions(regions, medial_wall_region)
    }
}


impl fmt::Display for Parcellation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Surface parcellation assigning {} vertices to {} brain regions.", self.vertex_labels.len(), self.region_names.len())
    }
}

//! A static k-d tree over 3D points for k-nearest-neighbor queries.
//!
//! The tree is implicit: building permutes an index array so that, for every sub-range, the median
//! element splits the range along the axis given by the depth. Queries return neighbors ordered by
//! distance, with equal distances ordered by point index, so results are deterministic.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::util::squared_distance;


#[derive(Debug, Clone)]
pub struct KdTree {
    points: Vec<[f32; 3]>,
    order: Vec<usize>,
}


/// A neighbor candidate during a query, ordered by squared distance first and index second.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    dist2: f32,
    index: usize,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dist2.total_cmp(&other.dist2).then(self.index.cmp(&other.index))
    }
}


impl KdTree {

    /// Build a tree over the given points. The points are copied.
    pub fn new(points: &[[f32; 3]]) -> KdTree {
        let mut order: Vec<usize> = (0..points.len()).collect();
        build(points, &mut order, 0);
        KdTree {
            points: points.to_vec(),
            order: order,
        }
    }


    pub fn len(&self) -> usize {
        self.points.len()
    }


    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }


    /// Find the `k` points nearest to `query`, nearest first, as `(point index, euclidean distance)` pairs.
    ///
    /// If the tree holds fewer than `k` points, all of them are returned.
    ///
    /// # Examples
    ///
    /// ```
    /// let tree = cortexmesh::KdTree::new(&[[0.0, 0.0, 0.0], [3.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
    /// let nn = tree.nearest(&[2.5, 0.0, 0.0], 2);
    /// assert_eq!(vec![1, 2], nn.iter().map(|(idx, _)| *idx).collect::<Vec<usize>>());
    /// ```
    pub fn nearest(&self, query: &[f32; 3], k: usize) -> Vec<(usize, f32)> {
        let k = k.min(self.points.len());
        if k == 0 {
            return Vec::new();
        }

        let mut heap: BinaryHeap<Candidate> = BinaryHeap::with_capacity(k + 1);
        self.search(query, k, 0, self.order.len(), 0, &mut heap);

        heap.into_sorted_vec()
            .into_iter()
            .map(|c| (c.index, c.dist2.sqrt()))
            .collect()
    }


    fn search(&self, query: &[f32; 3], k: usize, lo: usize, hi: usize, depth: usize, heap: &mut BinaryHeap<Candidate>) {
        if lo >= hi {
            return;
        }
        let mid = lo + (hi - lo) / 2;
        let index = self.order[mid];
        let point = &self.points[index];

        let candidate = Candidate { dist2: squared_distance(query, point), index: index };
        if heap.len() < k {
            heap.push(candidate);
        } else if heap.peek().map_or(false, |worst| candidate < *worst) {
            heap.pop();
            heap.push(candidate);
        }

        let axis = depth % 3;
        let diff = query[axis] - point[axis];
        let (near, far) = if diff < 0.0 { ((lo, mid), (mid + 1, hi)) } else { ((mid + 1, hi), (lo, mid)) };

        self.search(query, k, near.0, near.1, depth + 1, heap);

        // Points on the far side are at least |diff| away. Equal distances are still visited for the index tie-break.
        let visit_far = heap.len() < k || heap.peek().map_or(true, |worst| diff * diff <= worst.dist2);
        if visit_far {
            self.search(query, k, far.0, far.1, depth + 1, heap);
        }
    }
}


fn build(points: &[[f32; 3]], order: &mut [usize], depth: usize) {
    if order.len() <= 1 {
        return;
    }
    let axis = depth % 3;
    let mid = order.len() / 2;
    order.select_nth_unstable_by(mid, |a, b| points[*a][axis].total_cmp(&points[*b][axis]));

    let (left, right) = order.split_at_mut(mid);
    build(points, left, depth + 1);
    build(points, &mut right[1..], depth + 1);
}

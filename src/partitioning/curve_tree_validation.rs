//! Structural validation of a built curve tree.

use crate::bounding_volume::BoundingVolume;
use crate::partitioning::{CurveTree, Node};

impl CurveTree {
    /// Panics if any structural invariant of this tree is violated.
    ///
    /// Checks that every node is reachable from the root exactly once (the
    /// node array forms a finite tree), that interior bounds are exactly the
    /// union of their children's bounds, that leaf ranges partition the
    /// curve storage with no gaps or overlaps, and that the curve and key
    /// arrays are parallel.
    pub fn assert_well_formed(&self) {
        assert_eq!(self.curves.len(), self.keys.len());
        assert!(!self.nodes.is_empty(), "the tree has no root");

        let mut visited = vec![false; self.nodes.len()];
        let mut leaf_ranges = Vec::new();
        let mut stack = vec![0usize];

        while let Some(node) = stack.pop() {
            assert!(!visited[node], "node {} is referenced twice", node);
            visited[node] = true;

            match self.nodes[node] {
                Node::Leaf { first, count, .. } => {
                    leaf_ranges.push((first as usize, count as usize));
                }
                Node::Interior {
                    aabb, left, right, ..
                } => {
                    let left = left as usize;
                    let right = right as usize;
                    assert!(left < self.nodes.len() && right < self.nodes.len());

                    // Exact componentwise equality, not approximate
                    // containment: the interior box must be the min/max
                    // union of its children.
                    let merged = self.nodes[left].aabb().merged(&self.nodes[right].aabb());
                    assert_eq!(
                        aabb, merged,
                        "interior node {} does not bound its children exactly",
                        node
                    );

                    stack.push(left);
                    stack.push(right);
                }
            }
        }

        assert!(
            visited.iter().all(|v| *v),
            "the tree contains unreachable nodes"
        );

        // Leaf ranges must partition [0, curve_count) exactly.
        leaf_ranges.sort_unstable();
        let mut next = 0;
        for (first, count) in &leaf_ranges {
            assert_eq!(*first, next, "leaf ranges have a gap or an overlap");
            next = first + count;
        }
        assert_eq!(next, self.curves.len(), "leaf ranges do not cover all curves");
    }
}

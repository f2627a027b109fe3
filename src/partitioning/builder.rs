//! Top-down tree construction over an abstract partitioner.

use crate::bounding_volume::Aabb;
use core::ops::Range;
use smallvec::SmallVec;

/// A node of the curve tree.
///
/// Leaves reference a contiguous range of item indices; after the final
/// reordering pass these are direct indices into the tree's curve storage.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Node {
    /// A node with two children and the bounding box of everything below it.
    Interior {
        /// Bounding box of both subtrees.
        aabb: Aabb,
        /// Index of the left child; the right child is always at `left + 1`.
        left: u32,
        /// Index of the right child.
        right: u32,
    },
    /// A terminal node covering the item range `first..first + count`.
    Leaf {
        /// Bounding box of the contained items.
        aabb: Aabb,
        /// First item index covered by this leaf.
        first: u32,
        /// Number of items covered by this leaf. Zero only for the root of
        /// an empty tree.
        count: u32,
    },
}

impl Node {
    /// The bounding box of this node.
    #[inline]
    pub fn aabb(&self) -> Aabb {
        match self {
            Node::Interior { aabb, .. } | Node::Leaf { aabb, .. } => *aabb,
        }
    }

    /// Is this node a leaf?
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

/// The queries the tree builder makes against a splitting strategy.
///
/// A partitioner owns the per-item bounding boxes and the master item
/// ordering; each [`Partitioner::partition`] call refines the ordering so
/// that, once the build completes, [`Partitioner::item_ordering`] maps final
/// item positions back to original item indices.
pub trait Partitioner {
    /// The total number of items being partitioned.
    fn item_count(&self) -> usize;

    /// The bounding box of the items currently ordered inside `range`.
    fn compute_bbox(&self, range: Range<usize>) -> Aabb;

    /// Either splits `range` into `range.start..mid` and `mid..range.end`,
    /// returning `mid`, or returns `None` when the range should become a
    /// leaf. A returned `mid` always lies strictly inside the range.
    fn partition(&mut self, range: Range<usize>) -> Option<usize>;

    /// The permutation accumulated by the partitioning calls so far:
    /// `item_ordering()[position] == original index`.
    fn item_ordering(&self) -> &[usize];
}

/// Builds the node hierarchy by driving a [`Partitioner`] top-down.
pub struct Builder;

// Frames held inline before the work list spills to the heap. Balanced trees
// need about log2(n) live frames so this covers any realistic input.
const BUILD_STACK_DEPTH: usize = 64;

#[derive(Copy, Clone, Debug)]
struct BuildFrame {
    node: usize,
    start: usize,
    end: usize,
}

impl Builder {
    /// Builds the tree, returning its nodes with the root at index 0.
    ///
    /// The build uses an explicit work list instead of call-stack recursion:
    /// a pathologically skewed input can drive the tree depth up to the item
    /// count, which must not overflow the thread stack.
    pub fn build<P: Partitioner>(&self, partitioner: &mut P) -> Vec<Node> {
        let item_count = partitioner.item_count();
        let mut nodes = Vec::new();
        let mut stack: SmallVec<[BuildFrame; BUILD_STACK_DEPTH]> = SmallVec::new();

        nodes.push(Node::Leaf {
            aabb: Aabb::new_invalid(),
            first: 0,
            count: 0,
        });
        stack.push(BuildFrame {
            node: 0,
            start: 0,
            end: item_count,
        });

        while let Some(frame) = stack.pop() {
            let aabb = partitioner.compute_bbox(frame.start..frame.end);

            match partitioner.partition(frame.start..frame.end) {
                None => {
                    nodes[frame.node] = Node::Leaf {
                        aabb,
                        first: frame.start as u32,
                        count: (frame.end - frame.start) as u32,
                    };
                }
                Some(mid) => {
                    debug_assert!(frame.start < mid && mid < frame.end);

                    // The children are allocated next to each other; their
                    // contents are filled in when their frames are popped.
                    let left = nodes.len();
                    let right = left + 1;
                    nodes.push(Node::Leaf {
                        aabb: Aabb::new_invalid(),
                        first: 0,
                        count: 0,
                    });
                    nodes.push(Node::Leaf {
                        aabb: Aabb::new_invalid(),
                        first: 0,
                        count: 0,
                    });
                    nodes[frame.node] = Node::Interior {
                        aabb,
                        left: left as u32,
                        right: right as u32,
                    };

                    // Left pushed last so it is processed first, giving a
                    // deterministic depth-first node layout.
                    stack.push(BuildFrame {
                        node: right,
                        start: mid,
                        end: frame.end,
                    });
                    stack.push(BuildFrame {
                        node: left,
                        start: frame.start,
                        end: mid,
                    });
                }
            }
        }

        nodes
    }
}

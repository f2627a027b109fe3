//! Surface-area-heuristic partitioning of item bounding boxes.

use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::math::Real;
use crate::partitioning::Partitioner;
use core::ops::Range;
use ordered_float::OrderedFloat;

// After "On fast Construction of SAH-based Bounding Volume Hierarchies",
// Wald. The epsilon keeps the largest centroid from mapping to NUM_BINS.
const NUM_BINS: usize = 16;
const BIN_EPSILON: Real = 1.0e-5;

#[derive(Copy, Clone, Debug)]
struct Bin {
    aabb: Aabb,
    item_count: usize,
}

impl Default for Bin {
    fn default() -> Self {
        Self {
            aabb: Aabb::new_invalid(),
            item_count: 0,
        }
    }
}

/// Partitions item index ranges by minimizing the surface-area-heuristic
/// cost of the resulting split.
///
/// The partitioner owns the item bounding boxes and the master item
/// ordering. Every [`Partitioner::partition`] call permutes a sub-range of
/// the ordering in place; the final permutation is the contract result
/// consumed by the storage reordering pass.
///
/// All decisions are deterministic: candidate planes are compared under a
/// total order on costs and ties keep the lowest plane, while partitioning
/// itself is stable with respect to the current ordering.
pub struct SahPartitioner {
    aabbs: Vec<Aabb>,
    ordering: Vec<usize>,
    scratch: Vec<usize>,
    max_leaf_size: usize,
    traversal_cost: Real,
    intersection_cost: Real,
}

impl SahPartitioner {
    /// Creates a partitioner over the given per-item bounding boxes.
    ///
    /// `traversal_cost` is the estimated cost of visiting one interior node
    /// and `intersection_cost` the estimated cost of one ray/item
    /// intersection test, in the same arbitrary unit.
    pub fn new(
        aabbs: Vec<Aabb>,
        max_leaf_size: usize,
        traversal_cost: Real,
        intersection_cost: Real,
    ) -> Self {
        let ordering = (0..aabbs.len()).collect();
        Self {
            aabbs,
            ordering,
            scratch: Vec::new(),
            max_leaf_size: max_leaf_size.max(1),
            traversal_cost,
            intersection_cost,
        }
    }

    fn aabb_at(&self, position: usize) -> &Aabb {
        &self.aabbs[self.ordering[position]]
    }

    // Splits `range` by the bin plane `best_plane`, keeping the relative
    // order inside each half, and returns the split position.
    fn partition_by_bin(
        &mut self,
        range: Range<usize>,
        bins_axis: usize,
        k0: Real,
        k1: Real,
        best_plane: usize,
    ) -> usize {
        self.scratch.clear();
        let mut write = range.start;

        for read in range.clone() {
            let item = self.ordering[read];
            let center = self.aabbs[item].center();
            let bin_id = bin_index(k1, k0, center[bins_axis]);
            if bin_id <= best_plane {
                self.ordering[write] = item;
                write += 1;
            } else {
                self.scratch.push(item);
            }
        }

        self.ordering[write..range.end].copy_from_slice(&self.scratch);
        write
    }
}

#[inline]
fn bin_index(k1: Real, k0: Real, center: Real) -> usize {
    ((k1 * (center - k0)) as usize).min(NUM_BINS - 1)
}

impl Partitioner for SahPartitioner {
    fn item_count(&self) -> usize {
        self.aabbs.len()
    }

    fn compute_bbox(&self, range: Range<usize>) -> Aabb {
        let mut aabb = Aabb::new_invalid();
        for position in range {
            aabb.merge(self.aabb_at(position));
        }
        aabb
    }

    fn partition(&mut self, range: Range<usize>) -> Option<usize> {
        let count = range.len();
        if count <= 1 {
            return None;
        }

        // Bin along the dominant axis of the centroid bounds.
        let centroid_aabb =
            Aabb::from_points(range.clone().map(|position| self.aabb_at(position).center()));
        let bins_axis = centroid_aabb.extents().imax();
        let bins_extent = centroid_aabb.extents()[bins_axis];

        if bins_extent <= 0.0 {
            // All centroids coincide: no plane can discriminate the items.
            // Split in two halves when the leaf bound forces a split.
            return (count > self.max_leaf_size).then(|| range.start + count / 2);
        }

        let k0 = centroid_aabb.mins[bins_axis];
        let k1 = NUM_BINS as Real * (1.0 - BIN_EPSILON) / bins_extent;

        let mut bins = [Bin::default(); NUM_BINS];
        for position in range.clone() {
            let aabb = *self.aabb_at(position);
            let bin = &mut bins[bin_index(k1, k0, aabb.center()[bins_axis])];
            bin.aabb.merge(&aabb);
            bin.item_count += 1;
        }

        // Suffix-merge the bins so that `right_merges[i]` bounds everything
        // at plane `i` or beyond.
        let mut right_merges = bins;
        for i in (0..NUM_BINS - 1).rev() {
            right_merges[i].aabb = right_merges[i].aabb.merged(&right_merges[i + 1].aabb);
            right_merges[i].item_count += right_merges[i + 1].item_count;
        }

        // Sweep the NUM_BINS - 1 candidate planes left to right; the first
        // minimum wins so ties resolve to the lowest plane.
        let parent_area = right_merges[0].aabb.half_area();
        let mut best: Option<(OrderedFloat<Real>, usize, usize)> = None;
        let mut left_merge = Bin::default();

        for plane in 0..NUM_BINS - 1 {
            left_merge.aabb.merge(&bins[plane].aabb);
            left_merge.item_count += bins[plane].item_count;
            let right = &right_merges[plane + 1];

            if left_merge.item_count == 0 || right.item_count == 0 {
                continue;
            }

            let split_cost = self.traversal_cost
                + (left_merge.aabb.half_area() * left_merge.item_count as Real
                    + right.aabb.half_area() * right.item_count as Real)
                    / parent_area
                    * self.intersection_cost;

            let candidate = (OrderedFloat(split_cost), plane, left_merge.item_count);
            if best.map_or(true, |b| candidate.0 < b.0) {
                best = Some(candidate);
            }
        }

        match best {
            Some((split_cost, best_plane, left_count)) => {
                let leaf_cost = self.intersection_cost * count as Real;
                if count <= self.max_leaf_size && OrderedFloat(leaf_cost) <= split_cost {
                    return None;
                }

                let mid = self.partition_by_bin(range.clone(), bins_axis, k0, k1, best_plane);
                debug_assert_eq!(mid, range.start + left_count);
                Some(mid)
            }
            // Every item landed in one bin despite a nonzero centroid
            // extent; fall back to a median split like the degenerate-bin
            // path of binned builders.
            None => (count > self.max_leaf_size).then(|| range.start + count / 2),
        }
    }

    fn item_ordering(&self) -> &[usize] {
        &self.ordering
    }
}

#[cfg(test)]
mod test {
    use super::SahPartitioner;
    use crate::bounding_volume::Aabb;
    use crate::math::{Point, Real, Vector};
    use crate::partitioning::Partitioner;

    fn unit_aabb_at(x: Real, y: Real, z: Real) -> Aabb {
        let center = Point::new(x, y, z);
        Aabb::new(
            center - Vector::repeat(0.5),
            center + Vector::repeat(0.5),
        )
    }

    fn row(n: usize) -> Vec<Aabb> {
        (0..n).map(|i| unit_aabb_at(i as Real * 2.0, 0.0, 0.0)).collect()
    }

    #[test]
    fn ordering_starts_as_identity() {
        let partitioner = SahPartitioner::new(row(8), 4, 1.0, 1.0);
        assert_eq!(partitioner.item_ordering(), (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn partition_splits_along_the_dominant_axis() {
        let mut partitioner = SahPartitioner::new(row(16), 4, 1.0, 1.0);
        let mid = partitioner.partition(0..16).unwrap();
        assert!(0 < mid && mid < 16);

        // Every item left of the split must be left of every item on the
        // right along x.
        let max_left = (0..mid)
            .map(|p| partitioner.aabb_at(p).center().x)
            .fold(Real::MIN, Real::max);
        let min_right = (mid..16)
            .map(|p| partitioner.aabb_at(p).center().x)
            .fold(Real::MAX, Real::min);
        assert!(max_left < min_right);
    }

    #[test]
    fn partition_is_a_permutation() {
        let mut partitioner = SahPartitioner::new(row(33), 2, 1.0, 1.0);
        let mid = partitioner.partition(0..33).unwrap();
        let _ = partitioner.partition(0..mid);
        let _ = partitioner.partition(mid..33);

        let mut seen = partitioner.item_ordering().to_vec();
        seen.sort_unstable();
        assert_eq!(seen, (0..33).collect::<Vec<_>>());
    }

    #[test]
    fn small_cheap_ranges_become_leaves() {
        let mut partitioner = SahPartitioner::new(row(3), 4, 10.0, 1.0);
        assert_eq!(partitioner.partition(0..3), None);
    }

    #[test]
    fn oversized_ranges_always_split() {
        // All centroids coincide, yet the range exceeds the leaf bound.
        let aabbs = vec![unit_aabb_at(0.0, 0.0, 0.0); 9];
        let mut partitioner = SahPartitioner::new(aabbs, 4, 1.0, 1.0);
        assert_eq!(partitioner.partition(0..9), Some(4));
    }

    #[test]
    fn coincident_centroids_within_leaf_bound_become_a_leaf() {
        let aabbs = vec![unit_aabb_at(0.0, 0.0, 0.0); 3];
        let mut partitioner = SahPartitioner::new(aabbs, 4, 1.0, 1.0);
        assert_eq!(partitioner.partition(0..3), None);
    }

    #[test]
    fn partitioning_is_deterministic() {
        let run = || {
            let mut partitioner = SahPartitioner::new(row(64), 4, 1.0, 10.0);
            let mid = partitioner.partition(0..64).unwrap();
            let _ = partitioner.partition(0..mid);
            let _ = partitioner.partition(mid..64);
            partitioner.item_ordering().to_vec()
        };
        assert_eq!(run(), run());
    }
}

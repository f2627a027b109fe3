//! The curve tree: a BVH over the curves of one assembly.

use crate::bounding_volume::Aabb;
use crate::math::Real;
use crate::partitioning::{Builder, CurveKey, Node, Partitioner, SahPartitioner};
use crate::scene::{Assembly, CurveObject, ParamError};
use crate::shape::Curve;
use crate::utils::{reordered, Statistics};
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Default maximum number of curves per leaf.
pub const DEFAULT_MAX_LEAF_SIZE: usize = 5;
/// Default estimated cost of traversing one interior node.
pub const DEFAULT_NODE_TRAVERSAL_COST: Real = 1.0;
/// Default estimated cost of one ray/curve intersection test.
pub const DEFAULT_CURVE_INTERSECTION_COST: Real = 10.0;

/// Error produced when a curve tree cannot be built.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum CurveTreeBuildError {
    /// The selected acceleration structure algorithm is not implemented.
    #[error("the \"{0}\" acceleration structure algorithm is not implemented.")]
    UnsupportedAlgorithm(String),
    /// A build parameter failed validation.
    #[error(transparent)]
    InvalidParameter(#[from] ParamError),
}

/// The set of inputs of a curve tree build.
///
/// Read-only: the builder never mutates the assembly it is handed.
pub struct CurveTreeArguments<'a> {
    assembly: &'a Assembly,
    tree_uid: u64,
}

impl<'a> CurveTreeArguments<'a> {
    /// Creates build arguments for the curves of `assembly`.
    pub fn new(assembly: &'a Assembly, tree_uid: u64) -> Self {
        Self { assembly, tree_uid }
    }
}

/// Extracts the curves of `assembly` together with their provenance keys.
///
/// Object instances are visited in order and only those whose object model
/// is [`CurveObject::MODEL`] contribute; every other model is skipped
/// without error, so an assembly without curves simply yields empty output.
/// Curves are mapped into assembly space by their instance transform. The
/// two returned sequences are parallel: one key per curve, in (instance,
/// curve) iteration order.
pub fn collect_curves(assembly: &Assembly) -> (Vec<Curve>, Vec<CurveKey>) {
    let mut curves = Vec::new();
    let mut keys = Vec::new();

    for (instance_index, instance) in assembly.object_instances().iter().enumerate() {
        let object = instance.object();
        if object.model() != CurveObject::MODEL {
            continue;
        }
        let Some(curve_object) = object.downcast_ref::<CurveObject>() else {
            continue;
        };

        for curve_index in 0..curve_object.curve_count() {
            curves.push(curve_object.curve(curve_index).transformed(instance.transform()));
            keys.push(CurveKey::new(
                instance_index as u32,
                curve_index as u32,
                // All curves share one material for now.
                0,
            ));
        }
    }

    (curves, keys)
}

/// A BVH over the curve primitives of one assembly.
///
/// The tree owns its node array and the reordered curve/key storage. It is
/// immutable once built: traversal code may freely share it across threads.
#[derive(Debug)]
pub struct CurveTree {
    pub(super) nodes: Vec<Node>,
    pub(super) curves: Vec<Curve>,
    pub(super) keys: Vec<CurveKey>,
}

impl CurveTree {
    /// The nodes of this tree, with the root at index 0.
    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The curves of this tree, in leaf-traversal order.
    #[inline]
    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }

    /// The curve keys of this tree, parallel to [`CurveTree::curves`].
    #[inline]
    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }

    /// The number of nodes of this tree.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The bounding box of every curve of this tree.
    ///
    /// Invalid (inverted) when the tree contains no curve.
    #[inline]
    pub fn root_aabb(&self) -> Aabb {
        self.nodes[0].aabb()
    }

    /// The depth of this tree. A single-leaf tree has depth 1.
    pub fn max_depth(&self) -> usize {
        self.per_level_curve_counts().len()
    }

    /// The number of curves referenced by leaves at each depth, starting at
    /// the root level.
    pub fn per_level_curve_counts(&self) -> Vec<u64> {
        let mut counts = Vec::new();
        let mut stack = vec![(0usize, 0usize)];

        while let Some((node, depth)) = stack.pop() {
            if counts.len() <= depth {
                counts.resize(depth + 1, 0);
            }

            match self.nodes[node] {
                Node::Leaf { count, .. } => counts[depth] += count as u64,
                Node::Interior { left, right, .. } => {
                    stack.push((left as usize, depth + 1));
                    stack.push((right as usize, depth + 1));
                }
            }
        }

        counts
    }
}

/// Builds [`CurveTree`]s from build arguments.
pub struct CurveTreeFactory<'a> {
    arguments: CurveTreeArguments<'a>,
}

impl<'a> CurveTreeFactory<'a> {
    /// Creates a factory for the given build arguments.
    pub fn new(arguments: CurveTreeArguments<'a>) -> Self {
        Self { arguments }
    }

    /// Runs the full build pipeline: collect, bound, partition, build,
    /// reorder.
    ///
    /// Reads the `algorithm` and `time` parameters from the assembly, then
    /// reports build statistics at debug level. The only failure modes are
    /// configuration errors: an unknown `algorithm` value fails choice
    /// validation, and a recognized-but-unimplemented one (like `"sbvh"`)
    /// fails loudly instead of silently falling back to `"bvh"`.
    pub fn create(&self) -> Result<CurveTree, CurveTreeBuildError> {
        let assembly = self.arguments.assembly;
        let params = assembly.params();
        let algorithm = params.get_optional_enum("algorithm", "bvh", &["bvh", "sbvh"])?;
        let time = params.get_optional("time", 0.5);

        let start_time = Instant::now();
        let mut statistics =
            Statistics::new(format!("curve tree #{} statistics", self.arguments.tree_uid));

        let tree = match algorithm.as_str() {
            "bvh" => build_bvh(assembly, &mut statistics),
            other => return Err(CurveTreeBuildError::UnsupportedAlgorithm(other.to_string())),
        };

        statistics.insert_count("nodes", tree.node_count() as u64);
        statistics.insert_size("nodes alignment", alignment(tree.nodes.as_ptr()));
        statistics.insert_count("max depth", tree.max_depth() as u64);
        for (depth, count) in tree.per_level_curve_counts().iter().enumerate() {
            if *count > 0 {
                statistics.insert_count(format!("level {} curves", depth), *count);
            }
        }
        statistics.insert_scalar("motion time", time);
        statistics.insert_time("total time", start_time.elapsed());
        statistics.report(log::Level::Debug);

        Ok(tree)
    }
}

fn build_bvh(assembly: &Assembly, statistics: &mut Statistics) -> CurveTree {
    // Collect the curves and curve keys from the assembly.
    let (curves, keys) = collect_curves(assembly);
    debug_assert_eq!(curves.len(), keys.len());
    statistics.insert_count("curves", curves.len() as u64);

    // Bounding boxes of the individual curves. Discarded once the ordering
    // is known.
    #[cfg(not(feature = "parallel"))]
    let aabbs: Vec<Aabb> = curves.iter().map(|curve| curve.local_aabb()).collect();
    #[cfg(feature = "parallel")]
    let aabbs: Vec<Aabb> = curves.par_iter().map(|curve| curve.local_aabb()).collect();

    let degenerate_count = aabbs.iter().filter(|aabb| aabb.volume() <= 0.0).count();
    if degenerate_count > 0 {
        log::warn!(
            "assembly \"{}\" contains {} degenerate curve(s), bounded by zero-volume boxes",
            assembly.name(),
            degenerate_count
        );
    }

    let mut partitioner = SahPartitioner::new(
        aabbs,
        DEFAULT_MAX_LEAF_SIZE,
        DEFAULT_NODE_TRAVERSAL_COST,
        DEFAULT_CURVE_INTERSECTION_COST,
    );
    let nodes = Builder.build(&mut partitioner);

    // Reorder the curves and keys to match the leaf-traversal order chosen
    // by the partitioner.
    let (curves, keys) = if curves.len() > 1 {
        let ordering = partitioner.item_ordering();
        (reordered(&curves, ordering), reordered(&keys, ordering))
    } else {
        (curves, keys)
    };

    CurveTree {
        nodes,
        curves,
        keys,
    }
}

// The largest power of two dividing the node storage address.
fn alignment<T>(ptr: *const T) -> usize {
    let address = ptr as usize;
    1 << address.trailing_zeros().min(12)
}

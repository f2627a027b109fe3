//! Spatial partitioning of curve primitives.

pub use self::builder::{Builder, Node, Partitioner};
pub use self::curve_key::CurveKey;
pub use self::curve_tree::{
    collect_curves, CurveTree, CurveTreeArguments, CurveTreeBuildError, CurveTreeFactory,
    DEFAULT_CURVE_INTERSECTION_COST, DEFAULT_MAX_LEAF_SIZE, DEFAULT_NODE_TRAVERSAL_COST,
};
pub use self::sah::SahPartitioner;

mod builder;
mod curve_key;
mod curve_tree;
mod curve_tree_validation;
mod sah;

#[cfg(test)]
mod curve_tree_tests;

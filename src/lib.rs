/*!
strandtree
==========

**strandtree** is a bounding-volume-hierarchy (BVH) acceleration structure
for ray-traced hair and fur. It extracts curve primitives from a scene
assembly, partitions them with the surface-area heuristic, and lays out the
resulting tree and its curve storage in leaf-traversal order for
cache-friendly intersection queries.

*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![deny(unused_results)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(missing_copy_implementations)]
#![allow(clippy::module_inception)]
#![allow(clippy::manual_range_contains)]

extern crate nalgebra as na;

pub mod bounding_volume;
pub mod math;
pub mod partitioning;
pub mod scene;
pub mod shape;
pub mod utils;

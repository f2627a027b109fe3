//! Linear algebra type aliases.

/// The scalar type used throughout this crate.
///
/// Curve trees are built in double precision: hair assemblies routinely sit
/// far from the world origin and single precision loses too many bits there.
pub type Real = f64;

/// The dimension of the ambient space.
pub const DIM: usize = 3;

/// The point type.
pub type Point<N> = na::Point3<N>;

/// The vector type.
pub type Vector<N> = na::Vector3<N>;

/// The transformation type mapping object space to assembly space.
pub type Isometry<N> = na::Isometry3<N>;

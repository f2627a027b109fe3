//! Provenance key attached to each collected curve.

/// Identifies where a curve stored in a [`CurveTree`](crate::partitioning::CurveTree)
/// came from.
///
/// Keys form an array parallel to the curve storage: the curve and the key
/// at the same position always originate from the same source curve, before
/// and after the cache-locality reordering.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CurveKey {
    object_instance_index: u32,
    curve_index: u32,
    material_index: u32,
}

impl CurveKey {
    /// Creates a new curve key.
    pub fn new(object_instance_index: u32, curve_index: u32, material_index: u32) -> Self {
        Self {
            object_instance_index,
            curve_index,
            material_index,
        }
    }

    /// Index of the object instance the curve was collected from.
    #[inline]
    pub fn object_instance_index(&self) -> u32 {
        self.object_instance_index
    }

    /// Index of the curve inside its source object.
    #[inline]
    pub fn curve_index(&self) -> u32 {
        self.curve_index
    }

    /// Index of the curve's material.
    ///
    /// Currently always 0: all curves are assumed to share a single
    /// material. Known limitation, kept until per-curve material
    /// assignments exist scene-side.
    #[inline]
    pub fn material_index(&self) -> u32 {
        self.material_index
    }
}

//! The assembly accessor consumed by the curve tree build.
//!
//! Only the surface the acceleration structure needs is modeled here:
//! enumerable object instances, a model tag per geometric object, and curve
//! accessors for curve-bearing objects. Everything else about the scene
//! graph lives outside this crate.

use crate::math::{Isometry, Real};
use crate::scene::ParamSet;
use crate::shape::Curve;
use downcast_rs::{impl_downcast, DowncastSync};
use std::sync::Arc;

/// A geometric object referenced by one or more object instances.
///
/// Objects are type-tagged by their model string; the curve tree build only
/// processes objects whose model is [`CurveObject::MODEL`] and skips every
/// other model without error.
pub trait Object: DowncastSync {
    /// The model identifier of this object.
    fn model(&self) -> &str;
}

impl_downcast!(sync Object);

/// An object shared between multiple object instances.
pub type SharedObject = Arc<dyn Object>;

/// A collection of Bézier curves sharing one material.
pub struct CurveObject {
    curves: Vec<Curve>,
}

impl CurveObject {
    /// The model identifier of curve objects.
    pub const MODEL: &'static str = "curve_object";

    /// Creates a curve object from a set of curves.
    pub fn new(curves: Vec<Curve>) -> Self {
        Self { curves }
    }

    /// The number of curves in this object.
    #[inline]
    pub fn curve_count(&self) -> usize {
        self.curves.len()
    }

    /// The `i`-th curve of this object.
    #[inline]
    pub fn curve(&self, i: usize) -> &Curve {
        &self.curves[i]
    }
}

impl Object for CurveObject {
    fn model(&self) -> &str {
        Self::MODEL
    }
}

/// The instantiation of an object inside an assembly.
pub struct ObjectInstance {
    object: SharedObject,
    transform: Isometry<Real>,
}

impl ObjectInstance {
    /// Instantiates `object` with the given object-to-assembly transform.
    pub fn new(object: SharedObject, transform: Isometry<Real>) -> Self {
        Self { object, transform }
    }

    /// The object referenced by this instance.
    #[inline]
    pub fn object(&self) -> &dyn Object {
        &*self.object
    }

    /// The transform mapping the object space to the assembly space.
    #[inline]
    pub fn transform(&self) -> &Isometry<Real> {
        &self.transform
    }
}

/// A named, ordered collection of object instances.
pub struct Assembly {
    name: String,
    instances: Vec<ObjectInstance>,
    params: ParamSet,
}

impl Assembly {
    /// Creates an empty assembly.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instances: Vec::new(),
            params: ParamSet::new(),
        }
    }

    /// The name of this assembly, used in diagnostics.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Appends an object instance to this assembly.
    pub fn push_instance(&mut self, instance: ObjectInstance) {
        self.instances.push(instance);
    }

    /// The object instances of this assembly, in insertion order.
    #[inline]
    pub fn object_instances(&self) -> &[ObjectInstance] {
        &self.instances
    }

    /// The parameters attached to this assembly.
    #[inline]
    pub fn params(&self) -> &ParamSet {
        &self.params
    }

    /// Mutable access to the parameters attached to this assembly.
    #[inline]
    pub fn params_mut(&mut self) -> &mut ParamSet {
        &mut self.params
    }
}

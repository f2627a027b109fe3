//! Geometric primitives.

pub use self::curve::{Curve, CurveCreationError, MAX_CONTROL_POINTS};

mod curve;

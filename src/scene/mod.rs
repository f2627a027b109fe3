//! Scene description collaborators: assemblies, object instances, parameters.

pub use self::assembly::{Assembly, CurveObject, Object, ObjectInstance, SharedObject};
pub use self::params::{ParamError, ParamSet};

mod assembly;
mod params;

//! Various small utilities.

pub use self::reorder::reordered;
pub use self::statistics::{StatValue, Statistics};

mod reorder;
mod statistics;

//! Math module - vectors, quaternions, and ray queries
//!
//! Hand-rolled 3D math for placement geometry. Everything here is plain
//! data with serde derives so poses can go straight into level files.

mod quat;
mod ray;
mod vec;

pub use quat::*;
pub use ray::*;
pub use vec::*;

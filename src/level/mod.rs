//! Level persistence - saving and restoring placed scenes
//!
//! A saved level is a flat snapshot: parallel lists of type ids, positions,
//! and rotations, written as human-readable RON. Loading resolves ids back
//! against the catalog and replays each entry through the commit path.

mod codec;
mod snapshot;

pub use codec::*;
pub use snapshot::*;

//! Catalog module - the set of placeable types available in a session
//!
//! Types are defined in RON files under a content directory and discovered
//! at startup. Each carries a stable integer id (the persistence key) and
//! its connector anchors. The catalog is read-only during a placement
//! session except via explicit refresh.

mod anchor;
mod library;
mod placeable;

pub use anchor::*;
pub use library::*;
pub use placeable::*;

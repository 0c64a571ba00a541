//! Fast hash collections used across the engine.

pub use rustc_hash::{FxHashMap, FxHashSet};

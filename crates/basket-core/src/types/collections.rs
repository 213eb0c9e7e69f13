//! Hash collections used throughout the engine.
//!
//! FxHash is not DoS-resistant, which is fine for item ids and itemsets built
//! from a single upload. Iteration order is never relied on for output.

pub use rustc_hash::{FxHashMap, FxHashSet};

//! Shared types used across basket crates.

pub mod collections;
pub mod identifiers;
pub mod interning;
pub mod state;

pub use identifiers::ItemId;
pub use interning::{normalize_item, ItemInterner};
pub use state::EngineState;

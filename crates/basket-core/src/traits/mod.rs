//! Shared traits used across basket crates.

pub mod cancellation;

pub use cancellation::CancellationToken;

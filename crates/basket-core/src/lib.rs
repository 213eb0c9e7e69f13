//! # basket-core
//!
//! Foundation crate for the basket analysis engine.
//! Defines shared types, errors, config, events, cancellation, and tracing setup.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod errors;
pub mod events;
pub mod tracing;
pub mod traits;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::BasketConfig;
pub use errors::error_code::BasketErrorCode;
pub use errors::{AnalysisError, ConfigError, ExportError, ParseError};
pub use events::dispatcher::EventDispatcher;
pub use events::handler::AnalysisEventHandler;
pub use traits::CancellationToken;
pub use types::collections::{FxHashMap, FxHashSet};
pub use types::identifiers::ItemId;
pub use types::state::EngineState;

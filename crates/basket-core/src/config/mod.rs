//! Configuration: one struct per subsystem, aggregated by `BasketConfig`.

pub mod basket_config;
pub mod log_config;
pub mod mining_config;
pub mod output_config;
pub mod parse_config;

pub use basket_config::BasketConfig;
pub use log_config::{LogConfig, LogFormat};
pub use mining_config::MiningConfig;
pub use output_config::{OutputConfig, OutputFormat};
pub use parse_config::{ParseConfig, TransactionLayout};

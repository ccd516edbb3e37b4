/// TOML configuration and environment resolution.
pub mod config;

pub use config::{ConfigError, HandoffConfig};

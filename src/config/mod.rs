//! TOML configuration.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{
    CommandConfig, Config, ExecutorSection, LoggingConfig, PersistenceConfig, UiConfig,
};

//! Configuration module
//!
//! Layered configuration loading (TOML file + environment variables) and the
//! typed settings consumed by the rest of the application, including the
//! board allow-list and its provenance.

pub mod loader;
pub mod types;

pub use loader::{load_config, load_config_from_str};
pub use types::{
    AccessControlConfig, AppConfig, LogFormat, LoggingConfig, PolicyProvenance, ServerConfig,
    TransportMode, TrelloConfig,
};

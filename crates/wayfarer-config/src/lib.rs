//! Configuration for the wayfarer random-teleport service.
//!
//! Settings persist to disk as a RON file, can be overridden from the command
//! line via clap, and support change detection on reload.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE_NAME, CenterConfig, Config, DebugConfig, TeleportConfig, TerrainConfig,
    WorldRangeConfig, default_config_dir,
};
pub use error::ConfigError;

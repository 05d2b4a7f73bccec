//! Configuration for the terrain viewer.
//!
//! Settings persist to disk as a RON file, can be overridden from the command
//! line, and tolerate missing or unknown fields so older and newer files both
//! load.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE_NAME, ClockConfig, Config, DebugConfig, ObserverConfig, WindowConfig,
    default_config_dir,
};
pub use error::ConfigError;

//! JSON configuration for the command-line tools.

pub mod match3d;

pub use match3d::{load_config, OutputConfig, RuntimeConfig};

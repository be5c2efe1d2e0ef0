//! Configuration file loading for tnm-quorum
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./tnm-quorum.toml` or `./.tnm-quorum.toml`
//! 3. XDG config: `$XDG_CONFIG_HOME/tnm-quorum/config.toml`
//! 4. Default values

mod file_config;
mod loader;

pub use file_config::{ConfigValidationError, FileBatchConfig, FileConfig, FileOutputConfig};
pub use loader::ConfigLoader;

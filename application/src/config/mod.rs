//! Application-level configuration.
//!
//! - [`StagingConfig`]: weights and evidence lexicon for the core pipeline
//! - [`BatchParams`]: concurrency control for batch runs

pub mod batch_params;
pub mod staging_config;

pub use batch_params::BatchParams;
pub use staging_config::StagingConfig;

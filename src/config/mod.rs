//! Configuration model for clairscan.
//!
//! This module defines the Config struct that represents `clairscan.yaml`.
//! It supports forward-compatible YAML parsing (unknown fields are ignored),
//! sensible defaults for every field, and validation of config values.

mod model;
mod operations;
pub mod types;


// Re-export public API
pub use model::Config;
pub use types::{BinarySpec, ServiceSpec, Severity};

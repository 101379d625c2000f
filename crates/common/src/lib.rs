//! Shared configuration and logging for modelir hosts
//!
//! This crate holds the pieces every host of `modelir-core` needs before it
//! can run a normalization pass: a validated, immutable [`GeneratorConfig`]
//! and the tracing bootstrap.

pub mod config;
pub mod logging;

// Re-export commonly used types
pub use config::{ConfigError, GeneratorConfig, NamingConvention, PathDialect, TargetProfile};
pub use logging::init_tracing;

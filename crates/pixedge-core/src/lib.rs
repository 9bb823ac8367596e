//! Pixedge Core Library
//!
//! This crate provides the domain models, error types and configuration shared
//! by the edge dispatcher and the client composer.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    ActionKind, ActionMode, ActionOption, ActionParam, OutputFormat, ProcessingConfig,
    ProviderAction, ProviderActionList, WatermarkParam,
};

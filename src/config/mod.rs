//! Configuration loading and management for the Result Engine.
//!
//! This module loads institution metadata and per-department grading
//! schemes from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use result_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Loaded institution: {}", config.institution().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{BulkAdjustmentSettings, InstitutionConfig, InstitutionMetadata};

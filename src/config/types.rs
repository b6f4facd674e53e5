//! Configuration types for result computation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

use crate::models::GradingScheme;

/// Metadata about the institution, from `institution.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct InstitutionMetadata {
    /// Short institution code (e.g., "CHST").
    pub code: String,
    /// The human-readable name of the institution.
    pub name: String,
    /// The pass mark. Must equal the engine's fixed pass mark.
    pub pass_mark: Decimal,
    /// Bulk adjustment settings.
    #[serde(default)]
    pub bulk_adjustment: BulkAdjustmentSettings,
}

/// Settings for the bulk mark adjustment transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkAdjustmentSettings {
    /// How many times a single write is attempted when the store is unavailable.
    #[serde(default = "default_max_write_attempts")]
    pub max_write_attempts: u32,
}

fn default_max_write_attempts() -> u32 {
    3
}

impl Default for BulkAdjustmentSettings {
    fn default() -> Self {
        Self {
            max_write_attempts: default_max_write_attempts(),
        }
    }
}

/// The complete institution configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct InstitutionConfig {
    /// Institution metadata.
    metadata: InstitutionMetadata,
    /// Grading schemes keyed by department.
    schemes: HashMap<String, GradingScheme>,
}

impl InstitutionConfig {
    /// Creates a new InstitutionConfig from its component parts.
    pub fn new(metadata: InstitutionMetadata, schemes: Vec<GradingScheme>) -> Self {
        let schemes = schemes
            .into_iter()
            .map(|scheme| (scheme.department.clone(), scheme))
            .collect();
        Self { metadata, schemes }
    }

    /// Returns the institution metadata.
    pub fn institution(&self) -> &InstitutionMetadata {
        &self.metadata
    }

    /// Returns all grading schemes keyed by department.
    pub fn schemes(&self) -> &HashMap<String, GradingScheme> {
        &self.schemes
    }

    /// Returns the bulk adjustment settings.
    pub fn bulk_adjustment(&self) -> &BulkAdjustmentSettings {
        &self.metadata.bulk_adjustment
    }
}

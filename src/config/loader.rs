//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading institution
//! configuration and departmental grading schemes from YAML files.

use std::fs;
use std::path::Path;

use crate::calculation::PASS_MARK;
use crate::error::{EngineError, EngineResult};
use crate::models::GradingScheme;

use super::types::{InstitutionConfig, InstitutionMetadata};

/// Loads and provides access to institution configuration.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/default/
/// ├── institution.yaml        # Institution metadata and pass mark
/// └── grading_schemes/
///     ├── nursing.yaml        # One scheme per department
///     └── ...
/// ```
///
/// # Example
///
/// ```no_run
/// use result_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// let scheme = loader.get_scheme("nursing").unwrap();
/// println!("{} grade bands", scheme.grade_bands.len());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: InstitutionConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - `institution.yaml` or the `grading_schemes` directory is missing
    /// - Any file contains invalid YAML
    /// - The configured pass mark differs from the engine's fixed pass mark
    /// - Two scheme files name the same department
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let institution_path = path.join("institution.yaml");
        let metadata = Self::load_yaml::<InstitutionMetadata>(&institution_path)?;

        if metadata.pass_mark != PASS_MARK {
            return Err(EngineError::ConfigParseError {
                path: institution_path.display().to_string(),
                message: format!(
                    "pass_mark {} is not supported; the pass mark is fixed at {}",
                    metadata.pass_mark, PASS_MARK
                ),
            });
        }

        let schemes = Self::load_schemes(&path.join("grading_schemes"))?;

        Ok(Self::from_config(InstitutionConfig::new(metadata, schemes)))
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: InstitutionConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads every scheme file from the grading schemes directory.
    fn load_schemes(schemes_dir: &Path) -> EngineResult<Vec<GradingScheme>> {
        let schemes_dir_str = schemes_dir.display().to_string();

        let entries = fs::read_dir(schemes_dir).map_err(|_| EngineError::ConfigNotFound {
            path: schemes_dir_str.clone(),
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: schemes_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                paths.push(path);
            }
        }
        // read_dir order is platform dependent
        paths.sort();

        let mut schemes: Vec<GradingScheme> = Vec::with_capacity(paths.len());
        for path in paths {
            let scheme = Self::load_yaml::<GradingScheme>(&path)?;
            if schemes.iter().any(|s| s.department == scheme.department) {
                return Err(EngineError::ConfigParseError {
                    path: path.display().to_string(),
                    message: format!("duplicate scheme for department '{}'", scheme.department),
                });
            }
            schemes.push(scheme);
        }

        if schemes.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no grading scheme files found)", schemes_dir_str),
            });
        }

        Ok(schemes)
    }

    /// Returns the underlying institution configuration.
    pub fn config(&self) -> &InstitutionConfig {
        &self.config
    }

    /// Returns the institution metadata.
    pub fn institution(&self) -> &InstitutionMetadata {
        self.config.institution()
    }

    /// Gets the grading scheme owned by a department.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use result_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/default")?;
    /// let scheme = loader.get_scheme("nursing")?;
    /// println!("Scheme for {}", scheme.department);
    /// # Ok::<(), result_engine::error::EngineError>(())
    /// ```
    pub fn get_scheme(&self, department: &str) -> EngineResult<&GradingScheme> {
        self.config
            .schemes()
            .get(department)
            .ok_or_else(|| EngineError::SchemeNotFound {
                department: department.to_string(),
            })
    }

    /// Returns how many times a single store write may be attempted.
    pub fn max_write_attempts(&self) -> u32 {
        self.config.bulk_adjustment().max_write_attempts.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::path::PathBuf;

    fn config_path() -> &'static str {
        "./config/default"
    }

    /// Copies the default configuration into a fresh temporary directory.
    fn temp_config(prefix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("{}-{}", prefix, uuid::Uuid::new_v4()));
        let schemes = dir.join("grading_schemes");
        fs::create_dir_all(&schemes).expect("create temp dir");

        let source = Path::new(config_path());
        fs::copy(source.join("institution.yaml"), dir.join("institution.yaml"))
            .expect("copy institution.yaml");
        for name in ["nursing.yaml", "community_health.yaml"] {
            fs::copy(source.join("grading_schemes").join(name), schemes.join(name))
                .expect("copy scheme");
        }
        dir
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.institution().code, "CHST");
        assert_eq!(loader.institution().pass_mark, Decimal::from(40));
        assert_eq!(loader.max_write_attempts(), 3);
    }

    #[test]
    fn test_get_scheme_for_nursing() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let scheme = loader.get_scheme("nursing").unwrap();
        assert_eq!(scheme.department, "nursing");
        assert_eq!(scheme.grade_labels(), vec!["A", "B", "C", "D", "E", "F"]);
        assert!(scheme.is_failing_grade("F"));
        assert!(!scheme.comment_bands.is_empty());
    }

    #[test]
    fn test_band_order_follows_file_order() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let scheme = loader.get_scheme("community_health").unwrap();
        assert_eq!(scheme.grade_bands[0].grade, "A1");
        assert_eq!(scheme.grade_bands.last().unwrap().grade, "F9");
    }

    #[test]
    fn test_get_scheme_unknown_department_returns_error() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        match loader.get_scheme("astronomy") {
            Err(EngineError::SchemeNotFound { department }) => {
                assert_eq!(department, "astronomy");
            }
            other => panic!("Expected SchemeNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("institution.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_copied_configuration_loads() {
        let dir = temp_config("result-engine-config-copy");

        let loader = ConfigLoader::load(&dir).unwrap();
        assert_eq!(loader.config().schemes().len(), 2);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unsupported_pass_mark_is_rejected() {
        let dir = temp_config("result-engine-pass-mark");
        let institution = dir.join("institution.yaml");
        let content = fs::read_to_string(&institution).unwrap();
        fs::write(&institution, content.replace("pass_mark: 40", "pass_mark: 45")).unwrap();

        match ConfigLoader::load(&dir) {
            Err(EngineError::ConfigParseError { path, message }) => {
                assert!(path.ends_with("institution.yaml"));
                assert!(message.contains("pass_mark 45"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_duplicate_department_scheme_is_rejected() {
        let dir = temp_config("result-engine-duplicate-scheme");
        let schemes = dir.join("grading_schemes");
        fs::copy(schemes.join("nursing.yaml"), schemes.join("nursing_copy.yaml")).unwrap();

        match ConfigLoader::load(&dir) {
            Err(EngineError::ConfigParseError { path, message }) => {
                assert!(path.ends_with("nursing_copy.yaml"));
                assert!(message.contains("duplicate scheme for department 'nursing'"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }

        fs::remove_dir_all(&dir).ok();
    }
}

//! Error types for the Result Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the engine surfaces. Outcomes that are part of the
//! normal model (an unmatched grade band, a zero-credit semester, an empty
//! adjustment selection, an unsatisfied entitlement) are never errors.

use thiserror::Error;

/// The main error type for the Result Engine.
///
/// # Example
///
/// ```
/// use result_engine::error::EngineError;
///
/// let error = EngineError::SchemeNotFound {
///     department: "pharmacy".to_string(),
/// };
/// assert_eq!(error.to_string(), "Grading scheme not found for department: pharmacy");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No grading scheme is configured for the department.
    #[error("Grading scheme not found for department: {department}")]
    SchemeNotFound {
        /// The department that has no scheme.
        department: String,
    },

    /// A course referenced by a registration does not exist.
    #[error("Course not found: {course_id}")]
    CourseNotFound {
        /// The missing course ID.
        course_id: String,
    },

    /// A student referenced by a request does not exist.
    #[error("Student not found: {student_id}")]
    StudentNotFound {
        /// The missing student ID.
        student_id: String,
    },

    /// A registration was rejected before reaching the calculation stage.
    #[error("Invalid registration '{registration_id}': {message}")]
    InvalidRegistration {
        /// The ID of the invalid registration.
        registration_id: String,
        /// A description of what made the registration invalid.
        message: String,
    },

    /// A payable was rejected before reaching the entitlement gate.
    #[error("Invalid payable '{payable_id}': {message}")]
    InvalidPayable {
        /// The ID of the invalid payable.
        payable_id: String,
        /// A description of what made the payable invalid.
        message: String,
    },

    /// The store could not complete a read or write. Retrying may succeed.
    #[error("Store unavailable: {message}")]
    StoreUnavailable {
        /// A description of the failure.
        message: String,
    },

    /// A bulk adjustment could not be persisted and was rolled back.
    #[error("Transaction failed for {scope} after {applied_writes} write(s): {message}")]
    TransactionFailure {
        /// The course scope being adjusted.
        scope: String,
        /// How many writes had been applied before the failure (all rolled back).
        applied_writes: usize,
        /// A description of the failure.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl EngineError {
    /// Returns true if the operation that produced this error may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, EngineError::StoreUnavailable { .. })
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/institution.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/institution.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_course_not_found_displays_id() {
        let error = EngineError::CourseNotFound {
            course_id: "NUR101".to_string(),
        };
        assert_eq!(error.to_string(), "Course not found: NUR101");
    }

    #[test]
    fn test_invalid_registration_displays_id_and_message() {
        let error = EngineError::InvalidRegistration {
            registration_id: "reg_001".to_string(),
            message: "score 120 is outside 0-100".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid registration 'reg_001': score 120 is outside 0-100"
        );
    }

    #[test]
    fn test_transaction_failure_displays_scope_and_writes() {
        let error = EngineError::TransactionFailure {
            scope: "NUR101/first/2024/2025".to_string(),
            applied_writes: 2,
            message: "disk full".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Transaction failed for NUR101/first/2024/2025 after 2 write(s): disk full"
        );
    }

    #[test]
    fn test_only_store_unavailable_is_transient() {
        assert!(
            EngineError::StoreUnavailable {
                message: "timeout".to_string()
            }
            .is_transient()
        );
        assert!(
            !EngineError::CalculationError {
                message: "x".to_string()
            }
            .is_transient()
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_scheme_not_found() -> EngineResult<()> {
            Err(EngineError::SchemeNotFound {
                department: "x".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_scheme_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}

//! Error types for the rate table domain
//!
//! The only fallible operation in this crate is pre-submission validation
//! of a rate document; everything else (estimation, formatting) is total.

/// Rejection of a rate document before submission
///
/// Fields are named by their wire path (`hourlyRate`, `project.landing`),
/// matching what an editing surface displays. The first offending leaf
/// aborts validation, so every error names exactly one field.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Leaf value is not numeric at all
    #[error("field {field} is not a number")]
    NotANumber {
        /// Wire path of the offending leaf
        field: String,
    },

    /// Leaf value parses but is below zero
    #[error("field {field} must be >= 0, got {value}")]
    NegativeValue {
        /// Wire path of the offending leaf
        field: String,
        /// The rejected value
        value: f64,
    },

    /// Leaf value is NaN or infinite
    #[error("field {field} is not a finite number")]
    NotFinite {
        /// Wire path of the offending leaf
        field: String,
    },
}

impl ValidationError {
    /// Wire path of the field that failed validation
    #[inline]
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::NotANumber { field }
            | Self::NegativeValue { field, .. }
            | Self::NotFinite { field } => field,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_display() {
        let err = ValidationError::NegativeValue {
            field: "project.landing".to_string(),
            value: -3.0,
        };
        assert!(err.to_string().contains("project.landing"));
        assert!(err.to_string().contains("-3"));
    }

    #[test]
    fn validation_error_field_accessor() {
        let err = ValidationError::NotANumber {
            field: "hourlyRate".to_string(),
        };
        assert_eq!(err.field(), "hourlyRate");
    }
}

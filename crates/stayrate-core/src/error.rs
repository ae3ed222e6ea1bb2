//! # Error Types
//!
//! Domain-specific error types for stayrate-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stayrate-core errors (this file)                                      │
//! │  ├── CoreError        - General domain errors                          │
//! │  ├── RedemptionError  - Why a discount code was refused                │
//! │  └── ValidationError  - Admin input failures                           │
//! │                                                                         │
//! │  stayrate-db errors (separate crate)                                   │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  stayrate-offers errors (app)                                          │
//! │  └── ServiceError     - What callers see (code + message)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pricing and resolution never fail. They substitute neutral values
//! instead, so nothing in this file is produced by the price path.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Convention not found: {0}")]
    ConventionNotFound(String),

    #[error("Discount code not found: {0}")]
    DiscountCodeNotFound(String),

    /// Code redemption was refused.
    #[error(transparent)]
    Redemption(#[from] RedemptionError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Redemption Error
// =============================================================================

/// Reasons a visitor's code entry is refused.
///
/// ## User Workflow
/// ```text
/// Visitor types "sante2024"
///      │
///      ▼
/// blank?                        → MissingCode
/// unknown or inactive code?     → UnknownCode
/// convention gone or inactive?  → ConventionInactive
/// code valid_from in future?    → NotYetValid
/// code valid_until in past?     → Expired
///      │
///      ▼
/// SessionDiscount stored, visitor sees offers
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RedemptionError {
    #[error("Please enter a discount code")]
    MissingCode,

    #[error("Invalid or expired code")]
    UnknownCode { code: String },

    #[error("Invalid code (convention inactive)")]
    ConventionInactive { code: String },

    #[error("This code is not valid yet")]
    NotYetValid { code: String },

    #[error("This code has expired")]
    Expired { code: String },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised at the system boundary before loose input becomes a typed record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: f64, max: f64 },

    /// Value is NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Invalid format (e.g., invalid UUID, bad characters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A field that is forbidden in this context was supplied.
    #[error("{field} is not allowed: {reason}")]
    NotAllowed { field: String, reason: String },

    /// Date window ends before it starts.
    #[error("{field} ends before it starts")]
    InvertedRange { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redemption_messages() {
        assert_eq!(
            RedemptionError::MissingCode.to_string(),
            "Please enter a discount code"
        );
        let err = RedemptionError::Expired {
            code: "SANTE2024".to_string(),
        };
        assert_eq!(err.to_string(), "This code has expired");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "code".to_string(),
        };
        assert_eq!(err.to_string(), "code is required");

        let err = ValidationError::OutOfRange {
            field: "discount_percentage".to_string(),
            min: 0.0,
            max: 100.0,
        };
        assert_eq!(
            err.to_string(),
            "discount_percentage must be between 0 and 100"
        );
    }

    #[test]
    fn test_errors_convert_to_core_error() {
        let core_err: CoreError = ValidationError::Required {
            field: "name".to_string(),
        }
        .into();
        assert!(matches!(core_err, CoreError::Validation(_)));

        let core_err: CoreError = RedemptionError::MissingCode.into();
        assert!(matches!(core_err, CoreError::Redemption(_)));
        assert_eq!(core_err.to_string(), "Please enter a discount code");
    }
}

//! # Service Error Type
//!
//! Unified error type for the offer and admin services.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in stayrate                               │
//! │                                                                         │
//! │  RedemptionError  ─┐                                                   │
//! │  ValidationError  ─┤                                                   │
//! │  CoreError        ─┼──► ServiceError { code, message } ──► CLI / UI    │
//! │  DbError          ─┤                                                   │
//! │  CatalogError     ─┘                                                   │
//! │                                                                         │
//! │  Pricing itself never fails: a missing margin or discount is neutral. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Serializes as:
//! ```json
//! { "code": "CODE_REJECTED", "message": "This code has expired" }
//! ```

use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;

use crate::catalog::CatalogError;
use stayrate_core::{CoreError, RedemptionError, ValidationError};
use stayrate_db::DbError;

/// Error returned from service operations.
#[derive(Debug, Clone, Serialize, Error, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct ServiceError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for service responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// A discount code was refused at redemption
    CodeRejected,

    /// The visitor has not redeemed a code yet
    SessionRequired,

    /// Database operation failed
    DatabaseError,

    /// Hotel data could not be loaded
    CatalogUnavailable,

    /// Internal error
    Internal,
}

impl ServiceError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ServiceError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ServiceError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::new(ErrorCode::ValidationError, message)
    }

    /// The visitor must redeem a code first.
    pub fn session_required() -> Self {
        ServiceError::new(ErrorCode::SessionRequired, "Please enter a discount code")
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ServiceError::new(ErrorCode::Internal, message)
    }
}

impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ServiceError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => {
                ServiceError::validation(format!("{} '{}' already exists", field, value))
            }
            DbError::CheckViolation { message } => {
                tracing::warn!("Check constraint rejected input: {}", message);
                ServiceError::validation("Value out of range")
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ServiceError::validation("Invalid reference")
            }
            DbError::ConnectionFailed(_) => {
                ServiceError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ServiceError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::PoolExhausted => {
                ServiceError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::QueryFailed(e) | DbError::TransactionFailed(e) | DbError::Internal(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database operation failed: {}", e);
                ServiceError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl From<RedemptionError> for ServiceError {
    fn from(err: RedemptionError) -> Self {
        ServiceError::new(ErrorCode::CodeRejected, err.to_string())
    }
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::validation(err.to_string())
    }
}

impl From<CoreError> for ServiceError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConventionNotFound(id) => ServiceError::not_found("Convention", &id),
            CoreError::DiscountCodeNotFound(id) => ServiceError::not_found("DiscountCode", &id),
            CoreError::Redemption(e) => e.into(),
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<CatalogError> for ServiceError {
    fn from(err: CatalogError) -> Self {
        tracing::error!("Hotel catalog failed: {}", err);
        ServiceError::new(ErrorCode::CatalogUnavailable, "Hotel offers are unavailable")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redemption_maps_to_code_rejected() {
        let err: ServiceError = RedemptionError::NotYetValid {
            code: "SANTE2024".to_string(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::CodeRejected);
        assert_eq!(err.message, "This code is not valid yet");
    }

    #[test]
    fn test_db_errors_hide_details() {
        let err: ServiceError = DbError::QueryFailed("no such column: x".to_string()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("column"));

        let err: ServiceError = DbError::duplicate("conventions.name", "Organisme public B").into();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_core_error_mapping() {
        let err: ServiceError = CoreError::ConventionNotFound("c-9".to_string()).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.to_string(), "Convention not found: c-9");
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(ServiceError::session_required()).unwrap();
        assert_eq!(json["code"], "SESSION_REQUIRED");
        assert_eq!(json["message"], "Please enter a discount code");
    }
}

//! # Validation Module
//!
//! Input validation for admin-entered policy records.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Admin form / CLI flags                                       │
//! │  └── Raw strings and numbers                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required fields, lengths, characters                              │
//! │  ├── Finite numbers within range                                       │
//! │  └── Margin scope and date windows                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── UNIQUE (convention name, code)                                    │
//! │                                                                         │
//! │  The pricing path only ever sees typed records that passed here.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stayrate_core::validation::{normalize_code, validate_code};
//!
//! let code = normalize_code(" partner15 ");
//! validate_code(&code).unwrap();
//! assert_eq!(code, "PARTNER15");
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::types::MarginType;
use crate::MAX_CODE_LENGTH;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Canonical form of a discount code: trimmed, uppercase.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Validates a discount code.
///
/// ## Rules
/// - Must not be empty
/// - At most [`MAX_CODE_LENGTH`] characters
/// - Letters, digits, hyphens and underscores only
///
/// ## Example
/// ```rust
/// use stayrate_core::validation::validate_code;
///
/// assert!(validate_code("SANTE2024").is_ok());
/// assert!(validate_code("").is_err());
/// assert!(validate_code("HAS SPACE").is_err());
/// ```
pub fn validate_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    if code.chars().count() > MAX_CODE_LENGTH {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: MAX_CODE_LENGTH,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a convention name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_convention_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use stayrate_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

fn require_finite(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a convention's discount percentage.
///
/// ## Rules
/// - Finite
/// - Between 0 and 100 inclusive
pub fn validate_discount_percentage(pct: f64) -> ValidationResult<()> {
    require_finite("discount_percentage", pct)?;

    if !(0.0..=100.0).contains(&pct) {
        return Err(ValidationError::OutOfRange {
            field: "discount_percentage".to_string(),
            min: 0.0,
            max: 100.0,
        });
    }

    Ok(())
}

/// Validates a margin value.
///
/// ## Rules
/// - Finite
/// - Not negative (zero is allowed and means "no markup")
pub fn validate_margin_value(value: f64) -> ValidationResult<()> {
    require_finite("margin_value", value)?;

    if value < 0.0 {
        return Err(ValidationError::OutOfRange {
            field: "margin_value".to_string(),
            min: 0.0,
            max: f64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Structural Validators
// =============================================================================

/// Validates a margin's scope.
///
/// ## Rules
/// - Global margins carry no entity id
/// - Hotel and room-type margins require one
///
/// ## Returns
/// The cleaned entity id (`None` for global).
pub fn validate_margin_scope(
    margin_type: MarginType,
    entity_id: Option<&str>,
) -> ValidationResult<Option<String>> {
    let entity_id = entity_id.map(str::trim).filter(|e| !e.is_empty());

    match (margin_type.requires_entity(), entity_id) {
        (true, None) => Err(ValidationError::Required {
            field: "entity_id".to_string(),
        }),
        (false, Some(_)) => Err(ValidationError::NotAllowed {
            field: "entity_id".to_string(),
            reason: "global margins apply to every room".to_string(),
        }),
        (_, entity_id) => Ok(entity_id.map(str::to_string)),
    }
}

/// Validates an optional date window.
///
/// ## Rules
/// - When both ends are given, `valid_from <= valid_until`
pub fn validate_date_range(
    valid_from: Option<NaiveDate>,
    valid_until: Option<NaiveDate>,
) -> ValidationResult<()> {
    if let (Some(from), Some(until)) = (valid_from, valid_until) {
        if from > until {
            return Err(ValidationError::InvertedRange {
                field: "validity".to_string(),
            });
        }
    }

    Ok(())
}

/// Parses an optional `YYYY-MM-DD` form value. Blank means absent.
pub fn parse_optional_date(field: &str, value: Option<&str>) -> ValidationResult<Option<NaiveDate>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ValidationError::InvalidFormat {
                field: field.to_string(),
                reason: "expected a date as YYYY-MM-DD".to_string(),
            }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

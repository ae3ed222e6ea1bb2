//! # Discount Resolution
//!
//! Two related checks live here:
//!
//! - [`redeem_code`] runs once, when a visitor types a code.
//! - [`resolve_discount`] runs on every offer render.
//!
//! ## What Each Check Looks At
//! ```text
//! ┌───────────────────────────────┬──────────────────┬─────────────────────┐
//! │                               │  redeem_code     │  resolve_discount   │
//! ├───────────────────────────────┼──────────────────┼─────────────────────┤
//! │  code exists + active         │        ✓         │                     │
//! │  code date bounds             │        ✓         │                     │
//! │  convention exists + active   │        ✓         │          ✓          │
//! │  convention date bounds       │                  │          ✓          │
//! └───────────────────────────────┴──────────────────┴─────────────────────┘
//! ```
//!
//! The asymmetry is current product behavior. A code that expires after
//! redemption keeps working for the rest of the session, while a
//! convention that expires stops the discount on the next render.
//!
//! ## Freshness
//! The percentage applied on render is the one cached in the session at
//! redemption. An admin editing the convention's percentage does not change
//! an active session until the visitor redeems again.

use chrono::NaiveDate;

use crate::error::RedemptionError;
use crate::types::{Convention, DiscountCode, SessionDiscount};
use crate::validation::normalize_code;
use crate::validity::is_valid;

/// Effective discount percentage for a visitor on `today`.
///
/// Returns `0.0` when the session's convention no longer exists or is not
/// valid today. Otherwise returns the percentage cached in the session.
pub fn resolve_discount(
    session: &SessionDiscount,
    conventions: &[Convention],
    today: NaiveDate,
) -> f64 {
    match conventions.iter().find(|c| c.id == session.convention_id) {
        Some(convention) if is_valid(convention, today) => session.discount_percentage,
        _ => 0.0,
    }
}

/// Finds a code case-insensitively.
pub fn find_code<'a>(codes: &'a [DiscountCode], input: &str) -> Option<&'a DiscountCode> {
    let wanted = normalize_code(input);
    codes.iter().find(|c| c.code.eq_ignore_ascii_case(&wanted))
}

/// Validates a visitor's code entry and captures the session discount.
///
/// ## Arguments
/// * `input` - What the visitor typed. Trimmed and uppercased.
/// * `codes` - Candidate codes (may be pre-filtered by the caller).
/// * `conventions` - Candidate conventions.
/// * `today` - Reference day for the code's date bounds.
///
/// ## Example
/// ```rust
/// use chrono::{NaiveDate, Utc};
/// use stayrate_core::discount::redeem_code;
/// use stayrate_core::{Convention, DiscountCode};
///
/// let convention = Convention {
///     id: "c1".into(),
///     name: "Health Ministry".into(),
///     discount_percentage: 20.0,
///     is_active: true,
///     valid_from: None,
///     valid_until: None,
///     created_at: Utc::now(),
/// };
/// let code = DiscountCode {
///     id: "d1".into(),
///     code: "SANTE2024".into(),
///     convention_id: "c1".into(),
///     is_active: true,
///     valid_from: None,
///     valid_until: None,
///     created_at: Utc::now(),
/// };
///
/// let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
/// let session = redeem_code(" sante2024 ", &[code], &[convention], today).unwrap();
/// assert_eq!(session.discount_code, "SANTE2024");
/// assert_eq!(session.discount_percentage, 20.0);
/// ```
pub fn redeem_code(
    input: &str,
    codes: &[DiscountCode],
    conventions: &[Convention],
    today: NaiveDate,
) -> Result<SessionDiscount, RedemptionError> {
    let normalized = normalize_code(input);
    if normalized.is_empty() {
        return Err(RedemptionError::MissingCode);
    }

    let code = codes
        .iter()
        .find(|c| c.is_active && c.code.eq_ignore_ascii_case(&normalized))
        .ok_or_else(|| RedemptionError::UnknownCode {
            code: normalized.clone(),
        })?;

    let convention = conventions
        .iter()
        .find(|c| c.id == code.convention_id && c.is_active)
        .ok_or_else(|| RedemptionError::ConventionInactive {
            code: normalized.clone(),
        })?;

    if matches!(code.valid_from, Some(from) if from > today) {
        return Err(RedemptionError::NotYetValid { code: normalized });
    }

    if matches!(code.valid_until, Some(until) if until < today) {
        return Err(RedemptionError::Expired { code: normalized });
    }

    Ok(SessionDiscount {
        discount_code: normalized,
        convention_id: convention.id.clone(),
        convention_name: convention.name.clone(),
        discount_percentage: convention.discount_percentage,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 14).unwrap()
    }

    fn convention(id: &str, pct: f64) -> Convention {
        Convention {
            id: id.to_string(),
            name: format!("Convention {id}"),
            discount_percentage: pct,
            is_active: true,
            valid_from: None,
            valid_until: None,
            created_at: Utc::now(),
        }
    }

    fn code(code: &str, convention_id: &str) -> DiscountCode {
        DiscountCode {
            id: format!("id-{code}"),
            code: code.to_string(),
            convention_id: convention_id.to_string(),
            is_active: true,
            valid_from: None,
            valid_until: None,
            created_at: Utc::now(),
        }
    }

    fn session(convention_id: &str, pct: f64) -> SessionDiscount {
        SessionDiscount {
            discount_code: "PARTNER15".to_string(),
            convention_id: convention_id.to_string(),
            convention_name: "Partner A".to_string(),
            discount_percentage: pct,
        }
    }

    // -------------------------------------------------------------------------
    // resolve_discount
    // -------------------------------------------------------------------------

    #[test]
    fn test_resolve_uses_cached_percentage() {
        // Convention now says 30%, session captured 15%.
        let conventions = vec![convention("c1", 30.0)];
        assert_eq!(resolve_discount(&session("c1", 15.0), &conventions, today()), 15.0);
    }

    #[test]
    fn test_resolve_missing_convention_is_zero() {
        let conventions = vec![convention("other", 30.0)];
        assert_eq!(resolve_discount(&session("c1", 15.0), &conventions, today()), 0.0);
        assert_eq!(resolve_discount(&session("c1", 15.0), &[], today()), 0.0);
    }

    #[test]
    fn test_resolve_inactive_convention_is_zero() {
        let mut c = convention("c1", 15.0);
        c.is_active = false;
        assert_eq!(resolve_discount(&session("c1", 15.0), &[c], today()), 0.0);
    }

    #[test]
    fn test_resolve_convention_dates_checked() {
        let mut expired = convention("c1", 15.0);
        expired.valid_until = Some(today() - Duration::days(1));
        assert_eq!(resolve_discount(&session("c1", 15.0), &[expired], today()), 0.0);

        let mut future = convention("c1", 15.0);
        future.valid_from = Some(today() + Duration::days(1));
        assert_eq!(resolve_discount(&session("c1", 15.0), &[future], today()), 0.0);

        let mut last_day = convention("c1", 15.0);
        last_day.valid_until = Some(today());
        assert_eq!(resolve_discount(&session("c1", 15.0), &[last_day], today()), 15.0);
    }

    // -------------------------------------------------------------------------
    // redeem_code
    // -------------------------------------------------------------------------

    #[test]
    fn test_redeem_success_is_case_insensitive() {
        let conventions = vec![convention("c1", 20.0)];
        let codes = vec![code("SANTE2024", "c1")];

        let session = redeem_code("sante2024", &codes, &conventions, today()).unwrap();
        assert_eq!(session.discount_code, "SANTE2024");
        assert_eq!(session.convention_id, "c1");
        assert_eq!(session.convention_name, "Convention c1");
        assert_eq!(session.discount_percentage, 20.0);
    }

    #[test]
    fn test_redeem_blank_input() {
        assert_eq!(
            redeem_code("   ", &[], &[], today()),
            Err(RedemptionError::MissingCode)
        );
    }

    #[test]
    fn test_redeem_unknown_or_inactive_code() {
        let conventions = vec![convention("c1", 20.0)];
        let mut inactive = code("SANTE2024", "c1");
        inactive.is_active = false;

        assert!(matches!(
            redeem_code("NOPE", &[inactive.clone()], &conventions, today()),
            Err(RedemptionError::UnknownCode { .. })
        ));
        assert!(matches!(
            redeem_code("SANTE2024", &[inactive], &conventions, today()),
            Err(RedemptionError::UnknownCode { .. })
        ));
    }

    #[test]
    fn test_redeem_inactive_or_deleted_convention() {
        let codes = vec![code("SANTE2024", "c1")];
        assert!(matches!(
            redeem_code("SANTE2024", &codes, &[], today()),
            Err(RedemptionError::ConventionInactive { .. })
        ));

        let mut inactive = convention("c1", 20.0);
        inactive.is_active = false;
        assert!(matches!(
            redeem_code("SANTE2024", &codes, &[inactive], today()),
            Err(RedemptionError::ConventionInactive { .. })
        ));
    }

    #[test]
    fn test_redeem_checks_code_dates() {
        let conventions = vec![convention("c1", 20.0)];

        let mut future = code("EARLY", "c1");
        future.valid_from = Some(today() + Duration::days(1));
        assert_eq!(
            redeem_code("EARLY", &[future], &conventions, today()),
            Err(RedemptionError::NotYetValid {
                code: "EARLY".to_string()
            })
        );

        let mut expired = code("LATE", "c1");
        expired.valid_until = Some(today() - Duration::days(1));
        assert_eq!(
            redeem_code("LATE", &[expired], &conventions, today()),
            Err(RedemptionError::Expired {
                code: "LATE".to_string()
            })
        );

        let mut boundary = code("EDGE", "c1");
        boundary.valid_from = Some(today());
        boundary.valid_until = Some(today());
        assert!(redeem_code("EDGE", &[boundary], &conventions, today()).is_ok());
    }

    #[test]
    fn test_redeem_ignores_convention_dates() {
        // Convention window is over, but redemption only checks its active flag.
        let mut expired = convention("c1", 20.0);
        expired.valid_until = Some(today() - Duration::days(30));
        let codes = vec![code("SANTE2024", "c1")];

        let session = redeem_code("SANTE2024", &codes, &[expired.clone()], today()).unwrap();
        // ...and the render-time check then zeroes the discount.
        assert_eq!(resolve_discount(&session, &[expired], today()), 0.0);
    }

    #[test]
    fn test_find_code() {
        let codes = vec![code("PUBLIC25", "c3")];
        assert!(find_code(&codes, " public25").is_some());
        assert!(find_code(&codes, "PUBLIC2").is_none());
    }
}

//! # Temporal Validity
//!
//! Decides whether a dated, switchable record applies on a given day.
//!
//! ## Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  is_valid(entity, today)                                                │
//! │                                                                         │
//! │  is_active == Some(false)        → false                               │
//! │  valid_from  > today             → false   (not started yet)           │
//! │  valid_until < today             → false   (already over)              │
//! │  otherwise                       → true                                │
//! │                                                                         │
//! │          valid_from                     valid_until                     │
//! │  ──────────────[━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━]──────────────► days     │
//! │     invalid     ▲ valid (both ends included) ▲     invalid             │
//! │                                                                         │
//! │  Absent bounds impose no constraint.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Bounds and "today" are calendar dates. Parsing date strings is the
//! caller's job.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{Convention, DiscountCode, Margin};

/// Anything carrying an optional active flag and optional date bounds.
pub trait Schedule {
    /// `None` when the entity has no active flag at all.
    fn is_active(&self) -> Option<bool>;

    fn valid_from(&self) -> Option<NaiveDate>;

    fn valid_until(&self) -> Option<NaiveDate>;
}

/// Returns whether `entity` applies on `today`.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use stayrate_core::validity::{is_valid, ValidityWindow};
///
/// let day = |d| NaiveDate::from_ymd_opt(2025, 1, d).unwrap();
/// let window = ValidityWindow::between(day(10), day(20));
///
/// assert!(is_valid(&window, day(10)));
/// assert!(is_valid(&window, day(20)));
/// assert!(!is_valid(&window, day(21)));
/// ```
pub fn is_valid<E: Schedule + ?Sized>(entity: &E, today: NaiveDate) -> bool {
    if entity.is_active() == Some(false) {
        return false;
    }

    if matches!(entity.valid_from(), Some(from) if from > today) {
        return false;
    }

    if matches!(entity.valid_until(), Some(until) if until < today) {
        return false;
    }

    true
}

// =============================================================================
// Standalone Window
// =============================================================================

/// A bare validity window, for callers that hold loose fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityWindow {
    pub is_active: Option<bool>,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
}

impl ValidityWindow {
    /// A window with no constraints at all.
    pub const fn unbounded() -> Self {
        ValidityWindow {
            is_active: None,
            valid_from: None,
            valid_until: None,
        }
    }

    pub const fn between(from: NaiveDate, until: NaiveDate) -> Self {
        ValidityWindow {
            is_active: None,
            valid_from: Some(from),
            valid_until: Some(until),
        }
    }

    pub const fn starting(from: NaiveDate) -> Self {
        ValidityWindow {
            is_active: None,
            valid_from: Some(from),
            valid_until: None,
        }
    }

    pub const fn until(until: NaiveDate) -> Self {
        ValidityWindow {
            is_active: None,
            valid_from: None,
            valid_until: Some(until),
        }
    }

    pub const fn active(mut self, active: bool) -> Self {
        self.is_active = Some(active);
        self
    }
}

impl Schedule for ValidityWindow {
    fn is_active(&self) -> Option<bool> {
        self.is_active
    }

    fn valid_from(&self) -> Option<NaiveDate> {
        self.valid_from
    }

    fn valid_until(&self) -> Option<NaiveDate> {
        self.valid_until
    }
}

// =============================================================================
// Record Implementations
// =============================================================================

macro_rules! impl_schedule {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Schedule for $ty {
                fn is_active(&self) -> Option<bool> {
                    Some(self.is_active)
                }

                fn valid_from(&self) -> Option<NaiveDate> {
                    self.valid_from
                }

                fn valid_until(&self) -> Option<NaiveDate> {
                    self.valid_until
                }
            }
        )*
    };
}

impl_schedule!(Convention, DiscountCode, Margin);

// =============================================================================
// Unit Tests
// =============================================================================

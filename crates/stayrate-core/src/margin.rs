//! # Margin Resolution
//!
//! Picks the markup that pricing applies and normalizes it to a
//! `{value, unit}` pair.
//!
//! ## Resolution
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  margins (all scopes)                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  first record with type == global AND is_active                        │
//! │       │                                                                 │
//! │       ├── none?                     → {0, percentage}                  │
//! │       ├── outside its date window?  → {0, percentage}                  │
//! │       ├── value is 0 or NaN?        → {0, percentage}                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  {margin_value, margin_unit}                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Hotel and room-type margins are never consulted here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{Margin, MarginType, MarginUnit};
use crate::validity::is_valid;

/// A margin ready to be applied by the price compositor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AppliedMargin {
    pub value: f64,
    pub unit: MarginUnit,
}

impl AppliedMargin {
    /// The identity margin: leaves every price untouched.
    #[inline]
    pub const fn neutral() -> Self {
        AppliedMargin {
            value: 0.0,
            unit: MarginUnit::Percentage,
        }
    }

    #[inline]
    pub const fn percentage(value: f64) -> Self {
        AppliedMargin {
            value,
            unit: MarginUnit::Percentage,
        }
    }

    #[inline]
    pub const fn fixed(value: f64) -> Self {
        AppliedMargin {
            value,
            unit: MarginUnit::Fixed,
        }
    }

    /// Whether applying this margin changes a price.
    #[inline]
    pub fn is_effective(&self) -> bool {
        self.value > 0.0
    }
}

impl Default for AppliedMargin {
    fn default() -> Self {
        AppliedMargin::neutral()
    }
}

impl From<&Margin> for AppliedMargin {
    fn from(margin: &Margin) -> Self {
        AppliedMargin {
            value: margin.margin_value,
            unit: margin.margin_unit,
        }
    }
}

/// Resolves the global margin in force on `today`.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use stayrate_core::margin::{resolve_global_margin, AppliedMargin};
///
/// let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
/// assert_eq!(resolve_global_margin(&[], today), AppliedMargin::neutral());
/// ```
pub fn resolve_global_margin(margins: &[Margin], today: NaiveDate) -> AppliedMargin {
    let Some(global) = margins
        .iter()
        .find(|m| m.margin_type == MarginType::Global && m.is_active)
    else {
        return AppliedMargin::neutral();
    };

    // NaN counts as "no value", same as zero.
    if global.margin_value == 0.0 || global.margin_value.is_nan() {
        return AppliedMargin::neutral();
    }

    if !is_valid(global, today) {
        return AppliedMargin::neutral();
    }

    AppliedMargin::from(global)
}

// =============================================================================
// Unit Tests
// =============================================================================

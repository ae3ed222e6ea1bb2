//! # Price Composition
//!
//! Turns a raw supplier price into the figures a visitor sees.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  raw price ──► margin ──► discount ──► round                           │
//! │                                                                         │
//! │  1. marked = raw                                                       │
//! │  2. margin.value > 0 ?                                                 │
//! │        percentage: marked = marked × (1 + value/100)                   │
//! │        fixed:      marked = marked + value                             │
//! │  3. discount_amount = marked × pct/100                                 │
//! │  4. final_price     = marked − discount_amount                         │
//! │  5. round final_price and discount_amount to cents (half up)           │
//! │  6. price_with_margin = final + discount (unrounded values)            │
//! │                                                                         │
//! │  Example: raw 100, margin 10%, discount 20%                            │
//! │     marked 110 → discount 22 → final 88                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Margin always comes before discount. The compositor is total: NaN in,
//! NaN out.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::margin::AppliedMargin;
use crate::types::{MarginUnit, Room};

/// Output field names added to a priced room.
pub const PRICING_FIELDS: [&str; 5] = [
    "originalPrice",
    "priceWithMargin",
    "finalPrice",
    "discountAmount",
    "discountPercentage",
];

// =============================================================================
// Price Breakdown
// =============================================================================

/// Every derived figure for one room.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    /// Raw supplier price, unchanged.
    pub original_price: f64,

    /// Marked-up price reconstructed as `final + discount`. Not rounded.
    pub price_with_margin: f64,

    /// What the visitor pays, rounded to cents.
    pub final_price: f64,

    /// What the discount saves, rounded to cents.
    pub discount_amount: f64,

    /// Effective discount percentage that was applied.
    pub discount_percentage: f64,
}

/// Rounds to two decimals, halves going up (toward +∞).
///
/// ## Example
/// ```rust
/// use stayrate_core::pricing::round_to_cents;
///
/// assert_eq!(round_to_cents(3.3333), 3.33);
/// assert_eq!(round_to_cents(0.125), 0.13);
/// assert_eq!(round_to_cents(29.9997), 30.0);
/// ```
#[inline]
pub fn round_to_cents(value: f64) -> f64 {
    // Compare the fraction instead of adding 0.5, which can carry a value
    // just below the half over it.
    let scaled = value * 100.0;
    let floor = scaled.floor();
    let rounded = if scaled - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded / 100.0
}

/// Applies margin then discount to `raw_price`.
///
/// ## Example
/// ```rust
/// use stayrate_core::margin::AppliedMargin;
/// use stayrate_core::pricing::compute_price;
///
/// let price = compute_price(100.0, AppliedMargin::percentage(10.0), 20.0);
/// assert_eq!(price.discount_amount, 22.0);
/// assert_eq!(price.final_price, 88.0);
/// ```
pub fn compute_price(
    raw_price: f64,
    margin: AppliedMargin,
    discount_percentage: f64,
) -> PriceBreakdown {
    let mut marked = raw_price;

    if margin.is_effective() {
        marked = match margin.unit {
            MarginUnit::Percentage => marked * (1.0 + margin.value / 100.0),
            MarginUnit::Fixed => marked + margin.value,
        };
    }

    let discount_amount = marked * (discount_percentage / 100.0);
    let final_price = marked - discount_amount;

    PriceBreakdown {
        original_price: raw_price,
        price_with_margin: final_price + discount_amount,
        final_price: round_to_cents(final_price),
        discount_amount: round_to_cents(discount_amount),
        discount_percentage,
    }
}

// =============================================================================
// Priced Rooms
// =============================================================================

/// A room augmented with its [`PriceBreakdown`].
///
/// Serializes as the original room object with the five pricing fields
/// merged in at the top level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricedRoom {
    #[serde(flatten)]
    pub room: Room,

    #[serde(flatten)]
    pub pricing: PriceBreakdown,
}

/// Prices one room. Stale pricing fields on the input are replaced.
pub fn price_room(room: &Room, margin: AppliedMargin, discount_percentage: f64) -> PricedRoom {
    let mut room = room.clone();
    for field in PRICING_FIELDS {
        room.details.remove(field);
    }

    let pricing = compute_price(room.price, margin, discount_percentage);
    PricedRoom { room, pricing }
}

/// Prices every room in `rooms`, preserving order.
pub fn price_rooms(
    rooms: &[Room],
    margin: AppliedMargin,
    discount_percentage: f64,
) -> Vec<PricedRoom> {
    rooms
        .iter()
        .map(|room| price_room(room, margin, discount_percentage))
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

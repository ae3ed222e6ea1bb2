//! # Domain Types
//!
//! Policy records and the external room/hotel shapes the pricing path reads.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   Convention    │◄──│  DiscountCode   │   │     Margin      │       │
//! │  │  ─────────────  │ 1 │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  name (unique)  │ * │  code (UPPER)   │   │  margin_type    │       │
//! │  │  discount %     │   │  convention_id  │   │  entity_id?     │       │
//! │  │  validity       │   │  validity       │   │  value + unit   │       │
//! │  └─────────────────┘   └─────────────────┘   │  validity       │       │
//! │                                              └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │ SessionDiscount │   │  Hotel / Room   │  (external, read-only)      │
//! │  │  code, conv id  │   │  price + opaque │                             │
//! │  │  cached %       │   │  fields         │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Validity Fields
//! `is_active`, `valid_from` and `valid_until` share one meaning across every
//! record. See [`crate::validity`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;

// =============================================================================
// Convention
// =============================================================================

/// An organization entitled to a negotiated discount percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Convention {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name, unique across conventions.
    pub name: String,

    /// Nominal discount granted to holders of this convention's codes.
    pub discount_percentage: f64,

    /// Admin switch. Inactive conventions grant nothing.
    pub is_active: bool,

    /// First day the convention applies (inclusive).
    #[ts(as = "Option<String>")]
    pub valid_from: Option<NaiveDate>,

    /// Last day the convention applies (inclusive).
    #[ts(as = "Option<String>")]
    pub valid_until: Option<NaiveDate>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Discount Code
// =============================================================================

/// A redeemable token bound to exactly one [`Convention`].
///
/// The percentage is never stored here; it is always inherited from the
/// parent convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct DiscountCode {
    pub id: String,

    /// The code itself, stored uppercase. Lookups are case-insensitive.
    pub code: String,

    /// Parent convention. May dangle if the convention was deleted.
    pub convention_id: String,

    pub is_active: bool,

    #[ts(as = "Option<String>")]
    pub valid_from: Option<NaiveDate>,

    #[ts(as = "Option<String>")]
    pub valid_until: Option<NaiveDate>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Margin
// =============================================================================

/// Scope a margin applies to.
///
/// Only [`MarginType::Global`] is read by pricing today. Hotel and room-type
/// margins are stored and managed but not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum MarginType {
    /// Applies to every room.
    Global,
    /// Applies to one hotel (`entity_id` = hotel id).
    Hotel,
    /// Applies to one room type (`entity_id` = room type).
    RoomType,
}

impl MarginType {
    /// Whether margins of this type must carry an `entity_id`.
    #[inline]
    pub const fn requires_entity(&self) -> bool {
        !matches!(self, MarginType::Global)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            MarginType::Global => "global",
            MarginType::Hotel => "hotel",
            MarginType::RoomType => "room_type",
        }
    }
}

/// How a margin value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum MarginUnit {
    /// `value` is a percentage of the supplier price.
    Percentage,
    /// `value` is an absolute amount added to the supplier price.
    Fixed,
}

impl Default for MarginUnit {
    fn default() -> Self {
        MarginUnit::Percentage
    }
}

/// A markup policy applied to supplier prices before any discount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Margin {
    pub id: String,

    pub margin_type: MarginType,

    /// Hotel id or room type. `None` for global margins.
    pub entity_id: Option<String>,

    pub margin_value: f64,

    pub margin_unit: MarginUnit,

    pub is_active: bool,

    #[ts(as = "Option<String>")]
    pub valid_from: Option<NaiveDate>,

    #[ts(as = "Option<String>")]
    pub valid_until: Option<NaiveDate>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Margin {
    /// Whether this margin occupies the given `(type, entity)` slot.
    ///
    /// A missing and an empty entity id are the same slot.
    pub fn occupies(&self, margin_type: MarginType, entity_id: Option<&str>) -> bool {
        let own = self.entity_id.as_deref().filter(|e| !e.is_empty());
        let other = entity_id.filter(|e| !e.is_empty());
        self.margin_type == margin_type && own == other
    }
}

// =============================================================================
// Session Discount
// =============================================================================

/// Per-visitor discount state captured when a code is redeemed.
///
/// `discount_percentage` is a snapshot of the convention's percentage at
/// redemption time. Later admin edits do not reach an already-active session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SessionDiscount {
    /// The redeemed code, uppercase.
    pub discount_code: String,
    pub convention_id: String,
    pub convention_name: String,
    pub discount_percentage: f64,
}

// =============================================================================
// External: Rooms and Hotels
// =============================================================================

/// A room offer as delivered by the hotel data source.
///
/// Only `price` is read by pricing. Everything else rides along untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: Value,

    /// Raw supplier price.
    pub price: f64,

    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Room {
    pub fn new(id: impl Into<Value>, price: f64) -> Self {
        Room {
            id: id.into(),
            price,
            details: Map::new(),
        }
    }

    /// Attaches an opaque field.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

/// A hotel as delivered by the hotel data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotel {
    pub id: Value,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub stars: u8,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Hotel {
    /// Cheapest raw room price, or `+inf` for a hotel without rooms.
    pub fn cheapest_raw_price(&self) -> f64 {
        self.rooms
            .iter()
            .map(|r| r.price)
            .fold(f64::INFINITY, f64::min)
    }

    /// Matches an id given as text (`"3"`) against a numeric or string id.
    pub fn has_id(&self, id: &str) -> bool {
        match &self.id {
            Value::String(s) => s == id,
            Value::Number(n) => n.to_string() == id.trim(),
            _ => false,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

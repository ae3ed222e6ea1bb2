//! # stayrate-core: Pricing and Discount Rules
//!
//! This crate holds the rules that turn a supplier's room price into the
//! price a convention member sees. Everything here is a pure function over
//! typed records with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        stayrate Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Offers app (apps/offers)                        │   │
//! │  │    redeem code ──► list offers ──► hotel detail ──► logout      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ typed records + today's date           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ stayrate-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌──────────┐      │   │
//! │  │   │ validity │─►│  margin  │  │ discount │  │ pricing  │      │   │
//! │  │   │  window  │─►│ resolver │  │ resolver │  │compositor│      │   │
//! │  │   └──────────┘  └────┬─────┘  └────┬─────┘  └────▲─────┘      │   │
//! │  │                      └─────────────┴─────────────┘             │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 stayrate-db (Policy Provider)                   │   │
//! │  │        conventions, discount codes, margins in SQLite           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Conventions, codes, margins, session state, rooms, hotels
//! - [`validity`] - Active flag + inclusive date window check
//! - [`margin`] - Global margin resolution
//! - [`discount`] - Code redemption and per-render discount resolution
//! - [`pricing`] - Margin-then-discount price composition
//! - [`offers`] - Hotel filtering and bulk pricing
//! - [`validation`] - Admin input rules
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output. "Today" is a parameter.
//! 2. **Neutral Fallbacks**: a missing or expired policy yields a zero
//!    margin or zero discount, never an error.
//! 3. **Margin Before Discount**: the order is fixed.
//!
//! ## Example Usage
//!
//! ```rust
//! use stayrate_core::margin::AppliedMargin;
//! use stayrate_core::pricing::compute_price;
//!
//! // 100 raw, 10% markup, 20% convention discount
//! let price = compute_price(100.0, AppliedMargin::percentage(10.0), 20.0);
//!
//! assert_eq!(price.final_price, 88.0);
//! assert_eq!(price.discount_amount, 22.0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod discount;
pub mod error;
pub mod margin;
pub mod offers;
pub mod pricing;
pub mod types;
pub mod validation;
pub mod validity;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use discount::{redeem_code, resolve_discount};
pub use error::{CoreError, RedemptionError, ValidationError};
pub use margin::{resolve_global_margin, AppliedMargin};
pub use offers::{OfferFilter, PricedHotel};
pub use pricing::{compute_price, PriceBreakdown, PricedRoom};
pub use types::*;
pub use validity::{is_valid, Schedule, ValidityWindow};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Longest accepted discount code.
pub const MAX_CODE_LENGTH: usize = 50;

/// Label shown for a code whose convention was deleted.
pub const UNKNOWN_CONVENTION: &str = "Unknown";

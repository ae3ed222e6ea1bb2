//! # Offers
//!
//! Filtering and pricing of hotel lists for the offers page.
//!
//! ## Flow
//! ```text
//! hotels ──► OfferFilter::apply ──► price_hotels(margin, discount) ──► page
//!            destination / stars /
//!            cheapest raw price
//! ```
//!
//! The price range compares each hotel's cheapest *raw* room price, since
//! filtering happens before pricing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::margin::AppliedMargin;
use crate::pricing::{price_rooms, PricedRoom};
use crate::types::Hotel;

/// Visitor-selected filters. Absent fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferFilter {
    /// Case-insensitive substring of the hotel's name or address.
    pub destination: Option<String>,

    /// Accepted star ratings. Empty accepts all.
    #[serde(default)]
    pub stars: Vec<u8>,

    pub price_min: Option<f64>,

    pub price_max: Option<f64>,
}

impl OfferFilter {
    /// Parses the comma-separated star list used by the offers form
    /// (`"4,5"`). Unparsable entries are ignored.
    pub fn parse_stars(raw: &str) -> Vec<u8> {
        raw.split(',')
            .filter_map(|s| s.trim().parse::<u8>().ok())
            .collect()
    }

    pub fn matches(&self, hotel: &Hotel) -> bool {
        if let Some(destination) = self.destination.as_deref().map(str::trim) {
            if !destination.is_empty() {
                let needle = destination.to_lowercase();
                let hit = hotel.address.to_lowercase().contains(&needle)
                    || hotel.name.to_lowercase().contains(&needle);
                if !hit {
                    return false;
                }
            }
        }

        if !self.stars.is_empty() && !self.stars.contains(&hotel.stars) {
            return false;
        }

        if self.price_min.is_some() || self.price_max.is_some() {
            let cheapest = hotel.cheapest_raw_price();
            if matches!(self.price_min, Some(min) if cheapest < min) {
                return false;
            }
            if matches!(self.price_max, Some(max) if cheapest > max) {
                return false;
            }
        }

        true
    }

    /// Keeps the hotels that match, preserving order.
    pub fn apply<'a>(&self, hotels: &'a [Hotel]) -> Vec<&'a Hotel> {
        hotels.iter().filter(|h| self.matches(h)).collect()
    }
}

/// A hotel whose rooms carry pricing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricedHotel {
    pub id: Value,
    pub name: String,
    pub address: String,
    pub stars: u8,
    pub rooms: Vec<PricedRoom>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// Prices every room of `hotel`.
pub fn price_hotel(hotel: &Hotel, margin: AppliedMargin, discount_percentage: f64) -> PricedHotel {
    PricedHotel {
        id: hotel.id.clone(),
        name: hotel.name.clone(),
        address: hotel.address.clone(),
        stars: hotel.stars,
        rooms: price_rooms(&hotel.rooms, margin, discount_percentage),
        details: hotel.details.clone(),
    }
}

/// Prices every room of every hotel, preserving order.
pub fn price_hotels<'a, I>(hotels: I, margin: AppliedMargin, discount_percentage: f64) -> Vec<PricedHotel>
where
    I: IntoIterator<Item = &'a Hotel>,
{
    hotels
        .into_iter()
        .map(|h| price_hotel(h, margin, discount_percentage))
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

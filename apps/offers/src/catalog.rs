//! # Hotel Catalog
//!
//! Source of the raw hotel and room data that gets priced.
//!
//! The pricing path never owns hotel data: it reads `price`, `name`,
//! `address` and `stars`, and carries every other field through untouched.
//! [`StaticCatalog`] ships the Tunisian fallback inventory and can also be
//! loaded from a JSON file with the same shape.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

use stayrate_core::Hotel;

/// Catalog failures.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed catalog: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Anything that can list hotels.
#[async_trait]
pub trait HotelCatalog: Send + Sync {
    /// Every hotel, in display order.
    async fn hotels(&self) -> Result<Vec<Hotel>, CatalogError>;

    /// One hotel by id. `None` when absent.
    async fn hotel(&self, id: &str) -> Result<Option<Hotel>, CatalogError> {
        Ok(self.hotels().await?.into_iter().find(|h| h.has_id(id)))
    }
}

/// In-memory hotel list.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    hotels: Vec<Hotel>,
}

impl StaticCatalog {
    /// Parses a JSON array of hotels.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let hotels: Vec<Hotel> = serde_json::from_str(raw)?;
        debug!(count = hotels.len(), "Loaded hotel catalog");
        Ok(StaticCatalog { hotels })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// The built-in inventory: three hotels in Sousse and Djerba.
    ///
    /// Room `originalPrice` values are stale supplier list prices; pricing
    /// replaces them.
    pub fn tunisia() -> Self {
        let raw = json!([
            {
                "id": 1,
                "name": "Hôtel La Grande Bleue",
                "address": "Avenue Habib Bourguiba, Sousse",
                "stars": 5,
                "description": "Hôtel de luxe face à la mer avec spa et piscines",
                "image": "/images/hotels/grande-bleue.jpg",
                "rating": 4.7,
                "amenities": ["Piscine", "Spa", "Wi-Fi", "Restaurant", "Plage privée"],
                "rooms": [
                    {
                        "id": 1,
                        "type": "Chambre Deluxe",
                        "description": "Vue mer, balcon privé",
                        "price": 250,
                        "originalPrice": 300,
                        "available": true,
                        "capacity": 2,
                        "amenities": ["Climatisation", "Mini-bar", "Balcon"]
                    },
                    {
                        "id": 2,
                        "type": "Suite Présidentielle",
                        "description": "Suite avec salon et terrasse panoramique",
                        "price": 550,
                        "originalPrice": 700,
                        "available": true,
                        "capacity": 4,
                        "amenities": ["Jacuzzi", "Salon", "Terrasse"]
                    }
                ]
            },
            {
                "id": 2,
                "name": "Hôtel Le Pacha",
                "address": "Port El Kantaoui, Sousse",
                "stars": 4,
                "description": "Au coeur de la marina de Port El Kantaoui",
                "image": "/images/hotels/le-pacha.jpg",
                "rating": 4.3,
                "amenities": ["Piscine", "Wi-Fi", "Restaurant", "Parking"],
                "rooms": [
                    {
                        "id": 3,
                        "type": "Chambre Standard",
                        "description": "Chambre confortable côté jardin",
                        "price": 120,
                        "originalPrice": 150,
                        "available": true,
                        "capacity": 2,
                        "amenities": ["Climatisation", "TV"]
                    },
                    {
                        "id": 4,
                        "type": "Chambre Marina",
                        "description": "Vue sur le port de plaisance",
                        "price": 180,
                        "originalPrice": 220,
                        "available": true,
                        "capacity": 3,
                        "amenities": ["Climatisation", "TV", "Balcon"]
                    }
                ]
            },
            {
                "id": 3,
                "name": "Hôtel Les Dunes",
                "address": "Zone Touristique, Djerba",
                "stars": 5,
                "description": "Bungalows dans un jardin tropical en bord de plage",
                "image": "/images/hotels/les-dunes.jpg",
                "rating": 4.6,
                "amenities": ["Piscine", "Spa", "Golf", "Plage privée"],
                "rooms": [
                    {
                        "id": 5,
                        "type": "Bungalow Vue Jardin",
                        "description": "Bungalow avec terrasse sur le jardin",
                        "price": 200,
                        "originalPrice": 250,
                        "available": true,
                        "capacity": 2,
                        "amenities": ["Climatisation", "Terrasse"]
                    },
                    {
                        "id": 6,
                        "type": "Bungalow Vue Mer",
                        "description": "Bungalow face à la mer",
                        "price": 300,
                        "originalPrice": 380,
                        "available": true,
                        "capacity": 3,
                        "amenities": ["Climatisation", "Terrasse", "Vue mer"]
                    }
                ]
            }
        ]);

        StaticCatalog {
            hotels: hotels_from_value(raw),
        }
    }

    pub fn len(&self) -> usize {
        self.hotels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hotels.is_empty()
    }
}

/// Falls back to an empty catalog when `raw` does not match `Hotel`.
fn hotels_from_value(raw: Value) -> Vec<Hotel> {
    match serde_json::from_value(raw) {
        Ok(hotels) => hotels,
        Err(e) => {
            warn!(error = %e, "Built-in hotel catalog is malformed, serving no hotels");
            Vec::new()
        }
    }
}

#[async_trait]
impl HotelCatalog for StaticCatalog {
    async fn hotels(&self) -> Result<Vec<Hotel>, CatalogError> {
        Ok(self.hotels.clone())
    }
}

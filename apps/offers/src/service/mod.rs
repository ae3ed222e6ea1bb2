//! # Service Layer
//!
//! - [`OfferService`]: visitor flow over any [`stayrate_db::PolicyProvider`]
//!   and [`crate::catalog::HotelCatalog`]
//! - [`AdminService`]: policy management over the database

pub mod admin;
pub mod offers;

pub use admin::{
    AdminService, CodeInput, CodeListing, CodesPage, ConventionInput, DashboardStats, MarginInput,
};
pub use offers::{HotelPage, OfferService, OffersPage};

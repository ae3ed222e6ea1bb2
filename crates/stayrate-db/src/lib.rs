//! # stayrate-db: Policy Storage for stayrate
//!
//! This crate stores conventions, discount codes and margins in SQLite and
//! hands them to the pricing path through the [`PolicyProvider`] trait.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        stayrate Data Flow                               │
//! │                                                                         │
//! │  OfferService::offers / AdminService::add_code                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   stayrate-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ Convention    │    │ 001_initial  │  │   │
//! │  │   │ SqlitePool    │◄───│ DiscountCode  │    │  _schema.sql │  │   │
//! │  │   │               │    │ Margin        │    │              │  │   │
//! │  │   └───────┬───────┘    └───────────────┘    └──────────────┘  │   │
//! │  │           │                                                     │   │
//! │  │   ┌───────▼─────────────────────────────┐                      │   │
//! │  │   │ PolicyProvider (provider.rs)        │◄── PolicySnapshot    │   │
//! │  │   │ conventions / discount_code / margins│    (in-memory)      │   │
//! │  │   └─────────────────────────────────────┘                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │                     ./stayrate.db                               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Convention, discount code and margin repositories
//! - [`provider`] - The policy provider seam
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stayrate_db::{Database, DbConfig, PolicyProvider};
//!
//! let db = Database::new(DbConfig::new("./stayrate.db")).await?;
//!
//! let margins = db.margins().list().await?;
//! let code = db.discount_code("sante2024").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod provider;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use provider::{PolicyProvider, PolicySnapshot};

// Repository re-exports for convenience
pub use repository::convention::ConventionRepository;
pub use repository::discount_code::DiscountCodeRepository;
pub use repository::margin::MarginRepository;

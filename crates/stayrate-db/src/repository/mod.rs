//! # Repository Module
//!
//! Database repository implementations for stayrate policy records.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  AdminService                                                          │
//! │       │                                                                 │
//! │       │  db.discount_codes().insert(&code)                             │
//! │       ▼                                                                 │
//! │  DiscountCodeRepository                                                │
//! │  ├── list(&self)                                                       │
//! │  ├── find_by_code(&self, code)                                         │
//! │  ├── insert(&self, code)                                               │
//! │  └── update(&self, code)                                               │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ConventionRepository`] - Convention CRUD
//! - [`DiscountCodeRepository`] - Code CRUD and case-insensitive lookup
//! - [`MarginRepository`] - Margin listing and one-per-scope save
//!
//! [`ConventionRepository`]: convention::ConventionRepository
//! [`DiscountCodeRepository`]: discount_code::DiscountCodeRepository
//! [`MarginRepository`]: margin::MarginRepository

pub mod convention;
pub mod discount_code;
pub mod margin;

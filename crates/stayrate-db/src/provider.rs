//! # Policy Provider
//!
//! The single seam through which the pricing path reads policy records.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   OfferService<P: PolicyProvider>                                      │
//! │        │                                                                │
//! │        ├── conventions()        ──► discount resolution                │
//! │        ├── discount_code(code)  ──► redemption                         │
//! │        └── margins()            ──► margin resolution                  │
//! │                                                                         │
//! │   implemented by:                                                       │
//! │     Database        SQLite through the repositories                    │
//! │     PolicySnapshot  plain vectors held in memory                       │
//! │     Arc<P>          shared handle to either                            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::DbResult;
use crate::pool::Database;
use stayrate_core::discount::find_code;
use stayrate_core::{Convention, DiscountCode, Margin};

/// Supplies the policy records pricing depends on.
#[async_trait]
pub trait PolicyProvider: Send + Sync {
    /// Every convention, active or not.
    async fn conventions(&self) -> DbResult<Vec<Convention>>;

    /// The code matching `code` case-insensitively, active or not.
    async fn discount_code(&self, code: &str) -> DbResult<Option<DiscountCode>>;

    /// Every margin, of every type.
    async fn margins(&self) -> DbResult<Vec<Margin>>;
}

#[async_trait]
impl PolicyProvider for Database {
    async fn conventions(&self) -> DbResult<Vec<Convention>> {
        Database::conventions(self).list().await
    }

    async fn discount_code(&self, code: &str) -> DbResult<Option<DiscountCode>> {
        self.discount_codes().find_by_code(code).await
    }

    async fn margins(&self) -> DbResult<Vec<Margin>> {
        Database::margins(self).list().await
    }
}

#[async_trait]
impl<P: PolicyProvider + ?Sized> PolicyProvider for Arc<P> {
    async fn conventions(&self) -> DbResult<Vec<Convention>> {
        (**self).conventions().await
    }

    async fn discount_code(&self, code: &str) -> DbResult<Option<DiscountCode>> {
        (**self).discount_code(code).await
    }

    async fn margins(&self) -> DbResult<Vec<Margin>> {
        (**self).margins().await
    }
}

// =============================================================================
// In-Memory Snapshot
// =============================================================================

/// A fixed set of policy records held in memory.
///
/// ## Usage
/// ```rust,ignore
/// let policies = PolicySnapshot::new()
///     .with_convention(convention)
///     .with_code(code)
///     .with_margin(global_margin);
///
/// let service = OfferService::new(policies, catalog, config);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PolicySnapshot {
    pub conventions: Vec<Convention>,
    pub codes: Vec<DiscountCode>,
    pub margins: Vec<Margin>,
}

impl PolicySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_convention(mut self, convention: Convention) -> Self {
        self.conventions.push(convention);
        self
    }

    pub fn with_code(mut self, code: DiscountCode) -> Self {
        self.codes.push(code);
        self
    }

    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margins.push(margin);
        self
    }
}

#[async_trait]
impl PolicyProvider for PolicySnapshot {
    async fn conventions(&self) -> DbResult<Vec<Convention>> {
        Ok(self.conventions.clone())
    }

    async fn discount_code(&self, code: &str) -> DbResult<Option<DiscountCode>> {
        Ok(find_code(&self.codes, code).cloned())
    }

    async fn margins(&self) -> DbResult<Vec<Margin>> {
        Ok(self.margins.clone())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

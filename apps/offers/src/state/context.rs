//! # Application Context
//!
//! Process-wide resources, created once and passed explicitly.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AppConfig::from_env()                                                 │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  AppContext::init(&config) ── opens pool, runs migrations              │
//! │        │                                                                │
//! │        ├──► offer_service(catalog) ─► OfferService<Database, C>        │
//! │        └──► admin_service()        ─► AdminService                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::info;

use crate::catalog::HotelCatalog;
use crate::config::AppConfig;
use crate::error::ServiceError;
use crate::service::{AdminService, OfferService};
use stayrate_db::Database;

/// Configuration plus the database pool.
#[derive(Debug, Clone)]
pub struct AppContext {
    config: AppConfig,
    db: Database,
}

impl AppContext {
    /// Opens the database described by `config`.
    pub async fn init(config: &AppConfig) -> Result<Self, ServiceError> {
        let db = Database::new(config.db_config()).await?;

        info!(
            path = %config.database_path.display(),
            currency = %config.currency,
            "Application context ready"
        );

        Ok(AppContext {
            config: config.clone(),
            db,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Offer service reading policies from this context's database.
    pub fn offer_service<C: HotelCatalog>(&self, catalog: C) -> OfferService<Database, C> {
        OfferService::new(self.db.clone(), catalog, self.config.clone())
    }

    pub fn admin_service(&self) -> AdminService {
        AdminService::new(self.db.clone())
    }

    pub async fn shutdown(&self) {
        self.db.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use std::path::PathBuf;

    fn memory_config() -> AppConfig {
        AppConfig {
            database_path: PathBuf::from(":memory:"),
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn test_init_in_memory() {
        let ctx = AppContext::init(&memory_config()).await.unwrap();
        assert!(ctx.database().health_check().await);
        assert_eq!(ctx.config().currency, "TND");

        let stats = ctx.admin_service().dashboard().await.unwrap();
        assert_eq!(stats.conventions, 0);

        let offers = ctx.offer_service(StaticCatalog::tunisia());
        assert_eq!(offers.config().currency, "TND");

        ctx.shutdown().await;
    }
}

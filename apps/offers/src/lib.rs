//! # stayrate Offers
//!
//! Orchestration layer that turns policy records and a hotel catalog into
//! priced offers for visitors holding a convention discount code.
//!
//! ## Module Organization
//! ```text
//! stayrate_offers/
//! ├── lib.rs          ◄─── You are here (logging setup, exports)
//! ├── config.rs       ◄─── Environment configuration
//! ├── catalog.rs      ◄─── HotelCatalog trait + static fallback inventory
//! ├── error.rs        ◄─── ServiceError returned by every service call
//! ├── state/
//! │   ├── context.rs  ◄─── AppContext (config + database), passed explicitly
//! │   └── session.rs  ◄─── VisitorSession (redeemed discount)
//! ├── service/
//! │   ├── offers.rs   ◄─── redeem / offers / hotel / logout
//! │   └── admin.rs    ◄─── conventions, codes, margins, dashboard
//! └── main.rs         ◄─── `offers` CLI
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! let config = AppConfig::from_env()?;
//! let ctx = AppContext::init(&config).await?;
//!
//! let offers = ctx.offer_service(StaticCatalog::tunisia());
//! let mut session = VisitorSession::new();
//! offers.redeem(&mut session, "SANTE2024").await?;
//! let page = offers.offers(&session, &OfferFilter::default()).await?;
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod service;
pub mod state;

use tracing_subscriber::EnvFilter;

pub use catalog::{CatalogError, HotelCatalog, StaticCatalog};
pub use config::{AppConfig, ConfigError};
pub use error::{ErrorCode, ServiceError};
pub use service::{AdminService, OfferService};
pub use state::{AppContext, VisitorSession};

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,stayrate=debug,sqlx=warn";

/// Initializes the tracing subscriber.
///
/// Uses `RUST_LOG` when set, otherwise [`DEFAULT_LOG_FILTER`]. Logs go to
/// stderr so command output on stdout stays machine-readable.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

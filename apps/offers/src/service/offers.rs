//! # Offer Service
//!
//! Visitor-facing flow: redeem a code, browse priced hotels, leave.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  redeem(code)                                                          │
//! │    ├── PolicyProvider::discount_code ─┐  (concurrent)                  │
//! │    ├── PolicyProvider::conventions   ─┘                                │
//! │    └── redeem_code ──► VisitorSession::set                             │
//! │                                                                         │
//! │  offers(session, filter) / hotel(session, id)                          │
//! │    ├── HotelCatalog::hotels          ─┐                                │
//! │    ├── PolicyProvider::margins       ─┤  (concurrent)                  │
//! │    ├── PolicyProvider::conventions   ─┘                                │
//! │    ├── resolve_global_margin + resolve_discount                        │
//! │    └── OfferFilter::apply ──► price_hotels                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Redemption checks the code's own dates and the convention's active flag.
//! Rendering checks the convention's dates as well, so a convention that
//! lapses after redemption silently stops discounting.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::HotelCatalog;
use crate::config::AppConfig;
use crate::error::ServiceError;
use crate::state::VisitorSession;
use stayrate_core::offers::{price_hotel, price_hotels};
use stayrate_core::validation::normalize_code;
use stayrate_core::{
    redeem_code, resolve_discount, resolve_global_margin, AppliedMargin, OfferFilter,
    PricedHotel, RedemptionError, SessionDiscount,
};
use stayrate_db::PolicyProvider;

// =============================================================================
// Response Types
// =============================================================================

/// The offers listing for one visitor.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OffersPage {
    pub convention_name: String,
    pub discount_code: String,

    /// Percentage captured at redemption.
    pub discount_percentage: f64,

    /// Percentage actually applied today (0 once the convention lapses).
    pub effective_discount_percentage: f64,

    pub margin: AppliedMargin,
    pub currency: String,
    pub filter: OfferFilter,
    pub hotels: Vec<PricedHotel>,
}

/// One priced hotel.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelPage {
    pub convention_name: String,
    pub discount_code: String,
    pub effective_discount_percentage: f64,
    pub currency: String,
    pub hotel: PricedHotel,
}

/// Margin and discount in force for one render.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PricingTerms {
    margin: AppliedMargin,
    discount_percentage: f64,
}

// =============================================================================
// Service
// =============================================================================

/// Prices a hotel catalog for visitors holding a convention code.
#[derive(Debug, Clone)]
pub struct OfferService<P, C> {
    policies: P,
    catalog: C,
    config: AppConfig,
    fixed_today: Option<NaiveDate>,
}

impl<P: PolicyProvider, C: HotelCatalog> OfferService<P, C> {
    pub fn new(policies: P, catalog: C, config: AppConfig) -> Self {
        OfferService {
            policies,
            catalog,
            config,
            fixed_today: None,
        }
    }

    /// Pins the reference date instead of reading the clock.
    pub fn at_date(mut self, today: NaiveDate) -> Self {
        self.fixed_today = Some(today);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn today(&self) -> NaiveDate {
        self.fixed_today.unwrap_or_else(|| self.config.today())
    }

    /// Validates `input` and stores the resulting discount in `session`.
    ///
    /// On failure the session is left as it was.
    ///
    /// ## Returns
    /// * `Ok(SessionDiscount)` - Now held by the session
    /// * `Err(CODE_REJECTED)` - Blank, unknown, inactive, or out-of-window code
    pub async fn redeem(
        &self,
        session: &mut VisitorSession,
        input: &str,
    ) -> Result<SessionDiscount, ServiceError> {
        let normalized = normalize_code(input);
        if normalized.is_empty() {
            return Err(RedemptionError::MissingCode.into());
        }

        let (code, conventions) = tokio::join!(
            self.policies.discount_code(&normalized),
            self.policies.conventions()
        );
        let (code, conventions) = (code?, conventions?);

        match redeem_code(&normalized, code.as_slice(), &conventions, self.today()) {
            Ok(discount) => {
                info!(
                    code = %discount.discount_code,
                    convention = %discount.convention_name,
                    percentage = discount.discount_percentage,
                    "Discount code redeemed"
                );
                session.set(discount.clone());
                Ok(discount)
            }
            Err(e) => {
                warn!(code = %normalized, reason = %e, "Discount code refused");
                Err(e.into())
            }
        }
    }

    /// Filters then prices the catalog for the session's discount.
    pub async fn offers(
        &self,
        session: &VisitorSession,
        filter: &OfferFilter,
    ) -> Result<OffersPage, ServiceError> {
        let discount = session.require()?;

        let (hotels, terms) = tokio::join!(self.catalog.hotels(), self.pricing_terms(discount));
        let (hotels, terms) = (hotels?, terms?);

        let matching = filter.apply(&hotels);
        debug!(
            total = hotels.len(),
            matching = matching.len(),
            "Filtered hotel offers"
        );

        Ok(OffersPage {
            convention_name: discount.convention_name.clone(),
            discount_code: discount.discount_code.clone(),
            discount_percentage: discount.discount_percentage,
            effective_discount_percentage: terms.discount_percentage,
            margin: terms.margin,
            currency: self.config.currency.clone(),
            filter: filter.clone(),
            hotels: price_hotels(matching, terms.margin, terms.discount_percentage),
        })
    }

    /// Prices one hotel for the session's discount.
    pub async fn hotel(
        &self,
        session: &VisitorSession,
        hotel_id: &str,
    ) -> Result<HotelPage, ServiceError> {
        let discount = session.require()?;

        let (hotel, terms) = tokio::join!(self.catalog.hotel(hotel_id), self.pricing_terms(discount));
        let hotel = hotel?.ok_or_else(|| ServiceError::not_found("Hotel", hotel_id))?;
        let terms = terms?;

        Ok(HotelPage {
            convention_name: discount.convention_name.clone(),
            discount_code: discount.discount_code.clone(),
            effective_discount_percentage: terms.discount_percentage,
            currency: self.config.currency.clone(),
            hotel: price_hotel(&hotel, terms.margin, terms.discount_percentage),
        })
    }

    /// Ends the visitor's session.
    pub fn logout(&self, session: &mut VisitorSession) {
        if let Some(discount) = session.current() {
            debug!(code = %discount.discount_code, "Visitor logged out");
        }
        session.clear();
    }

    async fn pricing_terms(&self, discount: &SessionDiscount) -> Result<PricingTerms, ServiceError> {
        let (margins, conventions) =
            tokio::join!(self.policies.margins(), self.policies.conventions());
        let (margins, conventions) = (margins?, conventions?);

        let today = self.today();
        let terms = PricingTerms {
            margin: resolve_global_margin(&margins, today),
            discount_percentage: resolve_discount(discount, &conventions, today),
        };

        debug!(
            margin = terms.margin.value,
            discount = terms.discount_percentage,
            %today,
            "Resolved pricing terms"
        );
        Ok(terms)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use crate::error::ErrorCode;
    use chrono::Utc;
    use stayrate_core::{Convention, DiscountCode, Margin, MarginType, MarginUnit};
    use stayrate_db::{Database, DbConfig, PolicySnapshot};

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn convention(id: &str, name: &str, pct: f64) -> Convention {
        Convention {
            id: id.to_string(),
            name: name.to_string(),
            discount_percentage: pct,
            is_active: true,
            valid_from: None,
            valid_until: None,
            created_at: Utc::now(),
        }
    }

    fn code(id: &str, code: &str, convention_id: &str) -> DiscountCode {
        DiscountCode {
            id: id.to_string(),
            code: code.to_string(),
            convention_id: convention_id.to_string(),
            is_active: true,
            valid_from: None,
            valid_until: None,
            created_at: Utc::now(),
        }
    }

    fn global_margin(value: f64) -> Margin {
        Margin {
            id: "m-1".to_string(),
            margin_type: MarginType::Global,
            entity_id: None,
            margin_value: value,
            margin_unit: MarginUnit::Percentage,
            is_active: true,
            valid_from: None,
            valid_until: None,
            created_at: Utc::now(),
        }
    }

    fn policies() -> PolicySnapshot {
        PolicySnapshot::new()
            .with_convention(convention("c-1", "Ministère de la Santé", 20.0))
            .with_convention(convention("c-2", "Entreprise partenaire A", 15.0))
            .with_code(code("d-1", "SANTE2024", "c-1"))
            .with_code(code("d-2", "PARTNER15", "c-2"))
            .with_margin(global_margin(10.0))
    }

    fn service(policies: PolicySnapshot) -> OfferService<PolicySnapshot, StaticCatalog> {
        OfferService::new(policies, StaticCatalog::tunisia(), AppConfig::default())
            .at_date(day(6, 15))
    }

    async fn redeemed(service: &OfferService<PolicySnapshot, StaticCatalog>, input: &str) -> VisitorSession {
        let mut session = VisitorSession::new();
        service.redeem(&mut session, input).await.unwrap();
        session
    }

    #[tokio::test]
    async fn test_redeem_sets_session() {
        let service = service(policies());
        let mut session = VisitorSession::new();

        let discount = service.redeem(&mut session, " partner15 ").await.unwrap();
        assert_eq!(discount.discount_code, "PARTNER15");
        assert_eq!(discount.convention_name, "Entreprise partenaire A");
        assert_eq!(session.current(), Some(&discount));
    }

    #[tokio::test]
    async fn test_redeem_refusals_leave_session() {
        let mut snapshot = policies().with_convention(Convention {
            is_active: false,
            ..convention("c-3", "Organisme public B", 25.0)
        });
        snapshot = snapshot.with_code(code("d-3", "PUBLIC25", "c-3"));
        snapshot = snapshot.with_code(DiscountCode {
            valid_until: Some(day(6, 14)),
            ..code("d-4", "OLD2024", "c-1")
        });
        snapshot = snapshot.with_code(DiscountCode {
            valid_from: Some(day(6, 16)),
            ..code("d-5", "SOON2025", "c-1")
        });
        let service = service(snapshot);

        let mut session = VisitorSession::new();
        let cases = [
            ("   ", "Please enter a discount code"),
            ("NOPE", "Invalid or expired code"),
            ("PUBLIC25", "Invalid code (convention inactive)"),
            ("OLD2024", "This code has expired"),
            ("SOON2025", "This code is not valid yet"),
        ];

        for (input, message) in cases {
            let err = service.redeem(&mut session, input).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::CodeRejected, "{input}");
            assert_eq!(err.message, message, "{input}");
            assert!(!session.is_redeemed());
        }
    }

    #[tokio::test]
    async fn test_offers_require_session() {
        let service = service(policies());
        let err = service
            .offers(&VisitorSession::new(), &OfferFilter::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionRequired);
    }

    #[tokio::test]
    async fn test_offers_priced_with_margin_then_discount() {
        let service = service(policies());
        let session = redeemed(&service, "SANTE2024").await;

        let page = service.offers(&session, &OfferFilter::default()).await.unwrap();
        assert_eq!(page.convention_name, "Ministère de la Santé");
        assert_eq!(page.effective_discount_percentage, 20.0);
        assert_eq!(page.margin, AppliedMargin::percentage(10.0));
        assert_eq!(page.currency, "TND");
        assert_eq!(page.hotels.len(), 3);

        // 120 → 132 with margin → 105.60 after 20%
        let standard = &page.hotels[1].rooms[0];
        assert_eq!(standard.pricing.original_price, 120.0);
        assert_eq!(standard.pricing.discount_amount, 26.4);
        assert_eq!(standard.pricing.final_price, 105.6);

        // Stale list prices are replaced.
        let json = serde_json::to_value(&page.hotels[0].rooms[0]).unwrap();
        assert_eq!(json["originalPrice"], 250.0);
        assert_eq!(json["finalPrice"], 220.0);
    }

    #[tokio::test]
    async fn test_offers_filtered_on_raw_prices() {
        let service = service(policies());
        let session = redeemed(&service, "SANTE2024").await;

        let by_destination = OfferFilter {
            destination: Some("djerba".to_string()),
            ..OfferFilter::default()
        };
        let page = service.offers(&session, &by_destination).await.unwrap();
        let names: Vec<&str> = page.hotels.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["Hôtel Les Dunes"]);

        let by_stars = OfferFilter {
            stars: vec![4],
            ..OfferFilter::default()
        };
        let page = service.offers(&session, &by_stars).await.unwrap();
        assert_eq!(page.hotels.len(), 1);
        assert_eq!(page.hotels[0].name, "Hôtel Le Pacha");

        // 120 raw fits under 125 even though it is priced at 132 with margin.
        let by_price = OfferFilter {
            price_max: Some(125.0),
            ..OfferFilter::default()
        };
        let page = service.offers(&session, &by_price).await.unwrap();
        assert_eq!(page.hotels.len(), 1);
        assert_eq!(page.hotels[0].name, "Hôtel Le Pacha");
    }

    #[tokio::test]
    async fn test_lapsed_convention_stops_discount() {
        // Convention dates are not checked at redemption, only when pricing.
        let snapshot = PolicySnapshot::new()
            .with_convention(Convention {
                valid_until: Some(day(6, 1)),
                ..convention("c-1", "Ministère de la Santé", 20.0)
            })
            .with_code(code("d-1", "SANTE2024", "c-1"))
            .with_margin(global_margin(10.0));
        let service = service(snapshot);
        let session = redeemed(&service, "SANTE2024").await;

        let page = service.offers(&session, &OfferFilter::default()).await.unwrap();
        assert_eq!(page.discount_percentage, 20.0);
        assert_eq!(page.effective_discount_percentage, 0.0);

        let standard = &page.hotels[1].rooms[0];
        assert_eq!(standard.pricing.final_price, 132.0);
        assert_eq!(standard.pricing.discount_amount, 0.0);
    }

    #[tokio::test]
    async fn test_no_margin_prices_raw() {
        let mut snapshot = policies();
        snapshot.margins.clear();
        let service = service(snapshot);
        let session = redeemed(&service, "PARTNER15").await;

        let page = service.hotel(&session, "2").await.unwrap();
        assert_eq!(page.hotel.rooms[0].pricing.final_price, 102.0);
        assert_eq!(page.hotel.rooms[0].pricing.discount_amount, 18.0);
    }

    #[tokio::test]
    async fn test_hotel_lookup() {
        let service = service(policies());
        let session = redeemed(&service, "SANTE2024").await;

        let page = service.hotel(&session, "3").await.unwrap();
        assert_eq!(page.hotel.name, "Hôtel Les Dunes");
        assert_eq!(page.hotel.rooms.len(), 2);
        assert_eq!(page.hotel.details["rating"], 4.6);

        let err = service.hotel(&session, "42").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = service.hotel(&VisitorSession::new(), "3").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionRequired);
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let service = service(policies());
        let mut session = redeemed(&service, "SANTE2024").await;

        service.logout(&mut session);
        assert!(!session.is_redeemed());

        let err = service
            .offers(&session, &OfferFilter::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionRequired);
    }

    #[tokio::test]
    async fn test_database_backed_flow() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.conventions()
            .insert(&convention("c-1", "Ministère de la Santé", 20.0))
            .await
            .unwrap();
        db.discount_codes()
            .insert(&code("d-1", "sante2024", "c-1"))
            .await
            .unwrap();
        db.margins().save(&global_margin(10.0)).await.unwrap();

        let service = OfferService::new(db, StaticCatalog::tunisia(), AppConfig::default())
            .at_date(day(6, 15));
        let mut session = VisitorSession::new();
        service.redeem(&mut session, "Sante2024").await.unwrap();

        let page = service.offers(&session, &OfferFilter::default()).await.unwrap();
        assert_eq!(page.hotels[1].rooms[0].pricing.final_price, 105.6);
    }
}

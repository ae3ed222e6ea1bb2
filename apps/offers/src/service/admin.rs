//! # Admin Service
//!
//! Management of the policy records: conventions, discount codes, margins.
//!
//! Every write passes through `stayrate_core::validation` before reaching
//! the database, so the pricing path only ever reads well-formed records.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ConventionInput / CodeInput / MarginInput  (raw form values)          │
//! │        │                                                                │
//! │        ▼  validate + parse dates                                        │
//! │  Convention / DiscountCode / Margin         (typed records)            │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  ConventionRepository / DiscountCodeRepository / MarginRepository      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::ServiceError;
use stayrate_core::validation::{
    normalize_code, parse_optional_date, validate_code, validate_convention_name,
    validate_date_range, validate_discount_percentage, validate_margin_scope,
    validate_margin_value, validate_uuid,
};
use stayrate_core::{
    Convention, CoreError, DiscountCode, Margin, MarginType, MarginUnit, UNKNOWN_CONVENTION,
};
use stayrate_db::Database;

// =============================================================================
// Inputs
// =============================================================================

/// Convention form values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConventionInput {
    pub name: String,
    pub discount_percentage: f64,
    /// Ignored on add: new conventions start active.
    pub is_active: bool,
    pub valid_from: Option<String>,
    pub valid_until: Option<String>,
}

/// Discount code form values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CodeInput {
    pub code: String,
    pub convention_id: String,
    /// Ignored on add: new codes start active.
    pub is_active: bool,
    pub valid_from: Option<String>,
    pub valid_until: Option<String>,
}

/// Margin form values.
#[derive(Debug, Clone, Deserialize)]
pub struct MarginInput {
    pub margin_type: MarginType,
    pub entity_id: Option<String>,
    pub margin_value: f64,
    #[serde(default)]
    pub margin_unit: MarginUnit,
    pub is_active: bool,
    pub valid_from: Option<String>,
    pub valid_until: Option<String>,
}

fn parse_window(
    valid_from: Option<&str>,
    valid_until: Option<&str>,
) -> Result<(Option<NaiveDate>, Option<NaiveDate>), ServiceError> {
    let from = parse_optional_date("valid_from", valid_from)?;
    let until = parse_optional_date("valid_until", valid_until)?;
    validate_date_range(from, until)?;
    Ok((from, until))
}

// =============================================================================
// Responses
// =============================================================================

/// Dashboard counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub conventions: i64,
    pub codes: i64,
    /// Codes with the admin switch on, whatever their dates.
    pub active_codes: i64,
}

/// A code with its convention's name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeListing {
    #[serde(flatten)]
    pub code: DiscountCode,
    pub convention_name: String,
}

/// The codes screen: every code plus the conventions a new code may use.
#[derive(Debug, Clone, Serialize)]
pub struct CodesPage {
    pub codes: Vec<CodeListing>,
    pub active_conventions: Vec<Convention>,
}

// =============================================================================
// Service
// =============================================================================

/// Admin operations over the policy database.
#[derive(Debug, Clone)]
pub struct AdminService {
    db: Database,
}

impl AdminService {
    pub fn new(db: Database) -> Self {
        AdminService { db }
    }

    pub async fn dashboard(&self) -> Result<DashboardStats, ServiceError> {
        let conventions = self.db.conventions();
        let codes = self.db.discount_codes();

        let (conventions, codes, active_codes) =
            tokio::try_join!(conventions.count(), codes.count(), codes.count_active())?;

        Ok(DashboardStats {
            conventions,
            codes,
            active_codes,
        })
    }

    // -------------------------------------------------------------------------
    // Conventions
    // -------------------------------------------------------------------------

    /// Every convention, newest first.
    pub async fn conventions(&self) -> Result<Vec<Convention>, ServiceError> {
        Ok(self.db.conventions().list().await?)
    }

    pub async fn add_convention(&self, input: ConventionInput) -> Result<Convention, ServiceError> {
        validate_convention_name(&input.name)?;
        validate_discount_percentage(input.discount_percentage)?;
        let (valid_from, valid_until) =
            parse_window(input.valid_from.as_deref(), input.valid_until.as_deref())?;

        let convention = self
            .db
            .conventions()
            .insert(&Convention {
                id: Uuid::new_v4().to_string(),
                name: input.name.trim().to_string(),
                discount_percentage: input.discount_percentage,
                is_active: true,
                valid_from,
                valid_until,
                created_at: Utc::now(),
            })
            .await?;

        info!(id = %convention.id, name = %convention.name, "Convention created");
        Ok(convention)
    }

    pub async fn edit_convention(
        &self,
        id: &str,
        input: ConventionInput,
    ) -> Result<Convention, ServiceError> {
        validate_uuid(id)?;
        validate_convention_name(&input.name)?;
        validate_discount_percentage(input.discount_percentage)?;
        let (valid_from, valid_until) =
            parse_window(input.valid_from.as_deref(), input.valid_until.as_deref())?;

        let repo = self.db.conventions();
        let existing = repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::ConventionNotFound(id.to_string()))?;

        let updated = Convention {
            name: input.name.trim().to_string(),
            discount_percentage: input.discount_percentage,
            is_active: input.is_active,
            valid_from,
            valid_until,
            ..existing
        };
        repo.update(&updated).await?;

        info!(id = %id, active = updated.is_active, "Convention updated");
        Ok(updated)
    }

    /// Deletes a convention. Its codes remain and list as "Unknown".
    pub async fn delete_convention(&self, id: &str) -> Result<(), ServiceError> {
        validate_uuid(id)?;
        self.db.conventions().delete(id).await?;
        info!(id = %id, "Convention deleted");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Discount Codes
    // -------------------------------------------------------------------------

    /// Every code, newest first, with convention names joined.
    pub async fn codes(&self) -> Result<CodesPage, ServiceError> {
        let conventions = self.db.conventions();
        let code_repo = self.db.discount_codes();
        let (codes, all, active) = tokio::try_join!(
            code_repo.list(),
            conventions.list(),
            conventions.list_active()
        )?;

        let names: HashMap<&str, &str> = all
            .iter()
            .map(|c| (c.id.as_str(), c.name.as_str()))
            .collect();

        let codes = codes
            .into_iter()
            .map(|code| {
                let convention_name = names
                    .get(code.convention_id.as_str())
                    .copied()
                    .unwrap_or(UNKNOWN_CONVENTION)
                    .to_string();
                CodeListing {
                    code,
                    convention_name,
                }
            })
            .collect();

        Ok(CodesPage {
            codes,
            active_conventions: active,
        })
    }

    pub async fn add_code(&self, input: CodeInput) -> Result<DiscountCode, ServiceError> {
        let code = normalize_code(&input.code);
        validate_code(&code)?;
        self.require_convention(&input.convention_id).await?;
        let (valid_from, valid_until) =
            parse_window(input.valid_from.as_deref(), input.valid_until.as_deref())?;

        let stored = self
            .db
            .discount_codes()
            .insert(&DiscountCode {
                id: Uuid::new_v4().to_string(),
                code,
                convention_id: input.convention_id,
                is_active: true,
                valid_from,
                valid_until,
                created_at: Utc::now(),
            })
            .await?;

        info!(id = %stored.id, code = %stored.code, "Discount code created");
        Ok(stored)
    }

    pub async fn edit_code(&self, id: &str, input: CodeInput) -> Result<DiscountCode, ServiceError> {
        validate_uuid(id)?;
        let code = normalize_code(&input.code);
        validate_code(&code)?;
        self.require_convention(&input.convention_id).await?;
        let (valid_from, valid_until) =
            parse_window(input.valid_from.as_deref(), input.valid_until.as_deref())?;

        let repo = self.db.discount_codes();
        let existing = repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::DiscountCodeNotFound(id.to_string()))?;

        let updated = DiscountCode {
            code,
            convention_id: input.convention_id,
            is_active: input.is_active,
            valid_from,
            valid_until,
            ..existing
        };
        repo.update(&updated).await?;

        info!(id = %id, code = %updated.code, "Discount code updated");
        Ok(updated)
    }

    pub async fn delete_code(&self, id: &str) -> Result<(), ServiceError> {
        validate_uuid(id)?;
        self.db.discount_codes().delete(id).await?;
        info!(id = %id, "Discount code deleted");
        Ok(())
    }

    async fn require_convention(&self, convention_id: &str) -> Result<(), ServiceError> {
        validate_uuid(convention_id)?;
        match self.db.conventions().get_by_id(convention_id).await? {
            Some(_) => Ok(()),
            None => Err(CoreError::ConventionNotFound(convention_id.to_string()).into()),
        }
    }

    // -------------------------------------------------------------------------
    // Margins
    // -------------------------------------------------------------------------

    /// Every margin, grouped by type.
    pub async fn margins(&self) -> Result<Vec<Margin>, ServiceError> {
        Ok(self.db.margins().list().await?)
    }

    /// Writes a margin into its `(type, entity)` slot, replacing whatever
    /// occupied it.
    pub async fn save_margin(&self, input: MarginInput) -> Result<Margin, ServiceError> {
        let entity_id = validate_margin_scope(input.margin_type, input.entity_id.as_deref())?;
        validate_margin_value(input.margin_value)?;
        let (valid_from, valid_until) =
            parse_window(input.valid_from.as_deref(), input.valid_until.as_deref())?;

        let saved = self
            .db
            .margins()
            .save(&Margin {
                id: Uuid::new_v4().to_string(),
                margin_type: input.margin_type,
                entity_id,
                margin_value: input.margin_value,
                margin_unit: input.margin_unit,
                is_active: input.is_active,
                valid_from,
                valid_until,
                created_at: Utc::now(),
            })
            .await?;

        info!(
            id = %saved.id,
            margin_type = saved.margin_type.as_str(),
            value = saved.margin_value,
            "Margin saved"
        );
        Ok(saved)
    }

    pub async fn delete_margin(&self, id: &str) -> Result<(), ServiceError> {
        validate_uuid(id)?;
        self.db.margins().delete(id).await?;
        info!(id = %id, "Margin deleted");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use stayrate_db::DbConfig;

    async fn admin() -> AdminService {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        AdminService::new(db)
    }

    fn convention_input(name: &str, pct: f64) -> ConventionInput {
        ConventionInput {
            name: name.to_string(),
            discount_percentage: pct,
            ..ConventionInput::default()
        }
    }

    fn code_input(code: &str, convention_id: &str) -> CodeInput {
        CodeInput {
            code: code.to_string(),
            convention_id: convention_id.to_string(),
            ..CodeInput::default()
        }
    }

    fn global_input(value: f64) -> MarginInput {
        MarginInput {
            margin_type: MarginType::Global,
            entity_id: None,
            margin_value: value,
            margin_unit: MarginUnit::Percentage,
            is_active: true,
            valid_from: None,
            valid_until: None,
        }
    }

    #[tokio::test]
    async fn test_add_convention_starts_active() {
        let admin = admin().await;

        let created = admin
            .add_convention(ConventionInput {
                is_active: false,
                valid_from: Some("2025-01-01".to_string()),
                valid_until: Some(" ".to_string()),
                ..convention_input("  Ministère de la Santé ", 20.0)
            })
            .await
            .unwrap();

        assert!(created.is_active);
        assert_eq!(created.name, "Ministère de la Santé");
        assert_eq!(created.valid_from, NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(created.valid_until, None);
    }

    #[tokio::test]
    async fn test_convention_validation() {
        let admin = admin().await;

        let err = admin.add_convention(convention_input("", 10.0)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = admin
            .add_convention(convention_input("Trop généreux", 120.0))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = admin
            .add_convention(ConventionInput {
                valid_from: Some("2025-02-01".to_string()),
                valid_until: Some("2025-01-01".to_string()),
                ..convention_input("Inversée", 10.0)
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        admin.add_convention(convention_input("Organisme public B", 25.0)).await.unwrap();
        let err = admin
            .add_convention(convention_input("Organisme public B", 10.0))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("Organisme public B"));
    }

    #[tokio::test]
    async fn test_edit_convention() {
        let admin = admin().await;
        let created = admin
            .add_convention(convention_input("Entreprise partenaire A", 15.0))
            .await
            .unwrap();

        let edited = admin
            .edit_convention(
                &created.id,
                ConventionInput {
                    is_active: false,
                    ..convention_input("Entreprise partenaire A", 18.0)
                },
            )
            .await
            .unwrap();
        assert_eq!(edited.discount_percentage, 18.0);
        assert!(!edited.is_active);
        assert_eq!(edited.id, created.id);

        let listed = admin.conventions().await.unwrap();
        assert_eq!(listed[0].discount_percentage, 18.0);

        let missing = Uuid::new_v4().to_string();
        let err = admin
            .edit_convention(&missing, convention_input("Absente", 5.0))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = admin.delete_convention("not-a-uuid").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_codes_listing_joins_names() {
        let admin = admin().await;
        let sante = admin
            .add_convention(convention_input("Ministère de la Santé", 20.0))
            .await
            .unwrap();
        let partner = admin
            .add_convention(convention_input("Entreprise partenaire A", 15.0))
            .await
            .unwrap();

        let code = admin.add_code(code_input(" sante2024", &sante.id)).await.unwrap();
        assert_eq!(code.code, "SANTE2024");
        assert!(code.is_active);
        admin.add_code(code_input("partner15", &partner.id)).await.unwrap();

        admin.delete_convention(&partner.id).await.unwrap();

        let page = admin.codes().await.unwrap();
        assert_eq!(page.codes.len(), 2);

        let names: HashMap<&str, &str> = page
            .codes
            .iter()
            .map(|l| (l.code.code.as_str(), l.convention_name.as_str()))
            .collect();
        assert_eq!(names["SANTE2024"], "Ministère de la Santé");
        assert_eq!(names["PARTNER15"], UNKNOWN_CONVENTION);

        assert_eq!(page.active_conventions.len(), 1);
        assert_eq!(page.active_conventions[0].id, sante.id);

        let json = serde_json::to_value(&page.codes[0]).unwrap();
        assert!(json.get("convention_name").is_some());
        assert!(json.get("code").is_some());
    }

    #[tokio::test]
    async fn test_code_validation() {
        let admin = admin().await;
        let sante = admin
            .add_convention(convention_input("Ministère de la Santé", 20.0))
            .await
            .unwrap();

        let err = admin.add_code(code_input("HAS SPACE", &sante.id)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let orphan = Uuid::new_v4().to_string();
        let err = admin.add_code(code_input("ORPHAN", &orphan)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, format!("Convention not found: {orphan}"));

        let err = admin
            .edit_code(&orphan, code_input("SANTE2024", &sante.id))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, format!("DiscountCode not found: {orphan}"));

        admin.add_code(code_input("SANTE2024", &sante.id)).await.unwrap();
        let err = admin.add_code(code_input("Sante2024", &sante.id)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_edit_and_delete_code() {
        let admin = admin().await;
        let sante = admin
            .add_convention(convention_input("Ministère de la Santé", 20.0))
            .await
            .unwrap();
        let code = admin.add_code(code_input("SANTE2024", &sante.id)).await.unwrap();

        let edited = admin
            .edit_code(
                &code.id,
                CodeInput {
                    is_active: false,
                    valid_until: Some("2025-12-31".to_string()),
                    ..code_input("sante2025", &sante.id)
                },
            )
            .await
            .unwrap();
        assert_eq!(edited.code, "SANTE2025");
        assert!(!edited.is_active);

        let stats = admin.dashboard().await.unwrap();
        assert_eq!(
            stats,
            DashboardStats {
                conventions: 1,
                codes: 1,
                active_codes: 0
            }
        );

        admin.delete_code(&code.id).await.unwrap();
        let err = admin.delete_code(&code.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_save_margin_overwrites_slot() {
        let admin = admin().await;

        let first = admin.save_margin(global_input(10.0)).await.unwrap();
        let second = admin
            .save_margin(MarginInput {
                margin_unit: MarginUnit::Fixed,
                ..global_input(25.0)
            })
            .await
            .unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.margin_value, 25.0);
        assert_eq!(second.margin_unit, MarginUnit::Fixed);

        let margins = admin.margins().await.unwrap();
        assert_eq!(margins.len(), 1);

        admin.delete_margin(&first.id).await.unwrap();
        assert!(admin.margins().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_margin_scope_rules() {
        let admin = admin().await;

        let err = admin
            .save_margin(MarginInput {
                entity_id: Some("h-1".to_string()),
                ..global_input(10.0)
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = admin
            .save_margin(MarginInput {
                margin_type: MarginType::Hotel,
                ..global_input(10.0)
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let hotel = admin
            .save_margin(MarginInput {
                margin_type: MarginType::Hotel,
                entity_id: Some(" 2 ".to_string()),
                ..global_input(5.0)
            })
            .await
            .unwrap();
        assert_eq!(hotel.entity_id.as_deref(), Some("2"));

        let err = admin.save_margin(global_input(f64::NAN)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}

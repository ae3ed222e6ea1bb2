//! # Discount Code Repository
//!
//! Database operations for discount codes.
//!
//! ## Case Handling
//! ```text
//! admin types "sante2024"  ──► stored as "SANTE2024"
//! visitor types "Sante2024" ──► matched (code column is COLLATE NOCASE)
//! ```
//!
//! `convention_id` is not a foreign key. A code can outlive its convention.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use stayrate_core::validation::normalize_code;
use stayrate_core::DiscountCode;

const SELECT_CODE: &str = r#"
    SELECT id, code, convention_id, is_active, valid_from, valid_until, created_at
    FROM discount_codes
"#;

/// Repository for discount code database operations.
#[derive(Debug, Clone)]
pub struct DiscountCodeRepository {
    pool: SqlitePool,
}

impl DiscountCodeRepository {
    /// Creates a new DiscountCodeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DiscountCodeRepository { pool }
    }

    /// Lists every code, newest first.
    pub async fn list(&self) -> DbResult<Vec<DiscountCode>> {
        let sql = format!("{SELECT_CODE} ORDER BY created_at DESC");
        let codes = sqlx::query_as::<_, DiscountCode>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = codes.len(), "Listed discount codes");
        Ok(codes)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<DiscountCode>> {
        let sql = format!("{SELECT_CODE} WHERE id = ?1");
        let code = sqlx::query_as::<_, DiscountCode>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(code)
    }

    /// Finds a code regardless of case or surrounding whitespace.
    ///
    /// Inactive codes are returned too; redemption decides what they mean.
    pub async fn find_by_code(&self, code: &str) -> DbResult<Option<DiscountCode>> {
        let code = normalize_code(code);
        if code.is_empty() {
            return Ok(None);
        }

        let sql = format!("{SELECT_CODE} WHERE code = ?1 COLLATE NOCASE");
        let found = sqlx::query_as::<_, DiscountCode>(&sql)
            .bind(&code)
            .fetch_optional(&self.pool)
            .await?;

        debug!(code = %code, found = found.is_some(), "Looked up discount code");
        Ok(found)
    }

    /// Inserts a new code, uppercased.
    ///
    /// ## Returns
    /// * `Ok(DiscountCode)` - The stored code (with its uppercase form)
    /// * `Err(DbError::UniqueViolation)` - Code exists in any casing
    pub async fn insert(&self, code: &DiscountCode) -> DbResult<DiscountCode> {
        let stored = DiscountCode {
            code: normalize_code(&code.code),
            ..code.clone()
        };

        debug!(code = %stored.code, convention_id = %stored.convention_id, "Inserting discount code");

        sqlx::query(
            r#"
            INSERT INTO discount_codes (
                id, code, convention_id, is_active,
                valid_from, valid_until, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            "#,
        )
        .bind(&stored.id)
        .bind(&stored.code)
        .bind(&stored.convention_id)
        .bind(stored.is_active)
        .bind(stored.valid_from)
        .bind(stored.valid_until)
        .bind(stored.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &stored.code),
            other => other,
        })?;

        Ok(stored)
    }

    /// Updates an existing code. The code text is uppercased.
    pub async fn update(&self, code: &DiscountCode) -> DbResult<()> {
        let normalized = normalize_code(&code.code);

        debug!(id = %code.id, code = %normalized, "Updating discount code");

        let result = sqlx::query(
            r#"
            UPDATE discount_codes SET
                code = ?2,
                convention_id = ?3,
                is_active = ?4,
                valid_from = ?5,
                valid_until = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(&code.id)
        .bind(&normalized)
        .bind(&code.convention_id)
        .bind(code.is_active)
        .bind(code.valid_from)
        .bind(code.valid_until)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &normalized),
            other => other,
        })?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("DiscountCode", &code.id));
        }

        Ok(())
    }

    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting discount code");

        let result = sqlx::query("DELETE FROM discount_codes WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("DiscountCode", id));
        }

        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM discount_codes")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Counts codes whose admin switch is on (dates ignored).
    pub async fn count_active(&self) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM discount_codes WHERE is_active = 1")
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

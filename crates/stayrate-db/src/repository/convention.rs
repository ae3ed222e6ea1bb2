//! # Convention Repository
//!
//! Database operations for conventions.
//!
//! Deleting a convention leaves its discount codes in place. Those codes
//! stop redeeming (their convention is gone) and are listed as orphans.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use stayrate_core::Convention;

const SELECT_CONVENTION: &str = r#"
    SELECT id, name, discount_percentage, is_active, valid_from, valid_until, created_at
    FROM conventions
"#;

/// Repository for convention database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ConventionRepository::new(pool);
///
/// let all = repo.list().await?;
/// let one = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ConventionRepository {
    pool: SqlitePool,
}

impl ConventionRepository {
    /// Creates a new ConventionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ConventionRepository { pool }
    }

    /// Lists every convention, newest first.
    pub async fn list(&self) -> DbResult<Vec<Convention>> {
        let sql = format!("{SELECT_CONVENTION} ORDER BY created_at DESC");
        let conventions = sqlx::query_as::<_, Convention>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = conventions.len(), "Listed conventions");
        Ok(conventions)
    }

    /// Lists conventions whose admin switch is on, by name.
    ///
    /// Dates are not considered; this feeds the code form's selector.
    pub async fn list_active(&self) -> DbResult<Vec<Convention>> {
        let sql = format!("{SELECT_CONVENTION} WHERE is_active = 1 ORDER BY name");
        let conventions = sqlx::query_as::<_, Convention>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(conventions)
    }

    /// Gets a convention by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Convention))` - Found
    /// * `Ok(None)` - No such convention
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Convention>> {
        let sql = format!("{SELECT_CONVENTION} WHERE id = ?1");
        let convention = sqlx::query_as::<_, Convention>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(convention)
    }

    /// Inserts a new convention.
    ///
    /// ## Returns
    /// * `Ok(Convention)` - The stored convention
    /// * `Err(DbError::UniqueViolation)` - Name already taken
    pub async fn insert(&self, convention: &Convention) -> DbResult<Convention> {
        debug!(name = %convention.name, "Inserting convention");

        sqlx::query(
            r#"
            INSERT INTO conventions (
                id, name, discount_percentage, is_active,
                valid_from, valid_until, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            "#,
        )
        .bind(&convention.id)
        .bind(&convention.name)
        .bind(convention.discount_percentage)
        .bind(convention.is_active)
        .bind(convention.valid_from)
        .bind(convention.valid_until)
        .bind(convention.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &convention.name),
            other => other,
        })?;

        Ok(convention.clone())
    }

    /// Updates every editable field of an existing convention.
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - Convention doesn't exist
    pub async fn update(&self, convention: &Convention) -> DbResult<()> {
        debug!(id = %convention.id, "Updating convention");

        let result = sqlx::query(
            r#"
            UPDATE conventions SET
                name = ?2,
                discount_percentage = ?3,
                is_active = ?4,
                valid_from = ?5,
                valid_until = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(&convention.id)
        .bind(&convention.name)
        .bind(convention.discount_percentage)
        .bind(convention.is_active)
        .bind(convention.valid_from)
        .bind(convention.valid_until)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &convention.name),
            other => other,
        })?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Convention", &convention.id));
        }

        Ok(())
    }

    /// Deletes a convention. Its codes are kept.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting convention");

        let result = sqlx::query("DELETE FROM conventions WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Convention", id));
        }

        Ok(())
    }

    /// Counts all conventions.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM conventions")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

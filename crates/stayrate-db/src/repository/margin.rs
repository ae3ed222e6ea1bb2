//! # Margin Repository
//!
//! Database operations for margins.
//!
//! ## One Margin Per Scope
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  save(margin)                                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                 │
//! │  SELECT ... WHERE margin_type = ? AND entity_id IS (same slot)         │
//! │       │                                                                 │
//! │       ├── found ──► UPDATE that row (keeps its id and created_at)      │
//! │       └── none  ──► INSERT                                             │
//! │  COMMIT                                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A NULL and an empty `entity_id` are the same slot.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use stayrate_core::{Margin, MarginType};

const SELECT_MARGIN: &str = r#"
    SELECT id, margin_type, entity_id, margin_value, margin_unit,
           is_active, valid_from, valid_until, created_at
    FROM margins
"#;

const SCOPE_FILTER: &str = "WHERE margin_type = ?1 AND COALESCE(entity_id, '') = COALESCE(?2, '')";

/// Repository for margin database operations.
#[derive(Debug, Clone)]
pub struct MarginRepository {
    pool: SqlitePool,
}

impl MarginRepository {
    /// Creates a new MarginRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MarginRepository { pool }
    }

    /// Lists every margin ordered by type (global, hotel, room_type), oldest
    /// first within a type.
    pub async fn list(&self) -> DbResult<Vec<Margin>> {
        let sql = format!("{SELECT_MARGIN} ORDER BY margin_type, created_at");
        let margins = sqlx::query_as::<_, Margin>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = margins.len(), "Listed margins");
        Ok(margins)
    }

    /// Finds the margin occupying a `(type, entity)` slot.
    pub async fn find_by_scope(
        &self,
        margin_type: MarginType,
        entity_id: Option<&str>,
    ) -> DbResult<Option<Margin>> {
        let sql = format!("{SELECT_MARGIN} {SCOPE_FILTER} ORDER BY created_at LIMIT 1");
        let margin = sqlx::query_as::<_, Margin>(&sql)
            .bind(margin_type)
            .bind(entity_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(margin)
    }

    /// Saves a margin into its slot.
    ///
    /// If the slot is taken, the existing row is overwritten and keeps its
    /// id. Otherwise `margin` is inserted as given.
    ///
    /// ## Returns
    /// The margin as stored.
    pub async fn save(&self, margin: &Margin) -> DbResult<Margin> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let sql = format!("{SELECT_MARGIN} {SCOPE_FILTER} ORDER BY created_at LIMIT 1");
        let existing = sqlx::query_as::<_, Margin>(&sql)
            .bind(margin.margin_type)
            .bind(margin.entity_id.as_deref())
            .fetch_optional(&mut *tx)
            .await?;

        let saved = match existing {
            Some(current) => {
                debug!(
                    id = %current.id,
                    margin_type = margin.margin_type.as_str(),
                    "Overwriting margin in occupied slot"
                );

                sqlx::query(
                    r#"
                    UPDATE margins SET
                        margin_value = ?2,
                        margin_unit = ?3,
                        is_active = ?4,
                        valid_from = ?5,
                        valid_until = ?6,
                        updated_at = ?7
                    WHERE id = ?1
                    "#,
                )
                .bind(&current.id)
                .bind(margin.margin_value)
                .bind(margin.margin_unit)
                .bind(margin.is_active)
                .bind(margin.valid_from)
                .bind(margin.valid_until)
                .bind(Utc::now())
                .execute(&mut *tx)
                .await?;

                Margin {
                    id: current.id,
                    entity_id: current.entity_id,
                    created_at: current.created_at,
                    ..margin.clone()
                }
            }
            None => {
                debug!(
                    id = %margin.id,
                    margin_type = margin.margin_type.as_str(),
                    "Inserting margin"
                );

                sqlx::query(
                    r#"
                    INSERT INTO margins (
                        id, margin_type, entity_id, margin_value, margin_unit,
                        is_active, valid_from, valid_until, created_at, updated_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
                    "#,
                )
                .bind(&margin.id)
                .bind(margin.margin_type)
                .bind(margin.entity_id.as_deref())
                .bind(margin.margin_value)
                .bind(margin.margin_unit)
                .bind(margin.is_active)
                .bind(margin.valid_from)
                .bind(margin.valid_until)
                .bind(margin.created_at)
                .execute(&mut *tx)
                .await?;

                margin.clone()
            }
        };

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(saved)
    }

    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting margin");

        let result = sqlx::query("DELETE FROM margins WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Margin", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::{DateTime, NaiveDate, TimeZone};
    use stayrate_core::MarginUnit;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, day, 12, 0, 0).unwrap()
    }

    fn margin(id: &str, margin_type: MarginType, entity_id: Option<&str>, value: f64) -> Margin {
        Margin {
            id: id.to_string(),
            margin_type,
            entity_id: entity_id.map(str::to_string),
            margin_value: value,
            margin_unit: MarginUnit::Percentage,
            is_active: true,
            valid_from: None,
            valid_until: None,
            created_at: at(1),
        }
    }

    async fn repo() -> MarginRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().margins()
    }

    #[tokio::test]
    async fn test_save_inserts_into_empty_slot() {
        let repo = repo().await;
        let saved = repo
            .save(&margin("m-1", MarginType::Global, None, 10.0))
            .await
            .unwrap();
        assert_eq!(saved.id, "m-1");

        let found = repo.find_by_scope(MarginType::Global, None).await.unwrap().unwrap();
        assert_eq!(found, saved);
    }

    #[tokio::test]
    async fn test_save_overwrites_occupied_slot() {
        let repo = repo().await;
        repo.save(&margin("m-1", MarginType::Global, None, 10.0))
            .await
            .unwrap();

        let mut replacement = margin("m-2", MarginType::Global, None, 15.0);
        replacement.margin_unit = MarginUnit::Fixed;
        replacement.valid_until = NaiveDate::from_ymd_opt(2025, 12, 31);
        replacement.created_at = at(9);

        let saved = repo.save(&replacement).await.unwrap();
        assert_eq!(saved.id, "m-1");
        assert_eq!(saved.created_at, at(1));
        assert_eq!(saved.margin_value, 15.0);

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].margin_unit, MarginUnit::Fixed);
        assert_eq!(all[0].valid_until, NaiveDate::from_ymd_opt(2025, 12, 31));
    }

    #[tokio::test]
    async fn test_slots_are_per_entity() {
        let repo = repo().await;
        repo.save(&margin("m-1", MarginType::Hotel, Some("1"), 5.0))
            .await
            .unwrap();
        repo.save(&margin("m-2", MarginType::Hotel, Some("2"), 7.0))
            .await
            .unwrap();
        repo.save(&margin("m-3", MarginType::Global, Some(""), 10.0))
            .await
            .unwrap();

        assert_eq!(repo.list().await.unwrap().len(), 3);
        // Empty entity id and NULL share a slot.
        let global = repo.find_by_scope(MarginType::Global, None).await.unwrap();
        assert_eq!(global.map(|m| m.id), Some("m-3".to_string()));
    }

    #[tokio::test]
    async fn test_list_orders_by_type() {
        let repo = repo().await;
        repo.save(&margin("m-1", MarginType::RoomType, Some("suite"), 3.0))
            .await
            .unwrap();
        repo.save(&margin("m-2", MarginType::Hotel, Some("1"), 5.0))
            .await
            .unwrap();
        repo.save(&margin("m-3", MarginType::Global, None, 10.0))
            .await
            .unwrap();

        let types: Vec<MarginType> = repo.list().await.unwrap().into_iter().map(|m| m.margin_type).collect();
        assert_eq!(
            types,
            vec![MarginType::Global, MarginType::Hotel, MarginType::RoomType]
        );
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = repo().await;
        repo.save(&margin("m-1", MarginType::Global, None, 10.0))
            .await
            .unwrap();

        repo.delete("m-1").await.unwrap();
        assert!(repo.list().await.unwrap().is_empty());
        assert!(matches!(repo.delete("m-1").await, Err(DbError::NotFound { .. })));
    }
}

// SQLite Transaction Implementation

use crate::error::map_sqlx_error;
use crate::window_repository::{time_column, WindowRow, SELECT_WINDOW};
use async_trait::async_trait;
use sqlx::{Sqlite, Transaction as SqlxTransaction};
use tokio::sync::OwnedMutexGuard;
use upkeep_core::domain::{MaintenanceWindow, SlotKey, WindowId};
use upkeep_core::error::Result;
use upkeep_core::port::{Transaction, WindowRepositoryTransaction};

/// Window write transaction
///
/// Owns the repository write lock; it is released after the sqlx transaction
/// (field drop order) whether the transaction commits, rolls back or is dropped.
pub struct SqliteWindowTransaction {
    tx: SqlxTransaction<'static, Sqlite>,
    _write_guard: OwnedMutexGuard<()>,
}

impl SqliteWindowTransaction {
    pub fn new(tx: SqlxTransaction<'static, Sqlite>, write_guard: OwnedMutexGuard<()>) -> Self {
        Self {
            tx,
            _write_guard: write_guard,
        }
    }
}

#[async_trait]
impl Transaction for SqliteWindowTransaction {
    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.tx.rollback().await.map_err(map_sqlx_error)?;
        Ok(())
    }
}

#[async_trait]
impl WindowRepositoryTransaction for SqliteWindowTransaction {
    async fn find_by_id(&mut self, id: &WindowId) -> Result<Option<MaintenanceWindow>> {
        let row = sqlx::query_as::<_, WindowRow>(&format!("{SELECT_WINDOW} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        row.map(WindowRow::into_window).transpose()
    }

    async fn find_by_slot(&mut self, key: &SlotKey) -> Result<Vec<MaintenanceWindow>> {
        let rows = sqlx::query_as::<_, WindowRow>(&format!(
            "{SELECT_WINDOW} WHERE placement_id = ? AND technician_id = ? AND weekday = ? \
             ORDER BY created_at ASC, id ASC"
        ))
        .bind(&key.placement_id)
        .bind(&key.technician_id)
        .bind(key.weekday.as_str())
        .fetch_all(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(WindowRow::into_window).collect()
    }

    async fn insert(&mut self, window: &MaintenanceWindow) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO maintenance_windows (
                id, placement_id, technician_id, weekday, start_time, end_time,
                notes, created_by, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&window.id)
        .bind(&window.placement_id)
        .bind(&window.technician_id)
        .bind(window.weekday.as_str())
        .bind(time_column(window.start))
        .bind(time_column(window.end))
        .bind(&window.notes)
        .bind(&window.created_by)
        .bind(window.created_at)
        .bind(window.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn update_slot(&mut self, window: &MaintenanceWindow) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE maintenance_windows
            SET weekday = ?, start_time = ?, end_time = ?, notes = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(window.weekday.as_str())
        .bind(time_column(window.start))
        .bind(time_column(window.end))
        .bind(&window.notes)
        .bind(window.updated_at)
        .bind(&window.id)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }
}

// SQLite WindowRepository Implementation

use crate::error::map_sqlx_error;
use crate::transaction::SqliteWindowTransaction;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;
use upkeep_core::domain::{
    parse_time_of_day, MaintenanceWindow, ScheduleEntry, SlotKey, Weekday, WindowId,
};
use upkeep_core::error::{AppError, Result};
use upkeep_core::port::{
    TransactionalWindowRepository, WindowRepository, WindowRepositoryTransaction,
};
use sqlx::SqlitePool;

pub(crate) const SELECT_WINDOW: &str = r#"
    SELECT id, placement_id, technician_id, weekday, start_time, end_time,
           notes, created_by, created_at, updated_at
    FROM maintenance_windows
"#;

/// Stored "HH:MM:SS"
pub(crate) fn time_column(time: chrono::NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}

pub struct SqliteWindowRepository {
    pool: SqlitePool,
    // Serializes write transactions across every clone sharing this repository
    write_lock: Arc<Mutex<()>>,
}

impl SqliteWindowRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            write_lock: Arc::new(Mutex::new(())),
        }
    }
}

#[async_trait]
impl WindowRepository for SqliteWindowRepository {
    async fn find_by_id(&self, id: &WindowId) -> Result<Option<MaintenanceWindow>> {
        let row = sqlx::query_as::<_, WindowRow>(&format!("{SELECT_WINDOW} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(WindowRow::into_window).transpose()
    }

    async fn find_by_slot(&self, key: &SlotKey) -> Result<Vec<MaintenanceWindow>> {
        let rows = sqlx::query_as::<_, WindowRow>(&format!(
            "{SELECT_WINDOW} WHERE placement_id = ? AND technician_id = ? AND weekday = ? \
             ORDER BY created_at ASC, id ASC"
        ))
        .bind(&key.placement_id)
        .bind(&key.technician_id)
        .bind(key.weekday.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(WindowRow::into_window).collect()
    }

    async fn delete_by_id(&self, id: &WindowId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM maintenance_windows WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn find_schedule_for(&self, weekday: Weekday) -> Result<Vec<ScheduleEntry>> {
        let rows = sqlx::query_as::<_, ScheduleRow>(
            r#"
            SELECT w.id AS window_id,
                   a.name AS asset_name,
                   a.category AS asset_category,
                   w.start_time, w.end_time, w.notes,
                   t.name AS technician_name,
                   t.email AS technician_email,
                   t.chat_id AS technician_chat_id,
                   t.chat_verified AS technician_chat_verified
            FROM maintenance_windows w
            JOIN asset_placements p ON p.id = w.placement_id
            JOIN assets a ON a.id = p.asset_id
            JOIN technicians t ON t.id = w.technician_id
            WHERE w.weekday = ?
            ORDER BY w.created_at ASC, w.id ASC
            "#,
        )
        .bind(weekday.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        debug!(weekday = %weekday, rows = rows.len(), "Schedule fetched");
        rows.into_iter().map(ScheduleRow::into_entry).collect()
    }
}

#[async_trait]
impl TransactionalWindowRepository for SqliteWindowRepository {
    async fn begin_transaction(&self) -> Result<Box<dyn WindowRepositoryTransaction>> {
        // Held until the transaction commits or is dropped
        let guard = Arc::clone(&self.write_lock).lock_owned().await;
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(Box::new(SqliteWindowTransaction::new(tx, guard)))
    }
}

fn corrupt(column: &str, value: &str) -> AppError {
    AppError::Database(format!("corrupt {column} value in storage: {value:?}"))
}

fn decode_weekday(value: &str) -> Result<Weekday> {
    value.parse().map_err(|_| corrupt("weekday", value))
}

fn decode_time(column: &str, value: &str) -> Result<chrono::NaiveTime> {
    parse_time_of_day(value).map_err(|_| corrupt(column, value))
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct WindowRow {
    id: String,
    placement_id: String,
    technician_id: String,
    weekday: String,
    start_time: String,
    end_time: String,
    notes: Option<String>,
    created_by: String,
    created_at: i64,
    updated_at: Option<i64>,
}

impl WindowRow {
    pub(crate) fn into_window(self) -> Result<MaintenanceWindow> {
        Ok(MaintenanceWindow {
            weekday: decode_weekday(&self.weekday)?,
            start: decode_time("start_time", &self.start_time)?,
            end: decode_time("end_time", &self.end_time)?,
            id: self.id,
            placement_id: self.placement_id,
            technician_id: self.technician_id,
            notes: self.notes,
            created_by: self.created_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ScheduleRow {
    window_id: String,
    asset_name: String,
    asset_category: String,
    start_time: String,
    end_time: String,
    notes: Option<String>,
    technician_name: String,
    technician_email: String,
    technician_chat_id: Option<String>,
    technician_chat_verified: i64,
}

impl ScheduleRow {
    fn into_entry(self) -> Result<ScheduleEntry> {
        Ok(ScheduleEntry {
            start: decode_time("start_time", &self.start_time)?,
            end: decode_time("end_time", &self.end_time)?,
            window_id: self.window_id,
            asset_name: self.asset_name,
            asset_category: self.asset_category,
            notes: self.notes,
            technician_name: self.technician_name,
            technician_email: self.technician_email,
            technician_chat_id: self.technician_chat_id,
            technician_chat_verified: self.technician_chat_verified != 0,
        })
    }
}

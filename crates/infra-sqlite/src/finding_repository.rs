// SQLite FindingReportSource Implementation

use crate::error::map_sqlx_error;
use async_trait::async_trait;
use sqlx::SqlitePool;
use upkeep_core::domain::FindingReportRow;
use upkeep_core::error::Result;
use upkeep_core::port::FindingReportSource;

/// Audit rows: findings joined with asset, room and the placement's technician
pub struct SqliteFindingReportSource {
    pool: SqlitePool,
}

impl SqliteFindingReportSource {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FindingReportSource for SqliteFindingReportSource {
    async fn find_report_rows(&self) -> Result<Vec<FindingReportRow>> {
        let rows = sqlx::query_as::<_, FindingRow>(
            r#"
            SELECT f.id AS finding_id,
                   a.name AS asset_name,
                   a.category AS asset_category,
                   f.notes,
                   f.reported_at,
                   r.floor,
                   r.name AS room,
                   t.name AS technician_name,
                   t.email AS technician_email
            FROM findings f
            JOIN asset_placements p ON p.id = f.placement_id
            JOIN assets a ON a.id = p.asset_id
            JOIN rooms r ON r.id = p.room_id
            JOIN technicians t ON t.id = p.technician_id
            ORDER BY f.reported_at DESC, f.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(FindingRow::into_report_row).collect())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct FindingRow {
    finding_id: String,
    asset_name: String,
    asset_category: String,
    notes: Option<String>,
    reported_at: i64,
    floor: String,
    room: String,
    technician_name: String,
    technician_email: String,
}

impl FindingRow {
    fn into_report_row(self) -> FindingReportRow {
        FindingReportRow {
            finding_id: self.finding_id,
            asset_name: self.asset_name,
            asset_category: self.asset_category,
            notes: self.notes,
            reported_at: self.reported_at,
            floor: self.floor,
            room: self.room,
            technician_name: self.technician_name,
            technician_email: self.technician_email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::seeded_pool;

    #[tokio::test]
    async fn test_rows_are_flattened_most_recent_first() {
        let pool = seeded_pool().await;
        for (id, at) in [("f-old", 1_000_i64), ("f-new", 3_000), ("f-mid", 2_000)] {
            sqlx::query(
                "INSERT INTO findings (id, placement_id, notes, reported_at) \
                 VALUES (?, 'placement-1', 'belt worn', ?)",
            )
            .bind(id)
            .bind(at)
            .execute(&pool)
            .await
            .unwrap();
        }

        let rows = SqliteFindingReportSource::new(pool)
            .find_report_rows()
            .await
            .unwrap();

        let ids: Vec<&str> = rows.iter().map(|r| r.finding_id.as_str()).collect();
        assert_eq!(ids, vec!["f-new", "f-mid", "f-old"]);
        assert_eq!(rows[0].floor_room(), "3-301");
        assert_eq!(rows[0].technician_identity(), "Ana Ruiz <ana@example.com>");
    }

    #[tokio::test]
    async fn test_no_findings_is_empty_not_error() {
        let pool = seeded_pool().await;
        let rows = SqliteFindingReportSource::new(pool)
            .find_report_rows()
            .await
            .unwrap();
        assert!(rows.is_empty());
    }
}

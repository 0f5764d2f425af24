// Shared fixtures for adapter tests

use crate::{create_pool, run_migrations};
use chrono::NaiveTime;
use sqlx::SqlitePool;
use upkeep_core::domain::{MaintenanceWindow, NewMaintenanceWindow, Weekday};

/// Migrated in-memory pool with one asset placed in one room,
/// technician "tech-1" (verified chat) and admin "admin-1"
pub(crate) async fn seeded_pool() -> SqlitePool {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();

    for sql in [
        "INSERT INTO assets (id, name, category) VALUES ('asset-1', 'Chiller 2', 'HVAC')",
        "INSERT INTO rooms (id, floor, name) VALUES ('room-1', '3', '301')",
        "INSERT INTO technicians (id, name, email, chat_id, chat_verified) \
         VALUES ('tech-1', 'Ana Ruiz', 'ana@example.com', '100', 1)",
        "INSERT INTO admins (id, username, email, chat_id, chat_verified) \
         VALUES ('admin-1', 'root', 'root@example.com', '900', 1)",
        "INSERT INTO asset_placements (id, asset_id, room_id, technician_id) \
         VALUES ('placement-1', 'asset-1', 'room-1', 'tech-1')",
    ] {
        sqlx::query(sql).execute(&pool).await.unwrap();
    }

    pool
}

pub(crate) fn window(
    id: &str,
    weekday: Weekday,
    start: (u32, u32),
    end: (u32, u32),
) -> MaintenanceWindow {
    NewMaintenanceWindow {
        placement_id: "placement-1".into(),
        technician_id: "tech-1".into(),
        weekday,
        start: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
        end: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
        notes: None,
    }
    .into_window(id, "admin-1", 1_700_000_000_000)
}

//! Shared fixtures: migrated in-memory database plus reference data

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sqlx::SqlitePool;
use std::sync::Arc;
use upkeep_core::application::MaintenanceWindowService;
use upkeep_core::domain::{NewMaintenanceWindow, Weekday};
use upkeep_core::port::id_provider::UuidProvider;
use upkeep_core::port::time_provider::mocks::FixedTimeProvider;
use upkeep_infra_sqlite::{create_pool, run_migrations, SqliteWindowRepository};

pub const ADMIN: &str = "admin-1";

pub async fn setup_pool() -> SqlitePool {
    let pool = create_pool(":memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}

/// Monday 2024-01-01 at `h:m`
pub fn monday_at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

pub fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub async fn exec(pool: &SqlitePool, sql: &str) {
    sqlx::query(sql).execute(pool).await.unwrap();
}

pub async fn add_admin(pool: &SqlitePool, id: &str, chat_id: Option<&str>, verified: bool) {
    sqlx::query(
        "INSERT INTO admins (id, username, email, chat_id, chat_verified) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(id)
    .bind(format!("{id}@example.com"))
    .bind(chat_id)
    .bind(i64::from(verified))
    .execute(pool)
    .await
    .unwrap();
}

pub async fn add_technician(pool: &SqlitePool, id: &str, chat_id: Option<&str>, verified: bool) {
    sqlx::query(
        "INSERT INTO technicians (id, name, email, chat_id, chat_verified) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(format!("Tech {id}"))
    .bind(format!("{id}@example.com"))
    .bind(chat_id)
    .bind(i64::from(verified))
    .execute(pool)
    .await
    .unwrap();
}

/// Asset `asset-{id}` placed in room B1-{id} as placement `placement-{id}`
pub async fn add_placement(pool: &SqlitePool, id: &str, asset_name: &str, technician_id: &str) {
    sqlx::query("INSERT INTO assets (id, name, category) VALUES (?, ?, 'HVAC')")
        .bind(format!("asset-{id}"))
        .bind(asset_name)
        .execute(pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO rooms (id, floor, name) VALUES (?, 'B1', ?)")
        .bind(format!("room-{id}"))
        .bind(id)
        .execute(pool)
        .await
        .unwrap();
    sqlx::query(
        "INSERT INTO asset_placements (id, asset_id, room_id, technician_id) VALUES (?, ?, ?, ?)",
    )
    .bind(format!("placement-{id}"))
    .bind(format!("asset-{id}"))
    .bind(format!("room-{id}"))
    .bind(technician_id)
    .execute(pool)
    .await
    .unwrap();
}

/// Admin, one technician ("tech-1", chat "100") and placement "placement-1"
pub async fn seed_basic(pool: &SqlitePool) {
    add_admin(pool, ADMIN, Some("900"), true).await;
    add_technician(pool, "tech-1", Some("100"), true).await;
    add_placement(pool, "1", "Chiller 2", "tech-1").await;
}

pub fn service(pool: &SqlitePool, now: NaiveDateTime) -> Arc<MaintenanceWindowService> {
    let repo = Arc::new(SqliteWindowRepository::new(pool.clone()));
    Arc::new(MaintenanceWindowService::new(
        repo.clone(),
        repo,
        Arc::new(UuidProvider),
        Arc::new(FixedTimeProvider::new(now)),
    ))
}

pub fn new_window(
    placement: &str,
    technician: &str,
    weekday: Weekday,
    start: NaiveTime,
    end: NaiveTime,
) -> NewMaintenanceWindow {
    NewMaintenanceWindow {
        placement_id: placement.into(),
        technician_id: technician.into(),
        weekday,
        start,
        end,
        notes: None,
    }
}

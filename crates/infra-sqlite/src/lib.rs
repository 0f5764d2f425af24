// Upkeep Infrastructure - SQLite Adapter
// Implements: WindowRepository, TransactionalWindowRepository, ContactProvider, FindingReportSource

mod connection;
mod contact_repository;
mod error;
mod finding_repository;
mod migration;
mod transaction;
mod window_repository;

#[cfg(test)]
mod test_support;

pub use connection::create_pool;
pub use contact_repository::SqliteContactProvider;
pub use finding_repository::SqliteFindingReportSource;
pub use migration::run_migrations;
pub use transaction::SqliteWindowTransaction;
pub use window_repository::SqliteWindowRepository;

// Note: sqlx::Error conversion goes through error::map_sqlx_error
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)

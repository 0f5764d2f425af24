// sqlx::Error -> AppError

use upkeep_core::error::AppError;

/// Convert sqlx::Error to AppError with structured information
///
/// The unique slot index is the last line of defense against double booking,
/// so unique violations surface as `Conflict` rather than a storage failure.
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if let Some(code) = db_err.code() {
                let code_str = code.as_ref();

                // SQLite error codes: https://www.sqlite.org/rescode.html
                match code_str {
                    "2067" | "1555" => {
                        // UNIQUE constraint failed
                        AppError::Conflict(format!(
                            "maintenance window slot already taken ({})",
                            db_err.message()
                        ))
                    }
                    "787" | "3850" => {
                        // FOREIGN KEY constraint failed
                        AppError::Validation(format!(
                            "unknown placement, technician or admin reference ({})",
                            db_err.message()
                        ))
                    }
                    "5" => {
                        // SQLITE_BUSY - database is locked
                        AppError::Database(format!(
                            "Database locked (SQLITE_BUSY): {}",
                            db_err.message()
                        ))
                    }
                    "13" => AppError::Database(format!("Database full: {}", db_err.message())),
                    _ => AppError::Database(format!(
                        "Database error [{}]: {}",
                        code_str,
                        db_err.message()
                    )),
                }
            } else {
                AppError::Database(format!("Database error: {}", db_err.message()))
            }
        }
        sqlx::Error::RowNotFound => AppError::Database("Row not found".to_string()),
        sqlx::Error::ColumnNotFound(col) => {
            AppError::Database(format!("Column not found: {}", col))
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            AppError::UpstreamUnavailable(format!("database unreachable: {}", err))
        }
        _ => AppError::Database(err.to_string()),
    }
}

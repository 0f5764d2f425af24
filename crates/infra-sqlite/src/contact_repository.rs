// SQLite ContactProvider Implementation

use crate::error::map_sqlx_error;
use async_trait::async_trait;
use sqlx::SqlitePool;
use upkeep_core::domain::AdminContact;
use upkeep_core::error::Result;
use upkeep_core::port::ContactProvider;

pub struct SqliteContactProvider {
    pool: SqlitePool,
}

impl SqliteContactProvider {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactProvider for SqliteContactProvider {
    async fn list_admins(&self) -> Result<Vec<AdminContact>> {
        let rows = sqlx::query_as::<_, ContactRow>(
            "SELECT id, username AS display_name, email, chat_id, chat_verified \
             FROM admins ORDER BY username ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ContactRow::into_contact).collect())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ContactRow {
    id: String,
    display_name: String,
    email: String,
    chat_id: Option<String>,
    chat_verified: i64,
}

impl ContactRow {
    fn into_contact(self) -> AdminContact {
        AdminContact {
            id: self.id,
            display_name: self.display_name,
            email: self.email,
            chat_id: self.chat_id,
            chat_verified: self.chat_verified != 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::seeded_pool;

    #[tokio::test]
    async fn test_list_admins_includes_unverified() {
        let pool = seeded_pool().await;
        sqlx::query(
            "INSERT INTO admins (id, username, email, chat_id, chat_verified) \
             VALUES ('admin-2', 'ops', 'ops@example.com', NULL, 0)",
        )
        .execute(&pool)
        .await
        .unwrap();

        let admins = SqliteContactProvider::new(pool).list_admins().await.unwrap();

        assert_eq!(admins.len(), 2);
        let ops = admins.iter().find(|a| a.id == "admin-2").unwrap();
        assert!(!ops.chat_verified);
        assert_eq!(ops.notification_target(), None);
        let root = admins.iter().find(|a| a.id == "admin-1").unwrap();
        assert_eq!(root.notification_target(), Some("900"));
    }
}

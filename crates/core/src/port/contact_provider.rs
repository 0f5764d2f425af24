// Contact Provider Port

use crate::domain::AdminContact;
use crate::error::Result;
use async_trait::async_trait;

/// Source of admin contacts for the broadcast digest
#[async_trait]
pub trait ContactProvider: Send + Sync {
    /// All admins (eligibility is decided by the caller)
    async fn list_admins(&self) -> Result<Vec<AdminContact>>;
}

pub mod mocks {
    use super::*;
    use crate::error::AppError;

    /// Fixed admin list, or a provider that is always offline
    pub struct StaticContactProvider {
        admins: Option<Vec<AdminContact>>,
    }

    impl StaticContactProvider {
        pub fn new(admins: Vec<AdminContact>) -> Self {
            Self {
                admins: Some(admins),
            }
        }

        pub fn new_unavailable() -> Self {
            Self { admins: None }
        }
    }

    #[async_trait]
    impl ContactProvider for StaticContactProvider {
        async fn list_admins(&self) -> Result<Vec<AdminContact>> {
            self.admins
                .clone()
                .ok_or_else(|| AppError::UpstreamUnavailable("contact store offline".to_string()))
        }
    }
}

// Finding Report Source Port

use crate::domain::FindingReportRow;
use crate::error::Result;
use async_trait::async_trait;

/// Flattened finding/maintenance rows for the audit report
#[async_trait]
pub trait FindingReportSource: Send + Sync {
    /// Every finding joined with asset, placement and technician, most recent first
    async fn find_report_rows(&self) -> Result<Vec<FindingReportRow>>;
}

pub mod mocks {
    use super::*;
    use crate::error::AppError;

    /// Fixed report rows, or a source that is always offline
    pub struct StaticFindingSource {
        rows: Option<Vec<FindingReportRow>>,
    }

    impl StaticFindingSource {
        pub fn new(rows: Vec<FindingReportRow>) -> Self {
            Self { rows: Some(rows) }
        }

        pub fn new_unavailable() -> Self {
            Self { rows: None }
        }
    }

    #[async_trait]
    impl FindingReportSource for StaticFindingSource {
        async fn find_report_rows(&self) -> Result<Vec<FindingReportRow>> {
            self.rows
                .clone()
                .ok_or_else(|| AppError::UpstreamUnavailable("finding store offline".to_string()))
        }
    }
}

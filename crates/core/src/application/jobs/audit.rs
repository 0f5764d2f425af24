//! Audit Job - renders every finding into a report document
//!
//! No watermark is kept: each run renders the full current data set.

use crate::application::aggregator::audit_rows;
use crate::application::trigger::ScheduledJob;
use crate::port::{FindingReportSource, ReportRenderer, TimeProvider};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// How an audit run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditOutcome {
    SourceUnavailable,
    RenderFailed,
    Rendered { rows: usize, destination: PathBuf },
}

pub struct AuditJob {
    findings: Arc<dyn FindingReportSource>,
    renderer: Arc<dyn ReportRenderer>,
    time_provider: Arc<dyn TimeProvider>,
    report_dir: PathBuf,
}

impl AuditJob {
    pub fn new(
        findings: Arc<dyn FindingReportSource>,
        renderer: Arc<dyn ReportRenderer>,
        time_provider: Arc<dyn TimeProvider>,
        report_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            findings,
            renderer,
            time_provider,
            report_dir: report_dir.into(),
        }
    }

    /// `<report_dir>/audit-YYYY-MM-DD.pdf` for the current local date
    pub fn destination(&self) -> PathBuf {
        let date = self.time_provider.local_now().date();
        self.report_dir
            .join(format!("audit-{}.pdf", date.format("%Y-%m-%d")))
    }

    pub async fn run_once(&self) -> AuditOutcome {
        let rows = match self.findings.find_report_rows().await {
            Ok(rows) => audit_rows(rows),
            Err(e) => {
                error!(error = %e, "Audit aborted: could not fetch finding report rows");
                return AuditOutcome::SourceUnavailable;
            }
        };

        let destination = self.destination();
        if let Err(e) = self.renderer.render(&rows, &destination).await {
            error!(
                error = %e,
                destination = %destination.display(),
                "Audit report rendering failed"
            );
            return AuditOutcome::RenderFailed;
        }

        info!(
            rows = rows.len(),
            destination = %destination.display(),
            "Audit report rendered"
        );
        AuditOutcome::Rendered {
            rows: rows.len(),
            destination,
        }
    }
}

#[async_trait]
impl ScheduledJob for AuditJob {
    fn name(&self) -> &str {
        "audit"
    }

    async fn run(&self) {
        self.run_once().await;
    }
}

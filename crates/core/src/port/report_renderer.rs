// Report Renderer Port - audit document output

use crate::domain::FindingReportRow;
use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Rendering errors
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encoding failed: {0}")]
    Encoding(String),
}

/// Report Renderer trait
///
/// Produces a paginated table with the columns
/// Asset, Category, Notes, Reported At, Floor-Room, Technician.
#[async_trait]
pub trait ReportRenderer: Send + Sync {
    /// Render `rows` (already ordered) to `destination`
    ///
    /// An empty row set still produces a valid document.
    async fn render(
        &self,
        rows: &[FindingReportRow],
        destination: &Path,
    ) -> Result<(), RenderError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Records each render call
    #[derive(Default)]
    pub struct RecordingRenderer {
        fail: bool,
        calls: Mutex<Vec<(Vec<FindingReportRow>, PathBuf)>>,
    }

    impl RecordingRenderer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn new_failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub fn calls(&self) -> Vec<(Vec<FindingReportRow>, PathBuf)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ReportRenderer for RecordingRenderer {
        async fn render(
            &self,
            rows: &[FindingReportRow],
            destination: &Path,
        ) -> Result<(), RenderError> {
            self.calls
                .lock()
                .unwrap()
                .push((rows.to_vec(), destination.to_path_buf()));

            if self.fail {
                return Err(RenderError::Encoding("mock renderer failure".to_string()));
            }
            Ok(())
        }
    }
}

// Upkeep Infrastructure - Report Rendering
// Implements: ReportRenderer (PdfReportRenderer)

mod layout;
mod pdf;

pub use pdf::{build_document, PdfReportRenderer, REPORT_COLUMNS};

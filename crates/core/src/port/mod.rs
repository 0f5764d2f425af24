// Port Layer - Interfaces for external dependencies

pub mod contact_provider;
pub mod finding_source;
pub mod id_provider; // For deterministic testing
pub mod notifier;
pub mod report_renderer;
pub mod time_provider;
pub mod transaction;
pub mod window_repository;

// Re-exports
pub use contact_provider::ContactProvider;
pub use finding_source::FindingReportSource;
pub use id_provider::IdProvider;
pub use notifier::{NotifyError, Notifier};
pub use report_renderer::{RenderError, ReportRenderer};
pub use time_provider::TimeProvider;
pub use transaction::{Transaction, TransactionalWindowRepository, WindowRepositoryTransaction};
pub use window_repository::WindowRepository;

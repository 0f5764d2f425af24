// Application Layer - Use Cases, Jobs and Scheduling

pub mod aggregator;
pub mod conflict;
pub mod jobs;
pub mod message;
pub mod trigger;
pub mod window_service;

// Re-exports
pub use aggregator::DailySchedule;
pub use jobs::{AuditJob, ReminderJob};
pub use trigger::{JobTrigger, RunningTrigger, ScheduledJob};
pub use window_service::MaintenanceWindowService;

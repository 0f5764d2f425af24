// Background jobs fired by the JobTrigger

pub mod audit;
pub mod reminder;

pub use audit::{AuditJob, AuditOutcome};
pub use reminder::{FanOut, ReminderJob, ReminderOutcome};

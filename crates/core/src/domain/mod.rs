// Domain Layer - Pure business logic and entities

pub mod contact;
pub mod error;
pub mod finding;
pub mod schedule;
pub mod weekday;
pub mod window;

// Re-exports
pub use contact::{AdminContact, Contact, TechnicianContact};
pub use error::DomainError;
pub use finding::FindingReportRow;
pub use schedule::ScheduleEntry;
pub use weekday::Weekday;
pub use window::{
    format_time_of_day, parse_time_of_day, AdminId, MaintenanceWindow, NewMaintenanceWindow,
    PlacementId, SlotKey, TechnicianId, WindowId, WindowSlot,
};

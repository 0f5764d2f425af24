// Schedule Entry (derived from a maintenance window and its joins)

use crate::domain::contact::notification_target;
use crate::domain::window::{format_time_of_day, WindowId};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// One of today's maintenance windows, joined with asset and technician data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub window_id: WindowId,
    pub asset_name: String,
    pub asset_category: String,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub notes: Option<String>,

    pub technician_name: String,
    pub technician_email: String,
    pub technician_chat_id: Option<String>,
    pub technician_chat_verified: bool,
}

impl ScheduleEntry {
    /// Key for the personal digest, if the technician can be notified
    pub fn personal_recipient(&self) -> Option<&str> {
        notification_target(
            self.technician_chat_id.as_deref(),
            self.technician_chat_verified,
        )
    }

    pub fn time_range(&self) -> String {
        format!(
            "{}-{}",
            format_time_of_day(self.start),
            format_time_of_day(self.end)
        )
    }
}

// Finding Domain Model (field-reported issues)

use serde::{Deserialize, Serialize};

/// Flattened finding row handed to the report renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindingReportRow {
    pub finding_id: String,
    pub asset_name: String,
    pub asset_category: String,
    pub notes: Option<String>,
    pub reported_at: i64, // epoch ms
    pub floor: String,
    pub room: String,
    pub technician_name: String,
    pub technician_email: String,
}

impl FindingReportRow {
    /// "2-Lab 204"
    pub fn floor_room(&self) -> String {
        format!("{}-{}", self.floor, self.room)
    }

    /// "Dana <dana@example.com>"
    pub fn technician_identity(&self) -> String {
        format!("{} <{}>", self.technician_name, self.technician_email)
    }
}

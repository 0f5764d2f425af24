// Maintenance Window Domain Model

use crate::domain::error::{DomainError, Result};
use crate::domain::Weekday;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Maintenance window ID (UUID v4)
pub type WindowId = String;

/// Asset placement identifier
pub type PlacementId = String;

/// Technician identifier
pub type TechnicianId = String;

/// Admin (user) identifier
pub type AdminId = String;

/// Parse "HH:MM" or "HH:MM:SS"
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime> {
    let trimmed = s.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|_| DomainError::InvalidTimeOfDay(s.to_string()))
}

/// Render a time of day the way messages and errors show it ("09:30")
pub fn format_time_of_day(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Scope of a conflict check: one technician on one placement on one weekday
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotKey {
    pub placement_id: PlacementId,
    pub technician_id: TechnicianId,
    pub weekday: Weekday,
}

/// Recurring weekly maintenance slot for a placement/technician pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceWindow {
    pub id: WindowId,
    pub placement_id: PlacementId,
    pub technician_id: TechnicianId,

    pub weekday: Weekday,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub notes: Option<String>,

    pub created_by: AdminId,
    pub created_at: i64, // epoch ms
    pub updated_at: Option<i64>,
}

impl MaintenanceWindow {
    pub fn slot_key(&self) -> SlotKey {
        SlotKey {
            placement_id: self.placement_id.clone(),
            technician_id: self.technician_id.clone(),
            weekday: self.weekday,
        }
    }

    /// "09:00-11:00"
    pub fn time_range(&self) -> String {
        format!(
            "{}-{}",
            format_time_of_day(self.start),
            format_time_of_day(self.end)
        )
    }

    /// Replace the mutable part of the window (weekday, times, notes)
    pub fn apply_slot(&mut self, slot: WindowSlot, now_millis: i64) {
        self.weekday = slot.weekday;
        self.start = slot.start;
        self.end = slot.end;
        self.notes = slot.notes;
        self.updated_at = Some(now_millis);
    }
}

/// Input for creating a window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMaintenanceWindow {
    pub placement_id: PlacementId,
    pub technician_id: TechnicianId,
    pub weekday: Weekday,
    pub start: NaiveTime,
    pub end: NaiveTime,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewMaintenanceWindow {
    pub fn slot_key(&self) -> SlotKey {
        SlotKey {
            placement_id: self.placement_id.clone(),
            technician_id: self.technician_id.clone(),
            weekday: self.weekday,
        }
    }

    /// Build the stored window with injected identity and timestamp
    pub fn into_window(
        self,
        id: impl Into<String>,
        created_by: impl Into<String>,
        created_at: i64,
    ) -> MaintenanceWindow {
        MaintenanceWindow {
            id: id.into(),
            placement_id: self.placement_id,
            technician_id: self.technician_id,
            weekday: self.weekday,
            start: self.start,
            end: self.end,
            notes: self.notes,
            created_by: created_by.into(),
            created_at,
            updated_at: None,
        }
    }
}

/// Full replacement of a window's schedule (update input)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowSlot {
    pub weekday: Weekday,
    pub start: NaiveTime,
    pub end: NaiveTime,
    #[serde(default)]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time_accepts_both_forms() {
        assert_eq!(
            parse_time_of_day("09:30").unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
        assert_eq!(
            parse_time_of_day("23:59:59").unwrap(),
            NaiveTime::from_hms_opt(23, 59, 59).unwrap()
        );
        assert!(parse_time_of_day("25:00").is_err());
        assert!(parse_time_of_day("9am").is_err());
    }

    #[test]
    fn test_apply_slot_keeps_identity() {
        let mut window = NewMaintenanceWindow {
            placement_id: "p1".into(),
            technician_id: "t1".into(),
            weekday: Weekday::Mon,
            start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
            notes: None,
        }
        .into_window("w1", "admin", 1000);

        window.apply_slot(
            WindowSlot {
                weekday: Weekday::Fri,
                start: NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
                end: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
                notes: Some("filters".into()),
            },
            2000,
        );

        assert_eq!(window.id, "w1");
        assert_eq!(window.created_by, "admin");
        assert_eq!(window.weekday, Weekday::Fri);
        assert_eq!(window.time_range(), "13:00-14:00");
        assert_eq!(window.updated_at, Some(2000));
    }
}

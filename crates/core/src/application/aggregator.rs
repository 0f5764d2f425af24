// Schedule Aggregator - broadcast/personal views of today's windows

use crate::domain::{FindingReportRow, ScheduleEntry, Weekday};
use std::collections::HashSet;

/// Today's windows, grouped for the reminder digests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySchedule {
    pub weekday: Weekday,
    /// Every entry once, query order (admin digest)
    pub broadcast: Vec<ScheduleEntry>,
    /// (technician chat id, that technician's entries), first-appearance order
    pub personal: Vec<(String, Vec<ScheduleEntry>)>,
}

impl DailySchedule {
    /// Build both views from the day's entries
    ///
    /// Entries repeated by the underlying query (same window id) are kept once.
    /// Technicians without a verified chat id appear only in `broadcast`.
    pub fn from_entries(weekday: Weekday, entries: Vec<ScheduleEntry>) -> Self {
        let mut seen = HashSet::new();
        let broadcast: Vec<ScheduleEntry> = entries
            .into_iter()
            .filter(|entry| seen.insert(entry.window_id.clone()))
            .collect();

        let mut personal: Vec<(String, Vec<ScheduleEntry>)> = Vec::new();
        for entry in &broadcast {
            let Some(recipient) = entry.personal_recipient() else {
                continue;
            };
            match personal.iter_mut().find(|(id, _)| id == recipient) {
                Some((_, group)) => group.push(entry.clone()),
                None => personal.push((recipient.to_string(), vec![entry.clone()])),
            }
        }

        Self {
            weekday,
            broadcast,
            personal,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.broadcast.is_empty()
    }
}

/// Flattened audit view: most recent finding first (stable for ties)
pub fn audit_rows(mut rows: Vec<FindingReportRow>) -> Vec<FindingReportRow> {
    rows.sort_by(|a, b| b.reported_at.cmp(&a.reported_at));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn entry(id: &str, tech: &str, chat: Option<&str>, verified: bool) -> ScheduleEntry {
        ScheduleEntry {
            window_id: id.into(),
            asset_name: format!("Asset {id}"),
            asset_category: "HVAC".into(),
            start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            notes: None,
            technician_name: tech.into(),
            technician_email: format!("{tech}@example.com"),
            technician_chat_id: chat.map(String::from),
            technician_chat_verified: verified,
        }
    }

    #[test]
    fn test_technician_with_two_windows_gets_one_group() {
        let schedule = DailySchedule::from_entries(
            Weekday::Mon,
            vec![
                entry("w1", "ana", Some("100"), true),
                entry("w2", "ben", Some("200"), true),
                entry("w3", "ana", Some("100"), true),
            ],
        );

        assert_eq!(schedule.broadcast.len(), 3);
        assert_eq!(schedule.personal.len(), 2);

        let (chat, entries) = &schedule.personal[0];
        assert_eq!(chat, "100");
        let ids: Vec<&str> = entries.iter().map(|e| e.window_id.as_str()).collect();
        assert_eq!(ids, vec!["w1", "w3"]);
    }

    #[test]
    fn test_unverified_technicians_only_in_broadcast() {
        let schedule = DailySchedule::from_entries(
            Weekday::Tue,
            vec![
                entry("w1", "ana", Some("100"), false),
                entry("w2", "ben", None, true),
            ],
        );

        assert_eq!(schedule.broadcast.len(), 2);
        assert!(schedule.personal.is_empty());
    }

    #[test]
    fn test_duplicate_rows_are_collapsed() {
        let schedule = DailySchedule::from_entries(
            Weekday::Wed,
            vec![
                entry("w1", "ana", Some("100"), true),
                entry("w1", "ana", Some("100"), true),
            ],
        );

        assert_eq!(schedule.broadcast.len(), 1);
        assert_eq!(schedule.personal[0].1.len(), 1);
    }

    #[test]
    fn test_audit_rows_most_recent_first() {
        let row = |id: &str, at: i64| FindingReportRow {
            finding_id: id.into(),
            asset_name: "Chiller".into(),
            asset_category: "HVAC".into(),
            notes: None,
            reported_at: at,
            floor: "1".into(),
            room: "101".into(),
            technician_name: "ana".into(),
            technician_email: "ana@example.com".into(),
        };

        let ordered = audit_rows(vec![row("a", 10), row("b", 30), row("c", 20)]);
        let ids: Vec<&str> = ordered.iter().map(|r| r.finding_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }
}

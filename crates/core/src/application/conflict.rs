//! Interval Conflict Checker
//!
//! Windows are half-open intervals `[start, end)` on the time-of-day axis.
//! Two windows conflict iff `a.start < b.end && a.end > b.start`, so touching
//! windows never conflict and a zero-length window never conflicts with
//! anything, itself included.

use crate::domain::{MaintenanceWindow, Weekday, WindowId};
use chrono::NaiveTime;

/// Half-open interval overlap test
pub fn overlaps(
    a_start: NaiveTime,
    a_end: NaiveTime,
    b_start: NaiveTime,
    b_end: NaiveTime,
) -> bool {
    if a_start == a_end || b_start == b_end {
        return false;
    }
    a_start < b_end && a_end > b_start
}

/// First existing window overlapping `[start, end)`, skipping `exclude`
///
/// `existing` must already be scoped to one (placement, technician, weekday).
pub fn find_conflict<'a>(
    start: NaiveTime,
    end: NaiveTime,
    existing: &'a [MaintenanceWindow],
    exclude: Option<&WindowId>,
) -> Option<&'a MaintenanceWindow> {
    existing
        .iter()
        .filter(|window| exclude != Some(&window.id))
        .find(|window| overlaps(start, end, window.start, window.end))
}

/// Like [`find_conflict`] but ignores windows on other weekdays
pub fn find_conflict_in_slot<'a>(
    weekday: Weekday,
    start: NaiveTime,
    end: NaiveTime,
    existing: &'a [MaintenanceWindow],
    exclude: Option<&WindowId>,
) -> Option<&'a MaintenanceWindow> {
    existing
        .iter()
        .filter(|window| window.weekday == weekday)
        .filter(|window| exclude != Some(&window.id))
        .find(|window| overlaps(start, end, window.start, window.end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewMaintenanceWindow;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn window(id: &str, weekday: Weekday, start: NaiveTime, end: NaiveTime) -> MaintenanceWindow {
        NewMaintenanceWindow {
            placement_id: "placement-1".into(),
            technician_id: "tech-1".into(),
            weekday,
            start,
            end,
            notes: None,
        }
        .into_window(id, "admin-1", 0)
    }

    #[test]
    fn test_overlapping_candidate_conflicts() {
        let existing = vec![window("w1", Weekday::Mon, t(9, 0), t(11, 0))];

        let conflict = find_conflict(t(10, 0), t(12, 0), &existing, None);
        assert_eq!(conflict.map(|w| w.id.as_str()), Some("w1"));
    }

    #[test]
    fn test_touching_boundaries_do_not_conflict() {
        let existing = vec![window("w1", Weekday::Mon, t(9, 0), t(11, 0))];

        assert!(find_conflict(t(11, 0), t(13, 0), &existing, None).is_none());
        assert!(find_conflict(t(7, 0), t(9, 0), &existing, None).is_none());
    }

    #[test]
    fn test_containment_conflicts_both_ways() {
        let existing = vec![window("w1", Weekday::Mon, t(9, 0), t(11, 0))];

        assert!(find_conflict(t(9, 30), t(10, 30), &existing, None).is_some());
        assert!(find_conflict(t(8, 0), t(12, 0), &existing, None).is_some());
        assert!(find_conflict(t(9, 0), t(11, 0), &existing, None).is_some());
    }

    #[test]
    fn test_zero_length_never_conflicts() {
        let existing = vec![
            window("w1", Weekday::Mon, t(9, 0), t(11, 0)),
            window("w2", Weekday::Mon, t(10, 0), t(10, 0)),
        ];

        assert!(find_conflict(t(10, 0), t(10, 0), &existing, None).is_none());
        // w2 is zero-length, so only w1 can be a witness
        let conflict = find_conflict(t(9, 30), t(10, 30), &existing, None);
        assert_eq!(conflict.map(|w| w.id.as_str()), Some("w1"));
    }

    #[test]
    fn test_zero_length_existing_is_never_a_witness() {
        let existing = vec![window("zero", Weekday::Mon, t(10, 0), t(10, 0))];

        assert!(find_conflict(t(9, 30), t(10, 30), &existing, None).is_none());
        assert!(!overlaps(t(9, 0), t(11, 0), t(10, 0), t(10, 0)));
        assert!(!overlaps(t(10, 0), t(10, 0), t(9, 0), t(11, 0)));
    }

    #[test]
    fn test_exclusion_skips_own_window() {
        let existing = vec![window("w1", Weekday::Mon, t(9, 0), t(11, 0))];
        let own_id = "w1".to_string();

        assert!(find_conflict(t(9, 0), t(11, 0), &existing, Some(&own_id)).is_none());
    }

    #[test]
    fn test_exclusion_still_checks_other_windows() {
        let existing = vec![
            window("w1", Weekday::Mon, t(9, 0), t(11, 0)),
            window("w2", Weekday::Mon, t(12, 0), t(13, 0)),
        ];
        let own_id = "w1".to_string();

        let conflict = find_conflict(t(10, 0), t(12, 30), &existing, Some(&own_id));
        assert_eq!(conflict.map(|w| w.id.as_str()), Some("w2"));
    }

    #[test]
    fn test_other_weekday_is_never_a_conflict() {
        let existing = vec![window("w1", Weekday::Mon, t(9, 0), t(11, 0))];

        let tuesday = find_conflict_in_slot(Weekday::Tue, t(10, 0), t(12, 0), &existing, None);
        assert!(tuesday.is_none());
        let monday = find_conflict_in_slot(Weekday::Mon, t(10, 0), t(12, 0), &existing, None);
        assert!(monday.is_some());
    }
}

// Reminder message formatting (chat markup: *bold*, _italic_)

use crate::domain::{ScheduleEntry, Weekday};
use std::fmt::Write;

/// Shown when a window has no notes
pub const EMPTY_NOTES_PLACEHOLDER: &str = "-";

fn is_markup(c: char) -> bool {
    matches!(c, '_' | '*' | '`' | '[')
}

/// Escape user text placed outside any entity
pub fn escape_markup(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if is_markup(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Wrap user text in a `marker` entity
///
/// Escapes are not honoured inside an entity, so each markup character
/// closes the entity, is emitted escaped, and the entity reopens after it:
/// `snake_case` in italics becomes `_snake_\__case_`.
pub fn entity(marker: char, text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 4);
    let mut run = String::new();
    for c in text.chars() {
        if is_markup(c) {
            push_run(&mut out, marker, &mut run);
            out.push('\\');
            out.push(c);
        } else {
            run.push(c);
        }
    }
    push_run(&mut out, marker, &mut run);
    out
}

// Empty entities are skipped
fn push_run(out: &mut String, marker: char, run: &mut String) {
    if run.is_empty() {
        return;
    }
    out.push(marker);
    out.push_str(run);
    out.push(marker);
    run.clear();
}

fn notes_line(notes: Option<&str>) -> String {
    match notes.map(str::trim).filter(|n| !n.is_empty()) {
        Some(text) => entity('_', text),
        None => EMPTY_NOTES_PLACEHOLDER.to_string(),
    }
}

fn write_entry(out: &mut String, number: usize, entry: &ScheduleEntry, with_technician: bool) {
    // Writing into a String cannot fail
    let _ = writeln!(out, "{}. {}", number, entity('*', &entry.asset_name));
    let _ = writeln!(out, "   Category: {}", entity('_', &entry.asset_category));
    let _ = writeln!(out, "   Time: {}", entry.time_range());
    if with_technician {
        let _ = writeln!(
            out,
            "   Technician: {} ({})",
            escape_markup(&entry.technician_name),
            escape_markup(&entry.technician_email)
        );
    }
    let _ = writeln!(out, "   Notes: {}", notes_line(entry.notes.as_deref()));
}

/// Admin digest: every entry, numbered, with technician identity
pub fn format_broadcast(weekday: Weekday, entries: &[ScheduleEntry]) -> String {
    let mut out = format!(
        "*Maintenance schedule for today ({})*\n{} window(s)\n",
        weekday,
        entries.len()
    );
    for (i, entry) in entries.iter().enumerate() {
        out.push('\n');
        write_entry(&mut out, i + 1, entry, true);
    }
    out
}

/// Technician digest: that technician's entries, without their own identity
pub fn format_personal(weekday: Weekday, entries: &[ScheduleEntry]) -> String {
    let mut out = format!(
        "*Your maintenance schedule for today ({})*\n{} window(s)\n",
        weekday,
        entries.len()
    );
    for (i, entry) in entries.iter().enumerate() {
        out.push('\n');
        write_entry(&mut out, i + 1, entry, false);
    }
    out
}

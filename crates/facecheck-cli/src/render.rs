//! Plain-text rendering of workflow results and backend listings.

use chrono::NaiveDateTime;
use facecheck_core::time::{parse_timestamp, time_ago};
use facecheck_core::workflow::PersistStep;
use facecheck_core::{BatchOutcome, CheckInRecord, Customer, Listing, Notification, Task, TaskLookup};

fn or_na(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("N/A")
}

fn hours(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |h| h.to_string())
}

/// Summary of a processed batch, one line per detection.
pub fn batch(outcome: &BatchOutcome) -> String {
    let mut out = String::new();
    for o in &outcome.outcomes {
        let mark = if o.matched() { "✓" } else { "✗" };
        let confidence = o
            .detection
            .confidence
            .map(|c| format!(", confidence {c:.2}"))
            .unwrap_or_default();
        out.push_str(&format!(
            "{mark} {} (similarity {:.2}{confidence})\n",
            o.message, o.detection.similarity
        ));
    }
    if outcome.outcomes.is_empty() && outcome.rejected.is_empty() {
        out.push_str("No faces detected\n");
    }
    out.push_str(&task_lookup(&outcome.tasks));
    out
}

/// Warnings for detections that were rejected or not fully persisted.
pub fn batch_warnings(outcome: &BatchOutcome) -> Vec<String> {
    let mut warnings = Vec::new();
    for r in &outcome.rejected {
        warnings.push(format!("detection #{} skipped: {}", r.index, r.error));
    }
    for o in &outcome.outcomes {
        for f in &o.failures {
            let step = match f.step {
                PersistStep::Record => "record",
                PersistStep::Notification => "notification",
            };
            warnings.push(format!("{step} for {} not saved: {}", o.person_name(), f.error));
        }
    }
    if let TaskLookup::Failed(err) = &outcome.tasks {
        warnings.push(format!("task lookup failed: {err}"));
    }
    warnings
}

pub fn task_lookup(lookup: &TaskLookup) -> String {
    match lookup {
        TaskLookup::Skipped | TaskLookup::Failed(_) => String::new(),
        TaskLookup::NoTasks => "No tasks found\n".to_string(),
        TaskLookup::Found(tasks) => task_table(tasks),
    }
}

pub fn task_table(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks found\n".to_string();
    }
    let mut out = String::from("ID\tNAME\tDESCRIPTION\tSTATUS\tCUSTOMER\tESTIMATE\tLOGGED\n");
    for t in tasks {
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
            t.task_id.map_or_else(|| "-".to_string(), |id| id.to_string()),
            or_na(t.name.as_deref()),
            or_na(t.description.as_deref()),
            or_na(t.status.as_deref()),
            or_na(t.customer.as_ref().map(|c| c.name.as_str())),
            hours(t.estimate_hours),
            hours(t.log_hours),
        ));
    }
    out
}

pub fn records(records: &[CheckInRecord]) -> String {
    if records.is_empty() {
        return "No records\n".to_string();
    }
    let mut out = String::new();
    for r in records {
        out.push_str(&format!(
            "[{}]\t{}\t{}\n",
            r.status,
            r.record_data,
            or_na(r.created_at.as_deref())
        ));
    }
    out
}

pub fn notifications(notifications: &[Notification], now: NaiveDateTime) -> String {
    let mut out = format!("{} notification(s)\n", notifications.len());
    for n in notifications {
        let age = n
            .created_at
            .as_deref()
            .and_then(parse_timestamp)
            .map_or_else(|| "unknown time".to_string(), |then| time_ago(then, now));
        out.push_str(&format!("{}\t{age}\n", n.display_message()));
    }
    out
}

pub fn customers(listing: &Listing<Customer>) -> String {
    let mut out = String::new();
    if listing.is_empty() {
        out.push_str("No customers found\n");
    } else {
        out.push_str("ID\tNAME\tEMAIL\tGENDER\tBIRTHDAY\n");
        for c in listing.items() {
            out.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\n",
                c.customer_id.map_or_else(|| "-".to_string(), |id| id.to_string()),
                c.name,
                or_na(c.email.as_deref()),
                or_na(c.gender.as_deref()),
                or_na(c.birthday.as_deref()),
            ));
        }
    }
    out.push_str(&page_footer(listing));
    out
}

pub fn tasks(listing: &Listing<Task>) -> String {
    let mut out = task_table(listing.items());
    out.push_str(&page_footer(listing));
    out
}

fn page_footer<T>(listing: &Listing<T>) -> String {
    let cursor = listing.cursor();
    format!("page {} of {}\n", cursor.page + 1, cursor.total_pages.max(1))
}

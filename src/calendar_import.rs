//! Import Google Calendar events into the local database.
//!
//! Input is the JSON payload returned by the calendar tool call:
//! `{"result": [event, ...]}` where each event follows the Google Calendar
//! API event shape (`id`, `summary`, `start.dateTime` / `start.date`, ...).
//! One bad event is logged and counted; it never aborts the batch.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::db::{DbCalendarEvent, LocalDb};
use crate::error::AppError;

/// Longest text stored for summary, location and links.
pub const MAX_FIELD_CHARS: usize = 500;

/// Date used when an event carries neither `dateTime` nor `date`.
const FALLBACK_DATE: &str = "2026-01-01";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub synced: usize,
    pub errors: usize,
}

/// Import every event in `payload`, upserting by Google event id.
pub fn import_calendar(db: &LocalDb, payload: &Value) -> Result<ImportReport, AppError> {
    let events = payload
        .get("result")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            AppError::InvalidInput(format!(
                "Expected array of events, got {}",
                json_kind(payload.get("result"))
            ))
        })?;

    log::info!("Calendar import: found {} events", events.len());

    let synced_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, false);

    let report = db.with_transaction(|tx| {
        let mut report = ImportReport::default();
        for event in events {
            let outcome = parse_event(event, &synced_at)
                .and_then(|row| tx.upsert_calendar_event(&row).map_err(AppError::from));
            match outcome {
                Ok(()) => report.synced += 1,
                Err(e) => {
                    let id = event.get("id").and_then(Value::as_str).unwrap_or("unknown");
                    log::warn!("Calendar import: failed to import event {}: {}", id, e);
                    report.errors += 1;
                }
            }
        }
        Ok::<_, AppError>(report)
    })?;

    log::info!(
        "Calendar import complete: {} synced, {} errors",
        report.synced,
        report.errors
    );
    Ok(report)
}

/// Convert one API event into a row.
pub fn parse_event(event: &Value, synced_at: &str) -> Result<DbCalendarEvent, AppError> {
    let google_event_id = event
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::InvalidInput("event has no id".to_string()))?
        .to_string();

    let summary = str_field(event, "summary")
        .filter(|s| !s.is_empty())
        .map(|s| truncate_chars(s, MAX_FIELD_CHARS))
        .unwrap_or_else(|| "Untitled".to_string());

    let start = event.get("start");
    let end = event.get("end");
    let is_all_day = start.and_then(|s| s.get("dateTime")).is_none();

    let start_time = parse_boundary(start, "T00:00:00+00:00")?;
    let end_time = parse_boundary(end, "T23:59:59+00:00")?;

    let attendees: Vec<&str> = event
        .get("attendees")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(|a| a.get("email").and_then(Value::as_str))
                .filter(|email| !email.is_empty())
                .collect()
        })
        .unwrap_or_default();

    Ok(DbCalendarEvent {
        google_event_id,
        summary,
        description: str_field(event, "description").map(str::to_string),
        start_time,
        end_time,
        is_all_day,
        location: bounded_optional(event, "location"),
        attendees: serde_json::to_string(&attendees)?,
        hangout_link: bounded_optional(event, "hangoutLink"),
        html_link: bounded_optional(event, "htmlLink"),
        synced_at: synced_at.to_string(),
    })
}

/// `dateTime` if present, otherwise `date` (or the fallback date) plus
/// `day_suffix`. Normalized to UTC RFC 3339.
fn parse_boundary(boundary: Option<&Value>, day_suffix: &str) -> Result<String, AppError> {
    let raw = match boundary.and_then(|b| b.get("dateTime")).and_then(Value::as_str) {
        Some(date_time) => date_time.to_string(),
        None => {
            let date = boundary
                .and_then(|b| b.get("date"))
                .and_then(Value::as_str)
                .unwrap_or(FALLBACK_DATE);
            format!("{}{}", date, day_suffix)
        }
    };

    let parsed = DateTime::parse_from_rfc3339(&raw)
        .map_err(|e| AppError::InvalidInput(format!("bad event time '{}': {}", raw, e)))?;
    Ok(parsed
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Secs, false))
}

fn str_field<'a>(event: &'a Value, key: &str) -> Option<&'a str> {
    event.get(key).and_then(Value::as_str)
}

fn bounded_optional(event: &Value, key: &str) -> Option<String> {
    str_field(event, key)
        .map(|s| truncate_chars(s, MAX_FIELD_CHARS))
        .filter(|s| !s.is_empty())
}

fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

fn json_kind(value: Option<&Value>) -> &'static str {
    match value {
        None | Some(Value::Null) => "nothing",
        Some(Value::Bool(_)) => "a boolean",
        Some(Value::Number(_)) => "a number",
        Some(Value::String(_)) => "a string",
        Some(Value::Array(_)) => "an array",
        Some(Value::Object(_)) => "an object",
    }
}

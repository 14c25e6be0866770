use rusqlite::{params, OptionalExtension, Row};

use super::*;

const EVENT_COLUMNS: &str = "google_event_id, summary, description, start_time, end_time,
     is_all_day, location, attendees, hangout_link, html_link, synced_at";

fn map_event(row: &Row<'_>) -> rusqlite::Result<DbCalendarEvent> {
    Ok(DbCalendarEvent {
        google_event_id: row.get(0)?,
        summary: row.get(1)?,
        description: row.get(2)?,
        start_time: row.get(3)?,
        end_time: row.get(4)?,
        is_all_day: row.get(5)?,
        location: row.get(6)?,
        attendees: row.get(7)?,
        hangout_link: row.get(8)?,
        html_link: row.get(9)?,
        synced_at: row.get(10)?,
    })
}

impl LocalDb {
    // =========================================================================
    // Calendar events
    // =========================================================================

    /// Insert or update an event keyed by its Google event id.
    pub fn upsert_calendar_event(&self, event: &DbCalendarEvent) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO calendar_events
                (google_event_id, summary, description, start_time, end_time, is_all_day,
                 location, attendees, hangout_link, html_link, synced_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
             ON CONFLICT(google_event_id) DO UPDATE SET
                summary = excluded.summary,
                description = excluded.description,
                start_time = excluded.start_time,
                end_time = excluded.end_time,
                is_all_day = excluded.is_all_day,
                location = excluded.location,
                attendees = excluded.attendees,
                hangout_link = excluded.hangout_link,
                html_link = excluded.html_link,
                synced_at = excluded.synced_at",
            params![
                event.google_event_id,
                event.summary,
                event.description,
                event.start_time,
                event.end_time,
                event.is_all_day,
                event.location,
                event.attendees,
                event.hangout_link,
                event.html_link,
                event.synced_at,
            ],
        )?;
        Ok(())
    }

    pub fn get_calendar_event(&self, google_event_id: &str) -> Result<Option<DbCalendarEvent>, DbError> {
        let sql = format!(
            "SELECT {} FROM calendar_events WHERE google_event_id = ?1",
            EVENT_COLUMNS
        );
        let event = self
            .conn
            .query_row(&sql, params![google_event_id], map_event)
            .optional()?;
        Ok(event)
    }

    /// Events starting in `[from, to)`, ordered by start time. Bounds are
    /// RFC 3339 strings compared lexically, which holds because stored times
    /// are normalized to UTC.
    pub fn get_calendar_events_between(
        &self,
        from: &str,
        to: &str,
    ) -> Result<Vec<DbCalendarEvent>, DbError> {
        let sql = format!(
            "SELECT {} FROM calendar_events
             WHERE start_time >= ?1 AND start_time < ?2
             ORDER BY start_time ASC",
            EVENT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![from, to], map_event)?;
        let mut events = Vec::new();
        for row in rows {
            events.push(row?);
        }
        Ok(events)
    }

    pub fn count_calendar_events(&self) -> Result<usize, DbError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM calendar_events", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use crate::db::test_utils::test_db;
    use crate::db::DbCalendarEvent;

    fn sample_event(id: &str, start: &str) -> DbCalendarEvent {
        DbCalendarEvent {
            google_event_id: id.to_string(),
            summary: "Acme sync".to_string(),
            description: None,
            start_time: start.to_string(),
            end_time: start.to_string(),
            is_all_day: false,
            location: None,
            attendees: "[]".to_string(),
            hangout_link: None,
            html_link: None,
            synced_at: "2024-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_upsert_updates_existing() {
        let db = test_db();
        db.upsert_calendar_event(&sample_event("e1", "2024-01-10T09:00:00+00:00"))
            .unwrap();

        let mut changed = sample_event("e1", "2024-01-10T10:00:00+00:00");
        changed.summary = "Acme sync (moved)".to_string();
        db.upsert_calendar_event(&changed).unwrap();

        assert_eq!(db.count_calendar_events().unwrap(), 1);
        let loaded = db.get_calendar_event("e1").unwrap().unwrap();
        assert_eq!(loaded, changed);
    }

    #[test]
    fn test_events_between_ordered() {
        let db = test_db();
        db.upsert_calendar_event(&sample_event("late", "2024-01-12T09:00:00+00:00"))
            .unwrap();
        db.upsert_calendar_event(&sample_event("early", "2024-01-10T09:00:00+00:00"))
            .unwrap();
        db.upsert_calendar_event(&sample_event("outside", "2024-02-01T09:00:00+00:00"))
            .unwrap();

        let events = db
            .get_calendar_events_between("2024-01-01", "2024-01-31")
            .unwrap();
        let ids: Vec<&str> = events.iter().map(|e| e.google_event_id.as_str()).collect();
        assert_eq!(ids, vec!["early", "late"]);
    }

    #[test]
    fn test_missing_event() {
        let db = test_db();
        assert!(db.get_calendar_event("nope").unwrap().is_none());
    }
}

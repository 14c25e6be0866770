//! Recent Meetings: bucket meetings into Sunday-aligned weeks.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;
use serde::Serialize;

use crate::dates::{parse_local_date, week_start};
use crate::types::Meeting;

/// How a week bucket is titled relative to today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "camelCase")]
pub enum WeekLabel {
    ThisWeek,
    LastWeek,
    Range(String),
}

impl std::fmt::Display for WeekLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeekLabel::ThisWeek => write!(f, "This Week"),
            WeekLabel::LastWeek => write!(f, "Last Week"),
            WeekLabel::Range(text) => write!(f, "{}", text),
        }
    }
}

/// Meetings that fall in one week, in the order they were encountered.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekBucket<'a> {
    pub week_start: NaiveDate,
    pub label: WeekLabel,
    pub meetings: Vec<&'a Meeting>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyGrouping<'a> {
    /// Most recent week first.
    pub weeks: Vec<WeekBucket<'a>>,
    /// Meetings whose date could not be parsed.
    pub undated: Vec<&'a Meeting>,
}

/// Group meetings into weeks, newest week first.
///
/// Every meeting lands in exactly one place: a week bucket, or `undated` when
/// its date is unreadable.
pub fn group_by_week<'a>(meetings: &'a [Meeting], today: NaiveDate, tz: &Tz) -> WeeklyGrouping<'a> {
    let mut index: HashMap<NaiveDate, usize> = HashMap::new();
    let mut weeks: Vec<WeekBucket<'a>> = Vec::new();
    let mut undated = Vec::new();

    for meeting in meetings {
        let Some(date) = parse_local_date(&meeting.meeting_date, tz) else {
            log::warn!(
                "Meeting {} has unreadable date '{}'; listing as undated",
                meeting.id,
                meeting.meeting_date
            );
            undated.push(meeting);
            continue;
        };

        let start = week_start(date);
        let slot = *index.entry(start).or_insert_with(|| {
            weeks.push(WeekBucket {
                week_start: start,
                label: week_label(start, today),
                meetings: Vec::new(),
            });
            weeks.len() - 1
        });
        weeks[slot].meetings.push(meeting);
    }

    weeks.sort_by(|a, b| b.week_start.cmp(&a.week_start));

    WeeklyGrouping { weeks, undated }
}

/// Title for the week starting at `start`, relative to `today`.
pub fn week_label(start: NaiveDate, today: NaiveDate) -> WeekLabel {
    let this_week = week_start(today);
    if start == this_week {
        WeekLabel::ThisWeek
    } else if start == this_week - Duration::days(7) {
        WeekLabel::LastWeek
    } else {
        WeekLabel::Range(format_week_range(start))
    }
}

/// `"Jan 7 - Jan 13, 2024"`; the year is the year the week ends in.
fn format_week_range(start: NaiveDate) -> String {
    let end = start + Duration::days(6);
    format!(
        "{} - {}",
        start.format("%b %-d"),
        end.format("%b %-d, %Y")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meeting(id: &str, date: &str) -> Meeting {
        Meeting {
            id: id.to_string(),
            meeting_date: date.to_string(),
            ..Default::default()
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_groups_by_sunday_week_newest_first() {
        let meetings = vec![
            meeting("a", "2024-01-02"),
            meeting("b", "2024-01-10"),
            meeting("c", "2024-01-08"),
            meeting("d", "2024-01-13"),
            meeting("e", "2024-01-14"),
        ];
        let grouping = group_by_week(&meetings, d(2024, 1, 15), &Tz::UTC);

        let starts: Vec<NaiveDate> = grouping.weeks.iter().map(|w| w.week_start).collect();
        assert_eq!(starts, vec![d(2024, 1, 14), d(2024, 1, 7), d(2023, 12, 31)]);

        let middle: Vec<&str> = grouping.weeks[1]
            .meetings
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(middle, vec!["b", "c", "d"], "encounter order within a bucket");
        assert!(grouping.undated.is_empty());
    }

    #[test]
    fn test_every_meeting_placed_exactly_once() {
        let meetings = vec![
            meeting("a", "2024-03-01"),
            meeting("b", "garbage"),
            meeting("c", "2024-02-14T09:00:00Z"),
            meeting("d", ""),
            meeting("e", "2024-03-02 10:00:00"),
        ];
        let grouping = group_by_week(&meetings, d(2024, 3, 4), &Tz::UTC);

        let bucketed: usize = grouping.weeks.iter().map(|w| w.meetings.len()).sum();
        assert_eq!(bucketed + grouping.undated.len(), meetings.len());
        let undated: Vec<&str> = grouping.undated.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(undated, vec!["b", "d"]);

        for pair in grouping.weeks.windows(2) {
            assert!(pair[0].week_start > pair[1].week_start);
        }
    }

    #[test]
    fn test_labels_relative_to_today() {
        let today = d(2024, 1, 17); // Wednesday
        assert_eq!(week_label(d(2024, 1, 14), today), WeekLabel::ThisWeek);
        assert_eq!(week_label(d(2024, 1, 7), today), WeekLabel::LastWeek);
        assert_eq!(
            week_label(d(2023, 12, 31), today),
            WeekLabel::Range("Dec 31 - Jan 6, 2024".to_string())
        );
        // Future weeks are ranges too.
        assert_eq!(
            week_label(d(2024, 1, 21), today),
            WeekLabel::Range("Jan 21 - Jan 27, 2024".to_string())
        );
    }

    #[test]
    fn test_label_display() {
        assert_eq!(WeekLabel::ThisWeek.to_string(), "This Week");
        assert_eq!(WeekLabel::LastWeek.to_string(), "Last Week");
    }

    #[test]
    fn test_empty_input() {
        let grouping = group_by_week(&[], d(2024, 1, 17), &Tz::UTC);
        assert!(grouping.weeks.is_empty());
        assert!(grouping.undated.is_empty());
    }
}

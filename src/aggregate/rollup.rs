//! Daily and weekly rollups for the dashboard summary widgets.
//!
//! Pure aggregation over an already-fetched window: counts, top-N by
//! frequency, and a per-day histogram scaled to the busiest day.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::dates::{parse_local_date, week_days, week_start};
use crate::types::{Meeting, Task, TaskStatus};

/// A value and how many meetings mentioned it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ranked {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRollup {
    pub date: NaiveDate,
    pub meeting_count: usize,
    pub tasks_created: usize,
    pub tasks_completed: usize,
    pub top_sectors: Vec<Ranked>,
    pub top_jurisdictions: Vec<Ranked>,
}

/// One bar of the weekly histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayBar {
    pub date: NaiveDate,
    /// Short weekday name, e.g. `Sun`.
    pub label: String,
    pub count: usize,
    /// `count / busiest day`, in `0.0..=1.0`.
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyRollup {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub meeting_count: usize,
    pub tasks_created: usize,
    pub tasks_completed: usize,
    pub top_sectors: Vec<Ranked>,
    pub top_jurisdictions: Vec<Ranked>,
    pub days: Vec<DayBar>,
}

/// Summarize a single day.
pub fn daily_rollup(
    date: NaiveDate,
    meetings: &[Meeting],
    tasks: &[Task],
    top_n: usize,
    tz: &Tz,
) -> DailyRollup {
    let in_day: Vec<&Meeting> = meetings
        .iter()
        .filter(|m| parse_local_date(&m.meeting_date, tz) == Some(date))
        .collect();
    let (tasks_created, tasks_completed) = count_tasks(tasks, tz, |d| d == date);

    DailyRollup {
        date,
        meeting_count: in_day.len(),
        tasks_created,
        tasks_completed,
        top_sectors: top_n_by_frequency(in_day.iter().map(|m| m.sectors()), top_n),
        top_jurisdictions: top_n_by_frequency(in_day.iter().map(|m| m.jurisdictions()), top_n),
    }
}

/// Summarize the Sunday-aligned week containing `any_day`.
pub fn weekly_rollup(
    any_day: NaiveDate,
    meetings: &[Meeting],
    tasks: &[Task],
    top_n: usize,
    tz: &Tz,
) -> WeeklyRollup {
    let start = week_start(any_day);
    let end = start + Duration::days(6);
    let in_week = |d: NaiveDate| d >= start && d <= end;

    let dated: Vec<(NaiveDate, &Meeting)> = meetings
        .iter()
        .filter_map(|m| parse_local_date(&m.meeting_date, tz).map(|d| (d, m)))
        .filter(|(d, _)| in_week(*d))
        .collect();

    let mut per_day: HashMap<NaiveDate, usize> = HashMap::new();
    for (date, _) in &dated {
        *per_day.entry(*date).or_default() += 1;
    }
    let days = histogram(start, &per_day);

    let (tasks_created, tasks_completed) = count_tasks(tasks, tz, in_week);

    WeeklyRollup {
        week_start: start,
        week_end: end,
        meeting_count: dated.len(),
        tasks_created,
        tasks_completed,
        top_sectors: top_n_by_frequency(dated.iter().map(|(_, m)| m.sectors()), top_n),
        top_jurisdictions: top_n_by_frequency(dated.iter().map(|(_, m)| m.jurisdictions()), top_n),
        days,
    }
}

fn histogram(start: NaiveDate, per_day: &HashMap<NaiveDate, usize>) -> Vec<DayBar> {
    let max = per_day.values().copied().max().unwrap_or(0);
    week_days(start)
        .into_iter()
        .map(|date| {
            let count = per_day.get(&date).copied().unwrap_or(0);
            let height = if max == 0 {
                0.0
            } else {
                count as f64 / max as f64
            };
            DayBar {
                date,
                label: date.format("%a").to_string(),
                count,
                height,
            }
        })
        .collect()
}

/// `(created, completed)` for tasks whose timestamps fall inside `window`.
fn count_tasks(tasks: &[Task], tz: &Tz, window: impl Fn(NaiveDate) -> bool) -> (usize, usize) {
    let created = tasks
        .iter()
        .filter(|t| parse_local_date(&t.created_at, tz).is_some_and(&window))
        .count();
    let completed = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Completed)
        .filter(|t| {
            t.completed_at
                .as_deref()
                .and_then(|raw| parse_local_date(raw, tz))
                .is_some_and(&window)
        })
        .count();
    (created, completed)
}

/// Count each trimmed, non-empty value across lists and keep the `n` most
/// frequent. Ties break alphabetically.
pub fn top_n_by_frequency<I>(lists: I, n: usize) -> Vec<Ranked>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    for list in lists {
        for value in list {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            *counts.entry(value.to_string()).or_default() += 1;
        }
    }

    let mut ranked: Vec<Ranked> = counts
        .into_iter()
        .map(|(name, count)| Ranked { name, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(n);
    ranked
}

//! Page view state.
//!
//! Each page owns one immutable record of its filters, sort and selection.
//! Events become actions; `reduce` returns the next record and leaves the old
//! one untouched. `apply` turns a fetched slice into what the page shows.

use chrono::NaiveDateTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::aggregate::PersonSummary;
use crate::dates::parse_local_datetime;
use crate::types::{Meeting, SourceType, Task, TaskPriority, TaskStatus};

fn matches_search(needle: &str, haystacks: &[&str]) -> bool {
    let needle = needle.trim().to_lowercase();
    needle.is_empty() || haystacks.iter().any(|h| h.to_lowercase().contains(&needle))
}

// =============================================================================
// Meetings
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MeetingSort {
    #[default]
    NewestFirst,
    OldestFirst,
    Title,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingsView {
    pub search: String,
    pub source: Option<SourceType>,
    pub sort: MeetingSort,
    pub selected: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeetingsAction {
    Search(String),
    FilterSource(Option<SourceType>),
    SortBy(MeetingSort),
    Select(String),
    Deselect,
    ClearFilters,
}

impl MeetingsView {
    pub fn reduce(self, action: MeetingsAction) -> Self {
        match action {
            MeetingsAction::Search(search) => Self { search, ..self },
            MeetingsAction::FilterSource(source) => Self { source, ..self },
            MeetingsAction::SortBy(sort) => Self { sort, ..self },
            MeetingsAction::Select(id) => Self {
                selected: Some(id),
                ..self
            },
            MeetingsAction::Deselect => Self {
                selected: None,
                ..self
            },
            MeetingsAction::ClearFilters => Self {
                selected: self.selected,
                ..Self::default()
            },
        }
    }

    /// Matching meetings in display order. Search covers title, summary,
    /// participants and organizations.
    pub fn apply<'a>(&self, meetings: &'a [Meeting], tz: &Tz) -> Vec<&'a Meeting> {
        let mut shown: Vec<(&Meeting, Option<NaiveDateTime>)> = meetings
            .iter()
            .filter(|m| self.source.map_or(true, |s| m.source_type == s))
            .filter(|m| {
                let participants = m.participants().join(" ");
                let organizations = m.organizations().join(" ");
                matches_search(
                    &self.search,
                    &[
                        m.title.as_str(),
                        m.executive_summary.as_str(),
                        participants.as_str(),
                        organizations.as_str(),
                    ],
                )
            })
            .map(|m| (m, parse_local_datetime(&m.meeting_date, tz)))
            .collect();

        match self.sort {
            // Undated meetings sink to the bottom either way.
            MeetingSort::NewestFirst => shown.sort_by(|a, b| match (a.1, b.1) {
                (Some(x), Some(y)) => y.cmp(&x),
                (x, y) => y.is_some().cmp(&x.is_some()),
            }),
            MeetingSort::OldestFirst => shown.sort_by(|a, b| match (a.1, b.1) {
                (Some(x), Some(y)) => x.cmp(&y),
                (x, y) => y.is_some().cmp(&x.is_some()),
            }),
            MeetingSort::Title => {
                shown.sort_by_cached_key(|(m, _)| m.title.to_lowercase())
            }
        }
        shown.into_iter().map(|(m, _)| m).collect()
    }

    pub fn selected_meeting<'a>(&self, meetings: &'a [Meeting]) -> Option<&'a Meeting> {
        let id = self.selected.as_deref()?;
        meetings.iter().find(|m| m.id == id)
    }
}

// =============================================================================
// Tasks
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskSort {
    /// Earliest due first; tasks without a due date last.
    #[default]
    DueDate,
    /// High before low.
    Priority,
    NewestFirst,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TasksView {
    pub search: String,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assignee: Option<String>,
    pub sort: TaskSort,
    pub show_completed: bool,
}

impl Default for TasksView {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: None,
            priority: None,
            assignee: None,
            sort: TaskSort::default(),
            show_completed: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TasksAction {
    Search(String),
    FilterStatus(Option<TaskStatus>),
    FilterPriority(Option<TaskPriority>),
    FilterAssignee(Option<String>),
    SortBy(TaskSort),
    ToggleCompleted,
    ClearFilters,
}

impl TasksView {
    pub fn reduce(self, action: TasksAction) -> Self {
        match action {
            TasksAction::Search(search) => Self { search, ..self },
            TasksAction::FilterStatus(status) => Self { status, ..self },
            TasksAction::FilterPriority(priority) => Self { priority, ..self },
            TasksAction::FilterAssignee(assignee) => Self { assignee, ..self },
            TasksAction::SortBy(sort) => Self { sort, ..self },
            TasksAction::ToggleCompleted => Self {
                show_completed: !self.show_completed,
                ..self
            },
            TasksAction::ClearFilters => Self {
                sort: self.sort,
                ..Self::default()
            },
        }
    }

    pub fn apply<'a>(&self, tasks: &'a [Task], tz: &Tz) -> Vec<&'a Task> {
        let mut shown: Vec<&Task> = tasks
            .iter()
            .filter(|t| self.show_completed || t.status != TaskStatus::Completed)
            .filter(|t| self.status.map_or(true, |s| t.status == s))
            .filter(|t| self.priority.map_or(true, |p| t.priority == p))
            .filter(|t| match &self.assignee {
                Some(who) => t
                    .assignee
                    .as_deref()
                    .is_some_and(|a| a.eq_ignore_ascii_case(who)),
                None => true,
            })
            .filter(|t| {
                matches_search(
                    &self.search,
                    &[t.title.as_str(), t.category.as_deref().unwrap_or("")],
                )
            })
            .collect();

        match self.sort {
            TaskSort::DueDate => shown.sort_by_cached_key(|t| {
                let due = t
                    .due_date
                    .as_deref()
                    .and_then(|d| parse_local_datetime(d, tz));
                (due.is_none(), due)
            }),
            TaskSort::Priority => shown.sort_by(|a, b| b.priority.cmp(&a.priority)),
            TaskSort::NewestFirst => shown.sort_by_cached_key(|t| {
                std::cmp::Reverse(parse_local_datetime(&t.created_at, tz))
            }),
        }
        shown
    }

    /// Filtered, sorted tasks split by status: open, in progress, completed.
    /// Empty groups are omitted.
    pub fn grouped<'a>(&self, tasks: &'a [Task], tz: &Tz) -> Vec<(TaskStatus, Vec<&'a Task>)> {
        let shown = self.apply(tasks, tz);
        [TaskStatus::Open, TaskStatus::InProgress, TaskStatus::Completed]
            .into_iter()
            .map(|status| {
                let group: Vec<&Task> = shown.iter().copied().filter(|t| t.status == status).collect();
                (status, group)
            })
            .filter(|(_, group)| !group.is_empty())
            .collect()
    }
}

// =============================================================================
// People
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PeopleSort {
    #[default]
    MostMeetings,
    Name,
    RecentlySeen,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeopleView {
    pub search: String,
    pub organization: Option<String>,
    pub sort: PeopleSort,
    pub selected: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeopleAction {
    Search(String),
    FilterOrganization(Option<String>),
    SortBy(PeopleSort),
    /// Select by person key.
    Select(String),
    Deselect,
}

impl PeopleView {
    pub fn reduce(self, action: PeopleAction) -> Self {
        match action {
            PeopleAction::Search(search) => Self { search, ..self },
            PeopleAction::FilterOrganization(organization) => Self {
                organization,
                ..self
            },
            PeopleAction::SortBy(sort) => Self { sort, ..self },
            PeopleAction::Select(key) => Self {
                selected: Some(key),
                ..self
            },
            PeopleAction::Deselect => Self {
                selected: None,
                ..self
            },
        }
    }

    pub fn apply<'a>(&self, people: &'a [PersonSummary], tz: &Tz) -> Vec<&'a PersonSummary> {
        let mut shown: Vec<&PersonSummary> = people
            .iter()
            .filter(|p| match &self.organization {
                Some(org) => p.organizations.iter().any(|o| o.eq_ignore_ascii_case(org)),
                None => true,
            })
            .filter(|p| {
                let orgs: Vec<&str> = p.organizations.iter().map(String::as_str).collect();
                let emails: Vec<&str> = p.emails.iter().map(String::as_str).collect();
                let mut fields = vec![p.name.as_str()];
                fields.extend(orgs);
                fields.extend(emails);
                matches_search(&self.search, &fields)
            })
            .collect();

        match self.sort {
            // Directory order already is meeting count, then name.
            PeopleSort::MostMeetings => {}
            PeopleSort::Name => shown.sort_by(|a, b| a.key.cmp(&b.key)),
            PeopleSort::RecentlySeen => shown.sort_by_cached_key(|p| {
                std::cmp::Reverse(parse_local_datetime(&p.last_meeting, tz))
            }),
        }
        shown
    }
}

//! In-memory data client over a JSON snapshot.
//!
//! A snapshot is what the pages would have fetched: one array per entity.
//! Analytics are computed locally with the same aggregation code the views use.

use std::path::Path;

use async_trait::async_trait;
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::{AnalyticsApi, DashboardStats, Entity, EntityApi};
use crate::aggregate::{daily_rollup, weekly_rollup, DailyRollup, WeeklyRollup};
use crate::dates::{parse_local_date, today_in, week_start};
use crate::error::AppError;
use crate::types::{
    Company, Contact, Document, Employee, KnownContact, Meeting, PayrollRecord, Task, TaskStatus,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub meetings: Vec<Meeting>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub companies: Vec<Company>,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub payroll: Vec<PayrollRecord>,
    #[serde(default)]
    pub documents: Vec<Document>,
}

impl Snapshot {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| AppError::Decode(format!("Failed to parse {}: {}", path.display(), e)))
    }

    pub fn known_contacts(&self) -> Vec<KnownContact> {
        self.contacts.iter().map(KnownContact::from).collect()
    }
}

/// Which snapshot array holds a given entity.
pub trait SnapshotCollection: Entity {
    fn collection(snapshot: &Snapshot) -> &Vec<Self>;
    fn collection_mut(snapshot: &mut Snapshot) -> &mut Vec<Self>;
}

macro_rules! impl_collection {
    ($($ty:ty => $field:ident),* $(,)?) => {
        $(
            impl SnapshotCollection for $ty {
                fn collection(snapshot: &Snapshot) -> &Vec<Self> {
                    &snapshot.$field
                }

                fn collection_mut(snapshot: &mut Snapshot) -> &mut Vec<Self> {
                    &mut snapshot.$field
                }
            }
        )*
    };
}

impl_collection! {
    Meeting => meetings,
    Task => tasks,
    Company => companies,
    Contact => contacts,
    Employee => employees,
    PayrollRecord => payroll,
    Document => documents,
}

pub struct SnapshotClient {
    snapshot: RwLock<Snapshot>,
    tz: Tz,
    top_n: usize,
}

impl SnapshotClient {
    pub fn new(snapshot: Snapshot, tz: Tz, top_n: usize) -> Self {
        Self {
            snapshot: RwLock::new(snapshot),
            tz,
            top_n,
        }
    }

    /// Copy of the current state, e.g. to persist after mutations.
    pub async fn snapshot(&self) -> Snapshot {
        self.snapshot.read().await.clone()
    }

    fn not_found<T: Entity>(id: &str) -> AppError {
        AppError::NotFound(format!("{} {}", T::ROUTER, id))
    }

    /// Dashboard numbers as of `today`.
    pub async fn dashboard_on(&self, today: NaiveDate) -> DashboardStats {
        let snap = self.snapshot.read().await;
        let this_week = week_start(today);

        let meetings_this_week = snap
            .meetings
            .iter()
            .filter_map(|m| parse_local_date(&m.meeting_date, &self.tz))
            .filter(|d| week_start(*d) == this_week)
            .count();
        let open: Vec<&Task> = snap
            .tasks
            .iter()
            .filter(|t| t.status != TaskStatus::Completed)
            .collect();
        let overdue = open
            .iter()
            .filter(|t| {
                t.due_date
                    .as_deref()
                    .and_then(|d| parse_local_date(d, &self.tz))
                    .is_some_and(|due| due < today)
            })
            .count();

        DashboardStats {
            company_count: snap.companies.len(),
            contact_count: snap.contacts.len(),
            meeting_count: snap.meetings.len(),
            meetings_this_week,
            open_task_count: open.len(),
            overdue_task_count: overdue,
        }
    }
}

#[async_trait]
impl<T: SnapshotCollection> EntityApi<T> for SnapshotClient {
    async fn list(&self) -> Result<Vec<T>, AppError> {
        Ok(T::collection(&*self.snapshot.read().await).clone())
    }

    async fn get_by_id(&self, id: &str) -> Result<T, AppError> {
        let snap = self.snapshot.read().await;
        T::collection(&snap)
            .iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or_else(|| Self::not_found::<T>(id))
    }

    async fn create(&self, mut record: T) -> Result<T, AppError> {
        if record.id().is_empty() {
            record.set_id(uuid::Uuid::new_v4().to_string());
        }
        let mut snap = self.snapshot.write().await;
        let records = T::collection_mut(&mut snap);
        if records.iter().any(|r| r.id() == record.id()) {
            return Err(AppError::InvalidInput(format!(
                "{} {} already exists",
                T::ROUTER,
                record.id()
            )));
        }
        records.push(record.clone());
        Ok(record)
    }

    async fn update(&self, record: T) -> Result<T, AppError> {
        let mut snap = self.snapshot.write().await;
        let slot = T::collection_mut(&mut snap)
            .iter_mut()
            .find(|r| r.id() == record.id())
            .ok_or_else(|| Self::not_found::<T>(record.id()))?;
        *slot = record.clone();
        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let mut snap = self.snapshot.write().await;
        let records = T::collection_mut(&mut snap);
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Err(Self::not_found::<T>(id));
        }
        Ok(())
    }
}

#[async_trait]
impl AnalyticsApi for SnapshotClient {
    async fn dashboard(&self) -> Result<DashboardStats, AppError> {
        Ok(self.dashboard_on(today_in(&self.tz)).await)
    }

    async fn daily_summary(&self, date: NaiveDate) -> Result<DailyRollup, AppError> {
        let snap = self.snapshot.read().await;
        Ok(daily_rollup(date, &snap.meetings, &snap.tasks, self.top_n, &self.tz))
    }

    async fn weekly_summary(&self, week_start: NaiveDate) -> Result<WeeklyRollup, AppError> {
        let snap = self.snapshot.read().await;
        Ok(weekly_rollup(week_start, &snap.meetings, &snap.tasks, self.top_n, &self.tz))
    }
}

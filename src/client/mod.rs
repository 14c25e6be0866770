//! Typed data client.
//!
//! Pages talk to the backend through two traits: [`EntityApi`] for per-entity
//! CRUD and [`AnalyticsApi`] for the report endpoints. [`HttpClient`] speaks
//! the backend's procedure-style HTTP API; [`SnapshotClient`] serves the same
//! calls from an in-memory snapshot (offline CLI use and tests).

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::aggregate::{DailyRollup, WeeklyRollup};
use crate::error::AppError;
use crate::types::{Company, Contact, Document, Employee, Meeting, PayrollRecord, Task};

pub mod http;
pub mod snapshot;

pub use http::{DownloadedFile, HttpClient};
pub use snapshot::{Snapshot, SnapshotClient};

/// A record the backend exposes under its own procedure router.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Router name, e.g. `meetings` for `meetings.list`.
    const ROUTER: &'static str;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
}

macro_rules! impl_entity {
    ($($ty:ty => $router:literal),* $(,)?) => {
        $(
            impl Entity for $ty {
                const ROUTER: &'static str = $router;

                fn id(&self) -> &str {
                    &self.id
                }

                fn set_id(&mut self, id: String) {
                    self.id = id;
                }
            }
        )*
    };
}

impl_entity! {
    Meeting => "meetings",
    Task => "tasks",
    Company => "companies",
    Contact => "contacts",
    Employee => "employees",
    PayrollRecord => "payroll",
    Document => "documents",
}

/// Fully qualified procedure name, e.g. `meetings.getById`.
pub fn procedure<T: Entity>(operation: &str) -> String {
    format!("{}.{}", T::ROUTER, operation)
}

#[async_trait]
pub trait EntityApi<T: Entity>: Send + Sync {
    async fn list(&self) -> Result<Vec<T>, AppError>;
    async fn get_by_id(&self, id: &str) -> Result<T, AppError>;
    /// Returns the stored record, with its server-assigned id.
    async fn create(&self, record: T) -> Result<T, AppError>;
    async fn update(&self, record: T) -> Result<T, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

/// Headline numbers for the dashboard stats widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub company_count: usize,
    pub contact_count: usize,
    pub meeting_count: usize,
    pub meetings_this_week: usize,
    pub open_task_count: usize,
    pub overdue_task_count: usize,
}

#[async_trait]
pub trait AnalyticsApi: Send + Sync {
    async fn dashboard(&self) -> Result<DashboardStats, AppError>;
    async fn daily_summary(&self, date: NaiveDate) -> Result<DailyRollup, AppError>;
    async fn weekly_summary(&self, week_start: NaiveDate) -> Result<WeeklyRollup, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_procedure_names() {
        assert_eq!(procedure::<Meeting>("list"), "meetings.list");
        assert_eq!(procedure::<PayrollRecord>("getById"), "payroll.getById");
        assert_eq!(procedure::<Contact>("delete"), "contacts.delete");
    }

    #[test]
    fn test_set_id() {
        let mut task = Task::default();
        task.set_id("t-9".to_string());
        assert_eq!(Entity::id(&task), "t-9");
    }
}

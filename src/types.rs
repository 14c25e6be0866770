//! Entity records as the backend serves them.
//!
//! These are consumed, not owned: the core reads them, derives aggregates and
//! hands them back to the data client untouched. Meeting list fields arrive as
//! JSON-encoded text and are decoded through [`crate::decode`].

use serde::{Deserialize, Serialize};

use crate::decode::decode_list;

/// Where a meeting record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Plaud,
    Fathom,
    Manual,
    Calendar,
    #[default]
    #[serde(other)]
    Other,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Plaud => "plaud",
            SourceType::Fathom => "fathom",
            SourceType::Manual => "manual",
            SourceType::Calendar => "calendar",
            SourceType::Other => "other",
        }
    }
}

/// A meeting with its AI-generated intelligence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub meeting_date: String,
    #[serde(default)]
    pub source_type: SourceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participants: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizations: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jurisdictions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sectors: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlights: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opportunities: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risks: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_quotes: Option<String>,
    #[serde(default)]
    pub executive_summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
}

impl Meeting {
    pub fn participants(&self) -> Vec<String> {
        decode_list(self.participants.as_deref())
    }

    pub fn organizations(&self) -> Vec<String> {
        decode_list(self.organizations.as_deref())
    }

    pub fn jurisdictions(&self) -> Vec<String> {
        decode_list(self.jurisdictions.as_deref())
    }

    pub fn sectors(&self) -> Vec<String> {
        decode_list(self.sectors.as_deref())
    }

    pub fn highlights(&self) -> Vec<String> {
        decode_list(self.highlights.as_deref())
    }

    pub fn opportunities(&self) -> Vec<String> {
        decode_list(self.opportunities.as_deref())
    }

    pub fn risks(&self) -> Vec<String> {
        decode_list(self.risks.as_deref())
    }

    pub fn key_quotes(&self) -> Vec<String> {
        decode_list(self.key_quotes.as_deref())
    }
}

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Open,
    InProgress,
    Completed,
}

/// Task priority. Ordered so that `High` sorts last; views reverse as needed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    /// Meeting this task was extracted from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_id: Option<String>,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

/// A contact the user already knows; feeds people-directory enrichment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnownContact {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

impl From<&Contact> for KnownContact {
    fn from(contact: &Contact) -> Self {
        KnownContact {
            name: contact.name.clone(),
            email: contact.email.clone(),
            organization: contact.organization.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hire_date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollRecord {
    pub id: String,
    pub employee_id: String,
    pub pay_period_start: String,
    pub pay_period_end: String,
    /// Amounts are carried in minor units (cents).
    pub gross_amount: i64,
    pub net_amount: i64,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meeting_deserializes_from_backend_shape() {
        let raw = r#"{
            "id": "m1",
            "title": "Acme intro",
            "meetingDate": "2024-01-10",
            "sourceType": "plaud",
            "participants": "[\"Alice\", \"Bob\"]",
            "organizations": "not json",
            "executiveSummary": "Kickoff"
        }"#;
        let meeting: Meeting = serde_json::from_str(raw).unwrap();
        assert_eq!(meeting.source_type, SourceType::Plaud);
        assert_eq!(meeting.participants(), vec!["Alice", "Bob"]);
        assert!(meeting.organizations().is_empty());
        assert!(meeting.jurisdictions().is_empty());
    }

    #[test]
    fn test_unknown_source_type_is_other() {
        let raw = r#"{"id": "m1", "meetingDate": "2024-01-10", "sourceType": "zoom"}"#;
        let meeting: Meeting = serde_json::from_str(raw).unwrap();
        assert_eq!(meeting.source_type, SourceType::Other);
    }

    #[test]
    fn test_task_status_snake_case() {
        let raw = r#"{"id": "t1", "title": "Follow up", "status": "in_progress", "createdAt": "2024-01-10"}"#;
        let task: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.priority, TaskPriority::Medium);
    }
}

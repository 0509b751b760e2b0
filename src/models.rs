use crate::dates::RecordDate;
use serde::{Deserialize, Serialize};

/// Field access the list pipeline needs from a record kind.
///
/// A kind that does not carry a field keeps the default, and filters on that
/// field never match it.
pub trait ListRecord {
    /// Stable identity. Unique within one collection.
    fn id(&self) -> &str;

    /// Text searched by the `searchTerm` filter (title or name).
    fn title(&self) -> Option<&str>;

    fn status(&self) -> Option<&str> {
        None
    }

    fn priority(&self) -> Option<&str> {
        None
    }

    /// `None` means unassigned.
    fn assignee_id(&self) -> Option<u64> {
        None
    }

    fn start_date(&self) -> RecordDate {
        RecordDate::Missing
    }

    fn end_date(&self) -> RecordDate {
        RecordDate::Missing
    }

    /// Discriminator used for badge counts.
    fn category(&self) -> Option<&str> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TaskKind {
    Task,
    Bug,
    Story,
}

impl TaskKind {
    pub const ALL: [TaskKind; 3] = [TaskKind::Task, TaskKind::Bug, TaskKind::Story];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Task => "Task",
            Self::Bug => "Bug",
            Self::Story => "Story",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(raw))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub assignee_id: Option<u64>,
    #[serde(default)]
    pub start_date: RecordDate,
    #[serde(default)]
    pub end_date: RecordDate,
    #[serde(default, rename = "type")]
    pub kind: Option<TaskKind>,
}

impl ListRecord for TaskRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> Option<&str> {
        Some(&self.title)
    }

    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn priority(&self) -> Option<&str> {
        self.priority.as_deref()
    }

    fn assignee_id(&self) -> Option<u64> {
        self.assignee_id
    }

    fn start_date(&self) -> RecordDate {
        self.start_date
    }

    fn end_date(&self) -> RecordDate {
        self.end_date
    }

    fn category(&self) -> Option<&str> {
        self.kind.map(TaskKind::as_str)
    }
}

/// An entry of the asset register. The owner plays the assignee role and the
/// review date is the end date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub owner_id: Option<u64>,
    #[serde(default)]
    pub acquired_on: RecordDate,
    #[serde(default)]
    pub review_on: RecordDate,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl ListRecord for AssetRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn assignee_id(&self) -> Option<u64> {
        self.owner_id
    }

    fn start_date(&self) -> RecordDate {
        self.acquired_on
    }

    fn end_date(&self) -> RecordDate {
        self.review_on
    }

    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

/// One line of an audit checklist, tied to a standard clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub assignee_id: Option<u64>,
    #[serde(default)]
    pub due_on: RecordDate,
    #[serde(default)]
    pub clause: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ListRecord for ChecklistItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> Option<&str> {
        Some(&self.title)
    }

    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn priority(&self) -> Option<&str> {
        self.priority.as_deref()
    }

    fn assignee_id(&self) -> Option<u64> {
        self.assignee_id
    }

    fn end_date(&self) -> RecordDate {
        self.due_on
    }

    fn category(&self) -> Option<&str> {
        self.clause.as_deref()
    }
}

impl<T: ListRecord + ?Sized> ListRecord for &T {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn title(&self) -> Option<&str> {
        (**self).title()
    }

    fn status(&self) -> Option<&str> {
        (**self).status()
    }

    fn priority(&self) -> Option<&str> {
        (**self).priority()
    }

    fn assignee_id(&self) -> Option<u64> {
        (**self).assignee_id()
    }

    fn start_date(&self) -> RecordDate {
        (**self).start_date()
    }

    fn end_date(&self) -> RecordDate {
        (**self).end_date()
    }

    fn category(&self) -> Option<&str> {
        (**self).category()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_kind_parses_case_insensitively() {
        assert_eq!(TaskKind::parse(" bug "), Some(TaskKind::Bug));
        assert_eq!(TaskKind::parse("STORY"), Some(TaskKind::Story));
        assert_eq!(TaskKind::parse("Epic"), None);
    }

    #[test]
    fn task_deserializes_with_sentinel_defaults() {
        let task: TaskRecord = serde_json::from_value(serde_json::json!({
            "id": "T-1",
            "title": "Draft risk register",
            "endDate": "N/A",
            "type": "Bug"
        }))
        .expect("task");
        assert!(task.start_date.is_missing());
        assert!(task.end_date.is_missing());
        assert_eq!(task.category(), Some("Bug"));
        assert_eq!(task.assignee_id(), None);
    }

    #[test]
    fn asset_maps_owner_and_review_date() {
        let asset = AssetRecord {
            id: "A-7".to_string(),
            name: "Laptop fleet".to_string(),
            status: Some("Active".to_string()),
            owner_id: Some(4),
            acquired_on: RecordDate::parse("2024-06-01"),
            review_on: RecordDate::parse("2025-06-01"),
            category: Some("Hardware".to_string()),
            location: None,
        };
        assert_eq!(asset.assignee_id(), Some(4));
        assert_eq!(asset.end_date(), RecordDate::parse("2025-06-01"));
        assert_eq!(asset.priority(), None);
    }
}

//! Task types: Task, TaskStatus, TaskPatch

use super::ids::{ColumnId, TaskId, UserId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Workflow status of a task, independent of the column it sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Review,
    Done,
    Cancelled,
    /// Any status this client does not know about
    #[serde(other)]
    Other,
}

/// A task/card on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_user_id: Option<UserId>,
    /// Zero-based order within the owning column
    #[serde(default)]
    pub position: usize,
    /// Must match the column whose list holds this task
    pub column_id: ColumnId,
    #[serde(default, alias = "importance", skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDateTime>,
    /// Task that must finish before this one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency_id: Option<TaskId>,
}

impl Task {
    /// Create a new task in the given column at position 0
    pub fn new(id: impl Into<TaskId>, title: impl Into<String>, column_id: impl Into<ColumnId>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            status: TaskStatus::default(),
            assigned_user_id: None,
            position: 0,
            column_id: column_id.into(),
            priority: None,
            start_date: None,
            end_date: None,
            dependency_id: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the status
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the assignee
    pub fn with_assignee(mut self, user: impl Into<UserId>) -> Self {
        self.assigned_user_id = Some(user.into());
        self
    }

    /// Set the position
    pub fn with_position(mut self, position: usize) -> Self {
        self.position = position;
        self
    }
}

/// Partial update of a task's ordering fields.
///
/// Absent fields are left untouched by the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_id: Option<ColumnId>,
}

impl TaskPatch {
    /// Patch carrying both ordering fields of a task
    pub fn ordering_of(task: &Task) -> Self {
        Self {
            position: Some(task.position),
            column_id: Some(task.column_id),
        }
    }

    /// Apply the patch to a task
    pub fn apply(&self, task: &mut Task) {
        if let Some(position) = self.position {
            task.position = position;
        }
        if let Some(column_id) = self.column_id {
            task.column_id = column_id;
        }
    }

    /// Check if the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.position.is_none() && self.column_id.is_none()
    }
}

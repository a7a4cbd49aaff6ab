//! Read-only filtered view of a board's columns

use crate::types::{Column, Task, TaskStatus, UserId};

/// Which assignee a task must have to stay visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssigneeFilter {
    /// Assigned to this user
    User(UserId),
    /// Assigned to nobody
    Unassigned,
}

/// Criteria for hiding tasks; an empty filter shows everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Case-insensitive match against title and description
    pub search: Option<String>,
    pub status: Option<TaskStatus>,
    pub assignee: Option<AssigneeFilter>,
}

impl TaskFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search = (!term.trim().is_empty()).then_some(term);
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_assignee(mut self, assignee: AssigneeFilter) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Check if the filter hides nothing
    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.status.is_none() && self.assignee.is_none()
    }

    /// Check if a task passes every criterion
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(status) = self.status {
            if task.status != status {
                return false;
            }
        }

        match self.assignee {
            Some(AssigneeFilter::User(user)) if task.assigned_user_id != Some(user) => return false,
            Some(AssigneeFilter::Unassigned) if task.assigned_user_id.is_some() => return false,
            _ => {}
        }

        match &self.search {
            Some(term) => {
                let term = term.trim().to_lowercase();
                task.title.to_lowercase().contains(&term)
                    || task
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&term))
            }
            None => true,
        }
    }

    /// Copy of `columns` with non-matching tasks hidden.
    ///
    /// Every column stays visible. Hidden tasks keep their positions, so the
    /// result is for display only and must not be fed back into reconciliation.
    pub fn apply(&self, columns: &[Column]) -> Vec<Column> {
        if self.is_empty() {
            return columns.to_vec();
        }
        columns
            .iter()
            .map(|column| Column {
                tasks: column.tasks.iter().filter(|t| self.matches(t)).cloned().collect(),
                ..column.clone()
            })
            .collect()
    }
}

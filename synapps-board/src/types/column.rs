//! Column type and the malformed-entry filter applied to incoming task lists

use super::ids::{BoardId, ColumnId};
use super::task::Task;
use serde::{Deserialize, Deserializer, Serialize};

/// A column of a board, holding its tasks in display order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    /// Zero-based left-to-right order on the board
    #[serde(default)]
    pub position: usize,
    pub board_id: BoardId,
    /// Array order is the task order; entries that do not parse as a task are dropped
    #[serde(default, deserialize_with = "well_formed_tasks")]
    pub tasks: Vec<Task>,
}

impl Column {
    /// Create an empty column
    pub fn new(id: impl Into<ColumnId>, title: impl Into<String>, board_id: impl Into<BoardId>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            position: 0,
            board_id: board_id.into(),
            tasks: Vec::new(),
        }
    }

    /// Set the position
    pub fn with_position(mut self, position: usize) -> Self {
        self.position = position;
        self
    }

    /// Set the tasks
    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = tasks;
        self
    }

    /// The droppable list id of this column's task list
    pub fn list_id(&self) -> String {
        self.id.to_string()
    }
}

/// Deserialize a task array, keeping only entries that parse as [`Task`].
///
/// `null` entries and entries without a numeric id are dropped here so the
/// reorder operations only ever see well-formed tasks.
fn well_formed_tasks<'de, D>(deserializer: D) -> Result<Vec<Task>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();
    let total = raw.len();

    let tasks: Vec<Task> = raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<Task>(value) {
            Ok(task) => Some(task),
            Err(error) => {
                tracing::warn!(%error, "dropping malformed task entry");
                None
            }
        })
        .collect();

    if tasks.len() != total {
        tracing::debug!(kept = tasks.len(), total, "filtered column task list");
    }
    Ok(tasks)
}

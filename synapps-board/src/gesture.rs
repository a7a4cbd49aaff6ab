//! Drag-end results handed over by the UI

use crate::types::ColumnId;
use serde::{Deserialize, Serialize};

/// List id used for the board's column list
pub const BOARD_LIST_ID: &str = "columns";

/// What was dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragKind {
    Column,
    Task,
}

impl DragKind {
    /// Name used in logs and errors
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Column => "column",
            Self::Task => "task",
        }
    }
}

/// A position in a droppable list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropLocation {
    /// `droppableId` of the list; a column id for task lists
    #[serde(rename = "droppableId")]
    pub list_id: String,
    pub index: usize,
}

impl DropLocation {
    pub fn new(list_id: impl Into<String>, index: usize) -> Self {
        Self {
            list_id: list_id.into(),
            index,
        }
    }

    /// A location in the board's column list
    pub fn board(index: usize) -> Self {
        Self::new(BOARD_LIST_ID, index)
    }

    /// A location in a column's task list
    pub fn column(column: impl Into<ColumnId>, index: usize) -> Self {
        Self::new(column.into().to_string(), index)
    }
}

/// One completed drag-and-drop interaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gesture {
    #[serde(rename = "type")]
    pub kind: DragKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draggable_id: Option<String>,
    pub source: DropLocation,
    /// `None` when dropped outside any list
    #[serde(default)]
    pub destination: Option<DropLocation>,
}

impl Gesture {
    /// Drag a column from one index of the board to another
    pub fn column(from: usize, to: usize) -> Self {
        Self {
            kind: DragKind::Column,
            draggable_id: None,
            source: DropLocation::board(from),
            destination: Some(DropLocation::board(to)),
        }
    }

    /// Drag a task between (or within) column task lists
    pub fn task(
        from_column: impl Into<ColumnId>,
        from_index: usize,
        to_column: impl Into<ColumnId>,
        to_index: usize,
    ) -> Self {
        Self {
            kind: DragKind::Task,
            draggable_id: None,
            source: DropLocation::column(from_column, from_index),
            destination: Some(DropLocation::column(to_column, to_index)),
        }
    }

    /// Drop outside any valid target
    pub fn cancelled(kind: DragKind, source: DropLocation) -> Self {
        Self {
            kind,
            draggable_id: None,
            source,
            destination: None,
        }
    }

    /// Set the dragged element's id
    pub fn with_draggable_id(mut self, id: impl Into<String>) -> Self {
        self.draggable_id = Some(id.into());
        self
    }

    /// Check if the drop lands where the drag started
    pub fn is_in_place(&self) -> bool {
        self.destination.as_ref() == Some(&self.source)
    }
}

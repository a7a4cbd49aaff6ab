//! Data-access seam to the remote board store.
//!
//! Transport, authentication and serialization to the wire live behind this
//! trait; the core only sees entity records and [`RequestError`]s.

use crate::error::RequestError;
use crate::types::{Board, BoardId, BoardMember, Column, ColumnId, Task, TaskId, TaskPatch};
use async_trait::async_trait;

/// Result of a single data-access call
pub type RequestResult<T> = std::result::Result<T, RequestError>;

/// Remote operations the board core depends on
#[async_trait]
pub trait BoardApi: Send + Sync {
    /// Persist a column's position
    async fn update_column_position(&self, column_id: ColumnId, position: usize) -> RequestResult<Column>;

    /// Apply a partial update to a task
    async fn update_task(&self, task_id: TaskId, patch: &TaskPatch) -> RequestResult<Task>;

    /// Fetch columns with their tasks, optionally limited to one board
    async fn fetch_columns(&self, board_id: Option<BoardId>) -> RequestResult<Vec<Column>>;

    /// Fetch board metadata
    async fn fetch_board(&self, board_id: BoardId) -> RequestResult<Board>;

    /// Fetch the members of a board
    async fn fetch_board_members(&self, board_id: BoardId) -> RequestResult<Vec<BoardMember>>;
}

//! In-process [`BoardApi`] backed by plain vectors.
//!
//! Stores columns and tasks the way the remote store does (tasks keyed by
//! `column_id`, ordered by `position` when read back), records every call, and
//! can be told to fail specific entities or to respond slowly.

use crate::api::{BoardApi, RequestResult};
use crate::error::RequestError;
use crate::types::{Board, BoardId, BoardMember, Column, ColumnId, Task, TaskId, TaskPatch};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;

/// A call received by [`InMemoryBoardApi`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    UpdateColumnPosition(ColumnId, usize),
    UpdateTask(TaskId, TaskPatch),
    FetchColumns(Option<BoardId>),
    FetchBoard(BoardId),
    FetchBoardMembers(BoardId),
}

#[derive(Debug, Default)]
struct RemoteState {
    boards: Vec<Board>,
    members: Vec<BoardMember>,
    /// Columns without their tasks
    columns: Vec<Column>,
    tasks: Vec<Task>,
    calls: Vec<ApiCall>,
    failing_tasks: HashMap<TaskId, RequestError>,
    failing_columns: HashMap<ColumnId, RequestError>,
    latency: Option<Duration>,
}

/// In-memory remote board store
#[derive(Debug, Default)]
pub struct InMemoryBoardApi {
    state: Mutex<RemoteState>,
}

impl InMemoryBoardApi {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given columns and their tasks
    pub fn with_columns(columns: Vec<Column>) -> Self {
        let mut api = Self::new();
        api.insert_columns(columns);
        api
    }

    /// Add a board
    pub fn with_board(mut self, board: Board) -> Self {
        self.state.get_mut().boards.push(board);
        self
    }

    /// Add board members
    pub fn with_members(mut self, members: Vec<BoardMember>) -> Self {
        self.state.get_mut().members.extend(members);
        self
    }

    fn insert_columns(&mut self, columns: Vec<Column>) {
        let state = self.state.get_mut();
        for mut column in columns {
            state.tasks.append(&mut column.tasks);
            state.columns.push(column);
        }
    }

    /// Every call received so far, in arrival order
    pub async fn calls(&self) -> Vec<ApiCall> {
        self.state.lock().await.calls.clone()
    }

    /// Make every update of `task_id` fail with `error`
    pub async fn fail_task(&self, task_id: TaskId, error: RequestError) {
        self.state.lock().await.failing_tasks.insert(task_id, error);
    }

    /// Make every position update of `column_id` fail with `error`
    pub async fn fail_column(&self, column_id: ColumnId, error: RequestError) {
        self.state.lock().await.failing_columns.insert(column_id, error);
    }

    /// Delay every call by `latency`
    pub async fn set_latency(&self, latency: Duration) {
        self.state.lock().await.latency = Some(latency);
    }

    /// The stored record of a task
    pub async fn remote_task(&self, task_id: TaskId) -> Option<Task> {
        let state = self.state.lock().await;
        state.tasks.iter().find(|t| t.id == task_id).cloned()
    }

    /// Columns of a board as a reload would see them
    pub async fn remote_columns(&self, board_id: BoardId) -> Vec<Column> {
        self.state.lock().await.assemble(Some(board_id))
    }

    async fn record(&self, call: ApiCall) {
        let latency = {
            let mut state = self.state.lock().await;
            state.calls.push(call);
            state.latency
        };
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl RemoteState {
    fn assemble(&self, board_id: Option<BoardId>) -> Vec<Column> {
        let mut columns: Vec<Column> = self
            .columns
            .iter()
            .filter(|c| board_id.is_none_or(|id| c.board_id == id))
            .cloned()
            .collect();
        columns.sort_by_key(|c| c.position);

        for column in &mut columns {
            column.tasks = self
                .tasks
                .iter()
                .filter(|t| t.column_id == column.id)
                .cloned()
                .collect();
            column.tasks.sort_by_key(|t| t.position);
        }
        columns
    }
}

#[async_trait]
impl BoardApi for InMemoryBoardApi {
    async fn update_column_position(&self, column_id: ColumnId, position: usize) -> RequestResult<Column> {
        self.record(ApiCall::UpdateColumnPosition(column_id, position)).await;
        let mut state = self.state.lock().await;

        if let Some(error) = state.failing_columns.get(&column_id) {
            return Err(error.clone());
        }
        let column = state
            .columns
            .iter_mut()
            .find(|c| c.id == column_id)
            .ok_or_else(|| RequestError::not_found("column", column_id))?;
        column.position = position;
        Ok(column.clone())
    }

    async fn update_task(&self, task_id: TaskId, patch: &TaskPatch) -> RequestResult<Task> {
        self.record(ApiCall::UpdateTask(task_id, *patch)).await;
        let mut state = self.state.lock().await;

        if let Some(error) = state.failing_tasks.get(&task_id) {
            return Err(error.clone());
        }
        if let Some(column_id) = patch.column_id {
            if !state.columns.iter().any(|c| c.id == column_id) {
                return Err(RequestError::not_found("column", column_id));
            }
        }
        let task = state
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| RequestError::not_found("task", task_id))?;
        patch.apply(task);
        Ok(task.clone())
    }

    async fn fetch_columns(&self, board_id: Option<BoardId>) -> RequestResult<Vec<Column>> {
        self.record(ApiCall::FetchColumns(board_id)).await;
        Ok(self.state.lock().await.assemble(board_id))
    }

    async fn fetch_board(&self, board_id: BoardId) -> RequestResult<Board> {
        self.record(ApiCall::FetchBoard(board_id)).await;
        let state = self.state.lock().await;
        state
            .boards
            .iter()
            .find(|b| b.id == board_id)
            .cloned()
            .ok_or_else(|| RequestError::not_found("board", board_id))
    }

    async fn fetch_board_members(&self, board_id: BoardId) -> RequestResult<Vec<BoardMember>> {
        self.record(ApiCall::FetchBoardMembers(board_id)).await;
        let state = self.state.lock().await;
        Ok(state
            .members
            .iter()
            .filter(|m| m.board_id == board_id)
            .cloned()
            .collect())
    }
}

//! BoardStore - the single owner of a board's in-memory state
//!
//! The store holds the current [`BoardSnapshot`] in a `watch` channel. Every
//! change publishes a whole new snapshot with the next version number;
//! renderers subscribe and only ever see immutable snapshots. Drag gestures go
//! through [`reconcile`], CRUD results from dialogs go through the callback
//! methods, and nothing else writes.

use crate::api::BoardApi;
use crate::config::SyncConfig;
use crate::error::{BoardError, ReconcileError, Result};
use crate::gesture::Gesture;
use crate::ordered::renumber;
use crate::reconcile::{reconcile, InstructionScope, PersistInstruction};
use crate::sequencer::{PersistenceSequencer, SequenceReport};
use crate::types::{Board, BoardId, BoardMember, Column, ColumnId, Task, TaskId};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Immutable view of a board at one version
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardSnapshot {
    /// Incremented on every published change
    pub version: u64,
    pub board: Option<Board>,
    pub columns: Vec<Column>,
    pub members: Vec<BoardMember>,
}

impl BoardSnapshot {
    /// Find a column by id
    pub fn column(&self, id: ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Find a task by id in any column
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.columns
            .iter()
            .flat_map(|c| c.tasks.iter())
            .find(|t| t.id == id)
    }

    /// Total number of tasks on the board
    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|c| c.tasks.len()).sum()
    }

    fn with_columns(&self, columns: Vec<Column>) -> Self {
        Self {
            version: self.version,
            board: self.board.clone(),
            columns,
            members: self.members.clone(),
        }
    }
}

/// A gesture committed locally whose instructions are still to be persisted
#[derive(Debug, Clone, PartialEq)]
pub struct Commit {
    /// Snapshot version that holds the gesture's result
    pub version: u64,
    pub instructions: Vec<PersistInstruction>,
}

/// What happened to a gesture handed to [`BoardStore::commit_and_persist`]
#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    /// Nothing to do: dropped outside any list or where it started
    Unchanged,
    /// The gesture could not be resolved; state was left as it was
    Aborted(ReconcileError),
    /// Committed locally, then persisted with the given report
    Committed { version: u64, report: SequenceReport },
}

/// A committed gesture whose persistence runs on a spawned task
#[derive(Debug)]
pub struct PendingPersist {
    pub version: u64,
    pub handle: JoinHandle<SequenceReport>,
}

/// Owner of one board's columns, tasks and members
pub struct BoardStore<A: ?Sized> {
    api: Arc<A>,
    sequencer: PersistenceSequencer<A>,
    scope: InstructionScope,
    state: watch::Sender<Arc<BoardSnapshot>>,
}

impl<A: BoardApi + ?Sized> BoardStore<A> {
    /// Create an empty store with the default sync configuration
    pub fn new(api: Arc<A>) -> Self {
        Self::with_config(api, &SyncConfig::default())
    }

    /// Create an empty store
    pub fn with_config(api: Arc<A>, config: &SyncConfig) -> Self {
        let (state, _) = watch::channel(Arc::new(BoardSnapshot::default()));
        Self {
            sequencer: PersistenceSequencer::new(Arc::clone(&api))
                .with_timeout(config.request_timeout()),
            api,
            scope: config.instruction_scope,
            state,
        }
    }

    /// The current snapshot
    pub fn snapshot(&self) -> Arc<BoardSnapshot> {
        self.state.borrow().clone()
    }

    /// Receive every snapshot published from now on
    pub fn subscribe(&self) -> watch::Receiver<Arc<BoardSnapshot>> {
        self.state.subscribe()
    }

    /// Replace the state with a fresh copy of the board from the remote store.
    ///
    /// Board and columns are fetched concurrently, members afterwards. Columns
    /// and each column's tasks are ordered by their stored position, then
    /// renumbered from array order; a task record without a `position` keeps
    /// the order it was returned in.
    pub async fn load(&self, board_id: BoardId) -> Result<Arc<BoardSnapshot>> {
        let (board, mut columns) = tokio::try_join!(
            self.api.fetch_board(board_id),
            self.api.fetch_columns(Some(board_id)),
        )?;
        let members = self.api.fetch_board_members(board_id).await?;

        if let Some(stray) = columns.iter().find(|c| c.board_id != board_id) {
            return Err(BoardError::Inconsistent {
                board_id: board_id.to_string(),
                message: format!("column {} belongs to board {}", stray.id, stray.board_id),
            });
        }

        columns.sort_by_key(|c| c.position);
        let columns: Vec<Column> = renumber(&columns)
            .into_iter()
            .map(|mut column| {
                column.tasks.sort_by_key(|t| t.position);
                for task in &mut column.tasks {
                    if task.column_id != column.id {
                        warn!(task = %task.id, column = %column.id, "task listed under a different column_id");
                        task.column_id = column.id;
                    }
                }
                column.tasks = renumber(&column.tasks);
                column
            })
            .collect();

        let version = self.publish(|current| {
            Some(BoardSnapshot {
                version: current.version,
                board: Some(board),
                columns,
                members,
            })
        });
        info!(board = %board_id, ?version, "board loaded");
        Ok(self.snapshot())
    }

    /// Apply a gesture to local state without persisting it.
    ///
    /// `Ok(None)` means the gesture changes nothing.
    pub fn commit(&self, gesture: &Gesture) -> std::result::Result<Option<Commit>, ReconcileError> {
        let mut outcome = Ok(None);
        let published = self.publish(|current| match reconcile(gesture, &current.columns, self.scope) {
            Ok(Some(transition)) => {
                outcome = Ok(Some(transition.instructions));
                Some(current.with_columns(transition.columns))
            }
            Ok(None) => None,
            Err(error) => {
                outcome = Err(error);
                None
            }
        });

        match (outcome, published) {
            (Ok(Some(instructions)), Some(version)) => {
                info!(
                    kind = gesture.kind.as_str(),
                    version,
                    instructions = instructions.len(),
                    "gesture committed"
                );
                Ok(Some(Commit {
                    version,
                    instructions,
                }))
            }
            (Err(error), _) => {
                warn!(kind = gesture.kind.as_str(), %error, "gesture aborted");
                Err(error)
            }
            _ => Ok(None),
        }
    }

    /// Persist instructions in order, isolating failures
    pub async fn persist(&self, instructions: &[PersistInstruction]) -> SequenceReport {
        self.sequencer.run(instructions).await
    }

    /// Commit a gesture locally, then persist its instructions.
    ///
    /// The new snapshot is published before the first remote call is made.
    pub async fn commit_and_persist(&self, gesture: &Gesture) -> GestureOutcome {
        match self.commit(gesture) {
            Ok(Some(commit)) => GestureOutcome::Committed {
                version: commit.version,
                report: self.persist(&commit.instructions).await,
            },
            Ok(None) => GestureOutcome::Unchanged,
            Err(error) => GestureOutcome::Aborted(error),
        }
    }

    // =========================================================================
    // Dialog callbacks
    // =========================================================================

    /// Replace the board metadata
    pub fn board_updated(&self, board: Board) -> Option<u64> {
        self.publish(|current| {
            Some(BoardSnapshot {
                board: Some(board),
                ..current.clone()
            })
        })
    }

    /// Append a newly created column
    pub fn column_created(&self, column: Column) -> Option<u64> {
        self.publish(|current| {
            let mut columns = current.columns.clone();
            columns.push(column);
            Some(current.with_columns(renumber(&columns)))
        })
    }

    /// Take the title of an edited column; local order and tasks are kept
    pub fn column_updated(&self, updated: &Column) -> Option<u64> {
        self.publish(|current| {
            let index = current.columns.iter().position(|c| c.id == updated.id)?;
            let mut columns = current.columns.clone();
            columns[index].title = updated.title.clone();
            Some(current.with_columns(columns))
        })
    }

    /// Drop a deleted column and its tasks
    pub fn column_deleted(&self, column_id: ColumnId) -> Option<u64> {
        self.publish(|current| {
            current.column(column_id)?;
            let columns: Vec<Column> = current
                .columns
                .iter()
                .filter(|c| c.id != column_id)
                .cloned()
                .collect();
            Some(current.with_columns(renumber(&columns)))
        })
    }

    /// Append a newly created task to the column named by its `column_id`
    pub fn task_added(&self, task: Task) -> Option<u64> {
        let column_id = task.column_id;
        let version = self.publish(|current| {
            let index = current.columns.iter().position(|c| c.id == column_id)?;
            let mut columns = current.columns.clone();
            columns[index].tasks.push(task);
            columns[index].tasks = renumber(&columns[index].tasks);
            Some(current.with_columns(columns))
        });
        if version.is_none() {
            debug!(column = %column_id, "created task for a column not on this board");
        }
        version
    }

    /// Replace an edited task.
    ///
    /// A task whose `column_id` changed is moved to the end of that column.
    /// Positions are taken from local order, not from the edited record.
    pub fn task_updated(&self, updated: Task) -> Option<u64> {
        self.publish(|current| {
            let (from, at) = locate_task(&current.columns, updated.id)?;
            let mut columns = current.columns.clone();

            if columns[from].id == updated.column_id {
                columns[from].tasks[at] = updated;
            } else {
                let to = columns.iter().position(|c| c.id == updated.column_id)?;
                columns[from].tasks.remove(at);
                columns[to].tasks.push(updated);
                columns[to].tasks = renumber(&columns[to].tasks);
            }
            columns[from].tasks = renumber(&columns[from].tasks);
            Some(current.with_columns(columns))
        })
    }

    /// Drop a deleted task
    pub fn task_deleted(&self, task_id: TaskId) -> Option<u64> {
        self.publish(|current| {
            let (column, at) = locate_task(&current.columns, task_id)?;
            let mut columns = current.columns.clone();
            columns[column].tasks.remove(at);
            columns[column].tasks = renumber(&columns[column].tasks);
            Some(current.with_columns(columns))
        })
    }

    /// Publish the snapshot built by `update`, if any, under the next version
    fn publish<F>(&self, update: F) -> Option<u64>
    where
        F: FnOnce(&BoardSnapshot) -> Option<BoardSnapshot>,
    {
        let mut version = None;
        self.state.send_if_modified(|current| {
            let Some(mut next) = update(&**current) else {
                return false;
            };
            next.version = current.version + 1;
            version = Some(next.version);
            *current = Arc::new(next);
            true
        });
        version
    }
}

impl<A: BoardApi + ?Sized + 'static> BoardStore<A> {
    /// Commit a gesture locally and persist it on a spawned task.
    ///
    /// Must be called from within a tokio runtime. Sequences of overlapping
    /// gestures run independently of each other.
    pub fn spawn_commit_and_persist(
        &self,
        gesture: &Gesture,
    ) -> std::result::Result<Option<PendingPersist>, ReconcileError> {
        let Some(commit) = self.commit(gesture)? else {
            return Ok(None);
        };
        let sequencer = self.sequencer.clone();
        let handle = tokio::spawn(async move { sequencer.run(&commit.instructions).await });
        Ok(Some(PendingPersist {
            version: commit.version,
            handle,
        }))
    }
}

fn locate_task(columns: &[Column], task_id: TaskId) -> Option<(usize, usize)> {
    columns.iter().enumerate().find_map(|(ci, column)| {
        column
            .tasks
            .iter()
            .position(|t| t.id == task_id)
            .map(|ti| (ci, ti))
    })
}

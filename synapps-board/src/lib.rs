//! Client-side core of a kanban board backed by a remote REST store
//!
//! A board is an ordered list of columns, each holding an ordered list of
//! tasks. Order is kept twice: as array order locally and as a `position`
//! integer remotely. This crate keeps the two consistent across drag-and-drop.
//!
//! ## Overview
//!
//! - **Ordered collections** ([`ordered`]) - pure remove / insert / renumber / transfer
//! - **Reconciliation** ([`reconcile`]) - one gesture in, new columns and update instructions out
//! - **Sequencing** ([`sequencer`]) - instructions persisted one at a time; failures logged, never rolled back
//! - **Store** ([`BoardStore`]) - the single owner of board state, publishing versioned snapshots
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use synapps_board::{BoardApi, BoardId, BoardStore, Gesture, GestureOutcome};
//!
//! # async fn example(api: Arc<dyn BoardApi>) -> Result<(), Box<dyn std::error::Error>> {
//! let store = BoardStore::new(api);
//! store.load(BoardId(1)).await?;
//!
//! // Drag the first task of column 3 to the top of column 4
//! match store.commit_and_persist(&Gesture::task(3, 0, 4, 0)).await {
//!     GestureOutcome::Committed { report, .. } if !report.is_clean() => {
//!         eprintln!("{} updates failed; a reload will show the stored order", report.failures.len());
//!     }
//!     _ => {}
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
mod error;
pub mod filter;
pub mod gesture;
#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod ordered;
pub mod reconcile;
pub mod sequencer;
mod store;
pub mod types;

pub use api::{BoardApi, RequestResult};
pub use config::SyncConfig;
pub use error::{BoardError, ConfigError, ReconcileError, RequestError, Result};
pub use filter::{AssigneeFilter, TaskFilter};
pub use gesture::{DragKind, DropLocation, Gesture};
pub use reconcile::{reconcile, InstructionScope, PersistInstruction, Transition};
pub use sequencer::{FailedInstruction, PersistenceSequencer, SequenceReport};
pub use store::{BoardSnapshot, BoardStore, Commit, GestureOutcome, PendingPersist};

// Re-export commonly used types
pub use types::{
    Board, BoardId, BoardMember, Column, ColumnId, MemberId, MemberUser, Task, TaskId, TaskPatch,
    TaskStatus, UserId,
};

//! Core types for the board client

mod board;
mod column;
mod ids;
mod task;

// Re-export all types
pub use board::{Board, BoardMember, MemberUser};
pub use column::Column;
pub use ids::{BoardId, ColumnId, MemberId, TaskId, UserId};
pub use task::{Task, TaskPatch, TaskStatus};

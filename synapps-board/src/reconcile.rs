//! Reorder reconciliation.
//!
//! [`reconcile`] turns one drag gesture into a new column list and the
//! persistence instructions that bring the remote store in line with it. It
//! is a pure function: the input columns are never mutated, and any gesture
//! that cannot be resolved fails closed with a [`ReconcileError`].

use crate::error::ReconcileError;
use crate::gesture::{DragKind, Gesture, BOARD_LIST_ID};
use crate::ordered::{move_within, transfer};
use crate::types::{Column, ColumnId, Task, TaskId, TaskPatch};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Which entities of the touched lists receive a persistence instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstructionScope {
    /// Every entity of every list the gesture touched
    #[default]
    Full,
    /// Only entities whose position or column changed
    Changed,
}

/// A partial update of one entity's ordering fields, keyed by entity id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "entity", rename_all = "snake_case")]
pub enum PersistInstruction {
    Column { column_id: ColumnId, position: usize },
    Task { task_id: TaskId, patch: TaskPatch },
}

impl PersistInstruction {
    /// Instruction persisting a task's position and column
    pub fn task(task: &Task) -> Self {
        Self::Task {
            task_id: task.id,
            patch: TaskPatch::ordering_of(task),
        }
    }

    /// Instruction persisting a column's position
    pub fn column(column: &Column) -> Self {
        Self::Column {
            column_id: column.id,
            position: column.position,
        }
    }
}

/// The committed result of a gesture
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// The full column list after the gesture
    pub columns: Vec<Column>,
    /// Remote updates in the order they must be issued
    pub instructions: Vec<PersistInstruction>,
}

/// Reconcile a gesture against the current columns.
///
/// Returns `Ok(None)` for a gesture that changes nothing (no destination, or
/// dropped where it started), `Ok(Some(_))` with the new columns and their
/// instructions, or an error when the gesture cannot be resolved.
pub fn reconcile(
    gesture: &Gesture,
    columns: &[Column],
    scope: InstructionScope,
) -> Result<Option<Transition>, ReconcileError> {
    let Some(destination) = gesture.destination.as_ref() else {
        debug!(kind = gesture.kind.as_str(), "dropped outside any list");
        return Ok(None);
    };
    if gesture.is_in_place() {
        debug!(kind = gesture.kind.as_str(), "dropped in place");
        return Ok(None);
    }

    let transition = match gesture.kind {
        DragKind::Column => reorder_columns(columns, gesture.source.index, destination.index, scope)?,
        DragKind::Task => {
            let source_idx = find_column(columns, &gesture.source.list_id)?;
            let dest_idx = find_column(columns, &destination.list_id)?;
            if source_idx == dest_idx {
                reorder_tasks(columns, source_idx, gesture.source.index, destination.index, scope)?
            } else {
                move_task(
                    columns,
                    source_idx,
                    dest_idx,
                    gesture.source.index,
                    destination.index,
                    scope,
                )?
            }
        }
    };

    debug!(
        kind = gesture.kind.as_str(),
        instructions = transition.instructions.len(),
        "gesture reconciled"
    );
    Ok(Some(transition))
}

fn find_column(columns: &[Column], list_id: &str) -> Result<usize, ReconcileError> {
    columns
        .iter()
        .position(|column| column.list_id() == list_id)
        .ok_or_else(|| ReconcileError::column_not_found(list_id))
}

fn reorder_columns(
    columns: &[Column],
    from: usize,
    to: usize,
    scope: InstructionScope,
) -> Result<Transition, ReconcileError> {
    let reordered = move_within(columns, from, to).ok_or_else(|| {
        ReconcileError::source_out_of_bounds("column", BOARD_LIST_ID, from, columns.len())
    })?;

    let before: HashMap<ColumnId, usize> = columns.iter().map(|c| (c.id, c.position)).collect();
    let instructions = reordered
        .iter()
        .filter(|column| match scope {
            InstructionScope::Full => true,
            InstructionScope::Changed => before.get(&column.id) != Some(&column.position),
        })
        .map(PersistInstruction::column)
        .collect();

    Ok(Transition {
        columns: reordered,
        instructions,
    })
}

fn reorder_tasks(
    columns: &[Column],
    column_idx: usize,
    from: usize,
    to: usize,
    scope: InstructionScope,
) -> Result<Transition, ReconcileError> {
    let column = &columns[column_idx];
    let tasks = move_within(&column.tasks, from, to).ok_or_else(|| {
        ReconcileError::source_out_of_bounds("task", column.list_id(), from, column.tasks.len())
    })?;

    let before = ordering_index(&column.tasks);
    let instructions = task_instructions(&tasks, &before, scope);

    let mut next = columns.to_vec();
    next[column_idx] = Column {
        tasks,
        ..column.clone()
    };

    Ok(Transition {
        columns: next,
        instructions,
    })
}

fn move_task(
    columns: &[Column],
    source_idx: usize,
    dest_idx: usize,
    from: usize,
    to: usize,
    scope: InstructionScope,
) -> Result<Transition, ReconcileError> {
    let source = &columns[source_idx];
    let dest = &columns[dest_idx];
    let dest_id = dest.id;

    let (source_tasks, dest_tasks) =
        transfer(&source.tasks, &dest.tasks, from, to, |task: &mut Task| {
            task.column_id = dest_id
        })
        .ok_or_else(|| {
            ReconcileError::source_out_of_bounds("task", source.list_id(), from, source.tasks.len())
        })?;

    let mut before = ordering_index(&source.tasks);
    before.extend(ordering_index(&dest.tasks));

    let mut instructions = task_instructions(&source_tasks, &before, scope);
    instructions.extend(task_instructions(&dest_tasks, &before, scope));

    let mut next = columns.to_vec();
    next[source_idx] = Column {
        tasks: source_tasks,
        ..source.clone()
    };
    next[dest_idx] = Column {
        tasks: dest_tasks,
        ..dest.clone()
    };

    Ok(Transition {
        columns: next,
        instructions,
    })
}

fn ordering_index(tasks: &[Task]) -> HashMap<TaskId, (usize, ColumnId)> {
    tasks
        .iter()
        .map(|task| (task.id, (task.position, task.column_id)))
        .collect()
}

fn task_instructions(
    tasks: &[Task],
    before: &HashMap<TaskId, (usize, ColumnId)>,
    scope: InstructionScope,
) -> Vec<PersistInstruction> {
    tasks
        .iter()
        .filter(|task| match scope {
            InstructionScope::Full => true,
            InstructionScope::Changed => {
                before.get(&task.id) != Some(&(task.position, task.column_id))
            }
        })
        .map(PersistInstruction::task)
        .collect()
}

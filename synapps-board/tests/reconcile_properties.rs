//! Property-based tests for reorder reconciliation
//!
//! Boards and gesture sequences are generated at random; the ordering,
//! conservation and parent-consistency invariants must hold after every
//! gesture, and the emitted instructions must bring a remote copy of the
//! board to the same state as the local one.

use proptest::prelude::*;
use std::collections::HashMap;
use synapps_board::ordered::is_contiguous;
use synapps_board::{
    reconcile, Column, ColumnId, DragKind, DropLocation, Gesture, InstructionScope,
    PersistInstruction, Task, TaskId,
};

// Generators for test data

/// Generate a well-formed board: 1-4 columns with 0-5 tasks each
fn board() -> impl Strategy<Value = Vec<Column>> {
    prop::collection::vec(0usize..6, 1..5).prop_map(|sizes| {
        let mut next_task = 100u64;
        sizes
            .iter()
            .enumerate()
            .map(|(ci, &count)| {
                let column_id = ci as u64 + 1;
                let tasks = (0..count)
                    .map(|position| {
                        next_task += 1;
                        Task::new(next_task, format!("task {next_task}"), column_id)
                            .with_position(position)
                    })
                    .collect();
                Column::new(column_id, format!("column {column_id}"), 1)
                    .with_position(ci)
                    .with_tasks(tasks)
            })
            .collect()
    })
}

/// Generate a gesture; list ids and indexes may point past the board
fn gesture() -> impl Strategy<Value = Gesture> {
    (
        any::<bool>(),
        1u64..6,
        0usize..7,
        prop::option::weighted(0.9, (1u64..6, 0usize..7)),
    )
        .prop_map(|(is_column, from_list, from, destination)| {
            let kind = if is_column { DragKind::Column } else { DragKind::Task };
            let location = |list: u64, index: usize| match kind {
                DragKind::Column => DropLocation::board(index),
                DragKind::Task => DropLocation::column(list, index),
            };
            Gesture {
                kind,
                draggable_id: None,
                source: location(from_list, from),
                destination: destination.map(|(list, index)| location(list, index)),
            }
        })
}

fn scope() -> impl Strategy<Value = InstructionScope> {
    prop_oneof![Just(InstructionScope::Full), Just(InstructionScope::Changed)]
}

fn check_invariants(columns: &[Column]) -> Result<(), TestCaseError> {
    prop_assert!(is_contiguous(columns), "column positions not contiguous");
    for column in columns {
        prop_assert!(is_contiguous(&column.tasks), "task positions of column {} not contiguous", column.id);
        for task in &column.tasks {
            prop_assert_eq!(task.column_id, column.id);
        }
    }
    Ok(())
}

fn all_task_ids(columns: &[Column]) -> Vec<TaskId> {
    let mut ids: Vec<TaskId> = columns
        .iter()
        .flat_map(|c| c.tasks.iter().map(|t| t.id))
        .collect();
    ids.sort();
    ids
}

/// Ordering fields as the remote store would hold them
#[derive(Debug, Clone, PartialEq)]
struct RemoteOrder {
    columns: HashMap<ColumnId, usize>,
    tasks: HashMap<TaskId, (usize, ColumnId)>,
}

impl RemoteOrder {
    fn of(columns: &[Column]) -> Self {
        Self {
            columns: columns.iter().map(|c| (c.id, c.position)).collect(),
            tasks: columns
                .iter()
                .flat_map(|c| c.tasks.iter())
                .map(|t| (t.id, (t.position, t.column_id)))
                .collect(),
        }
    }

    fn apply(&mut self, instruction: &PersistInstruction) {
        match instruction {
            PersistInstruction::Column { column_id, position } => {
                self.columns.insert(*column_id, *position);
            }
            PersistInstruction::Task { task_id, patch } => {
                let entry = self.tasks.get_mut(task_id).expect("instruction for unknown task");
                if let Some(position) = patch.position {
                    entry.0 = position;
                }
                if let Some(column_id) = patch.column_id {
                    entry.1 = column_id;
                }
            }
        }
    }
}

proptest! {
    /// Positions stay contiguous, tasks are conserved and parents stay consistent
    #[test]
    fn prop_invariants_hold_across_gestures(
        start in board(),
        gestures in prop::collection::vec(gesture(), 1..20),
        scope in scope(),
    ) {
        let expected_ids = all_task_ids(&start);
        let mut columns = start;

        for gesture in &gestures {
            match reconcile(gesture, &columns, scope) {
                Ok(Some(transition)) => columns = transition.columns,
                Ok(None) => prop_assert!(gesture.destination.is_none() || gesture.is_in_place()),
                Err(_) => {}
            }
            check_invariants(&columns)?;
            prop_assert_eq!(all_task_ids(&columns), expected_ids.clone());
        }
    }

    /// Applying the instructions to the pre-gesture remote state yields the local state
    #[test]
    fn prop_instructions_converge_remote(
        start in board(),
        gesture in gesture(),
        scope in scope(),
    ) {
        if let Ok(Some(transition)) = reconcile(&gesture, &start, scope) {
            let mut remote = RemoteOrder::of(&start);
            for instruction in &transition.instructions {
                remote.apply(instruction);
            }
            prop_assert_eq!(remote, RemoteOrder::of(&transition.columns));
        }
    }

    /// A moved task ends up in exactly one column
    #[test]
    fn prop_moved_task_in_exactly_one_column(
        start in board(),
        from in 0usize..4,
        to in 0usize..4,
        index in 0usize..6,
        dest_index in 0usize..6,
    ) {
        prop_assume!(from < start.len() && to < start.len());
        prop_assume!(index < start[from].tasks.len());
        let moved = start[from].tasks[index].id;

        let gesture = Gesture::task(start[from].id, index, start[to].id, dest_index);
        let columns = match reconcile(&gesture, &start, InstructionScope::Full).unwrap() {
            Some(transition) => transition.columns,
            None => start.clone(),
        };

        let holders: Vec<ColumnId> = columns
            .iter()
            .filter(|c| c.tasks.iter().any(|t| t.id == moved))
            .map(|c| c.id)
            .collect();
        prop_assert_eq!(holders, vec![start[to].id]);
    }

    /// Dropping in place or outside any list changes nothing
    #[test]
    fn prop_no_op_gestures(start in board(), gesture in gesture()) {
        let in_place = Gesture { destination: Some(gesture.source.clone()), ..gesture.clone() };
        let outside = Gesture { destination: None, ..gesture };

        prop_assert_eq!(reconcile(&in_place, &start, InstructionScope::Full), Ok(None));
        prop_assert_eq!(reconcile(&outside, &start, InstructionScope::Full), Ok(None));
    }

    /// A source index past the end of the list aborts the gesture
    #[test]
    fn prop_missing_source_aborts(
        start in board(),
        column in 0usize..4,
        past_end in 0usize..3,
        to in 0usize..4,
    ) {
        prop_assume!(column < start.len() && to < start.len());
        let index = start[column].tasks.len() + past_end;
        let gesture = Gesture::task(start[column].id, index, start[to].id, index + 1);

        prop_assert!(reconcile(&gesture, &start, InstructionScope::Full).is_err());
    }
}

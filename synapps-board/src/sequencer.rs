//! Persistence sequencing for reconciled gestures.
//!
//! Instructions of one gesture are issued strictly in order, each awaited
//! before the next. A failed call is logged and recorded in the
//! [`SequenceReport`]; it never stops the remaining instructions and never
//! rolls back local state.

use crate::api::BoardApi;
use crate::error::RequestError;
use crate::reconcile::PersistInstruction;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// An instruction the remote store did not accept
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedInstruction {
    pub instruction: PersistInstruction,
    pub error: RequestError,
}

/// Outcome of running one gesture's instructions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceReport {
    /// Number of calls issued
    pub issued: usize,
    /// Calls that failed, in issue order
    pub failures: Vec<FailedInstruction>,
}

impl SequenceReport {
    /// Number of calls the remote store accepted
    pub fn succeeded(&self) -> usize {
        self.issued - self.failures.len()
    }

    /// Check if every call succeeded
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Issues persistence instructions one at a time against a [`BoardApi`]
pub struct PersistenceSequencer<A: ?Sized> {
    api: Arc<A>,
    timeout: Option<Duration>,
}

impl<A: ?Sized> Clone for PersistenceSequencer<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            timeout: self.timeout,
        }
    }
}

impl<A: BoardApi + ?Sized> PersistenceSequencer<A> {
    /// Create a sequencer without a per-call timeout
    pub fn new(api: Arc<A>) -> Self {
        Self { api, timeout: None }
    }

    /// Bound every call by `timeout`; a call that exceeds it counts as failed
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Issue every instruction in order and report the failures
    pub async fn run(&self, instructions: &[PersistInstruction]) -> SequenceReport {
        let mut report = SequenceReport::default();

        for instruction in instructions {
            report.issued += 1;
            match self.issue(instruction).await {
                Ok(()) => debug!(?instruction, "persisted"),
                Err(error) => {
                    warn!(?instruction, %error, "persistence call failed");
                    report.failures.push(FailedInstruction {
                        instruction: *instruction,
                        error,
                    });
                }
            }
        }

        if !report.is_clean() {
            warn!(
                failed = report.failures.len(),
                issued = report.issued,
                "remote order may differ from local order until the next reload"
            );
        }
        report
    }

    async fn issue(&self, instruction: &PersistInstruction) -> Result<(), RequestError> {
        let call = async {
            match instruction {
                PersistInstruction::Column { column_id, position } => self
                    .api
                    .update_column_position(*column_id, *position)
                    .await
                    .map(drop),
                PersistInstruction::Task { task_id, patch } => {
                    self.api.update_task(*task_id, patch).await.map(drop)
                }
            }
        };

        match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, call)
                .await
                .unwrap_or_else(|_| {
                    Err(RequestError::Timeout {
                        elapsed_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                    })
                }),
            None => call.await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{ApiCall, InMemoryBoardApi};
    use crate::types::{Column, ColumnId, Task, TaskId, TaskPatch};

    fn api() -> Arc<InMemoryBoardApi> {
        Arc::new(InMemoryBoardApi::with_columns(vec![
            Column::new(1, "A", 1).with_tasks(vec![Task::new(10, "t", 1), Task::new(11, "u", 1)]),
            Column::new(2, "B", 1).with_position(1),
        ]))
    }

    fn task_instruction(id: u64, position: usize, column: u64) -> PersistInstruction {
        PersistInstruction::Task {
            task_id: TaskId(id),
            patch: TaskPatch {
                position: Some(position),
                column_id: Some(ColumnId(column)),
            },
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_instructions_issued_in_order() {
        let api = api();
        let sequencer = PersistenceSequencer::new(api.clone());

        let instructions = vec![
            PersistInstruction::Column { column_id: ColumnId(2), position: 0 },
            PersistInstruction::Column { column_id: ColumnId(1), position: 1 },
            task_instruction(11, 0, 1),
        ];
        let report = sequencer.run(&instructions).await;

        assert!(report.is_clean());
        assert_eq!(report.issued, 3);
        assert_eq!(
            api.calls().await,
            vec![
                ApiCall::UpdateColumnPosition(ColumnId(2), 0),
                ApiCall::UpdateColumnPosition(ColumnId(1), 1),
                ApiCall::UpdateTask(TaskId(11), TaskPatch { position: Some(0), column_id: Some(ColumnId(1)) }),
            ]
        );
    }

    #[test_log::test(tokio::test)]
    async fn test_failure_does_not_stop_sequence() {
        let api = api();
        api.fail_task(TaskId(10), RequestError::conflict("stale row")).await;
        let sequencer = PersistenceSequencer::new(api.clone());

        let instructions = vec![
            task_instruction(10, 1, 1),
            task_instruction(99, 0, 1),
            task_instruction(11, 0, 1),
        ];
        let report = sequencer.run(&instructions).await;

        assert_eq!(report.issued, 3);
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failures[0].error, RequestError::conflict("stale row"));
        assert!(matches!(report.failures[1].error, RequestError::NotFound { .. }));
        // the last instruction still ran
        assert_eq!(api.calls().await.len(), 3);
        assert_eq!(api.remote_task(TaskId(11)).await.unwrap().position, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_counts_as_failure() {
        let api = api();
        api.set_latency(Duration::from_secs(5)).await;
        let sequencer =
            PersistenceSequencer::new(api.clone()).with_timeout(Some(Duration::from_millis(100)));

        let report = sequencer
            .run(&[PersistInstruction::Column { column_id: ColumnId(1), position: 0 }])
            .await;

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].error, RequestError::Timeout { elapsed_ms: 100 });
    }

    #[tokio::test]
    async fn test_empty_sequence() {
        let sequencer = PersistenceSequencer::new(api());
        let report = sequencer.run(&[]).await;
        assert_eq!(report, SequenceReport::default());
    }
}

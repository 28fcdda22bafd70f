use serde::Serialize;

use crate::db::error::DbError;

use super::ExecutionOutcome;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunFileSuccess {
    pub ok: bool,
    pub message: String,
    pub blocks_executed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockFailure {
    pub error: String,
    pub block_index: usize,
    pub total_blocks: usize,
    pub block_preview: String,
    pub sql_code: String,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunFileError {
    pub error: String,
    pub details: String,
}

/// Response payload for a whole-file script run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RunFileReport {
    Completed(RunFileSuccess),
    BlockFailed(BlockFailure),
    CommitFailed(RunFileError),
    Aborted(RunFileError),
}

impl RunFileReport {
    pub fn from_result(result: Result<ExecutionOutcome, DbError>) -> Self {
        match result {
            Ok(outcome) => Self::from_outcome(outcome),
            Err(err) => Self::Aborted(RunFileError {
                error: "Script execution failed".to_string(),
                details: err.to_string(),
            }),
        }
    }

    pub fn from_outcome(outcome: ExecutionOutcome) -> Self {
        match outcome {
            ExecutionOutcome::Success { units_executed } => Self::Completed(RunFileSuccess {
                ok: true,
                message: format!("Executed {units_executed} block(s) successfully"),
                blocks_executed: units_executed,
            }),
            ExecutionOutcome::Failure(failure) => Self::BlockFailed(BlockFailure {
                error: "Error executing block".to_string(),
                block_index: failure.failed_index,
                total_blocks: failure.total_units,
                block_preview: failure.preview,
                sql_code: failure.full_text,
                details: failure.error_message,
            }),
            ExecutionOutcome::CommitFailed { error_message, .. } => {
                Self::CommitFailed(RunFileError {
                    error: "Commit failed".to_string(),
                    details: error_message,
                })
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

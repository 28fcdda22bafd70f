use log::{error, info};

use crate::db::error::DbError;
use crate::db::session::{SessionGuard, SessionProvider};

use super::ScriptUnit;

const LOG_PREVIEW_CHARS: usize = 80;
const REPORT_PREVIEW_CHARS: usize = 200;

/// Details of the unit that stopped a script run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitFailure {
    pub failed_index: usize,
    pub total_units: usize,
    pub preview: String,
    pub full_text: String,
    pub error_message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// Every unit ran and the transaction was committed.
    Success { units_executed: usize },
    /// A unit failed; everything executed before it was rolled back.
    Failure(UnitFailure),
    /// Every unit ran but the final commit was rejected.
    CommitFailed {
        units_executed: usize,
        error_message: String,
    },
}

/// Runs script units one after another on a single session and transaction.
///
/// The run is all-or-nothing: the first failing unit rolls back the whole
/// transaction and stops the run. Nothing is retried.
pub struct ScriptRunner<'a> {
    sessions: &'a dyn SessionProvider,
}

impl<'a> ScriptRunner<'a> {
    pub fn new(sessions: &'a dyn SessionProvider) -> Self {
        Self { sessions }
    }

    /// Only session acquisition errors are returned as `Err`; unit and commit
    /// failures are part of the outcome.
    pub fn run(&self, units: &[ScriptUnit]) -> Result<ExecutionOutcome, DbError> {
        let total_units = units.len();
        let _span = tracing::info_span!("script_run", units = total_units).entered();
        let mut session = SessionGuard::acquire(self.sessions)?;
        let mut units_executed = 0;

        info!("Starting script run: {total_units} block(s) to execute");

        for unit in units {
            info!(
                "[{}/{}] Executing: {}...",
                unit.index,
                total_units,
                unit.preview(LOG_PREVIEW_CHARS)
            );

            if let Err(err) = session.execute(&unit.executable_sql()) {
                error!("[{}/{}] Failed: {}", unit.index, total_units, err);
                error!("Failing SQL:\n{}", unit.text);
                if let Err(rollback_err) = session.rollback() {
                    error!("Rollback failed: {rollback_err}");
                }
                return Ok(ExecutionOutcome::Failure(UnitFailure {
                    failed_index: unit.index,
                    total_units,
                    preview: unit.preview(REPORT_PREVIEW_CHARS),
                    full_text: unit.text.clone(),
                    error_message: err.to_string(),
                }));
            }

            units_executed += 1;
            info!("[{}/{}] OK", unit.index, total_units);
        }

        info!("Committing script transaction");
        match session.commit() {
            Ok(()) => {
                info!("Script run succeeded: {units_executed} block(s) executed");
                Ok(ExecutionOutcome::Success { units_executed })
            }
            Err(err) => {
                error!("Commit failed: {err}");
                if let Err(rollback_err) = session.rollback() {
                    error!("Rollback after failed commit also failed: {rollback_err}");
                }
                Ok(ExecutionOutcome::CommitFailed {
                    units_executed,
                    error_message: err.to_string(),
                })
            }
        }
    }
}

//! Apply a rename plan through a filesystem collaborator

use super::plan::RenamePlan;
use crate::error::{RenameError, Result};
use crate::fs::FileSystem;
use serde::Serialize;
use tracing::{debug, info};

/// Outcome of a fully applied plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExecutionReport {
    /// Steps in the plan
    pub steps: usize,

    /// Primitive renames performed, staging moves included
    pub operations: usize,
}

/// Run every operation of `plan` in order.
///
/// Stops at the first failing rename. Operations already performed are not
/// undone; the error reports how many completed.
pub fn execute_plan<S>(plan: &RenamePlan, fs: &S) -> Result<ExecutionReport>
where
    S: FileSystem + ?Sized,
{
    let operations = plan.operations();

    for (completed, op) in operations.iter().enumerate() {
        debug!(from = %op.from.display(), to = %op.to.display(), "rename");
        fs.rename(&op.from, &op.to)
            .map_err(|e| RenameError::ExecutionFailed {
                from: op.from.clone(),
                to: op.to.clone(),
                completed,
                message: e.to_string(),
            })?;
    }

    info!(
        steps = plan.len(),
        operations = operations.len(),
        "rename plan applied"
    );

    Ok(ExecutionReport {
        steps: plan.len(),
        operations: operations.len(),
    })
}

//! Bulk rename conflict resolution and plan execution

pub mod execute;
pub mod naming;
pub mod plan;

pub use execute::{execute_plan, ExecutionReport};
pub use plan::{
    plan_renames, RenameOperation, RenameOptions, RenamePlan, RenameStep, StagingReason,
    DEFAULT_COUNTER_SEPARATOR, DEFAULT_MAX_RETRIES,
};

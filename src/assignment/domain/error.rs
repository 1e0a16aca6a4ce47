//! Error types for assignment domain validation.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors returned while constructing or transitioning domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The resolution text is empty after trimming.
    #[error("task resolution must not be empty")]
    EmptyResolution,

    /// The group name is empty after trimming.
    #[error("group name must not be empty")]
    EmptyGroupName,

    /// The execution date precedes the assignment date.
    #[error("execution date {execution} precedes assignment date {assignment}")]
    ExecutionDateBeforeAssignment {
        /// Requested due date.
        execution: NaiveDate,
        /// Date the task was assigned.
        assignment: NaiveDate,
    },

    /// No executors were named.
    #[error("a task requires at least one executor")]
    EmptyExecutors,

    /// The task is already marked completed by an executor.
    #[error("task is already marked completed")]
    AlreadyCompleted,

    /// Closure was requested before executor completion.
    #[error("task cannot be closed before it is completed")]
    NotYetCompleted,

    /// The task is already closed by its initiator.
    #[error("task is already closed")]
    AlreadyClosed,

    /// A revision was applied to a closed task.
    #[error("closed tasks cannot be revised")]
    RevisionAfterClosure,

    /// The attachment file extension is outside the allow-list.
    #[error("unsupported attachment extension: {0}")]
    UnsupportedAttachmentExtension(String),
}

//! Domain model for task assignment and delegation.
//!
//! Covers the task aggregate with its completion state machine, derived
//! urgency/overdue status, the task-group lookup entity, attachment
//! references, and the role-based scoping policy.

mod attachment;
mod error;
mod group;
mod ids;
pub mod scope;
mod task;

pub use attachment::AttachmentRef;
pub use error::TaskDomainError;
pub use group::Group;
pub use ids::{GroupId, TaskId};
pub use scope::{ExecutorRejection, TaskVisibility};
pub use task::{
    CompletionReport, DerivedStatus, PersistedTaskData, Task, TaskDraft, TaskRecord, TaskRevision,
    UrgentWindow,
};

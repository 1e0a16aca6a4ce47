//! Repository ports for task and group persistence.

use crate::assignment::domain::{Group, GroupId, Task, TaskId, TaskVisibility};
use crate::directory::domain::UserId;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;

/// Calendar window applied by the urgent/overdue listing filters.
///
/// The service resolves the clock and urgent window into concrete dates so
/// stores stay clock-free.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueFilter {
    /// Open tasks due between `today` and `horizon` inclusive.
    Urgent {
        /// Current date.
        today: NaiveDate,
        /// Last date inside the urgent window.
        horizon: NaiveDate,
    },
    /// Open tasks due before `today`.
    Overdue {
        /// Current date.
        today: NaiveDate,
    },
}

/// Criteria narrowing a scoped task listing.
///
/// Filters are applied after the visibility scope and can only narrow it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Restrict to these categories.
    pub groups: Vec<GroupId>,
    /// Restrict to tasks executed by any of these users.
    pub executors: Vec<UserId>,
    /// Restrict by executor-side completion flag.
    pub completed: Option<bool>,
    /// Restrict by initiator-side closure flag.
    pub closed: Option<bool>,
    /// Restrict by due-date window.
    pub due: Option<DueFilter>,
}

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// `insert` and `update` write the task row and its executor set as one
/// atomic unit; a failure on the executor side must roll back the row.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task with its executor set.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when another task
    /// shares the same title, number, initiator, and assignment date.
    async fn insert(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task, replacing the executor set.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier. Returns `None` when absent.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns the redirection children of a task.
    async fn children_of(&self, id: TaskId) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns tasks inside the given visibility matching the filter,
    /// ordered by due date.
    async fn search(
        &self,
        visibility: &TaskVisibility,
        filter: &TaskFilter,
    ) -> TaskRepositoryResult<Vec<Task>>;

    /// Deletes a task and its executor set.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::RedirectionsProtected`] while
    /// redirection children reference the task, or
    /// [`TaskRepositoryError::NotFound`] when it does not exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;

    /// Removes a user from the task store: deletes the tasks they
    /// initiated and strips them from executor sets (cascade rule applied
    /// when a user is deleted).
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::RedirectionsProtected`] when a task
    /// to be cascaded still has redirection children outside the cascade.
    async fn detach_user(&self, user: UserId) -> TaskRepositoryResult<()>;

    /// Clears the category reference on tasks filed under the group
    /// (set-null rule applied when a group is deleted).
    async fn detach_group(&self, group: GroupId) -> TaskRepositoryResult<()>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same registration batch key already exists.
    #[error("duplicate task registration for title '{title}'")]
    DuplicateTask {
        /// Title of the conflicting registration.
        title: String,
    },

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Deletion is blocked while redirection children exist.
    #[error("task {0} still has redirected children")]
    RedirectionsProtected(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Result type for group repository operations.
pub type GroupRepositoryResult<T> = Result<T, GroupRepositoryError>;

/// Group persistence contract.
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Stores a new group.
    async fn insert(&self, group: &Group) -> GroupRepositoryResult<()>;

    /// Persists changes to an existing group.
    ///
    /// # Errors
    ///
    /// Returns [`GroupRepositoryError::NotFound`] when the group does not
    /// exist.
    async fn update(&self, group: &Group) -> GroupRepositoryResult<()>;

    /// Finds a group by identifier. Returns `None` when absent.
    async fn find_by_id(&self, id: GroupId) -> GroupRepositoryResult<Option<Group>>;

    /// Returns all groups ordered by name.
    async fn list_all(&self) -> GroupRepositoryResult<Vec<Group>>;

    /// Deletes a group row. Task references are cleared separately via
    /// [`TaskRepository::detach_group`].
    ///
    /// # Errors
    ///
    /// Returns [`GroupRepositoryError::NotFound`] when the group does not
    /// exist.
    async fn delete(&self, id: GroupId) -> GroupRepositoryResult<()>;
}

/// Errors returned by group repository implementations.
#[derive(Debug, Clone, Error)]
pub enum GroupRepositoryError {
    /// The group was not found.
    #[error("group not found: {0}")]
    NotFound(GroupId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl GroupRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

//! Task aggregate root, completion state machine, and derived status.

use super::{AttachmentRef, GroupId, TaskDomainError, TaskId};
use crate::directory::domain::UserId;
use chrono::{Days, NaiveDate};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Number of days before the due date in which an open task counts as
/// urgent. Mirrors the deployment's reminder period setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UrgentWindow(u64);

impl UrgentWindow {
    /// Creates a window spanning the given number of days.
    #[must_use]
    pub const fn days(days: u64) -> Self {
        Self(days)
    }

    /// Returns the window length in days.
    #[must_use]
    pub const fn as_days(self) -> u64 {
        self.0
    }

    /// Returns the last date still inside the window, or `None` on
    /// calendar overflow.
    #[must_use]
    pub fn horizon_from(self, today: NaiveDate) -> Option<NaiveDate> {
        today.checked_add_days(Days::new(self.0))
    }
}

impl Default for UrgentWindow {
    fn default() -> Self {
        Self(3)
    }
}

/// Read-time status derived from the calendar, never persisted.
///
/// `urgent` and `overdue` are mutually exclusive and both imply the task
/// has not been completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedStatus {
    /// Open and due within the urgent window.
    pub urgent: bool,
    /// Open and past its due date.
    pub overdue: bool,
}

/// Fields supplied when drafting a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Task title.
    pub title: String,
    /// External registration number, if any.
    pub number: Option<String>,
    /// Category reference, if any.
    pub group: Option<GroupId>,
    /// Creating user.
    pub initiator: UserId,
    /// Resolution text.
    pub resolution: String,
    /// Parent task when this draft redirects an existing task.
    pub parent_task: Option<TaskId>,
    /// Users assigned to carry out the task.
    pub executors: Vec<UserId>,
    /// Due date.
    pub execution_date: NaiveDate,
    /// Optional task brief attachment.
    pub brief: Option<AttachmentRef>,
}

/// Partial update applied by the initiator while the task is open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskRevision {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement registration number.
    pub number: Option<String>,
    /// Replacement category.
    pub group: Option<GroupId>,
    /// Replacement resolution text.
    pub resolution: Option<String>,
    /// Replacement due date.
    pub execution_date: Option<NaiveDate>,
}

/// Evidence submitted by an executor when marking a task completed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionReport {
    /// Optional execution-evidence attachment.
    pub evidence: Option<AttachmentRef>,
    /// Optional free-text execution comment.
    pub comment: Option<String>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: String,
    /// Persisted registration number.
    pub number: Option<String>,
    /// Persisted category reference.
    pub group: Option<GroupId>,
    /// Persisted initiator.
    pub initiator: UserId,
    /// Persisted resolution text.
    pub resolution: String,
    /// Persisted parent-task reference.
    pub parent_task: Option<TaskId>,
    /// Persisted executor set.
    pub executors: Vec<UserId>,
    /// Persisted assignment date.
    pub assignment_date: NaiveDate,
    /// Persisted due date.
    pub execution_date: NaiveDate,
    /// Persisted brief attachment.
    pub brief: Option<AttachmentRef>,
    /// Persisted evidence attachment.
    pub evidence: Option<AttachmentRef>,
    /// Persisted execution comment.
    pub execution_comment: Option<String>,
    /// Persisted executor-side completion flag.
    pub is_completed: bool,
    /// Persisted initiator-side closure flag.
    pub is_closed: bool,
}

/// Task aggregate root.
///
/// Lifecycle: open on creation, marked completed by an executor, then
/// closed by the initiator. Transitions are forward-only; urgency and
/// overdue are derived per read via [`Task::derived_status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    number: Option<String>,
    group: Option<GroupId>,
    initiator: UserId,
    resolution: String,
    parent_task: Option<TaskId>,
    executors: Vec<UserId>,
    assignment_date: NaiveDate,
    execution_date: NaiveDate,
    brief: Option<AttachmentRef>,
    evidence: Option<AttachmentRef>,
    execution_comment: Option<String>,
    is_completed: bool,
    is_closed: bool,
}

impl Task {
    /// Creates a new open task. The assignment date is taken from the
    /// clock; the due date must not precede it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when the title or resolution is blank,
    /// the executor list is empty, or the due date lies in the past.
    pub fn new(draft: TaskDraft, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        let assignment_date = clock.utc().date_naive();
        let title = non_blank(draft.title, TaskDomainError::EmptyTitle)?;
        let resolution = non_blank(draft.resolution, TaskDomainError::EmptyResolution)?;
        let executors = dedupe(draft.executors);
        if executors.is_empty() {
            return Err(TaskDomainError::EmptyExecutors);
        }
        if draft.execution_date < assignment_date {
            return Err(TaskDomainError::ExecutionDateBeforeAssignment {
                execution: draft.execution_date,
                assignment: assignment_date,
            });
        }

        Ok(Self {
            id: TaskId::new(),
            title,
            number: draft.number,
            group: draft.group,
            initiator: draft.initiator,
            resolution,
            parent_task: draft.parent_task,
            executors,
            assignment_date,
            execution_date: draft.execution_date,
            brief: draft.brief,
            evidence: None,
            execution_comment: None,
            is_completed: false,
            is_closed: false,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            number: data.number,
            group: data.group,
            initiator: data.initiator,
            resolution: data.resolution,
            parent_task: data.parent_task,
            executors: data.executors,
            assignment_date: data.assignment_date,
            execution_date: data.execution_date,
            brief: data.brief,
            evidence: data.evidence,
            execution_comment: data.execution_comment,
            is_completed: data.is_completed,
            is_closed: data.is_closed,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the external registration number, if any.
    #[must_use]
    pub fn number(&self) -> Option<&str> {
        self.number.as_deref()
    }

    /// Returns the category reference, if any.
    #[must_use]
    pub const fn group(&self) -> Option<GroupId> {
        self.group
    }

    /// Returns the initiating user.
    #[must_use]
    pub const fn initiator(&self) -> UserId {
        self.initiator
    }

    /// Returns the resolution text.
    #[must_use]
    pub fn resolution(&self) -> &str {
        &self.resolution
    }

    /// Returns the parent-task reference, if this task redirects another.
    #[must_use]
    pub const fn parent_task(&self) -> Option<TaskId> {
        self.parent_task
    }

    /// Returns the executor set.
    #[must_use]
    pub fn executors(&self) -> &[UserId] {
        &self.executors
    }

    /// Returns the assignment date.
    #[must_use]
    pub const fn assignment_date(&self) -> NaiveDate {
        self.assignment_date
    }

    /// Returns the due date.
    #[must_use]
    pub const fn execution_date(&self) -> NaiveDate {
        self.execution_date
    }

    /// Returns the brief attachment, if any.
    #[must_use]
    pub const fn brief(&self) -> Option<&AttachmentRef> {
        self.brief.as_ref()
    }

    /// Returns the evidence attachment, if any.
    #[must_use]
    pub const fn evidence(&self) -> Option<&AttachmentRef> {
        self.evidence.as_ref()
    }

    /// Returns the execution comment, if any.
    #[must_use]
    pub fn execution_comment(&self) -> Option<&str> {
        self.execution_comment.as_deref()
    }

    /// Returns the executor-side completion flag.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.is_completed
    }

    /// Returns the initiator-side closure flag.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.is_closed
    }

    /// Returns true when the given user is a current executor.
    #[must_use]
    pub fn executes(&self, user: UserId) -> bool {
        self.executors.contains(&user)
    }

    /// Returns true while the task is neither completed nor closed.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !self.is_completed && !self.is_closed
    }

    /// Applies an initiator revision to an open task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::RevisionAfterClosure`] on a closed task,
    /// or a validation error when a revised field is invalid.
    pub fn apply_revision(&mut self, revision: TaskRevision) -> Result<(), TaskDomainError> {
        if self.is_closed {
            return Err(TaskDomainError::RevisionAfterClosure);
        }
        if let Some(title) = revision.title {
            self.title = non_blank(title, TaskDomainError::EmptyTitle)?;
        }
        if let Some(resolution) = revision.resolution {
            self.resolution = non_blank(resolution, TaskDomainError::EmptyResolution)?;
        }
        if let Some(execution_date) = revision.execution_date {
            if execution_date < self.assignment_date {
                return Err(TaskDomainError::ExecutionDateBeforeAssignment {
                    execution: execution_date,
                    assignment: self.assignment_date,
                });
            }
            self.execution_date = execution_date;
        }
        if let Some(number) = revision.number {
            self.number = Some(number);
        }
        if let Some(group) = revision.group {
            self.group = Some(group);
        }
        Ok(())
    }

    /// Records executor-side completion with optional evidence.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AlreadyCompleted`] when the flag is
    /// already set; the transition exists only from the open state.
    pub fn mark_completed(&mut self, report: CompletionReport) -> Result<(), TaskDomainError> {
        if self.is_completed {
            return Err(TaskDomainError::AlreadyCompleted);
        }
        self.is_completed = true;
        if report.evidence.is_some() {
            self.evidence = report.evidence;
        }
        if report.comment.is_some() {
            self.execution_comment = report.comment;
        }
        Ok(())
    }

    /// Records initiator-side closure, the terminal state.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotYetCompleted`] before executor
    /// completion and [`TaskDomainError::AlreadyClosed`] afterwards.
    pub const fn close(&mut self) -> Result<(), TaskDomainError> {
        if self.is_closed {
            return Err(TaskDomainError::AlreadyClosed);
        }
        if !self.is_completed {
            return Err(TaskDomainError::NotYetCompleted);
        }
        self.is_closed = true;
        Ok(())
    }

    /// Removes a user from the executor set. Applied by the user-removal
    /// cascade; the persisted set may become empty as a result.
    pub fn remove_executor(&mut self, user: UserId) {
        self.executors.retain(|executor| *executor != user);
    }

    /// Clears the category reference. Applied when the referenced group is
    /// deleted (set-null rule).
    pub const fn clear_group(&mut self) {
        self.group = None;
    }

    /// Computes the calendar-derived status for the given day.
    #[must_use]
    pub fn derived_status(&self, today: NaiveDate, window: UrgentWindow) -> DerivedStatus {
        if self.is_completed {
            return DerivedStatus::default();
        }
        let overdue = self.execution_date < today;
        let urgent = !overdue
            && window
                .horizon_from(today)
                .is_some_and(|horizon| self.execution_date <= horizon);
        DerivedStatus { urgent, overdue }
    }

    /// Returns true while the due date lies beyond the urgent window,
    /// the precondition for redirection by non-privileged actors.
    #[must_use]
    pub fn due_beyond_window(&self, today: NaiveDate, window: UrgentWindow) -> bool {
        window
            .horizon_from(today)
            .is_some_and(|horizon| self.execution_date > horizon)
    }
}

/// Snapshot of a task together with its derived status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// The task aggregate.
    pub task: Task,
    /// Calendar-derived status at read time.
    pub status: DerivedStatus,
}

impl TaskRecord {
    /// Builds a record by deriving status for the given day.
    #[must_use]
    pub fn new(task: Task, today: NaiveDate, window: UrgentWindow) -> Self {
        let status = task.derived_status(today, window);
        Self { task, status }
    }
}

fn non_blank(value: String, error: TaskDomainError) -> Result<String, TaskDomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(error);
    }
    Ok(trimmed.to_owned())
}

fn dedupe(executors: Vec<UserId>) -> Vec<UserId> {
    let mut unique: Vec<UserId> = Vec::with_capacity(executors.len());
    for executor in executors {
        if !unique.contains(&executor) {
            unique.push(executor);
        }
    }
    unique
}

//! Service layer for scoped task management.
//!
//! Every operation takes the [`Caller`] first, rejects anonymous callers,
//! and resolves the actor's visibility before touching the store. Reads
//! outside the actor's scope fail as not-found rather than forbidden, so
//! callers cannot probe for tasks they are not meant to see.

use crate::assignment::{
    domain::{
        scope, AttachmentRef, CompletionReport, ExecutorRejection, GroupId, Task, TaskDomainError,
        TaskDraft, TaskId, TaskRecord, TaskRevision, TaskVisibility, UrgentWindow,
    },
    ports::{
        DueFilter, GroupRepository, GroupRepositoryError, TaskFilter, TaskRepository,
        TaskRepositoryError,
    },
};
use crate::directory::{
    domain::{Actor, Caller, UserId},
    ports::{UserRepository, UserRepositoryError},
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for registering a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskRequest {
    /// Task title.
    pub title: String,
    /// External registration number, if any.
    pub number: Option<String>,
    /// Category reference, if any.
    pub group: Option<GroupId>,
    /// Resolution text.
    pub resolution: String,
    /// Users assigned to carry out the task.
    pub executors: Vec<UserId>,
    /// Due date.
    pub execution_date: NaiveDate,
    /// Optional task brief attachment.
    pub brief: Option<AttachmentRef>,
}

/// Request payload for redirecting a task to new executors.
///
/// Redirection forks the source task: the original row is left untouched
/// and a child task is registered with the acting user as initiator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectRequest {
    /// Executors of the redirected task.
    pub executors: Vec<UserId>,
    /// Replacement due date; the source due date is carried over when
    /// absent.
    pub execution_date: Option<NaiveDate>,
    /// Replacement resolution; the source resolution is carried over when
    /// absent.
    pub resolution: Option<String>,
}

/// Due-window selector for task listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueKind {
    /// Open tasks due within the urgent window.
    Urgent,
    /// Open tasks past their due date.
    Overdue,
}

/// Listing criteria applied inside the caller's visibility.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    /// Restrict to these categories.
    pub groups: Vec<GroupId>,
    /// Restrict to tasks executed by any of these users.
    pub executors: Vec<UserId>,
    /// Restrict by executor-side completion flag.
    pub completed: Option<bool>,
    /// Restrict by initiator-side closure flag.
    pub closed: Option<bool>,
    /// Restrict by due-date window.
    pub due: Option<DueKind>,
}

/// Validation failures surfaced by task board operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Domain-level validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// A named executor does not exist.
    #[error("unknown executor: {0}")]
    UnknownExecutor(UserId),

    /// A named executor lies outside the acting role's delegation pool.
    #[error("executor {executor} rejected: {reason}")]
    ExecutorRejected {
        /// The rejected candidate.
        executor: UserId,
        /// Why the candidate is outside the pool.
        reason: ExecutorRejection,
    },

    /// The referenced category does not exist.
    #[error("unknown group: {0}")]
    UnknownGroup(GroupId),

    /// A task with the same registration batch key already exists.
    #[error("duplicate task registration for title '{title}'")]
    DuplicateTask {
        /// Title of the conflicting registration.
        title: String,
    },
}

/// Service-level errors for task board operations.
#[derive(Debug, Error)]
pub enum TaskBoardError {
    /// The caller carries no authenticated identity.
    #[error("authentication required")]
    Unauthenticated,

    /// The operation is not permitted for the acting role.
    #[error("operation not permitted for this role")]
    Forbidden,

    /// The task does not exist inside the caller's visibility.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Input validation failed.
    #[error(transparent)]
    Validation(#[from] TaskValidationError),

    /// Deletion is blocked while redirection children exist.
    #[error("task {0} still has redirected children")]
    RedirectionsExist(TaskId),

    /// Task store failure.
    #[error(transparent)]
    Tasks(TaskRepositoryError),

    /// Directory store failure while resolving executors.
    #[error(transparent)]
    Users(#[from] UserRepositoryError),

    /// Group store failure while resolving a category.
    #[error(transparent)]
    Groups(#[from] GroupRepositoryError),
}

impl From<TaskRepositoryError> for TaskBoardError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::DuplicateTask { title } => {
                Self::Validation(TaskValidationError::DuplicateTask { title })
            }
            TaskRepositoryError::NotFound(id) => Self::NotFound(id),
            TaskRepositoryError::RedirectionsProtected(id) => Self::RedirectionsExist(id),
            other => Self::Tasks(other),
        }
    }
}

impl From<TaskDomainError> for TaskBoardError {
    fn from(err: TaskDomainError) -> Self {
        Self::Validation(TaskValidationError::Domain(err))
    }
}

/// Result type for task board operations.
pub type TaskBoardResult<T> = Result<T, TaskBoardError>;

/// Scoped task management service.
#[derive(Clone)]
pub struct TaskBoardService<T, G, U, C>
where
    T: TaskRepository,
    G: GroupRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    groups: Arc<G>,
    users: Arc<U>,
    clock: Arc<C>,
    urgent_window: UrgentWindow,
}

impl<T, G, U, C> TaskBoardService<T, G, U, C>
where
    T: TaskRepository,
    G: GroupRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task board service.
    #[must_use]
    pub const fn new(
        tasks: Arc<T>,
        groups: Arc<G>,
        users: Arc<U>,
        clock: Arc<C>,
        urgent_window: UrgentWindow,
    ) -> Self {
        Self {
            tasks,
            groups,
            users,
            clock,
            urgent_window,
        }
    }

    /// Registers a new task with the acting user as initiator.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Forbidden`] when the acting role may not
    /// initiate tasks, or [`TaskBoardError::Validation`] when the draft,
    /// executors, or category fail validation.
    pub async fn create_task(
        &self,
        caller: &Caller,
        request: NewTaskRequest,
    ) -> TaskBoardResult<TaskRecord> {
        let actor = require_actor(caller)?;
        if !scope::may_initiate(actor) {
            return Err(TaskBoardError::Forbidden);
        }
        self.vet_group(request.group).await?;
        self.vet_executors(actor, &request.executors).await?;

        let draft = TaskDraft {
            title: request.title,
            number: request.number,
            group: request.group,
            initiator: actor.user_id(),
            resolution: request.resolution,
            parent_task: None,
            executors: request.executors,
            execution_date: request.execution_date,
            brief: request.brief,
        };
        let task = Task::new(draft, &*self.clock)?;
        self.tasks.insert(&task).await?;
        tracing::info!(task = %task.id(), initiator = %actor.user_id(), "task created");
        Ok(self.record(task))
    }

    /// Retrieves a task inside the caller's visibility.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::NotFound`] when the task does not exist or
    /// lies outside the caller's scope.
    pub async fn get_task(&self, caller: &Caller, id: TaskId) -> TaskBoardResult<TaskRecord> {
        let actor = require_actor(caller)?;
        let task = self.load_visible(actor, id).await?;
        Ok(self.record(task))
    }

    /// Lists tasks inside the caller's visibility, narrowed by the query.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Unauthenticated`] for anonymous callers or
    /// a repository error when the search fails.
    pub async fn list_tasks(
        &self,
        caller: &Caller,
        query: TaskQuery,
    ) -> TaskBoardResult<Vec<TaskRecord>> {
        let actor = require_actor(caller)?;
        let visibility = scope::visibility(actor);
        let filter = self.to_filter(query);
        self.search_records(&visibility, &filter).await
    }

    /// Applies an initiator revision to a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::NotFound`] outside the caller's read scope,
    /// [`TaskBoardError::Forbidden`] when the task is visible but the caller
    /// holds no mutation rights over it, or [`TaskBoardError::Validation`]
    /// when a revised field is invalid.
    pub async fn update_task(
        &self,
        caller: &Caller,
        id: TaskId,
        revision: TaskRevision,
    ) -> TaskBoardResult<TaskRecord> {
        let actor = require_actor(caller)?;
        let mut task = self.load_mutable(actor, id).await?;
        self.vet_group(revision.group).await?;
        task.apply_revision(revision)?;
        self.tasks.update(&task).await?;
        Ok(self.record(task))
    }

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::RedirectionsExist`] while redirection
    /// children reference the task, [`TaskBoardError::NotFound`] outside
    /// the caller's read scope, or [`TaskBoardError::Forbidden`] when the
    /// caller holds no mutation rights over it.
    pub async fn delete_task(&self, caller: &Caller, id: TaskId) -> TaskBoardResult<()> {
        let actor = require_actor(caller)?;
        let task = self.load_mutable(actor, id).await?;
        self.tasks.delete(task.id()).await?;
        tracing::info!(task = %id, "task deleted");
        Ok(())
    }

    /// Records executor-side completion with optional evidence.
    ///
    /// Any current executor may complete; the initiator and privileged
    /// actors may complete on an executor's behalf.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Forbidden`] when the caller neither
    /// executes nor initiated the task and holds no unrestricted access,
    /// or [`TaskBoardError::Validation`] when the task is already
    /// completed.
    pub async fn complete_task(
        &self,
        caller: &Caller,
        id: TaskId,
        report: CompletionReport,
    ) -> TaskBoardResult<TaskRecord> {
        let actor = require_actor(caller)?;
        let mut task = self.load_visible(actor, id).await?;
        if !actor.is_privileged()
            && !task.executes(actor.user_id())
            && task.initiator() != actor.user_id()
        {
            return Err(TaskBoardError::Forbidden);
        }
        task.mark_completed(report)?;
        self.tasks.update(&task).await?;
        tracing::info!(task = %id, by = %actor.user_id(), "task completed");
        Ok(self.record(task))
    }

    /// Records initiator-side closure, the terminal transition.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Forbidden`] when the caller is neither the
    /// initiator nor privileged, or [`TaskBoardError::Validation`] when the
    /// task is not yet completed or already closed.
    pub async fn close_task(&self, caller: &Caller, id: TaskId) -> TaskBoardResult<TaskRecord> {
        let actor = require_actor(caller)?;
        let mut task = self.load_visible(actor, id).await?;
        if !actor.is_privileged() && task.initiator() != actor.user_id() {
            return Err(TaskBoardError::Forbidden);
        }
        task.close()?;
        self.tasks.update(&task).await?;
        tracing::info!(task = %id, by = %actor.user_id(), "task closed");
        Ok(self.record(task))
    }

    /// Redirects a task: registers a child task naming new executors while
    /// leaving the source untouched.
    ///
    /// The caller must be the source's initiator, one of its executors, or
    /// privileged; visibility scoping already enforces this for delegator
    /// and employee roles. Non-privileged actors may only redirect tasks
    /// whose due date still lies beyond the urgent window; ineligible tasks
    /// fail as not-found so eligibility cannot be probed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::NotFound`] when the source is invisible or
    /// ineligible, or [`TaskBoardError::Validation`] when the source is no
    /// longer open or the executors fail validation.
    pub async fn redirect_task(
        &self,
        caller: &Caller,
        id: TaskId,
        request: RedirectRequest,
    ) -> TaskBoardResult<TaskRecord> {
        let actor = require_actor(caller)?;
        let source = self.load_visible(actor, id).await?;
        if source.is_closed() {
            return Err(TaskDomainError::AlreadyClosed.into());
        }
        if source.is_completed() {
            return Err(TaskDomainError::AlreadyCompleted.into());
        }
        if !actor.is_privileged()
            && !source.due_beyond_window(self.today(), self.urgent_window)
        {
            return Err(TaskBoardError::NotFound(id));
        }
        self.vet_executors(actor, &request.executors).await?;

        let draft = TaskDraft {
            title: source.title().to_owned(),
            number: source.number().map(str::to_owned),
            group: source.group(),
            initiator: actor.user_id(),
            resolution: request
                .resolution
                .unwrap_or_else(|| source.resolution().to_owned()),
            parent_task: Some(source.id()),
            executors: request.executors,
            execution_date: request
                .execution_date
                .unwrap_or_else(|| source.execution_date()),
            brief: source.brief().cloned(),
        };
        let task = Task::new(draft, &*self.clock)?;
        self.tasks.insert(&task).await?;
        tracing::info!(task = %task.id(), parent = %id, by = %actor.user_id(), "task redirected");
        Ok(self.record(task))
    }

    /// Lists the redirection children of a visible task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::NotFound`] when the parent lies outside
    /// the caller's scope.
    pub async fn redirections(
        &self,
        caller: &Caller,
        id: TaskId,
    ) -> TaskBoardResult<Vec<TaskRecord>> {
        let actor = require_actor(caller)?;
        let parent = self.load_visible(actor, id).await?;
        let visibility = scope::visibility(actor);
        let children = self.tasks.children_of(parent.id()).await?;
        Ok(children
            .into_iter()
            .filter(|child| visibility.admits(child))
            .map(|child| self.record(child))
            .collect())
    }

    /// Walks parent references from a visible task towards the root of its
    /// redirection chain, newest first.
    ///
    /// The walk stops at the first ancestor outside the caller's scope, so
    /// the returned chain never leaks tasks the caller may not see.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::NotFound`] when the starting task lies
    /// outside the caller's scope.
    pub async fn lineage(&self, caller: &Caller, id: TaskId) -> TaskBoardResult<Vec<TaskRecord>> {
        let actor = require_actor(caller)?;
        let visibility = scope::visibility(actor);
        let mut current = self.load_visible(actor, id).await?;
        let mut chain = Vec::new();
        loop {
            let parent = current.parent_task();
            chain.push(self.record(current));
            let Some(parent_id) = parent else { break };
            let Some(ancestor) = self.tasks.find_by_id(parent_id).await? else {
                break;
            };
            if !visibility.admits(&ancestor) {
                break;
            }
            current = ancestor;
        }
        Ok(chain)
    }

    /// Lists open tasks the caller executes.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Unauthenticated`] for anonymous callers.
    pub async fn on_execution(&self, caller: &Caller) -> TaskBoardResult<Vec<TaskRecord>> {
        let actor = require_actor(caller)?;
        let visibility = TaskVisibility::ExecutingOnly(actor.user_id());
        let filter = TaskFilter {
            closed: Some(false),
            ..TaskFilter::default()
        };
        self.search_records(&visibility, &filter).await
    }

    /// Lists open tasks the caller initiated.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Unauthenticated`] for anonymous callers.
    pub async fn outgoing(&self, caller: &Caller) -> TaskBoardResult<Vec<TaskRecord>> {
        let actor = require_actor(caller)?;
        let visibility = TaskVisibility::InitiatedOnly(actor.user_id());
        let filter = TaskFilter {
            closed: Some(false),
            ..TaskFilter::default()
        };
        self.search_records(&visibility, &filter).await
    }

    /// Lists open tasks due within the urgent window, inside the caller's
    /// visibility.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Unauthenticated`] for anonymous callers.
    pub async fn urgent(&self, caller: &Caller) -> TaskBoardResult<Vec<TaskRecord>> {
        self.due_listing(caller, DueKind::Urgent).await
    }

    /// Lists open tasks past their due date, inside the caller's
    /// visibility.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Unauthenticated`] for anonymous callers.
    pub async fn overdue(&self, caller: &Caller) -> TaskBoardResult<Vec<TaskRecord>> {
        self.due_listing(caller, DueKind::Overdue).await
    }

    /// Lists completed tasks awaiting initiator closure, inside the
    /// caller's visibility.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Unauthenticated`] for anonymous callers.
    pub async fn pending_closure(&self, caller: &Caller) -> TaskBoardResult<Vec<TaskRecord>> {
        let actor = require_actor(caller)?;
        let visibility = scope::visibility(actor);
        let filter = TaskFilter {
            completed: Some(true),
            closed: Some(false),
            ..TaskFilter::default()
        };
        self.search_records(&visibility, &filter).await
    }

    async fn due_listing(
        &self,
        caller: &Caller,
        kind: DueKind,
    ) -> TaskBoardResult<Vec<TaskRecord>> {
        let actor = require_actor(caller)?;
        let visibility = scope::visibility(actor);
        let filter = self.to_filter(TaskQuery {
            closed: Some(false),
            due: Some(kind),
            ..TaskQuery::default()
        });
        self.search_records(&visibility, &filter).await
    }

    async fn search_records(
        &self,
        visibility: &TaskVisibility,
        filter: &TaskFilter,
    ) -> TaskBoardResult<Vec<TaskRecord>> {
        let tasks = self.tasks.search(visibility, filter).await?;
        Ok(tasks.into_iter().map(|task| self.record(task)).collect())
    }

    async fn load_visible(&self, actor: &Actor, id: TaskId) -> TaskBoardResult<Task> {
        let task = self
            .tasks
            .find_by_id(id)
            .await?
            .ok_or(TaskBoardError::NotFound(id))?;
        if !scope::visibility(actor).admits(&task) {
            return Err(TaskBoardError::NotFound(id));
        }
        Ok(task)
    }

    async fn load_mutable(&self, actor: &Actor, id: TaskId) -> TaskBoardResult<Task> {
        let task = self.load_visible(actor, id).await?;
        let mutation = scope::mutability(actor).ok_or(TaskBoardError::Forbidden)?;
        if !mutation.admits(&task) {
            return Err(TaskBoardError::Forbidden);
        }
        Ok(task)
    }

    async fn vet_group(&self, group: Option<GroupId>) -> TaskBoardResult<()> {
        let Some(id) = group else {
            return Ok(());
        };
        if self.groups.find_by_id(id).await?.is_none() {
            return Err(TaskValidationError::UnknownGroup(id).into());
        }
        Ok(())
    }

    async fn vet_executors(&self, actor: &Actor, executors: &[UserId]) -> TaskBoardResult<()> {
        for &executor in executors {
            let candidate = self
                .users
                .find_by_id(executor)
                .await?
                .ok_or(TaskValidationError::UnknownExecutor(executor))?;
            scope::may_assign(actor, &candidate).map_err(|reason| {
                TaskValidationError::ExecutorRejected { executor, reason }
            })?;
        }
        Ok(())
    }

    fn to_filter(&self, query: TaskQuery) -> TaskFilter {
        let today = self.today();
        let horizon = self.urgent_window.horizon_from(today).unwrap_or(today);
        let due = query.due.map(|kind| match kind {
            DueKind::Urgent => DueFilter::Urgent { today, horizon },
            DueKind::Overdue => DueFilter::Overdue { today },
        });
        TaskFilter {
            groups: query.groups,
            executors: query.executors,
            completed: query.completed,
            closed: query.closed,
            due,
        }
    }

    fn record(&self, task: Task) -> TaskRecord {
        TaskRecord::new(task, self.today(), self.urgent_window)
    }

    fn today(&self) -> NaiveDate {
        self.clock.utc().date_naive()
    }
}

fn require_actor(caller: &Caller) -> Result<&Actor, TaskBoardError> {
    caller.actor().ok_or(TaskBoardError::Unauthenticated)
}

//! In-memory task repository for assignment tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::assignment::{
    domain::{GroupId, Task, TaskId, TaskVisibility},
    ports::{DueFilter, TaskFilter, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use crate::directory::domain::UserId;

/// Registration batch key enforcing the task uniqueness constraint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct BatchKey {
    title: String,
    number: Option<String>,
    initiator: UserId,
    assignment_date: NaiveDate,
}

impl BatchKey {
    fn of(task: &Task) -> Self {
        Self {
            title: task.title().to_owned(),
            number: task.number().map(str::to_owned),
            initiator: task.initiator(),
            assignment_date: task.assignment_date(),
        }
    }
}

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    batch_index: HashMap<BatchKey, TaskId>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_due(task: &Task, due: DueFilter) -> bool {
    match due {
        DueFilter::Urgent { today, horizon } => {
            !task.is_completed()
                && task.execution_date() >= today
                && task.execution_date() <= horizon
        }
        DueFilter::Overdue { today } => !task.is_completed() && task.execution_date() < today,
    }
}

fn matches_filter(task: &Task, filter: &TaskFilter) -> bool {
    let group_ok = filter.groups.is_empty()
        || task
            .group()
            .is_some_and(|group: GroupId| filter.groups.contains(&group));
    let executors_ok = filter.executors.is_empty()
        || filter.executors.iter().any(|user| task.executes(*user));
    let completed_ok = filter
        .completed
        .is_none_or(|completed| task.is_completed() == completed);
    let closed_ok = filter.closed.is_none_or(|closed| task.is_closed() == closed);
    let due_ok = filter.due.is_none_or(|due| matches_due(task, due));

    group_ok && executors_ok && completed_ok && closed_ok && due_ok
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| TaskRepositoryError::persistence(std::io::Error::other(err.to_string())))?;
        let key = BatchKey::of(task);
        if state.batch_index.contains_key(&key) {
            return Err(TaskRepositoryError::DuplicateTask {
                title: task.title().to_owned(),
            });
        }
        state.batch_index.insert(key, task.id());
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| TaskRepositoryError::persistence(std::io::Error::other(err.to_string())))?;
        let previous = state
            .tasks
            .get(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?
            .clone();

        let key = BatchKey::of(task);
        let key_taken = state
            .batch_index
            .get(&key)
            .is_some_and(|owner| *owner != task.id());
        if key_taken {
            return Err(TaskRepositoryError::DuplicateTask {
                title: task.title().to_owned(),
            });
        }

        state.batch_index.remove(&BatchKey::of(&previous));
        state.batch_index.insert(key, task.id());
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self
            .state
            .read()
            .map_err(|err| TaskRepositoryError::persistence(std::io::Error::other(err.to_string())))?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn children_of(&self, id: TaskId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self
            .state
            .read()
            .map_err(|err| TaskRepositoryError::persistence(std::io::Error::other(err.to_string())))?;
        let mut children: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| task.parent_task() == Some(id))
            .cloned()
            .collect();
        children.sort_by_key(Task::assignment_date);
        Ok(children)
    }

    async fn search(
        &self,
        visibility: &TaskVisibility,
        filter: &TaskFilter,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let state = self
            .state
            .read()
            .map_err(|err| TaskRepositoryError::persistence(std::io::Error::other(err.to_string())))?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| visibility.admits(task) && matches_filter(task, filter))
            .cloned()
            .collect();
        tasks.sort_by_key(Task::execution_date);
        Ok(tasks)
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| TaskRepositoryError::persistence(std::io::Error::other(err.to_string())))?;
        if !state.tasks.contains_key(&id) {
            return Err(TaskRepositoryError::NotFound(id));
        }
        let has_children = state
            .tasks
            .values()
            .any(|task| task.parent_task() == Some(id));
        if has_children {
            return Err(TaskRepositoryError::RedirectionsProtected(id));
        }
        if let Some(removed) = state.tasks.remove(&id) {
            state.batch_index.remove(&BatchKey::of(&removed));
        }
        Ok(())
    }

    async fn detach_user(&self, user: UserId) -> TaskRepositoryResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| TaskRepositoryError::persistence(std::io::Error::other(err.to_string())))?;

        let doomed: Vec<TaskId> = state
            .tasks
            .values()
            .filter(|task| task.initiator() == user)
            .map(Task::id)
            .collect();

        // The protect rule on parent_task outranks the initiator cascade:
        // a survivor still pointing at a doomed task blocks the removal.
        let protected = state.tasks.values().find_map(|task| {
            task.parent_task()
                .filter(|parent| doomed.contains(parent) && !doomed.contains(&task.id()))
        });
        if let Some(parent) = protected {
            return Err(TaskRepositoryError::RedirectionsProtected(parent));
        }

        for id in &doomed {
            if let Some(removed) = state.tasks.remove(id) {
                state.batch_index.remove(&BatchKey::of(&removed));
            }
        }
        for task in state.tasks.values_mut() {
            task.remove_executor(user);
        }
        Ok(())
    }

    async fn detach_group(&self, group: GroupId) -> TaskRepositoryResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| TaskRepositoryError::persistence(std::io::Error::other(err.to_string())))?;
        for task in state.tasks.values_mut() {
            if task.group() == Some(group) {
                task.clear_group();
            }
        }
        Ok(())
    }
}

//! `PostgreSQL` repository implementations for assignment storage.

use super::{
    models::{GroupRow, NewGroupRow, NewTaskRow, TaskExecutorRow, TaskRow},
    schema::{groups, task_executors, tasks},
};
use crate::assignment::{
    domain::{AttachmentRef, Group, GroupId, PersistedTaskData, Task, TaskId, TaskVisibility},
    ports::{
        DueFilter, GroupRepository, GroupRepositoryError, GroupRepositoryResult, TaskFilter,
        TaskRepository, TaskRepositoryError, TaskRepositoryResult,
    },
};
use crate::directory::domain::UserId;
use async_trait::async_trait;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::collections::HashMap;

/// `PostgreSQL` connection pool type used by assignment adapters.
pub type AssignmentPgPool = Pool<ConnectionManager<PgConnection>>;

impl From<DieselError> for TaskRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

impl From<DieselError> for GroupRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: AssignmentPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: AssignmentPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

fn to_task_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        title: task.title().to_owned(),
        number: task.number().map(str::to_owned),
        group_id: task.group().map(GroupId::into_inner),
        initiator_id: task.initiator().into_inner(),
        resolution: task.resolution().to_owned(),
        parent_task_id: task.parent_task().map(TaskId::into_inner),
        assignment_date: task.assignment_date(),
        execution_date: task.execution_date(),
        brief_attachment: task.brief().map(|brief| brief.as_str().to_owned()),
        evidence_attachment: task.evidence().map(|evidence| evidence.as_str().to_owned()),
        execution_comment: task.execution_comment().map(str::to_owned),
        is_completed: task.is_completed(),
        is_closed: task.is_closed(),
    }
}

fn executor_rows(task: &Task) -> Vec<TaskExecutorRow> {
    task.executors()
        .iter()
        .map(|executor| TaskExecutorRow {
            task_id: task.id().into_inner(),
            user_id: executor.into_inner(),
        })
        .collect()
}

fn parse_attachment(value: Option<String>) -> TaskRepositoryResult<Option<AttachmentRef>> {
    value
        .map(|path| AttachmentRef::new(path).map_err(TaskRepositoryError::persistence))
        .transpose()
}

fn row_to_task(row: TaskRow, executors: Vec<UserId>) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        title,
        number,
        group_id,
        initiator_id,
        resolution,
        parent_task_id,
        assignment_date,
        execution_date,
        brief_attachment,
        evidence_attachment,
        execution_comment,
        is_completed,
        is_closed,
    } = row;

    let brief = parse_attachment(brief_attachment)?;
    let evidence = parse_attachment(evidence_attachment)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        title,
        number,
        group: group_id.map(GroupId::from_uuid),
        initiator: UserId::from_uuid(initiator_id),
        resolution,
        parent_task: parent_task_id.map(TaskId::from_uuid),
        executors,
        assignment_date,
        execution_date,
        brief,
        evidence,
        execution_comment,
        is_completed,
        is_closed,
    }))
}

fn load_executor_sets(
    connection: &mut PgConnection,
    task_ids: &[uuid::Uuid],
) -> TaskRepositoryResult<HashMap<uuid::Uuid, Vec<UserId>>> {
    let rows = task_executors::table
        .filter(task_executors::task_id.eq_any(task_ids.to_vec()))
        .load::<TaskExecutorRow>(connection)?;

    let mut sets: HashMap<uuid::Uuid, Vec<UserId>> = HashMap::new();
    for row in rows {
        sets.entry(row.task_id)
            .or_default()
            .push(UserId::from_uuid(row.user_id));
    }
    Ok(sets)
}

fn load_task(
    connection: &mut PgConnection,
    row: TaskRow,
) -> TaskRepositoryResult<Task> {
    let executors = task_executors::table
        .filter(task_executors::task_id.eq(row.id))
        .select(task_executors::user_id)
        .load::<uuid::Uuid>(connection)?
        .into_iter()
        .map(UserId::from_uuid)
        .collect();
    row_to_task(row, executors)
}

fn scoped_query(visibility: &TaskVisibility) -> tasks::BoxedQuery<'static, Pg> {
    let query = tasks::table.into_boxed();
    match *visibility {
        TaskVisibility::Everything => query,
        TaskVisibility::InitiatedOrExecuting(user) => {
            let uid = user.into_inner();
            query.filter(
                tasks::initiator_id.eq(uid).or(tasks::id.eq_any(
                    task_executors::table
                        .filter(task_executors::user_id.eq(uid))
                        .select(task_executors::task_id),
                )),
            )
        }
        TaskVisibility::InitiatedOnly(user) => {
            query.filter(tasks::initiator_id.eq(user.into_inner()))
        }
        TaskVisibility::ExecutingOnly(user) => query.filter(
            tasks::id.eq_any(
                task_executors::table
                    .filter(task_executors::user_id.eq(user.into_inner()))
                    .select(task_executors::task_id),
            ),
        ),
    }
}

fn filtered_query(
    visibility: &TaskVisibility,
    filter: &TaskFilter,
) -> tasks::BoxedQuery<'static, Pg> {
    let mut query = scoped_query(visibility);

    if !filter.groups.is_empty() {
        let ids: Vec<Option<uuid::Uuid>> = filter
            .groups
            .iter()
            .map(|group| Some(group.into_inner()))
            .collect();
        query = query.filter(tasks::group_id.eq_any(ids));
    }
    if !filter.executors.is_empty() {
        let ids: Vec<uuid::Uuid> = filter
            .executors
            .iter()
            .map(|user| user.into_inner())
            .collect();
        query = query.filter(
            tasks::id.eq_any(
                task_executors::table
                    .filter(task_executors::user_id.eq_any(ids))
                    .select(task_executors::task_id),
            ),
        );
    }
    if let Some(completed) = filter.completed {
        query = query.filter(tasks::is_completed.eq(completed));
    }
    if let Some(closed) = filter.closed {
        query = query.filter(tasks::is_closed.eq(closed));
    }
    match filter.due {
        Some(DueFilter::Urgent { today, horizon }) => {
            query = query
                .filter(tasks::is_completed.eq(false))
                .filter(tasks::execution_date.ge(today))
                .filter(tasks::execution_date.le(horizon));
        }
        Some(DueFilter::Overdue { today }) => {
            query = query
                .filter(tasks::is_completed.eq(false))
                .filter(tasks::execution_date.lt(today));
        }
        None => {}
    }

    query
}

fn map_task_unique_violation(err: DieselError, title: &str) -> TaskRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            TaskRepositoryError::DuplicateTask {
                title: title.to_owned(),
            }
        }
        _ => TaskRepositoryError::persistence(err),
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn insert(&self, task: &Task) -> TaskRepositoryResult<()> {
        let title = task.title().to_owned();
        let new_row = to_task_row(task);
        let executors = executor_rows(task);

        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|conn| {
                diesel::insert_into(tasks::table)
                    .values(&new_row)
                    .execute(conn)
                    .map_err(|err| map_task_unique_violation(err, &title))?;
                diesel::insert_into(task_executors::table)
                    .values(&executors)
                    .execute(conn)?;
                Ok(())
            })
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let title = task.title().to_owned();
        let row = to_task_row(task);
        let executors = executor_rows(task);

        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|conn| {
                let updated =
                    diesel::update(tasks::table.filter(tasks::id.eq(task_id.into_inner())))
                        .set(&row)
                        .execute(conn)
                        .map_err(|err| map_task_unique_violation(err, &title))?;
                if updated == 0 {
                    return Err(TaskRepositoryError::NotFound(task_id));
                }
                diesel::delete(
                    task_executors::table
                        .filter(task_executors::task_id.eq(task_id.into_inner())),
                )
                .execute(conn)?;
                diesel::insert_into(task_executors::table)
                    .values(&executors)
                    .execute(conn)?;
                Ok(())
            })
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?;
            row.map(|found| load_task(connection, found)).transpose()
        })
        .await
    }

    async fn children_of(&self, id: TaskId) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::parent_task_id.eq(id.into_inner()))
                .order(tasks::assignment_date.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;
            collect_tasks(connection, rows)
        })
        .await
    }

    async fn search(
        &self,
        visibility: &TaskVisibility,
        filter: &TaskFilter,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let scope = *visibility;
        let criteria = filter.clone();
        self.run_blocking(move |connection| {
            let rows = filtered_query(&scope, &criteria)
                .order(tasks::execution_date.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;
            collect_tasks(connection, rows)
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|conn| {
                let children: i64 = tasks::table
                    .filter(tasks::parent_task_id.eq(id.into_inner()))
                    .count()
                    .get_result(conn)?;
                if children > 0 {
                    return Err(TaskRepositoryError::RedirectionsProtected(id));
                }
                diesel::delete(
                    task_executors::table.filter(task_executors::task_id.eq(id.into_inner())),
                )
                .execute(conn)?;
                let deleted =
                    diesel::delete(tasks::table.filter(tasks::id.eq(id.into_inner())))
                        .execute(conn)?;
                if deleted == 0 {
                    return Err(TaskRepositoryError::NotFound(id));
                }
                Ok(())
            })
        })
        .await
    }

    async fn detach_user(&self, user: UserId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|conn| {
                let uid = user.into_inner();
                let doomed: Vec<uuid::Uuid> = tasks::table
                    .filter(tasks::initiator_id.eq(uid))
                    .select(tasks::id)
                    .load(conn)?;

                // Protect rule: a surviving child blocks the cascade.
                let survivor_parent = tasks::table
                    .filter(tasks::parent_task_id.eq_any(
                        doomed.iter().copied().map(Some).collect::<Vec<_>>(),
                    ))
                    .filter(tasks::id.ne_all(doomed.clone()))
                    .select(tasks::parent_task_id)
                    .first::<Option<uuid::Uuid>>(conn)
                    .optional()?;
                if let Some(Some(parent)) = survivor_parent {
                    return Err(TaskRepositoryError::RedirectionsProtected(
                        TaskId::from_uuid(parent),
                    ));
                }

                diesel::delete(
                    task_executors::table
                        .filter(task_executors::task_id.eq_any(doomed.clone())),
                )
                .execute(conn)?;
                diesel::delete(
                    task_executors::table.filter(task_executors::user_id.eq(uid)),
                )
                .execute(conn)?;
                diesel::delete(tasks::table.filter(tasks::id.eq_any(doomed))).execute(conn)?;
                Ok(())
            })
        })
        .await
    }

    async fn detach_group(&self, group: GroupId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            diesel::update(tasks::table.filter(tasks::group_id.eq(group.into_inner())))
                .set(tasks::group_id.eq(None::<uuid::Uuid>))
                .execute(connection)?;
            Ok(())
        })
        .await
    }
}

fn collect_tasks(
    connection: &mut PgConnection,
    rows: Vec<TaskRow>,
) -> TaskRepositoryResult<Vec<Task>> {
    let ids: Vec<uuid::Uuid> = rows.iter().map(|row| row.id).collect();
    let mut sets = load_executor_sets(connection, &ids)?;
    rows.into_iter()
        .map(|row| {
            let executors = sets.remove(&row.id).unwrap_or_default();
            row_to_task(row, executors)
        })
        .collect()
}

/// `PostgreSQL`-backed group repository.
#[derive(Debug, Clone)]
pub struct PostgresGroupRepository {
    pool: AssignmentPgPool,
}

impl PostgresGroupRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: AssignmentPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> GroupRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> GroupRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(GroupRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(GroupRepositoryError::persistence)?
    }
}

fn row_to_group(row: GroupRow) -> Group {
    Group::from_persisted(GroupId::from_uuid(row.id), row.name)
}

#[async_trait]
impl GroupRepository for PostgresGroupRepository {
    async fn insert(&self, group: &Group) -> GroupRepositoryResult<()> {
        let row = NewGroupRow {
            id: group.id().into_inner(),
            name: group.name().to_owned(),
        };
        self.run_blocking(move |connection| {
            diesel::insert_into(groups::table)
                .values(&row)
                .execute(connection)?;
            Ok(())
        })
        .await
    }

    async fn update(&self, group: &Group) -> GroupRepositoryResult<()> {
        let group_id = group.id();
        let row = NewGroupRow {
            id: group_id.into_inner(),
            name: group.name().to_owned(),
        };
        self.run_blocking(move |connection| {
            let updated =
                diesel::update(groups::table.filter(groups::id.eq(group_id.into_inner())))
                    .set(&row)
                    .execute(connection)?;
            if updated == 0 {
                return Err(GroupRepositoryError::NotFound(group_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: GroupId) -> GroupRepositoryResult<Option<Group>> {
        self.run_blocking(move |connection| {
            let row = groups::table
                .filter(groups::id.eq(id.into_inner()))
                .select(GroupRow::as_select())
                .first::<GroupRow>(connection)
                .optional()?;
            Ok(row.map(row_to_group))
        })
        .await
    }

    async fn list_all(&self) -> GroupRepositoryResult<Vec<Group>> {
        self.run_blocking(move |connection| {
            let rows = groups::table
                .order(groups::name.asc())
                .select(GroupRow::as_select())
                .load::<GroupRow>(connection)?;
            Ok(rows.into_iter().map(row_to_group).collect())
        })
        .await
    }

    async fn delete(&self, id: GroupId) -> GroupRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(groups::table.filter(groups::id.eq(id.into_inner())))
                .execute(connection)?;
            if deleted == 0 {
                return Err(GroupRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }
}

//! Diesel row models for assignment persistence.

use super::schema::{groups, task_executors, tasks};
use chrono::NaiveDate;
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// External registration number.
    pub number: Option<String>,
    /// Category reference.
    pub group_id: Option<uuid::Uuid>,
    /// Initiating user.
    pub initiator_id: uuid::Uuid,
    /// Resolution text.
    pub resolution: String,
    /// Parent task for redirections.
    pub parent_task_id: Option<uuid::Uuid>,
    /// Date the task was assigned.
    pub assignment_date: NaiveDate,
    /// Due date.
    pub execution_date: NaiveDate,
    /// Reference to the task brief attachment.
    pub brief_attachment: Option<String>,
    /// Reference to the execution-evidence attachment.
    pub evidence_attachment: Option<String>,
    /// Free-text execution comment.
    pub execution_comment: Option<String>,
    /// Executor-side completion flag.
    pub is_completed: bool,
    /// Initiator-side closure flag.
    pub is_closed: bool,
}

/// Insert/update model for task records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// External registration number.
    pub number: Option<String>,
    /// Category reference.
    pub group_id: Option<uuid::Uuid>,
    /// Initiating user.
    pub initiator_id: uuid::Uuid,
    /// Resolution text.
    pub resolution: String,
    /// Parent task for redirections.
    pub parent_task_id: Option<uuid::Uuid>,
    /// Date the task was assigned.
    pub assignment_date: NaiveDate,
    /// Due date.
    pub execution_date: NaiveDate,
    /// Reference to the task brief attachment.
    pub brief_attachment: Option<String>,
    /// Reference to the execution-evidence attachment.
    pub evidence_attachment: Option<String>,
    /// Free-text execution comment.
    pub execution_comment: Option<String>,
    /// Executor-side completion flag.
    pub is_completed: bool,
    /// Initiator-side closure flag.
    pub is_closed: bool,
}

/// Row of the task-to-executor join table.
#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = task_executors)]
pub struct TaskExecutorRow {
    /// Task reference.
    pub task_id: uuid::Uuid,
    /// Executor reference.
    pub user_id: uuid::Uuid,
}

/// Query result row for group records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = groups)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GroupRow {
    /// Group identifier.
    pub id: uuid::Uuid,
    /// Group name.
    pub name: String,
}

/// Insert/update model for group records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = groups)]
pub struct NewGroupRow {
    /// Group identifier.
    pub id: uuid::Uuid,
    /// Group name.
    pub name: String,
}

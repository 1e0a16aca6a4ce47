//! Role-based access scoping for tasks and executor candidates.
//!
//! Every rule takes the acting user as an explicit [`Actor`] parameter.
//! Scoping is computed before any caller-supplied filter is applied, so
//! filter parameters can narrow but never widen the visible set.

use super::Task;
use crate::directory::domain::{Actor, Role, User, UserId};
use thiserror::Error;

/// Subset of task rows an actor may reach for a given verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskVisibility {
    /// No restriction: administrators and the director.
    Everything,
    /// Tasks the user initiated or executes: delegating middle roles.
    InitiatedOrExecuting(UserId),
    /// Tasks the user initiated: mutation scope for delegating roles.
    InitiatedOnly(UserId),
    /// Tasks the user executes: rank-and-file employees.
    ExecutingOnly(UserId),
}

impl TaskVisibility {
    /// Returns true when the given task falls inside this visibility.
    #[must_use]
    pub fn admits(&self, task: &Task) -> bool {
        match *self {
            Self::Everything => true,
            Self::InitiatedOrExecuting(user) => task.initiator() == user || task.executes(user),
            Self::InitiatedOnly(user) => task.initiator() == user,
            Self::ExecutingOnly(user) => task.executes(user),
        }
    }
}

/// Visibility for list and retrieve verbs.
#[must_use]
pub fn visibility(actor: &Actor) -> TaskVisibility {
    if actor.is_privileged() {
        return TaskVisibility::Everything;
    }
    if actor.role().is_employee() {
        return TaskVisibility::ExecutingOnly(actor.user_id());
    }
    TaskVisibility::InitiatedOrExecuting(actor.user_id())
}

/// Visibility for update and delete verbs. `None` means the role holds no
/// mutation rights on tasks at all (employees act only through the
/// completion transition).
#[must_use]
pub fn mutability(actor: &Actor) -> Option<TaskVisibility> {
    if actor.is_privileged() {
        return Some(TaskVisibility::Everything);
    }
    if actor.role().is_employee() {
        return None;
    }
    Some(TaskVisibility::InitiatedOnly(actor.user_id()))
}

/// Returns true when the actor may create tasks and name executors.
#[must_use]
pub fn may_initiate(actor: &Actor) -> bool {
    actor.is_admin() || actor.role().may_initiate_tasks()
}

/// Reason an executor candidate was rejected for the acting role.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ExecutorRejection {
    /// Deputy directors may not delegate to directors.
    #[error("directors cannot be named as executors")]
    DirectorExcluded,

    /// The candidate belongs to a different department than the delegator.
    #[error("executor must belong to the delegator's department")]
    OutsideDepartment,

    /// Deputy heads may only delegate to rank-and-file employees.
    #[error("only rank-and-file employees may be named")]
    NotRankAndFile,

    /// Delegators may not name themselves.
    #[error("delegators may not name themselves as executor")]
    SelfAssignment,

    /// The acting role carries no delegation authority.
    #[error("role carries no delegation authority")]
    NoDelegationAuthority,
}

/// Checks whether the actor may name the candidate as an executor.
///
/// Admins and the director may name anyone; a deputy director anyone but
/// directors; a head of department only members of their own department
/// excluding themselves; a deputy head only rank-and-file employees of
/// their own department excluding themselves.
///
/// # Errors
///
/// Returns the [`ExecutorRejection`] explaining why the candidate is
/// outside the actor's pool.
pub fn may_assign(actor: &Actor, candidate: &User) -> Result<(), ExecutorRejection> {
    if actor.is_privileged() {
        return Ok(());
    }
    match actor.role() {
        Role::DeputyDirector => {
            if candidate.role().is_director() {
                return Err(ExecutorRejection::DirectorExcluded);
            }
            Ok(())
        }
        Role::HeadOfDepartment => {
            reject_self(actor, candidate)?;
            require_same_department(actor, candidate)
        }
        Role::DeputyHeadOfDepartment => {
            reject_self(actor, candidate)?;
            require_same_department(actor, candidate)?;
            if !candidate.role().is_employee() {
                return Err(ExecutorRejection::NotRankAndFile);
            }
            Ok(())
        }
        _ => Err(ExecutorRejection::NoDelegationAuthority),
    }
}

fn reject_self(actor: &Actor, candidate: &User) -> Result<(), ExecutorRejection> {
    if candidate.id() == actor.user_id() {
        return Err(ExecutorRejection::SelfAssignment);
    }
    Ok(())
}

fn require_same_department(actor: &Actor, candidate: &User) -> Result<(), ExecutorRejection> {
    let shared = actor
        .department()
        .is_some_and(|department| candidate.department() == Some(department));
    if !shared {
        return Err(ExecutorRejection::OutsideDepartment);
    }
    Ok(())
}

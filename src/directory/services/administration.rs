//! Service layer for directory administration.
//!
//! User and department management is gated on administrator rights. User
//! removal orchestrates the task-side cascade before touching the
//! directory row, so a failed cascade leaves the account intact.

use crate::assignment::domain::{scope, TaskId};
use crate::assignment::ports::{TaskRepository, TaskRepositoryError};
use crate::directory::{
    domain::{
        Actor, Caller, Department, DepartmentId, DirectoryDomainError, EmailAddress, User, UserId,
        UserProfile,
    },
    ports::{
        DepartmentRepository, DepartmentRepositoryError, UserRepository, UserRepositoryError,
    },
};
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for directory administration.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The caller carries no authenticated identity.
    #[error("authentication required")]
    Unauthenticated,

    /// The operation requires administrator rights.
    #[error("operation requires administrator rights")]
    Forbidden,

    /// The user does not exist or is hidden from the caller.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// The department does not exist.
    #[error("department not found: {0}")]
    DepartmentNotFound(DepartmentId),

    /// The email address is already registered.
    #[error("duplicate email address: {0}")]
    DuplicateEmail(EmailAddress),

    /// A department with the same name already exists.
    #[error("duplicate department name: {0}")]
    DuplicateDepartment(String),

    /// User removal is blocked while an initiated task has redirection
    /// children outside the cascade.
    #[error("task {0} still has redirected children")]
    RedirectionsExist(TaskId),

    /// Profile validation failed.
    #[error(transparent)]
    Validation(#[from] DirectoryDomainError),

    /// User store failure.
    #[error(transparent)]
    Users(UserRepositoryError),

    /// Department store failure.
    #[error(transparent)]
    Departments(DepartmentRepositoryError),

    /// Task store failure during the removal cascade.
    #[error(transparent)]
    Tasks(TaskRepositoryError),
}

impl From<UserRepositoryError> for DirectoryError {
    fn from(err: UserRepositoryError) -> Self {
        match err {
            UserRepositoryError::DuplicateEmail(email) => Self::DuplicateEmail(email),
            UserRepositoryError::NotFound(id) => Self::UserNotFound(id),
            other => Self::Users(other),
        }
    }
}

impl From<DepartmentRepositoryError> for DirectoryError {
    fn from(err: DepartmentRepositoryError) -> Self {
        match err {
            DepartmentRepositoryError::DuplicateName(name) => Self::DuplicateDepartment(name),
            DepartmentRepositoryError::NotFound(id) => Self::DepartmentNotFound(id),
            other => Self::Departments(other),
        }
    }
}

impl From<TaskRepositoryError> for DirectoryError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::RedirectionsProtected(id) => Self::RedirectionsExist(id),
            other => Self::Tasks(other),
        }
    }
}

/// Result type for directory administration operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Directory administration service.
#[derive(Clone)]
pub struct DirectoryService<U, D, T>
where
    U: UserRepository,
    D: DepartmentRepository,
    T: TaskRepository,
{
    users: Arc<U>,
    departments: Arc<D>,
    tasks: Arc<T>,
}

impl<U, D, T> DirectoryService<U, D, T>
where
    U: UserRepository,
    D: DepartmentRepository,
    T: TaskRepository,
{
    /// Creates a new directory administration service.
    #[must_use]
    pub const fn new(users: Arc<U>, departments: Arc<D>, tasks: Arc<T>) -> Self {
        Self {
            users,
            departments,
            tasks,
        }
    }

    /// Registers a new user account.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Forbidden`] for non-administrators,
    /// [`DirectoryError::DuplicateEmail`] on an email collision, or
    /// [`DirectoryError::Validation`] when the profile is invalid.
    pub async fn register_user(
        &self,
        caller: &Caller,
        profile: UserProfile,
    ) -> DirectoryResult<User> {
        require_admin(caller)?;
        self.vet_department(profile.department).await?;
        let user = User::new(profile)?;
        self.users.insert(&user).await?;
        tracing::info!(user = %user.id(), "user registered");
        Ok(user)
    }

    /// Retrieves a user account. Non-administrators may only retrieve
    /// their own account; other identifiers fail as not-found.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::UserNotFound`] when the account does not
    /// exist or is hidden from the caller.
    pub async fn get_user(&self, caller: &Caller, id: UserId) -> DirectoryResult<User> {
        let actor = require_actor(caller)?;
        if !actor.is_admin() && actor.user_id() != id {
            return Err(DirectoryError::UserNotFound(id));
        }
        self.users
            .find_by_id(id)
            .await?
            .ok_or(DirectoryError::UserNotFound(id))
    }

    /// Lists user accounts. Administrators see the whole directory;
    /// everyone else sees only their own account.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Unauthenticated`] for anonymous callers.
    pub async fn list_users(&self, caller: &Caller) -> DirectoryResult<Vec<User>> {
        let actor = require_actor(caller)?;
        if actor.is_admin() {
            return Ok(self.users.list_all().await?);
        }
        let own = self.users.find_by_id(actor.user_id()).await?;
        Ok(own.into_iter().collect())
    }

    /// Resolves the caller descriptor for a verified email address.
    ///
    /// This is the lookup an authentication collaborator performs after
    /// verifying a login; addresses with no account resolve to the
    /// anonymous caller.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Users`] when the lookup fails.
    pub async fn resolve_caller(&self, email: &EmailAddress) -> DirectoryResult<Caller> {
        let account = self.users.find_by_email(email).await?;
        Ok(account.map_or(Caller::Anonymous, |user| {
            Caller::Authenticated(Actor::from_user(&user))
        }))
    }

    /// Replaces a user's profile fields.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Forbidden`] for non-administrators,
    /// [`DirectoryError::UserNotFound`] when the account does not exist,
    /// or [`DirectoryError::DuplicateEmail`] on an email collision.
    pub async fn update_user(
        &self,
        caller: &Caller,
        id: UserId,
        profile: UserProfile,
    ) -> DirectoryResult<User> {
        require_admin(caller)?;
        self.vet_department(profile.department).await?;
        let mut user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or(DirectoryError::UserNotFound(id))?;
        user.apply_profile(profile)?;
        self.users.update(&user).await?;
        Ok(user)
    }

    /// Removes a user account with its referential cascade: tasks the
    /// user initiated are deleted, executor memberships are stripped, and
    /// curated departments lose their curator.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::RedirectionsExist`] when an initiated
    /// task has redirection children that survive the cascade, or
    /// [`DirectoryError::UserNotFound`] when the account does not exist.
    pub async fn delete_user(&self, caller: &Caller, id: UserId) -> DirectoryResult<()> {
        require_admin(caller)?;
        if self.users.find_by_id(id).await?.is_none() {
            return Err(DirectoryError::UserNotFound(id));
        }
        self.tasks.detach_user(id).await?;
        self.departments.clear_curator(id).await?;
        self.users.delete(id).await?;
        tracing::info!(user = %id, "user removed");
        Ok(())
    }

    /// Returns the users the caller may name as executors, in directory
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Unauthenticated`] for anonymous callers.
    pub async fn executor_candidates(&self, caller: &Caller) -> DirectoryResult<Vec<User>> {
        let actor = require_actor(caller)?;
        let users = self.users.list_all().await?;
        Ok(users
            .into_iter()
            .filter(|candidate| scope::may_assign(actor, candidate).is_ok())
            .collect())
    }

    /// Creates a new department.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Forbidden`] for non-administrators,
    /// [`DirectoryError::DuplicateDepartment`] on a name collision, or
    /// [`DirectoryError::Validation`] when the name is blank.
    pub async fn create_department(
        &self,
        caller: &Caller,
        name: impl Into<String> + Send,
        curator: Option<UserId>,
    ) -> DirectoryResult<Department> {
        require_admin(caller)?;
        self.vet_curator(curator).await?;
        let department = Department::new(name, curator)?;
        self.departments.insert(&department).await?;
        tracing::info!(department = %department.id(), "department created");
        Ok(department)
    }

    /// Retrieves a department by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::DepartmentNotFound`] when the department
    /// does not exist.
    pub async fn get_department(
        &self,
        caller: &Caller,
        id: DepartmentId,
    ) -> DirectoryResult<Department> {
        require_actor(caller)?;
        self.departments
            .find_by_id(id)
            .await?
            .ok_or(DirectoryError::DepartmentNotFound(id))
    }

    /// Returns all departments ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Unauthenticated`] for anonymous callers.
    pub async fn list_departments(&self, caller: &Caller) -> DirectoryResult<Vec<Department>> {
        require_actor(caller)?;
        Ok(self.departments.list_all().await?)
    }

    /// Returns the members of a department in directory order.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::DepartmentNotFound`] when the department
    /// does not exist.
    pub async fn department_members(
        &self,
        caller: &Caller,
        id: DepartmentId,
    ) -> DirectoryResult<Vec<User>> {
        require_actor(caller)?;
        if self.departments.find_by_id(id).await?.is_none() {
            return Err(DirectoryError::DepartmentNotFound(id));
        }
        Ok(self.users.list_by_department(id).await?)
    }

    /// Renames a department.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Forbidden`] for non-administrators,
    /// [`DirectoryError::DepartmentNotFound`] when it does not exist, or
    /// [`DirectoryError::DuplicateDepartment`] on a name collision.
    pub async fn rename_department(
        &self,
        caller: &Caller,
        id: DepartmentId,
        name: impl Into<String> + Send,
    ) -> DirectoryResult<Department> {
        require_admin(caller)?;
        let mut department = self
            .departments
            .find_by_id(id)
            .await?
            .ok_or(DirectoryError::DepartmentNotFound(id))?;
        department.rename(name)?;
        self.departments.update(&department).await?;
        Ok(department)
    }

    /// Assigns, replaces, or clears a department's curator.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Forbidden`] for non-administrators,
    /// [`DirectoryError::DepartmentNotFound`] when the department does not
    /// exist, or [`DirectoryError::UserNotFound`] when the curator does
    /// not.
    pub async fn assign_curator(
        &self,
        caller: &Caller,
        id: DepartmentId,
        curator: Option<UserId>,
    ) -> DirectoryResult<Department> {
        require_admin(caller)?;
        self.vet_curator(curator).await?;
        let mut department = self
            .departments
            .find_by_id(id)
            .await?
            .ok_or(DirectoryError::DepartmentNotFound(id))?;
        department.set_curator(curator);
        self.departments.update(&department).await?;
        Ok(department)
    }

    /// Removes a department. Member affiliations are cleared, not
    /// cascaded.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Forbidden`] for non-administrators or
    /// [`DirectoryError::DepartmentNotFound`] when it does not exist.
    pub async fn delete_department(&self, caller: &Caller, id: DepartmentId) -> DirectoryResult<()> {
        require_admin(caller)?;
        if self.departments.find_by_id(id).await?.is_none() {
            return Err(DirectoryError::DepartmentNotFound(id));
        }
        // Affiliations clear before the row goes; a partial failure must
        // not leave members pointing at a missing department.
        self.users.clear_department(id).await?;
        self.departments.delete(id).await?;
        tracing::info!(department = %id, "department removed");
        Ok(())
    }

    async fn vet_department(&self, department: Option<DepartmentId>) -> DirectoryResult<()> {
        let Some(id) = department else {
            return Ok(());
        };
        if self.departments.find_by_id(id).await?.is_none() {
            return Err(DirectoryError::DepartmentNotFound(id));
        }
        Ok(())
    }

    async fn vet_curator(&self, curator: Option<UserId>) -> DirectoryResult<()> {
        let Some(id) = curator else {
            return Ok(());
        };
        if self.users.find_by_id(id).await?.is_none() {
            return Err(DirectoryError::UserNotFound(id));
        }
        Ok(())
    }
}

fn require_actor(caller: &Caller) -> DirectoryResult<&Actor> {
    caller.actor().ok_or(DirectoryError::Unauthenticated)
}

fn require_admin(caller: &Caller) -> DirectoryResult<()> {
    let actor = require_actor(caller)?;
    if !actor.is_admin() {
        return Err(DirectoryError::Forbidden);
    }
    Ok(())
}

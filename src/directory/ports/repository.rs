//! Repository ports for user and department persistence.

use crate::directory::domain::{Department, DepartmentId, EmailAddress, User, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for user repository operations.
pub type UserRepositoryResult<T> = Result<T, UserRepositoryError>;

/// User persistence contract.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new user.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::DuplicateEmail`] when the email
    /// address is already registered.
    async fn insert(&self, user: &User) -> UserRepositoryResult<()>;

    /// Persists changes to an existing user.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::NotFound`] when the user does not
    /// exist, or [`UserRepositoryError::DuplicateEmail`] when a revised
    /// email collides with another account.
    async fn update(&self, user: &User) -> UserRepositoryResult<()>;

    /// Finds a user by identifier. Returns `None` when absent.
    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>>;

    /// Finds a user by email address. Returns `None` when absent.
    async fn find_by_email(&self, email: &EmailAddress) -> UserRepositoryResult<Option<User>>;

    /// Returns all users ordered by family name.
    async fn list_all(&self) -> UserRepositoryResult<Vec<User>>;

    /// Returns users affiliated with the given department.
    async fn list_by_department(
        &self,
        department: DepartmentId,
    ) -> UserRepositoryResult<Vec<User>>;

    /// Deletes a user row.
    ///
    /// Task-side cascades (initiated tasks, executor membership) are
    /// orchestrated by the service before this call.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::NotFound`] when the user does not
    /// exist.
    async fn delete(&self, id: UserId) -> UserRepositoryResult<()>;

    /// Clears the department affiliation of all users in a department.
    /// Applied when a department is removed (set-null rule).
    async fn clear_department(&self, department: DepartmentId) -> UserRepositoryResult<()>;
}

/// Errors returned by user repository implementations.
#[derive(Debug, Clone, Error)]
pub enum UserRepositoryError {
    /// The email address is already registered.
    #[error("duplicate email address: {0}")]
    DuplicateEmail(EmailAddress),

    /// The user was not found.
    #[error("user not found: {0}")]
    NotFound(UserId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl UserRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Result type for department repository operations.
pub type DepartmentRepositoryResult<T> = Result<T, DepartmentRepositoryError>;

/// Department persistence contract.
#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    /// Stores a new department.
    ///
    /// # Errors
    ///
    /// Returns [`DepartmentRepositoryError::DuplicateName`] when the name
    /// is already taken.
    async fn insert(&self, department: &Department) -> DepartmentRepositoryResult<()>;

    /// Persists changes to an existing department.
    ///
    /// # Errors
    ///
    /// Returns [`DepartmentRepositoryError::NotFound`] when the department
    /// does not exist, or [`DepartmentRepositoryError::DuplicateName`] when
    /// a rename collides with another department.
    async fn update(&self, department: &Department) -> DepartmentRepositoryResult<()>;

    /// Finds a department by identifier. Returns `None` when absent.
    async fn find_by_id(&self, id: DepartmentId) -> DepartmentRepositoryResult<Option<Department>>;

    /// Returns all departments ordered by name.
    async fn list_all(&self) -> DepartmentRepositoryResult<Vec<Department>>;

    /// Deletes a department row.
    ///
    /// # Errors
    ///
    /// Returns [`DepartmentRepositoryError::NotFound`] when the department
    /// does not exist.
    async fn delete(&self, id: DepartmentId) -> DepartmentRepositoryResult<()>;

    /// Clears the curator reference wherever the given user curates a
    /// department. Applied when the user is removed (set-null rule).
    async fn clear_curator(&self, curator: UserId) -> DepartmentRepositoryResult<()>;
}

/// Errors returned by department repository implementations.
#[derive(Debug, Clone, Error)]
pub enum DepartmentRepositoryError {
    /// A department with the same name already exists.
    #[error("duplicate department name: {0}")]
    DuplicateName(String),

    /// The department was not found.
    #[error("department not found: {0}")]
    NotFound(DepartmentId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl DepartmentRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

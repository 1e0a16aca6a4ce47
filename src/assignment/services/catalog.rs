//! Service layer for the admin-managed group catalogue.

use crate::assignment::{
    domain::{Group, GroupId, TaskDomainError},
    ports::{GroupRepository, GroupRepositoryError, TaskRepository, TaskRepositoryError},
};
use crate::directory::domain::Caller;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for group catalogue operations.
#[derive(Debug, Error)]
pub enum GroupCatalogError {
    /// The caller carries no authenticated identity.
    #[error("authentication required")]
    Unauthenticated,

    /// Catalogue management requires administrator rights.
    #[error("operation requires administrator rights")]
    Forbidden,

    /// The group does not exist.
    #[error("group not found: {0}")]
    NotFound(GroupId),

    /// Group name validation failed.
    #[error(transparent)]
    Validation(#[from] TaskDomainError),

    /// Group store failure.
    #[error(transparent)]
    Groups(GroupRepositoryError),

    /// Task store failure while clearing category references.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),
}

impl From<GroupRepositoryError> for GroupCatalogError {
    fn from(err: GroupRepositoryError) -> Self {
        match err {
            GroupRepositoryError::NotFound(id) => Self::NotFound(id),
            other => Self::Groups(other),
        }
    }
}

/// Result type for group catalogue operations.
pub type GroupCatalogResult<T> = Result<T, GroupCatalogError>;

/// Admin-managed catalogue of task groups.
///
/// Reads are open to any authenticated caller; writes require
/// administrator rights. Deleting a group clears the category reference on
/// tasks filed under it before removing the row.
#[derive(Clone)]
pub struct GroupCatalogService<G, T>
where
    G: GroupRepository,
    T: TaskRepository,
{
    groups: Arc<G>,
    tasks: Arc<T>,
}

impl<G, T> GroupCatalogService<G, T>
where
    G: GroupRepository,
    T: TaskRepository,
{
    /// Creates a new group catalogue service.
    #[must_use]
    pub const fn new(groups: Arc<G>, tasks: Arc<T>) -> Self {
        Self { groups, tasks }
    }

    /// Registers a new group.
    ///
    /// # Errors
    ///
    /// Returns [`GroupCatalogError::Forbidden`] for non-administrators or
    /// [`GroupCatalogError::Validation`] when the name is blank.
    pub async fn create_group(
        &self,
        caller: &Caller,
        name: impl Into<String> + Send,
    ) -> GroupCatalogResult<Group> {
        require_admin(caller)?;
        let group = Group::new(name)?;
        self.groups.insert(&group).await?;
        tracing::info!(group = %group.id(), "group created");
        Ok(group)
    }

    /// Retrieves a group by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`GroupCatalogError::NotFound`] when the group does not
    /// exist.
    pub async fn get_group(&self, caller: &Caller, id: GroupId) -> GroupCatalogResult<Group> {
        require_authenticated(caller)?;
        self.groups
            .find_by_id(id)
            .await?
            .ok_or(GroupCatalogError::NotFound(id))
    }

    /// Returns all groups ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`GroupCatalogError::Unauthenticated`] for anonymous
    /// callers.
    pub async fn list_groups(&self, caller: &Caller) -> GroupCatalogResult<Vec<Group>> {
        require_authenticated(caller)?;
        Ok(self.groups.list_all().await?)
    }

    /// Renames a group.
    ///
    /// # Errors
    ///
    /// Returns [`GroupCatalogError::Forbidden`] for non-administrators,
    /// [`GroupCatalogError::NotFound`] when the group does not exist, or
    /// [`GroupCatalogError::Validation`] when the new name is blank.
    pub async fn rename_group(
        &self,
        caller: &Caller,
        id: GroupId,
        name: impl Into<String> + Send,
    ) -> GroupCatalogResult<Group> {
        require_admin(caller)?;
        let mut group = self
            .groups
            .find_by_id(id)
            .await?
            .ok_or(GroupCatalogError::NotFound(id))?;
        group.rename(name)?;
        self.groups.update(&group).await?;
        Ok(group)
    }

    /// Deletes a group, clearing the category reference on tasks filed
    /// under it.
    ///
    /// # Errors
    ///
    /// Returns [`GroupCatalogError::Forbidden`] for non-administrators or
    /// [`GroupCatalogError::NotFound`] when the group does not exist.
    pub async fn delete_group(&self, caller: &Caller, id: GroupId) -> GroupCatalogResult<()> {
        require_admin(caller)?;
        self.tasks.detach_group(id).await?;
        self.groups.delete(id).await?;
        tracing::info!(group = %id, "group deleted");
        Ok(())
    }
}

fn require_authenticated(caller: &Caller) -> GroupCatalogResult<()> {
    caller
        .actor()
        .map(|_| ())
        .ok_or(GroupCatalogError::Unauthenticated)
}

fn require_admin(caller: &Caller) -> GroupCatalogResult<()> {
    let actor = caller.actor().ok_or(GroupCatalogError::Unauthenticated)?;
    if !actor.is_admin() {
        return Err(GroupCatalogError::Forbidden);
    }
    Ok(())
}

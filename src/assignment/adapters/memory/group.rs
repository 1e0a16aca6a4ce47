//! In-memory group repository for assignment tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::assignment::{
    domain::{Group, GroupId},
    ports::{GroupRepository, GroupRepositoryError, GroupRepositoryResult},
};

/// Thread-safe in-memory group repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGroupRepository {
    state: Arc<RwLock<HashMap<GroupId, Group>>>,
}

impl InMemoryGroupRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GroupRepository for InMemoryGroupRepository {
    async fn insert(&self, group: &Group) -> GroupRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            GroupRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        state.insert(group.id(), group.clone());
        Ok(())
    }

    async fn update(&self, group: &Group) -> GroupRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            GroupRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if !state.contains_key(&group.id()) {
            return Err(GroupRepositoryError::NotFound(group.id()));
        }
        state.insert(group.id(), group.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: GroupId) -> GroupRepositoryResult<Option<Group>> {
        let state = self.state.read().map_err(|err| {
            GroupRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.get(&id).cloned())
    }

    async fn list_all(&self) -> GroupRepositoryResult<Vec<Group>> {
        let state = self.state.read().map_err(|err| {
            GroupRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut groups: Vec<Group> = state.values().cloned().collect();
        groups.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(groups)
    }

    async fn delete(&self, id: GroupId) -> GroupRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            GroupRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.remove(&id).is_none() {
            return Err(GroupRepositoryError::NotFound(id));
        }
        Ok(())
    }
}

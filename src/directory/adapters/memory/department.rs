//! In-memory department repository for directory tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::directory::{
    domain::{Department, DepartmentId, UserId},
    ports::{DepartmentRepository, DepartmentRepositoryError, DepartmentRepositoryResult},
};

/// Thread-safe in-memory department repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDepartmentRepository {
    state: Arc<RwLock<InMemoryDepartmentState>>,
}

#[derive(Debug, Default)]
struct InMemoryDepartmentState {
    departments: HashMap<DepartmentId, Department>,
    name_index: HashMap<String, DepartmentId>,
}

impl InMemoryDepartmentRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DepartmentRepository for InMemoryDepartmentRepository {
    async fn insert(&self, department: &Department) -> DepartmentRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            DepartmentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.name_index.contains_key(department.name()) {
            return Err(DepartmentRepositoryError::DuplicateName(
                department.name().to_owned(),
            ));
        }
        state
            .name_index
            .insert(department.name().to_owned(), department.id());
        state.departments.insert(department.id(), department.clone());
        Ok(())
    }

    async fn update(&self, department: &Department) -> DepartmentRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            DepartmentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let previous = state
            .departments
            .get(&department.id())
            .ok_or(DepartmentRepositoryError::NotFound(department.id()))?
            .clone();

        let name_taken = state
            .name_index
            .get(department.name())
            .is_some_and(|owner| *owner != department.id());
        if name_taken {
            return Err(DepartmentRepositoryError::DuplicateName(
                department.name().to_owned(),
            ));
        }

        state.name_index.remove(previous.name());
        state
            .name_index
            .insert(department.name().to_owned(), department.id());
        state.departments.insert(department.id(), department.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: DepartmentId,
    ) -> DepartmentRepositoryResult<Option<Department>> {
        let state = self.state.read().map_err(|err| {
            DepartmentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.departments.get(&id).cloned())
    }

    async fn list_all(&self) -> DepartmentRepositoryResult<Vec<Department>> {
        let state = self.state.read().map_err(|err| {
            DepartmentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut departments: Vec<Department> = state.departments.values().cloned().collect();
        departments.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(departments)
    }

    async fn delete(&self, id: DepartmentId) -> DepartmentRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            DepartmentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let removed = state
            .departments
            .remove(&id)
            .ok_or(DepartmentRepositoryError::NotFound(id))?;
        state.name_index.remove(removed.name());
        Ok(())
    }

    async fn clear_curator(&self, curator: UserId) -> DepartmentRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            DepartmentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        for department in state.departments.values_mut() {
            if department.curator() == Some(curator) {
                department.set_curator(None);
            }
        }
        Ok(())
    }
}

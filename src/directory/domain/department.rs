//! Department aggregate root.

use super::{DepartmentId, DirectoryDomainError, UserId};
use serde::{Deserialize, Serialize};

/// Department in the organisational hierarchy.
///
/// A department has a unique name and at most one curator at a time. The
/// curator reference is cleared when the curating user is removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    id: DepartmentId,
    name: String,
    curator: Option<UserId>,
}

/// Parameter object for reconstructing a persisted department.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedDepartmentData {
    /// Persisted identifier.
    pub id: DepartmentId,
    /// Persisted unique name.
    pub name: String,
    /// Persisted curator reference.
    pub curator: Option<UserId>,
}

impl Department {
    /// Creates a new department.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::EmptyName`] when the name is blank
    /// after trimming.
    pub fn new(
        name: impl Into<String>,
        curator: Option<UserId>,
    ) -> Result<Self, DirectoryDomainError> {
        let trimmed = validate_name(name.into())?;
        Ok(Self {
            id: DepartmentId::new(),
            name: trimmed,
            curator,
        })
    }

    /// Reconstructs a department from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedDepartmentData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            curator: data.curator,
        }
    }

    /// Returns the department identifier.
    #[must_use]
    pub const fn id(&self) -> DepartmentId {
        self.id
    }

    /// Returns the department name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the curator reference, if any.
    #[must_use]
    pub const fn curator(&self) -> Option<UserId> {
        self.curator
    }

    /// Renames the department.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::EmptyName`] when the new name is
    /// blank after trimming.
    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), DirectoryDomainError> {
        self.name = validate_name(name.into())?;
        Ok(())
    }

    /// Assigns or replaces the curator.
    pub const fn set_curator(&mut self, curator: Option<UserId>) {
        self.curator = curator;
    }
}

fn validate_name(name: String) -> Result<String, DirectoryDomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DirectoryDomainError::EmptyName("department name"));
    }
    Ok(trimmed.to_owned())
}

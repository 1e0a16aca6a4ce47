//! Task group (category) lookup entity.

use super::{GroupId, TaskDomainError};
use serde::{Deserialize, Serialize};

/// Category a task may be filed under.
///
/// Admin-managed lookup table; referenced, never owned, by tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    id: GroupId,
    name: String,
}

impl Group {
    /// Creates a new group.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyGroupName`] when the name is blank
    /// after trimming.
    pub fn new(name: impl Into<String>) -> Result<Self, TaskDomainError> {
        Ok(Self {
            id: GroupId::new(),
            name: validate_name(name.into())?,
        })
    }

    /// Reconstructs a group from persisted storage.
    #[must_use]
    pub const fn from_persisted(id: GroupId, name: String) -> Self {
        Self { id, name }
    }

    /// Returns the group identifier.
    #[must_use]
    pub const fn id(&self) -> GroupId {
        self.id
    }

    /// Returns the group name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the group.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyGroupName`] when the new name is
    /// blank after trimming.
    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), TaskDomainError> {
        self.name = validate_name(name.into())?;
        Ok(())
    }
}

fn validate_name(name: String) -> Result<String, TaskDomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(TaskDomainError::EmptyGroupName);
    }
    Ok(trimmed.to_owned())
}

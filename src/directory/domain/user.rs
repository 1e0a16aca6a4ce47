//! User aggregate root.

use super::{DepartmentId, DirectoryDomainError, EmailAddress, Role, UserId};
use serde::{Deserialize, Serialize};

/// Profile fields supplied when registering a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    /// Unique email address.
    pub email: EmailAddress,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Organisational role.
    pub role: Role,
    /// Department affiliation, if any.
    pub department: Option<DepartmentId>,
    /// External chat handle used by the notification channel.
    pub chat_handle: Option<String>,
    /// Administrator flag granting unrestricted access regardless of role.
    pub is_admin: bool,
}

/// User aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    email: EmailAddress,
    first_name: String,
    last_name: String,
    role: Role,
    department: Option<DepartmentId>,
    chat_handle: Option<String>,
    is_admin: bool,
}

/// Parameter object for reconstructing a persisted user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted identifier.
    pub id: UserId,
    /// Persisted email address.
    pub email: EmailAddress,
    /// Persisted given name.
    pub first_name: String,
    /// Persisted family name.
    pub last_name: String,
    /// Persisted role.
    pub role: Role,
    /// Persisted department affiliation.
    pub department: Option<DepartmentId>,
    /// Persisted chat handle.
    pub chat_handle: Option<String>,
    /// Persisted administrator flag.
    pub is_admin: bool,
}

impl User {
    /// Creates a new user from profile fields.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::EmptyName`] when a name field is
    /// blank after trimming.
    pub fn new(profile: UserProfile) -> Result<Self, DirectoryDomainError> {
        let first_name = non_blank(profile.first_name, "first name")?;
        let last_name = non_blank(profile.last_name, "last name")?;

        Ok(Self {
            id: UserId::new(),
            email: profile.email,
            first_name,
            last_name,
            role: profile.role,
            department: profile.department,
            chat_handle: profile.chat_handle,
            is_admin: profile.is_admin,
        })
    }

    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            email: data.email,
            first_name: data.first_name,
            last_name: data.last_name,
            role: data.role,
            department: data.department,
            chat_handle: data.chat_handle,
            is_admin: data.is_admin,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the given name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Returns the family name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Returns the organisational role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the department affiliation, if any.
    #[must_use]
    pub const fn department(&self) -> Option<DepartmentId> {
        self.department
    }

    /// Returns the chat handle, if any.
    #[must_use]
    pub fn chat_handle(&self) -> Option<&str> {
        self.chat_handle.as_deref()
    }

    /// Returns true when the account carries administrator rights, either
    /// through the administrator role or the explicit flag.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.is_admin || self.role.is_administrator()
    }

    /// Replaces mutable profile fields, keeping identity and email checks
    /// to the repository layer.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::EmptyName`] when a revised name field
    /// is blank after trimming.
    pub fn apply_profile(&mut self, profile: UserProfile) -> Result<(), DirectoryDomainError> {
        let first_name = non_blank(profile.first_name, "first name")?;
        let last_name = non_blank(profile.last_name, "last name")?;

        self.email = profile.email;
        self.first_name = first_name;
        self.last_name = last_name;
        self.role = profile.role;
        self.department = profile.department;
        self.chat_handle = profile.chat_handle;
        self.is_admin = profile.is_admin;
        Ok(())
    }

    /// Clears the department affiliation.
    pub const fn detach_department(&mut self) {
        self.department = None;
    }
}

fn non_blank(value: String, field: &'static str) -> Result<String, DirectoryDomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DirectoryDomainError::EmptyName(field));
    }
    Ok(trimmed.to_owned())
}

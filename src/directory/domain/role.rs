//! Closed role enumeration controlling visibility and delegation authority.

use super::ParseRoleError;
use serde::{Deserialize, Serialize};

/// Organisational role held by a user.
///
/// Exactly one role per user; the role decides which task-visibility and
/// redirection rules apply. Checks go through the predicates below rather
/// than string comparison so role literals exist in one place only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Director of the organisation.
    Director,
    /// Deputy director.
    DeputyDirector,
    /// Head of a department.
    HeadOfDepartment,
    /// Deputy head of a department.
    DeputyHeadOfDepartment,
    /// Rank-and-file department employee.
    Employee,
    /// Administrator with unrestricted access.
    Administrator,
}

impl Role {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Director => "director",
            Self::DeputyDirector => "deputy_director",
            Self::HeadOfDepartment => "head_of_department",
            Self::DeputyHeadOfDepartment => "deputy_head_of_department",
            Self::Employee => "employee",
            Self::Administrator => "administrator",
        }
    }

    /// Returns true for the director role.
    #[must_use]
    pub const fn is_director(self) -> bool {
        matches!(self, Self::Director)
    }

    /// Returns true for the deputy director role.
    #[must_use]
    pub const fn is_deputy_director(self) -> bool {
        matches!(self, Self::DeputyDirector)
    }

    /// Returns true for the head-of-department role.
    #[must_use]
    pub const fn is_head_of_department(self) -> bool {
        matches!(self, Self::HeadOfDepartment)
    }

    /// Returns true for the deputy head-of-department role.
    #[must_use]
    pub const fn is_deputy_head_of_department(self) -> bool {
        matches!(self, Self::DeputyHeadOfDepartment)
    }

    /// Returns true for the rank-and-file employee role.
    #[must_use]
    pub const fn is_employee(self) -> bool {
        matches!(self, Self::Employee)
    }

    /// Returns true for the administrator role.
    #[must_use]
    pub const fn is_administrator(self) -> bool {
        matches!(self, Self::Administrator)
    }

    /// Returns true when the role may create tasks and name executors.
    ///
    /// Every role except the rank-and-file employee carries delegation
    /// authority.
    #[must_use]
    pub const fn may_initiate_tasks(self) -> bool {
        !matches!(self, Self::Employee)
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "director" => Ok(Self::Director),
            "deputy_director" => Ok(Self::DeputyDirector),
            "head_of_department" => Ok(Self::HeadOfDepartment),
            "deputy_head_of_department" => Ok(Self::DeputyHeadOfDepartment),
            "employee" => Ok(Self::Employee),
            "administrator" => Ok(Self::Administrator),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

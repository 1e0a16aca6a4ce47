//! Request-scoped actor descriptor.
//!
//! Scoping decisions take the acting user as an explicit parameter rather
//! than ambient request state, so every policy function receives an
//! [`Actor`] built by the authentication collaborator.

use super::{DepartmentId, Role, User, UserId};

/// Identity, role, and affiliation of the authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    user_id: UserId,
    role: Role,
    department: Option<DepartmentId>,
    is_admin: bool,
}

impl Actor {
    /// Creates an actor descriptor from its parts.
    #[must_use]
    pub const fn new(
        user_id: UserId,
        role: Role,
        department: Option<DepartmentId>,
        is_admin: bool,
    ) -> Self {
        Self {
            user_id,
            role,
            department,
            is_admin,
        }
    }

    /// Builds an actor descriptor from a directory user.
    #[must_use]
    pub const fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id(),
            role: user.role(),
            department: user.department(),
            is_admin: user.is_admin(),
        }
    }

    /// Returns the acting user's identifier.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the acting user's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the acting user's department, if any.
    #[must_use]
    pub const fn department(&self) -> Option<DepartmentId> {
        self.department
    }

    /// Returns true when the actor bypasses all scoping, either through the
    /// administrator role or the account-level flag.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.is_admin || self.role.is_administrator()
    }

    /// Returns true for actors with unrestricted task access: administrators
    /// and the director.
    #[must_use]
    pub const fn is_privileged(&self) -> bool {
        self.is_admin() || self.role.is_director()
    }
}

/// Caller identity attached to an incoming request.
///
/// Anonymous callers are rejected before any scoping or ownership check
/// runs, keeping the unauthenticated failure distinct from not-found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caller {
    /// No authenticated identity.
    Anonymous,
    /// Authenticated actor descriptor.
    Authenticated(Actor),
}

impl Caller {
    /// Returns the actor for authenticated callers.
    #[must_use]
    pub const fn actor(&self) -> Option<&Actor> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(actor) => Some(actor),
        }
    }
}

impl From<Actor> for Caller {
    fn from(actor: Actor) -> Self {
        Self::Authenticated(actor)
    }
}

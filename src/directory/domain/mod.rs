//! Domain model for the organisational directory.
//!
//! The directory domain covers users with their closed role enumeration,
//! departments with an optional curator, and the actor descriptor carried
//! through every scoped operation.

mod actor;
mod department;
mod error;
mod ids;
mod role;
mod user;

pub use actor::{Actor, Caller};
pub use department::{Department, PersistedDepartmentData};
pub use error::{DirectoryDomainError, ParseRoleError};
pub use ids::{DepartmentId, EmailAddress, UserId};
pub use role::Role;
pub use user::{PersistedUserData, User, UserProfile};

//! Diesel row models for directory persistence.

use super::schema::{departments, users};
use diesel::prelude::*;

/// Query result row for user records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// User identifier.
    pub id: uuid::Uuid,
    /// Unique email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Canonical role string.
    pub role: String,
    /// Department affiliation.
    pub department_id: Option<uuid::Uuid>,
    /// Chat handle for notifications.
    pub chat_handle: Option<String>,
    /// Administrator flag.
    pub is_admin: bool,
}

/// Insert model for user records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    /// User identifier.
    pub id: uuid::Uuid,
    /// Unique email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Canonical role string.
    pub role: String,
    /// Department affiliation.
    pub department_id: Option<uuid::Uuid>,
    /// Chat handle for notifications.
    pub chat_handle: Option<String>,
    /// Administrator flag.
    pub is_admin: bool,
}

/// Query result row for department records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = departments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DepartmentRow {
    /// Department identifier.
    pub id: uuid::Uuid,
    /// Unique department name.
    pub name: String,
    /// Curating user.
    pub curator_id: Option<uuid::Uuid>,
}

/// Insert model for department records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = departments)]
pub struct NewDepartmentRow {
    /// Department identifier.
    pub id: uuid::Uuid,
    /// Unique department name.
    pub name: String,
    /// Curating user.
    pub curator_id: Option<uuid::Uuid>,
}

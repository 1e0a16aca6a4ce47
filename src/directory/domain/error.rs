//! Error types for directory domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing directory domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DirectoryDomainError {
    /// The email address is not a single `local@domain` pair.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// A name field is empty after trimming.
    #[error("{0} must not be empty")]
    EmptyName(&'static str),
}

/// Error returned while parsing roles from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

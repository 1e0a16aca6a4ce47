//! Port contracts for the organisational directory.
//!
//! Ports define infrastructure-agnostic interfaces used by directory
//! services.

pub mod repository;

pub use repository::{
    DepartmentRepository, DepartmentRepositoryError, DepartmentRepositoryResult, UserRepository,
    UserRepositoryError, UserRepositoryResult,
};

//! Port contracts for task assignment.
//!
//! Ports define infrastructure-agnostic interfaces used by assignment
//! services.

pub mod repository;

pub use repository::{
    DueFilter, GroupRepository, GroupRepositoryError, GroupRepositoryResult, TaskFilter,
    TaskRepository, TaskRepositoryError, TaskRepositoryResult,
};

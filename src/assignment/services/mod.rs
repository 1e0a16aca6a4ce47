//! Application services for task assignment.

mod board;
mod catalog;

pub use board::{
    DueKind, NewTaskRequest, RedirectRequest, TaskBoardError, TaskBoardResult, TaskBoardService,
    TaskQuery, TaskValidationError,
};
pub use catalog::{GroupCatalogError, GroupCatalogResult, GroupCatalogService};

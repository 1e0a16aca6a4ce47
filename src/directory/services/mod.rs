//! Application services for the organisational directory.

mod administration;

pub use administration::{DirectoryError, DirectoryResult, DirectoryService};

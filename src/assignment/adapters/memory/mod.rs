//! In-memory assignment adapters for tests.

mod group;
mod task;

pub use group::InMemoryGroupRepository;
pub use task::InMemoryTaskRepository;

//! In-memory directory adapters for tests.

mod department;
mod user;

pub use department::InMemoryDepartmentRepository;
pub use user::InMemoryUserRepository;

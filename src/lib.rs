//! Remit: departmental task and assignment tracking.
//!
//! Remit tracks tasks delegated across an organisational hierarchy: who
//! initiated them, who executes them, how urgent they are, and whether
//! they have been completed and closed. Access is scoped by role, so a
//! rank-and-file employee sees only the tasks they execute while the
//! director sees everything.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, Postgres)
//!
//! # Modules
//!
//! - [`directory`]: Users with their role enumeration, and departments
//! - [`assignment`]: The task aggregate, scoping policy, and lifecycle

pub mod assignment;
pub mod directory;

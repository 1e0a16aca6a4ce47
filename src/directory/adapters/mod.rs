//! Adapter implementations of directory ports.

pub mod memory;
pub mod postgres;

//! Adapter implementations of assignment ports.

pub mod memory;
pub mod postgres;

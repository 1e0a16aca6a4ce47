//! Task assignment: drafting, delegation scoping, lifecycle, and
//! redirection.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

//! Unit and service tests for task assignment.

mod scope_tests;
mod support;

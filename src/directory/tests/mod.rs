//! Unit and service tests for the organisational directory.

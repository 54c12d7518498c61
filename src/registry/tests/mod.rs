//! Unit tests for the agent registry.

mod store_tests;

//! Unit tests for agent invocation.

mod support;

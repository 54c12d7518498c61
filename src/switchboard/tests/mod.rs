//! Unit tests for the switchboard service.

//! Unit tests for the credential vault.

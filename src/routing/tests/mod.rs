//! Unit tests for tokenisation and agent selection.

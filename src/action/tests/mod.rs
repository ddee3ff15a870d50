//! Unit tests for the action module.

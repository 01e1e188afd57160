//! Unit tests for agentci
//!
//! These tests use mocked ports and run fast without external I/O.

mod mocks;
mod property_tests;

//! Domain layer — pure types and functions.
//!
//! No I/O, no async, no filesystem or network access. Everything in here
//! is testable without mocks.

pub mod connection;
pub mod descriptor;
pub mod error;
pub mod secrets;
pub mod status;

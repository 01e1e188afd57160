//! Application layer — port traits and lifecycle use-cases.

pub mod ports;
pub mod services;

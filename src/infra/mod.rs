//! Infrastructure layer — production implementations of the port traits.

pub mod api;
pub mod descriptor_store;
pub mod git;
pub mod notify;
pub mod settings;
pub mod tarball;

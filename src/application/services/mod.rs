//! Lifecycle use-cases, one free async function per operation.
//!
//! All I/O is routed through the port traits in
//! [`crate::application::ports`].

pub mod create;
pub mod deploy;
pub mod poller;
pub mod status;

use anyhow::Result;

use crate::application::ports::DescriptorStore;
use crate::domain::descriptor::AgentDescriptor;
use crate::domain::error::AgentError;

/// Load the descriptor and require a registered agent id.
///
/// # Errors
///
/// Returns [`AgentError::DescriptorNotFound`] when no descriptor file
/// exists, and [`AgentError::NotRegistered`] when the record carries no
/// agent id (a migrated legacy descriptor).
pub(crate) async fn load_registered(store: &impl DescriptorStore) -> Result<AgentDescriptor> {
    let dir = store.dir().display().to_string();
    let descriptor = store
        .load()
        .await?
        .ok_or(AgentError::DescriptorNotFound { dir: dir.clone() })?;
    if !descriptor.is_registered() {
        return Err(AgentError::NotRegistered { dir }.into());
    }
    Ok(descriptor)
}

//! agentci — CI orchestrator for cloud agent deployments.
//!
//! Drives a remote control plane through one lifecycle operation per
//! invocation: `create`, `deploy`, `status`, or `status-retry`. Inputs
//! arrive through environment variables; output is structured JSON log
//! lines and a deterministic exit code.

pub mod application;
pub mod cli;
pub mod domain;
pub mod infra;

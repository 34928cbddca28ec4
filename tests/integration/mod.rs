//! Integration tests for ggh
//!
//! These drive the public library API (branch lifecycle core, command
//! handlers and configuration loading) against the in-memory API, and the
//! HTTP client against a mock server.

pub mod branch_lifecycle;
pub mod config_loading;
pub mod github_client;
pub mod helpers;

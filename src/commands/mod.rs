//! Command handlers behind each `ggh` subcommand.
//!
//! Handlers print results to stdout and return `anyhow::Result` so `main` can
//! report failures uniformly.

pub mod branch;
pub mod display;
pub mod file;
pub mod pull_request;
pub mod repo;
pub mod webhook;

use crate::cancel::CancelToken;
use crate::config::Settings;

/// Shared state every handler receives.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub settings: &'a Settings,
    pub cancel: &'a CancelToken,
}

impl<'a> Context<'a> {
    pub fn new(settings: &'a Settings, cancel: &'a CancelToken) -> Self {
        Self { settings, cancel }
    }
}

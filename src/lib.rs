pub mod branch;
pub mod cancel;
pub mod commands;
pub mod completions;
pub mod config;
pub mod error;
pub mod github;
pub mod logging;
pub mod validation;

pub use error::{Error, Result};

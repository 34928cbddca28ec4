//! Runtime settings, resolved once at startup.
//!
//! Precedence: command-line flags, then environment (handled by clap's `env`
//! attributes), then the optional TOML file, then built-in defaults.

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::branch::PollPolicy;
use crate::error::{Error, Result};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Page size used when listing branches for deletion.
pub const DEFAULT_PER_PAGE: u32 = 100;

/// Page size requested by `branch-list`.
pub const DEFAULT_LIST_PER_PAGE: u32 = 500;

/// Upper bound on concurrent ref deletions.
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Optional on-disk configuration (`~/.config/ggh/config.toml`).
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub api_url: Option<String>,
    pub per_page: Option<u32>,
    pub list_per_page: Option<u32>,
    pub max_concurrency: Option<usize>,
    pub poll_interval_ms: Option<u64>,
    pub poll_timeout_secs: Option<u64>,
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub token: Option<String>,
    pub api_url: Option<String>,
    pub config_path: Option<PathBuf>,
    pub max_concurrency: Option<usize>,
}

/// Immutable configuration passed explicitly to every component.
#[derive(Clone)]
pub struct Settings {
    pub token: String,
    pub api_url: String,
    pub per_page: u32,
    pub list_per_page: u32,
    pub max_concurrency: usize,
    pub poll: PollPolicy,
}

impl Settings {
    /// Defaults with the given token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_url: DEFAULT_API_URL.to_string(),
            per_page: DEFAULT_PER_PAGE,
            list_per_page: DEFAULT_LIST_PER_PAGE,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            poll: PollPolicy::default(),
        }
    }

    /// Read the config file (explicit path or the default location) and merge.
    pub fn load(overrides: Overrides) -> Result<Self> {
        let file = match overrides.config_path.as_deref() {
            Some(path) => read_config_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => read_config_file(&path)?,
                _ => FileConfig::default(),
            },
        };
        Self::resolve(overrides, file)
    }

    /// Merge overrides over file values over defaults, then validate.
    pub fn resolve(overrides: Overrides, file: FileConfig) -> Result<Self> {
        let token = overrides
            .token
            .filter(|t| !t.trim().is_empty())
            .ok_or(Error::MissingToken)?;

        let mut settings = Self::with_token(token);
        if let Some(url) = overrides.api_url.or(file.api_url) {
            settings.api_url = url;
        }
        if let Some(n) = file.per_page {
            settings.per_page = n;
        }
        if let Some(n) = file.list_per_page {
            settings.list_per_page = n;
        }
        if let Some(n) = overrides.max_concurrency.or(file.max_concurrency) {
            settings.max_concurrency = n;
        }
        if let Some(ms) = file.poll_interval_ms {
            settings.poll.interval = Duration::from_millis(ms);
        }
        if let Some(secs) = file.poll_timeout_secs {
            settings.poll.timeout = Duration::from_secs(secs);
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.per_page == 0 || self.list_per_page == 0 {
            return Err(Error::InvalidConfig(
                "page sizes must be at least 1".to_string(),
            ));
        }
        if self.max_concurrency == 0 {
            return Err(Error::InvalidConfig(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        if self.poll.interval.is_zero() {
            return Err(Error::InvalidConfig(
                "poll_interval_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("per_page", &self.per_page)
            .field("list_per_page", &self.list_per_page)
            .field("max_concurrency", &self.max_concurrency)
            .field("poll", &self.poll)
            .finish()
    }
}

/// `$XDG_CONFIG_HOME/ggh/config.toml` (or the platform equivalent).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ggh").join("config.toml"))
}

pub fn read_config_file(path: &Path) -> Result<FileConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::InvalidConfig(format!("cannot read {}: {e}", path.display())))?;
    toml::from_str(&content)
        .map_err(|e| Error::InvalidConfig(format!("cannot parse {}: {e}", path.display())))
}

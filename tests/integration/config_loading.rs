//! Config file discovery through the platform config directory

use serial_test::serial;
use std::fs;
use tempfile::TempDir;

use ggh::config::{default_config_path, Overrides, Settings, DEFAULT_MAX_CONCURRENCY};

fn token_only() -> Overrides {
    Overrides {
        token: Some("t0ken".to_string()),
        ..Overrides::default()
    }
}

/// Runs `f` with `XDG_CONFIG_HOME` pointed at a fresh directory.
#[cfg(target_os = "linux")]
fn with_config_home<F: FnOnce(&std::path::Path)>(f: F) {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let previous = std::env::var_os("XDG_CONFIG_HOME");
    std::env::set_var("XDG_CONFIG_HOME", dir.path());

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| f(dir.path())));

    match previous {
        Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
        None => std::env::remove_var("XDG_CONFIG_HOME"),
    }
    if let Err(panic) = outcome {
        std::panic::resume_unwind(panic);
    }
}

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn test_default_config_file_is_picked_up() {
    with_config_home(|home| {
        let path = default_config_path().expect("config dir should resolve");
        assert_eq!(path, home.join("ggh").join("config.toml"));

        fs::create_dir_all(home.join("ggh")).unwrap();
        fs::write(&path, "max_concurrency = 3\nper_page = 30\n").unwrap();

        let settings = Settings::load(token_only()).unwrap();
        assert_eq!(settings.max_concurrency, 3);
        assert_eq!(settings.per_page, 30);
    });
}

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn test_absent_default_file_uses_defaults() {
    with_config_home(|_| {
        let settings = Settings::load(token_only()).unwrap();
        assert_eq!(settings.max_concurrency, DEFAULT_MAX_CONCURRENCY);
    });
}

#[test]
#[serial]
fn test_flag_override_beats_explicit_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ggh.toml");
    fs::write(&path, "max_concurrency = 16\napi_url = \"https://ghe.example.com/api/v3\"\n").unwrap();

    let overrides = Overrides {
        config_path: Some(path),
        max_concurrency: Some(2),
        ..token_only()
    };
    let settings = Settings::load(overrides).unwrap();
    assert_eq!(settings.max_concurrency, 2);
    assert_eq!(settings.api_url, "https://ghe.example.com/api/v3");
}

#[test]
fn test_malformed_file_is_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ggh.toml");
    fs::write(&path, "max_concurrency = \"many\"\n").unwrap();

    let overrides = Overrides {
        config_path: Some(path),
        ..token_only()
    };
    let err = Settings::load(overrides).unwrap_err();
    assert!(err.is_config());
}

//! Tests for configuration loading and root folder resolution
//!
//! Tests that touch MEETAI_ROOT_FOLDER or MEETAI_CONFIG are marked #[serial]
//! so they never race on the process environment.

use meetai_common::config::{
    resolve_root_folder, ConfigSource, TomlConfig, CONFIG_PATH_ENV, ROOT_FOLDER_ENV,
};
use serial_test::serial;
use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};

#[test]
#[serial]
fn test_cli_argument_wins() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/meetai-env");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/meetai-toml")),
        ..Default::default()
    };

    let resolved = resolve_root_folder(Some(Path::new("/tmp/meetai-cli")), &config);
    assert_eq!(resolved, PathBuf::from("/tmp/meetai-cli"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_env_var_beats_toml() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/meetai-env");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/meetai-toml")),
        ..Default::default()
    };

    assert_eq!(resolve_root_folder(None, &config), PathBuf::from("/tmp/meetai-env"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_toml_beats_default() {
    env::remove_var(ROOT_FOLDER_ENV);
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/meetai-toml")),
        ..Default::default()
    };

    assert_eq!(resolve_root_folder(None, &config), PathBuf::from("/tmp/meetai-toml"));
}

#[test]
#[serial]
fn test_default_root_folder_is_not_empty() {
    env::remove_var(ROOT_FOLDER_ENV);
    let resolved = resolve_root_folder(None, &TomlConfig::default());
    assert!(!resolved.as_os_str().is_empty());
    assert!(resolved.to_string_lossy().contains("meetai"));
}

#[test]
fn test_load_explicit_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[free_tier]\nmax_agents = 7\n").unwrap();

    let (config, source) = TomlConfig::load(Some(file.path())).unwrap();
    assert_eq!(config.free_tier.max_agents, 7);
    assert_eq!(config.free_tier.max_meetings, 3);
    assert_eq!(source, ConfigSource::File(file.path().to_path_buf()));
}

#[test]
#[serial]
fn test_missing_default_file_reports_defaults() {
    let dir = tempfile::TempDir::new().unwrap();
    env::set_var(CONFIG_PATH_ENV, dir.path().join("absent.toml"));

    let (config, source) = TomlConfig::load(None).unwrap();
    assert_eq!(source, ConfigSource::Defaults);
    assert_eq!(config.server.port, 5730);

    env::remove_var(CONFIG_PATH_ENV);
}

#[test]
#[serial]
fn test_default_path_from_env_is_loaded() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("meetai.toml");
    std::fs::write(&path, "[server]\nport = 8088\n").unwrap();
    env::set_var(CONFIG_PATH_ENV, &path);

    let (config, source) = TomlConfig::load(None).unwrap();
    assert_eq!(source, ConfigSource::File(path.clone()));
    assert_eq!(config.server.port, 8088);

    env::remove_var(CONFIG_PATH_ENV);
}

#[test]
fn test_load_missing_explicit_file_fails() {
    let result = TomlConfig::load(Some(Path::new("/nonexistent/meetai.toml")));
    assert!(result.is_err());
}

//! Unit tests for configuration and graceful degradation
//!
//! Tests:
//! - Missing TOML files do not cause failures
//! - Priority order for root folder resolution (CLI → ENV → TOML → default)
//! - TOML write-back used by the credential store
//!
//! Note: Uses serial_test to prevent ENV variable race conditions.
//! Tests that manipulate MSCOPE_ROOT_FOLDER or MSCOPE_CONFIG are marked with
//! #[serial] so they run sequentially.

use mscope_common::config::{
    config_file_path, load_toml_config, read_toml_config, write_toml_config, CompiledDefaults,
    LoggingConfig, RootFolderInitializer, RootFolderResolver, TomlConfig, CONFIG_PATH_ENV,
    ROOT_FOLDER_ENV,
};
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_compiled_defaults_for_current_platform() {
    let defaults = CompiledDefaults::for_current_platform();

    assert!(!defaults.root_folder.as_os_str().is_empty());
    assert!(defaults.root_folder.to_string_lossy().contains("mscope"));
    assert!(defaults.config_file.to_string_lossy().ends_with("toml"));
    assert_eq!(defaults.log_level, "info");
    assert_eq!(defaults.port, 3000);
}

#[test]
#[serial]
fn test_resolver_with_no_overrides_uses_default() {
    env::remove_var(ROOT_FOLDER_ENV);

    let root_folder = RootFolderResolver::new("test-module").resolve();

    let defaults = CompiledDefaults::for_current_platform();
    assert_eq!(root_folder, defaults.root_folder);
}

#[test]
#[serial]
fn test_resolver_env_beats_toml() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/mscope-test-env-folder");

    let toml = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/mscope-test-toml-folder")),
        ..Default::default()
    };
    let root_folder = RootFolderResolver::new("test-module").with_toml(&toml).resolve();

    assert_eq!(root_folder, PathBuf::from("/tmp/mscope-test-env-folder"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_resolver_cli_beats_env() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/mscope-test-env-folder");

    let root_folder = RootFolderResolver::new("test-module")
        .with_cli_arg(Some(PathBuf::from("/tmp/mscope-test-cli-folder")))
        .resolve();

    assert_eq!(root_folder, PathBuf::from("/tmp/mscope-test-cli-folder"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_resolver_toml_used_without_env() {
    env::remove_var(ROOT_FOLDER_ENV);

    let toml = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/mscope-test-toml-folder")),
        ..Default::default()
    };
    let root_folder = RootFolderResolver::new("test-module").with_toml(&toml).resolve();

    assert_eq!(root_folder, PathBuf::from("/tmp/mscope-test-toml-folder"));
}

#[test]
#[serial]
fn test_config_path_env_override() {
    env::set_var(CONFIG_PATH_ENV, "/tmp/mscope-test/custom.toml");
    assert_eq!(config_file_path(), PathBuf::from("/tmp/mscope-test/custom.toml"));

    env::remove_var(CONFIG_PATH_ENV);
    assert_ne!(config_file_path(), PathBuf::from("/tmp/mscope-test/custom.toml"));
}

#[test]
fn test_missing_toml_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let config = load_toml_config(&dir.path().join("absent.toml"));

    assert_eq!(config, TomlConfig::default());
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_invalid_toml_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "port = [this is not toml").unwrap();

    assert!(read_toml_config(&path).is_err());
    assert_eq!(load_toml_config(&path), TomlConfig::default());
}

#[test]
fn test_partial_toml_parses() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("partial.toml");
    std::fs::write(
        &path,
        "port = 8080\ngemini_api_key = \"AIzaFromToml\"\n\n[logging]\nlevel = \"debug\"\n",
    )
    .unwrap();

    let config = load_toml_config(&path);
    assert_eq!(config.port, Some(8080));
    assert_eq!(config.gemini_api_key.as_deref(), Some("AIzaFromToml"));
    assert_eq!(config.logging.level, "debug");
    assert!(config.root_folder.is_none());
}

#[test]
fn test_write_then_read_preserves_fields() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let config = TomlConfig {
        port: Some(3001),
        static_assets: Some(PathBuf::from("/srv/mscope/dist")),
        gemini_api_key: Some("AIzaWritten".to_string()),
        logging: LoggingConfig {
            level: "warn".to_string(),
        },
        ..Default::default()
    };

    write_toml_config(&config, &path).unwrap();

    assert!(path.exists());
    assert!(!path.with_extension("toml.tmp").exists());
    assert_eq!(read_toml_config(&path).unwrap(), config);
}

#[test]
fn test_root_folder_initializer_creates_directory() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("data").join("mscope");

    let initializer = RootFolderInitializer::new(root.clone());
    initializer.ensure_directory_exists().unwrap();

    assert!(root.is_dir());
    assert_eq!(initializer.database_path(), root.join("microscope.db"));
}

//! Edge case and error scenario tests

use std::fs;
use libris_config::{Config, ConfigError, ConfigManager};
use tempfile::TempDir;

fn setup_test_manager() -> Result<(TempDir, ConfigManager), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let manager = ConfigManager::with_directory(temp_dir.path().to_path_buf())?;
    Ok((temp_dir, manager))
}

#[test]
fn test_corrupted_config_is_parse_error() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;

    fs::write(manager.config_path(), "this is not valid TOML {{{")?;

    assert!(matches!(manager.load(), Err(ConfigError::Parse { .. })));
    assert!(matches!(manager.check(), Err(ConfigError::Parse { .. })));
    Ok(())
}

#[test]
fn test_wrong_type_is_parse_error() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;

    fs::write(
        manager.config_path(),
        "[library]\ndefault_quantity = \"three\"\n",
    )?;

    assert!(matches!(manager.load(), Err(ConfigError::Parse { .. })));
    Ok(())
}

#[test]
fn test_unknown_log_level_is_parse_error() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;

    fs::write(manager.config_path(), "[app]\nlog_level = \"loud\"\n")?;

    assert!(manager.load().is_err());
    Ok(())
}

#[test]
fn test_save_creates_parent_directories() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let nested_path = temp_dir.path().join("a").join("b").join("c");
    let manager = ConfigManager::with_directory(nested_path)?;

    manager.save(&Config::default())?;

    assert!(manager.config_path().exists());
    Ok(())
}

#[test]
fn test_invalid_quantity_in_file_is_refused() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;

    fs::write(
        manager.config_path(),
        "version = 1\n\n[library]\ndefault_quantity = 0\n",
    )?;

    let err = manager.load().unwrap_err();
    assert_eq!(err.problems().len(), 1);
    assert_eq!(err.problems()[0].field, "library.default_quantity");

    Ok(())
}

#[test]
fn test_failed_save_leaves_previous_file() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;

    let mut config = Config::default();
    config.library.default_quantity = 7;
    manager.save(&config)?;

    config.library.books_file = String::new();
    assert!(matches!(
        manager.save(&config),
        Err(ConfigError::Invalid { .. })
    ));

    let loaded = manager.load()?;
    assert_eq!(loaded.library.default_quantity, 7);
    assert_eq!(loaded.library.books_file, "books.txt");

    Ok(())
}

#[test]
fn test_data_dir_pointing_at_file_is_invalid() -> Result<(), Box<dyn std::error::Error>> {
    let (temp_dir, manager) = setup_test_manager()?;
    let file_path = temp_dir.path().join("not_a_dir");
    fs::write(&file_path, "x")?;

    let mut config = Config::default();
    config.app.data_dir = Some(file_path);

    let err = manager.save(&config).unwrap_err();
    assert_eq!(err.problems()[0].field, "app.data_dir");
    Ok(())
}

#[test]
fn test_newer_version_is_accepted() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;

    fs::write(manager.config_path(), "version = 99\n")?;

    let config = manager.load()?;
    assert_eq!(config.version, 99);
    assert_eq!(fs::read_to_string(manager.config_path())?, "version = 99\n");
    Ok(())
}

#[test]
fn test_concurrent_config_loads() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let config_dir = temp_dir.path().to_path_buf();
    let manager = ConfigManager::with_directory(config_dir.clone())?;
    manager.initialize()?;

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let dir = config_dir.clone();
            std::thread::spawn(move || {
                if let Ok(mgr) = ConfigManager::with_directory(dir) {
                    for _ in 0..10 {
                        let _ = mgr.load();
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().is_ok());
    }

    Ok(())
}

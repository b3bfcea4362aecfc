//! Locating, loading and saving the libris config

use crate::persistence::ConfigFile;
use crate::{Config, ConfigError, ConfigResult, FieldError, LogLevel};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.toml";

const ENV_DATA_DIR: &str = "LIBRIS_APP_DATA_DIR";
const ENV_LOG_LEVEL: &str = "LIBRIS_APP_LOG_LEVEL";
const ENV_DEFAULT_QUANTITY: &str = "LIBRIS_LIBRARY_DEFAULT_QUANTITY";

/// Entry point for everything that touches `config.toml`
pub struct ConfigManager {
    file: ConfigFile,
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Uses the platform config directory
    ///
    /// - Linux: `~/.config/libris/`
    /// - macOS: `~/Library/Application Support/libris/`
    /// - Windows: `%APPDATA%\libris\config\`
    pub fn new() -> ConfigResult<Self> {
        let config_dir = Self::project_dirs()?.config_dir().to_path_buf();
        Self::with_directory(config_dir)
    }

    pub fn with_directory(config_dir: PathBuf) -> ConfigResult<Self> {
        Ok(Self {
            file: ConfigFile::new(config_dir.join(CONFIG_FILE_NAME)),
            config_dir,
        })
    }

    fn project_dirs() -> ConfigResult<ProjectDirs> {
        ProjectDirs::from("", "", "libris").ok_or(ConfigError::NoHomeDirectory)
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_path(&self) -> &Path {
        self.file.path()
    }

    /// Resolves the directory the record files live in
    ///
    /// An explicit `app.data_dir` wins. Otherwise the platform data directory
    /// is used, falling back to the config directory when the platform has
    /// none.
    pub fn data_dir(&self, config: &Config) -> PathBuf {
        if let Some(ref dir) = config.app.data_dir {
            return dir.clone();
        }

        match Self::project_dirs() {
            Ok(dirs) => dirs.data_dir().to_path_buf(),
            Err(e) => {
                log::warn!("{}, storing records next to the config file", e);
                self.config_dir.clone()
            }
        }
    }

    /// Loads the file, refusing settings that fail validation
    pub fn load(&self) -> ConfigResult<Config> {
        self.file.load()
    }

    /// Loads the file and applies `LIBRIS_*` environment overrides
    ///
    /// The overridden settings are validated again.
    pub fn load_with_env_overrides(&self) -> ConfigResult<Config> {
        self.load_with(|key| std::env::var(key).ok())
    }

    fn load_with(&self, lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Config> {
        let mut config = self.load()?;
        apply_overrides(&mut config, lookup)?;

        config.validate().map_err(|problems| ConfigError::Invalid {
            origin: "LIBRIS_* environment overrides".to_string(),
            problems,
        })?;
        Ok(config)
    }

    /// Lists what is wrong with the file as written
    ///
    /// Unlike `load` this succeeds for a parseable file with bad values, so
    /// the problems can be shown to the user.
    pub fn check(&self) -> ConfigResult<Vec<FieldError>> {
        let config = self.file.read()?;
        Ok(config.validate().err().unwrap_or_default())
    }

    pub fn save(&self, config: &Config) -> ConfigResult<()> {
        self.file.save(config)
    }

    /// Writes a default config unless one exists; true if a file was created
    pub fn initialize(&self) -> ConfigResult<bool> {
        if self.config_path().exists() {
            log::info!("Config already exists at {}", self.config_path().display());
            return Ok(false);
        }

        self.save(&Config::default())?;
        Ok(true)
    }

    /// Overwrites the file with defaults, keeping the old one as a backup
    pub fn reset(&self) -> ConfigResult<()> {
        self.save(&Config::default())
    }

    pub fn backup_path(&self) -> PathBuf {
        self.file.backup_path()
    }
}

/// Applies `LIBRIS_*` overrides read through `lookup`
fn apply_overrides(
    config: &mut Config,
    lookup: impl Fn(&str) -> Option<String>,
) -> ConfigResult<()> {
    if let Some(dir) = lookup(ENV_DATA_DIR) {
        log::debug!("{} overrides app.data_dir", ENV_DATA_DIR);
        config.app.data_dir = Some(PathBuf::from(dir));
    }

    if let Some(level) = lookup(ENV_LOG_LEVEL) {
        config.app.log_level =
            level
                .parse::<LogLevel>()
                .map_err(|e| ConfigError::InvalidOverride {
                    variable: ENV_LOG_LEVEL.to_string(),
                    value: level.clone(),
                    reason: e.message,
                })?;
    }

    if let Some(quantity) = lookup(ENV_DEFAULT_QUANTITY) {
        config.library.default_quantity =
            quantity
                .trim()
                .parse::<u32>()
                .map_err(|e| ConfigError::InvalidOverride {
                    variable: ENV_DEFAULT_QUANTITY.to_string(),
                    value: quantity.clone(),
                    reason: e.to_string(),
                })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn setup_test_manager() -> (TempDir, ConfigManager) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let manager = ConfigManager::with_directory(temp_dir.path().to_path_buf())
            .expect("Failed to create manager");
        (temp_dir, manager)
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_initialize_once() {
        let (_temp_dir, manager) = setup_test_manager();

        assert!(manager.initialize().unwrap());
        assert!(manager.config_path().exists());
        assert!(!manager.initialize().unwrap());
    }

    #[test]
    fn test_reset_keeps_backup() {
        let (_temp_dir, manager) = setup_test_manager();
        let mut config = Config::default();
        config.library.default_quantity = 9;
        manager.save(&config).unwrap();

        manager.reset().unwrap();

        assert_eq!(manager.load().unwrap(), Config::default());
        let backup = fs::read_to_string(manager.backup_path()).unwrap();
        assert!(backup.contains("default_quantity = 9"));
    }

    #[test]
    fn test_check_reports_without_failing() {
        let (_temp_dir, manager) = setup_test_manager();
        assert!(manager.check().unwrap().is_empty());

        fs::write(manager.config_path(), "[library]\ndefault_quantity = 0\n").unwrap();
        let problems = manager.check().unwrap();
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].field, "library.default_quantity");
        assert!(manager.load().is_err());
    }

    #[test]
    fn test_data_dir_explicit() {
        let (temp_dir, manager) = setup_test_manager();
        let mut config = Config::default();
        config.app.data_dir = Some(temp_dir.path().join("records"));

        assert_eq!(manager.data_dir(&config), temp_dir.path().join("records"));
    }

    #[test]
    fn test_overrides_applied() {
        let (_temp_dir, manager) = setup_test_manager();
        let config = manager
            .load_with(env(&[
                (ENV_DATA_DIR, "/srv/libris"),
                (ENV_LOG_LEVEL, "debug"),
                (ENV_DEFAULT_QUANTITY, "5"),
            ]))
            .unwrap();

        assert_eq!(config.app.data_dir, Some(PathBuf::from("/srv/libris")));
        assert_eq!(config.app.log_level, LogLevel::Debug);
        assert_eq!(config.library.default_quantity, 5);
    }

    #[test]
    fn test_unparseable_override_rejected() {
        let (_temp_dir, manager) = setup_test_manager();

        let result = manager.load_with(env(&[(ENV_DEFAULT_QUANTITY, "lots")]));
        assert!(matches!(result, Err(ConfigError::InvalidOverride { .. })));

        let result = manager.load_with(env(&[(ENV_LOG_LEVEL, "shout")]));
        assert!(matches!(result, Err(ConfigError::InvalidOverride { .. })));
    }

    #[test]
    fn test_out_of_range_override_rejected() {
        let (_temp_dir, manager) = setup_test_manager();

        let err = manager
            .load_with(env(&[(ENV_DEFAULT_QUANTITY, "0")]))
            .unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { .. }));
        assert_eq!(err.problems()[0].field, "library.default_quantity");
    }

    #[test]
    fn test_no_overrides_leaves_config() {
        let (_temp_dir, manager) = setup_test_manager();
        assert_eq!(manager.load_with(env(&[])).unwrap(), Config::default());
    }

    #[test]
    fn test_config_file_path() {
        let (temp_dir, manager) = setup_test_manager();
        assert_eq!(manager.config_path(), temp_dir.path().join("config.toml"));
        assert_eq!(manager.config_dir(), temp_dir.path());
    }
}

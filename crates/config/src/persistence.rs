//! Reading and writing `config.toml`
//!
//! A missing file means defaults. Anything else must parse, and `load` only
//! hands out settings that pass validation.

use crate::{Config, ConfigError, ConfigResult, CONFIG_VERSION};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// The config file on disk
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where the previous version is kept on every overwrite
    pub fn backup_path(&self) -> PathBuf {
        self.path.with_extension("toml.backup")
    }

    /// Parses the file without judging its values
    pub fn read(&self) -> ConfigResult<Config> {
        self.parse().map(|(config, _)| config)
    }

    /// Reads and validates the file
    ///
    /// A file written by an older version is rewritten at the current
    /// version, but only once it is known to be valid.
    pub fn load(&self) -> ConfigResult<Config> {
        let (config, upgraded) = self.parse()?;

        config.validate().map_err(|problems| ConfigError::Invalid {
            origin: self.path.display().to_string(),
            problems,
        })?;

        if upgraded {
            self.save(&config)?;
        }
        Ok(config)
    }

    /// Returns the parsed config and whether its version was raised
    fn parse(&self) -> ConfigResult<(Config, bool)> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No config at {}, using defaults", self.path.display());
                return Ok((Config::default(), false));
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if contents.trim().is_empty() {
            return Err(ConfigError::Read {
                path: self.path.clone(),
                source: io::Error::new(io::ErrorKind::InvalidData, "file is empty"),
            });
        }

        let mut config: Config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })?;

        if config.version > CONFIG_VERSION {
            log::warn!(
                "{} was written by a newer libris (version {}), reading it as version {}",
                self.path.display(),
                config.version,
                CONFIG_VERSION
            );
            return Ok((config, false));
        }

        let upgraded = config.version < CONFIG_VERSION;
        if upgraded {
            log::info!(
                "Upgrading {} from version {} to {}",
                self.path.display(),
                config.version,
                CONFIG_VERSION
            );
            config.version = CONFIG_VERSION;
        }
        Ok((config, upgraded))
    }

    /// Validates and writes `config`, keeping the previous file as a backup
    pub fn save(&self, config: &Config) -> ConfigResult<()> {
        config.validate().map_err(|problems| ConfigError::Invalid {
            origin: "the settings being saved".to_string(),
            problems,
        })?;

        let contents = toml::to_string_pretty(config)?;
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));

        fs::create_dir_all(dir).map_err(|source| ConfigError::Write {
            path: dir.to_path_buf(),
            source,
        })?;

        if self.path.exists() {
            let backup_path = self.backup_path();
            fs::copy(&self.path, &backup_path).map_err(|source| ConfigError::Write {
                path: backup_path.clone(),
                source,
            })?;
            log::debug!("Kept previous config as {}", backup_path.display());
        }

        self.write_atomic(dir, &contents)?;
        log::info!("Config saved to {}", self.path.display());
        Ok(())
    }

    fn write_atomic(&self, dir: &Path, contents: &str) -> ConfigResult<()> {
        let write_error = |source: io::Error| ConfigError::Write {
            path: self.path.clone(),
            source,
        };

        let mut temp_file = NamedTempFile::new_in(dir).map_err(write_error)?;
        temp_file.write_all(contents.as_bytes()).map_err(write_error)?;
        temp_file.flush().map_err(write_error)?;
        temp_file
            .persist(&self.path)
            .map_err(|e| write_error(e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldError;
    use tempfile::TempDir;

    fn setup() -> (TempDir, ConfigFile) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file = ConfigFile::new(temp_dir.path().join("config.toml"));
        (temp_dir, file)
    }

    #[test]
    fn test_missing_file_is_default() {
        let (_temp_dir, file) = setup();
        assert_eq!(file.load().unwrap(), Config::default());
        assert!(!file.path().exists());
    }

    #[test]
    fn test_save_then_load() {
        let (_temp_dir, file) = setup();
        let mut config = Config::default();
        config.library.books_file = "catalog.txt".to_string();

        file.save(&config).unwrap();
        assert_eq!(file.load().unwrap().library.books_file, "catalog.txt");
    }

    #[test]
    fn test_save_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file = ConfigFile::new(temp_dir.path().join("nested").join("config.toml"));

        file.save(&Config::default()).unwrap();
        assert!(file.path().exists());
    }

    #[test]
    fn test_backup_holds_previous_version() {
        let (_temp_dir, file) = setup();
        let mut config = Config::default();
        file.save(&config).unwrap();
        config.library.default_quantity = 2;
        file.save(&config).unwrap();

        let backup = fs::read_to_string(file.backup_path()).unwrap();
        assert!(backup.contains("default_quantity = 1"));
    }

    #[test]
    fn test_unparseable_file() {
        let (_temp_dir, file) = setup();
        fs::write(file.path(), "this is not valid TOML {{{").unwrap();
        assert!(matches!(file.load(), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_empty_file() {
        let (_temp_dir, file) = setup();
        fs::write(file.path(), "   \n").unwrap();
        assert!(matches!(file.load(), Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_shared_record_file_refused_on_load() {
        let (_temp_dir, file) = setup();
        fs::write(
            file.path(),
            "[library]\nbooks_file = \"catalog.txt\"\nusers_file = \"catalog.txt\"\n",
        )
        .unwrap();

        let err = file.load().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
        assert_eq!(err.problems()[0].field, "library.users_file");

        // The raw settings stay readable for diagnostics
        assert_eq!(file.read().unwrap().library.users_file, "catalog.txt");
    }

    #[test]
    fn test_old_version_rewritten_once_valid() {
        let (_temp_dir, file) = setup();
        fs::write(file.path(), "version = 0\n").unwrap();

        assert_eq!(file.load().unwrap().version, CONFIG_VERSION);
        let rewritten = fs::read_to_string(file.path()).unwrap();
        assert!(rewritten.contains(&format!("version = {}", CONFIG_VERSION)));
    }

    #[test]
    fn test_invalid_old_version_left_untouched() {
        let (_temp_dir, file) = setup();
        let original = "version = 0\n\n[library]\ndefault_quantity = 0\n";
        fs::write(file.path(), original).unwrap();

        assert!(file.load().is_err());
        assert_eq!(fs::read_to_string(file.path()).unwrap(), original);
    }

    #[test]
    fn test_save_refuses_invalid() {
        let (_temp_dir, file) = setup();
        let mut config = Config::default();
        config.library.default_quantity = 0;

        let err = file.save(&config).unwrap_err();
        assert_eq!(
            err.problems(),
            [FieldError::new("library.default_quantity", "must be between 1 and 10000")
                .with_value(0)]
        );
        assert!(!file.path().exists());
    }
}

//! Configuration management for `dayflags`.
//!
//! Configuration sources and precedence (highest wins):
//! 1. CLI overrides
//! 2. Environment variables (`DAYFLAGS_DB`, `DAYFLAGS_DIR`)
//! 3. Config file (`<data dir>/dayflags.yaml`, or `--config`)
//! 4. Defaults

use crate::backup::BackupSignal;
use crate::error::{DayFlagError, Result};
use crate::notify::ChangeNotifier;
use crate::storage::{DayFlagStore, StoreOptions};
use crate::uri::ResourceUri;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Default database filename.
pub const DEFAULT_DB_FILENAME: &str = "alarm.db";
/// Config filename looked up in the data directory.
pub const CONFIG_FILENAME: &str = "dayflags.yaml";
/// Data directory used when neither `DAYFLAGS_DIR` nor `--db` point elsewhere.
pub const DEFAULT_DIR_NAME: &str = ".dayflags";

const MAX_READ_POOL_SIZE: usize = 16;

/// Values read from the YAML config file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct FileConfig {
    pub database: Option<String>,
    pub authority: Option<String>,
    pub busy_timeout_ms: Option<u64>,
    pub read_pool_size: Option<usize>,
}

impl FileConfig {
    /// Load a config file. Missing or empty files return empty config.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(&contents)?;
        debug!(path = %path.display(), ?config, "Loaded config file");
        Ok(config)
    }
}

/// Environment overrides, captured once so resolution stays testable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub db: Option<PathBuf>,
    pub dir: Option<PathBuf>,
}

impl EnvOverrides {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            db: non_empty_var("DAYFLAGS_DB").map(PathBuf::from),
            dir: non_empty_var("DAYFLAGS_DIR").map(PathBuf::from),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// CLI overrides for config loading (optional).
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub db: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// Fully resolved settings for opening a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub options: StoreOptions,
}

impl ResolvedConfig {
    /// Open the store these settings describe.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open_store(
        &self,
        notifier: Arc<ChangeNotifier>,
        backup: Arc<dyn BackupSignal>,
    ) -> Result<DayFlagStore> {
        DayFlagStore::open(&self.db_path, &self.options, notifier, backup)
    }
}

/// Load configuration from all sources.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or holds invalid values.
pub fn load_config(cli: &CliOverrides) -> Result<ResolvedConfig> {
    let cwd = env::current_dir()?;
    resolve_config(cli, &EnvOverrides::from_env(), &cwd)
}

/// Resolve configuration against explicit environment values and a base directory.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or holds invalid values.
pub fn resolve_config(cli: &CliOverrides, env: &EnvOverrides, cwd: &Path) -> Result<ResolvedConfig> {
    let data_dir = env
        .dir
        .clone()
        .unwrap_or_else(|| cwd.join(DEFAULT_DIR_NAME));

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| data_dir.join(CONFIG_FILENAME));
    let file = FileConfig::load(&config_path)?;

    let db_path = cli
        .db
        .clone()
        .or_else(|| env.db.clone())
        .unwrap_or_else(|| {
            let candidate = PathBuf::from(
                file.database
                    .as_deref()
                    .filter(|name| !name.trim().is_empty())
                    .unwrap_or(DEFAULT_DB_FILENAME),
            );
            if candidate.is_absolute() {
                candidate
            } else {
                data_dir.join(candidate)
            }
        });

    let defaults = StoreOptions::default();
    let options = StoreOptions {
        authority: file.authority.clone().unwrap_or(defaults.authority),
        busy_timeout_ms: file.busy_timeout_ms.unwrap_or(defaults.busy_timeout_ms),
        read_pool_size: file.read_pool_size.unwrap_or(defaults.read_pool_size),
    };
    validate_options(&options)?;

    Ok(ResolvedConfig {
        data_dir,
        db_path,
        options,
    })
}

fn validate_options(options: &StoreOptions) -> Result<()> {
    let root = ResourceUri::parse(&format!("content://{}", options.authority))
        .map_err(|err| DayFlagError::Config(format!("authority: {err}")))?;
    if !root.segments().is_empty() {
        return Err(DayFlagError::Config(format!(
            "authority '{}' must not contain '/'",
            options.authority
        )));
    }
    if options.read_pool_size > MAX_READ_POOL_SIZE {
        return Err(DayFlagError::Config(format!(
            "read-pool-size {} exceeds {MAX_READ_POOL_SIZE}",
            options.read_pool_size
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_when_nothing_is_configured() {
        let temp = TempDir::new().expect("tempdir");
        let resolved =
            resolve_config(&CliOverrides::default(), &EnvOverrides::default(), temp.path())
                .expect("config");

        let data_dir = temp.path().join(DEFAULT_DIR_NAME);
        assert_eq!(resolved.data_dir, data_dir);
        assert_eq!(resolved.db_path, data_dir.join(DEFAULT_DB_FILENAME));
        assert_eq!(resolved.options, StoreOptions::default());
    }

    #[test]
    fn config_file_values_apply() {
        let temp = TempDir::new().expect("tempdir");
        let data_dir = temp.path().join(DEFAULT_DIR_NAME);
        fs::create_dir_all(&data_dir).expect("create data dir");
        fs::write(
            data_dir.join(CONFIG_FILENAME),
            "database: flags.db\nauthority: com.example.alarm\nbusy-timeout-ms: 250\nread-pool-size: 0\n",
        )
        .expect("write config");

        let resolved =
            resolve_config(&CliOverrides::default(), &EnvOverrides::default(), temp.path())
                .expect("config");
        assert_eq!(resolved.db_path, data_dir.join("flags.db"));
        assert_eq!(resolved.options.authority, "com.example.alarm");
        assert_eq!(resolved.options.busy_timeout_ms, 250);
        assert_eq!(resolved.options.read_pool_size, 0);
    }

    #[test]
    fn merge_precedence_order() {
        let temp = TempDir::new().expect("tempdir");
        let env_dir = temp.path().join("env-dir");
        fs::create_dir_all(&env_dir).expect("create env dir");
        fs::write(env_dir.join(CONFIG_FILENAME), "database: from-file.db\n")
            .expect("write config");

        let mut env = EnvOverrides {
            db: None,
            dir: Some(env_dir.clone()),
        };
        let resolved = resolve_config(&CliOverrides::default(), &env, temp.path()).unwrap();
        assert_eq!(resolved.db_path, env_dir.join("from-file.db"));

        env.db = Some(temp.path().join("from-env.db"));
        let resolved = resolve_config(&CliOverrides::default(), &env, temp.path()).unwrap();
        assert_eq!(resolved.db_path, temp.path().join("from-env.db"));

        let cli = CliOverrides {
            db: Some(temp.path().join("from-cli.db")),
            config: None,
        };
        let resolved = resolve_config(&cli, &env, temp.path()).unwrap();
        assert_eq!(resolved.db_path, temp.path().join("from-cli.db"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("custom.yaml");

        fs::write(&path, "authority: a/b\n").unwrap();
        let cli = CliOverrides {
            db: None,
            config: Some(path.clone()),
        };
        assert!(matches!(
            resolve_config(&cli, &EnvOverrides::default(), temp.path()),
            Err(DayFlagError::Config(_))
        ));

        fs::write(&path, "read-pool-size: 99\n").unwrap();
        assert!(matches!(
            resolve_config(&cli, &EnvOverrides::default(), temp.path()),
            Err(DayFlagError::Config(_))
        ));

        fs::write(&path, "colour: blue\n").unwrap();
        assert!(matches!(
            resolve_config(&cli, &EnvOverrides::default(), temp.path()),
            Err(DayFlagError::Yaml(_))
        ));
    }

    #[test]
    fn empty_config_file_is_default() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join(CONFIG_FILENAME);
        fs::write(&path, "\n").unwrap();
        assert_eq!(FileConfig::load(&path).unwrap(), FileConfig::default());
    }
}

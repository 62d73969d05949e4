use crate::core::path::{RemotePath, DEFAULT_ROOT};
use crate::error::{AdbxError, Result};
use log::{debug, warn};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = ".adbxconfig";
const DEFAULT_ADB: &str = "adb";
const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 30;

/// Environment variable naming the adb executable
pub const ADB_PATH_ENV: &str = "ADB_PATH";

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    pub adb_path: Option<String>,
    pub root: Option<String>,
    pub device: Option<String>,
    pub command_timeout_secs: Option<u64>,
    pub transfer_timeout_secs: Option<u64>,
    #[serde(default)]
    pub alias: HashMap<String, String>,
}

impl Config {
    pub fn load() -> Self {
        match Config::get_config_path() {
            Some(path) => Config::load_from_path(&path),
            None => {
                debug!("No home directory, using default config");
                Config::default()
            }
        }
    }

    pub fn load_from_path(config_path: &Path) -> Self {
        debug!("Loading config from: {:?}", config_path);

        if let Ok(content) = fs::read_to_string(config_path) {
            match toml::from_str(&content) {
                Ok(config) => {
                    debug!("Parsed config: {:?}", config);
                    config
                }
                Err(e) => {
                    warn!("Error parsing config file {}: {}", config_path.display(), e);
                    Config::default()
                }
            }
        } else {
            debug!("No config file found or unable to read it");
            Config::default()
        }
    }

    pub fn get_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_FILE))
    }
}

/// Values given on the command line, which win over everything else
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub adb_path: Option<String>,
    pub root: Option<String>,
    pub device: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Effective settings after merging flags, environment, config and defaults
#[derive(Debug, Clone)]
pub struct Settings {
    pub adb_path: PathBuf,
    pub root: RemotePath,
    pub device: Option<String>,
    pub command_timeout: Duration,
    pub transfer_timeout: Option<Duration>,
    pub alias: HashMap<String, String>,
}

impl Settings {
    pub fn resolve(config: &Config, overrides: &Overrides) -> Result<Self> {
        Self::resolve_with_env(config, overrides, std::env::var(ADB_PATH_ENV).ok())
    }

    /// Merge with an explicit `ADB_PATH` value.
    ///
    /// Precedence for the adb path: flag, environment, config file, `adb`.
    pub fn resolve_with_env(
        config: &Config,
        overrides: &Overrides,
        env_adb: Option<String>,
    ) -> Result<Self> {
        let raw_adb = overrides
            .adb_path
            .clone()
            .or_else(|| env_adb.filter(|s| !s.trim().is_empty()))
            .or_else(|| config.adb_path.clone())
            .unwrap_or_else(|| DEFAULT_ADB.to_string());
        let adb_path = PathBuf::from(shellexpand::tilde(&raw_adb).into_owned());

        let raw_root = overrides
            .root
            .as_deref()
            .or(config.root.as_deref())
            .unwrap_or(DEFAULT_ROOT);
        let root = RemotePath::new(raw_root)
            .map_err(|_| AdbxError::Config(format!("root must be an absolute path: {}", raw_root)))?;

        let command_secs = overrides
            .timeout_secs
            .or(config.command_timeout_secs)
            .unwrap_or(DEFAULT_COMMAND_TIMEOUT_SECS);
        if command_secs == 0 {
            return Err(AdbxError::Config("timeout must be at least one second".to_string()));
        }

        let settings = Self {
            adb_path,
            root,
            device: overrides.device.clone().or_else(|| config.device.clone()),
            command_timeout: Duration::from_secs(command_secs),
            transfer_timeout: config
                .transfer_timeout_secs
                .filter(|s| *s > 0)
                .map(Duration::from_secs),
            alias: config.alias.clone(),
        };
        debug!("Effective settings: {:?}", settings);
        Ok(settings)
    }

    pub fn resolve_alias(&self, command: &str) -> String {
        debug!("Resolving alias for: {}", command);
        self.alias
            .get(command)
            .cloned()
            .unwrap_or_else(|| command.to_string())
    }
}

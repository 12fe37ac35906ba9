use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".branch-inventory";
/// CSV file name stored inside the application data directory.
const DATA_FILE_NAME: &str = "inventory.csv";
/// Log file written next to the data file.
const LOG_FILE_NAME: &str = "branch-inventory.log";
/// Environment variable that overrides the data file location.
pub const DATA_FILE_ENV: &str = "INVENTORY_FILE";

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Where the inventory CSV lives. Still resolved in memory-only mode so
    /// exports have a directory to land in.
    pub data_file: PathBuf,
    /// When false nothing is read from or written to `data_file`.
    pub persist: bool,
}

impl AppConfig {
    /// Resolve settings from an explicit path, then `INVENTORY_FILE`, then
    /// the default location under the user's home.
    pub fn resolve(file_flag: Option<PathBuf>, memory_only: bool) -> Result<Self> {
        let env_override = env::var_os(DATA_FILE_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        let data_file = match file_flag.or(env_override) {
            Some(path) => path,
            None => default_data_file()?,
        };
        Ok(Self {
            data_file,
            persist: !memory_only,
        })
    }

    /// Directory holding the data file; exports and logs go here too.
    pub fn data_dir(&self) -> &Path {
        self.data_file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }

    pub fn log_file(&self) -> PathBuf {
        self.data_dir().join(LOG_FILE_NAME)
    }

    pub fn export_file(&self) -> PathBuf {
        self.data_dir().join(crate::storage::EXPORT_FILE_NAME)
    }
}

/// Resolve the absolute path to the CSV file inside the user's home.
fn default_data_file() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DATA_FILE_NAME))
}

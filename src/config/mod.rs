use crate::errors::{AppError, AppResult};
use crate::sheets::http::DEFAULT_API_BASE_URL;
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub spreadsheet_id: String,
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default = "default_state_db")]
    pub state_db: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
}

fn default_sheet_name() -> String {
    "Sheet1".to_string()
}
fn default_state_db() -> String {
    Config::state_db_file().to_string_lossy().to_string()
}
fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}
fn default_max_retries() -> u32 {
    2
}
fn default_retry_base_delay_ms() -> u64 {
    250
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            sheet_name: default_sheet_name(),
            api_key: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            state_db: default_state_db(),
            api_base_url: default_api_base_url(),
            max_retries: default_max_retries(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rsheetcrud")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".rsheetcrud")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rsheetcrud.conf")
    }

    /// Return the default path of the state database (token + journal)
    pub fn state_db_file() -> PathBuf {
        Self::config_dir().join("rsheetcrud.sqlite")
    }

    /// Load configuration from file (or defaults if not found),
    /// then apply environment overrides.
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        let mut cfg = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|_| AppError::ConfigLoad)?;
            serde_yaml::from_str(&content)
                .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?
        } else {
            Config::default()
        };

        cfg.apply_env(|name| env::var(name).ok());
        cfg.state_db = expand_tilde(&cfg.state_db).to_string_lossy().to_string();
        Ok(cfg)
    }

    /// Override file values with `RSHEETCRUD_*` variables that are set and non-empty.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let overrides: [(&str, &mut String); 5] = [
            ("RSHEETCRUD_SPREADSHEET_ID", &mut self.spreadsheet_id),
            ("RSHEETCRUD_SHEET_NAME", &mut self.sheet_name),
            ("RSHEETCRUD_API_KEY", &mut self.api_key),
            ("RSHEETCRUD_CLIENT_ID", &mut self.client_id),
            ("RSHEETCRUD_CLIENT_SECRET", &mut self.client_secret),
        ];
        for (name, slot) in overrides {
            if let Some(value) = lookup(name).filter(|v| !v.trim().is_empty()) {
                *slot = value;
            }
        }
    }

    /// Remote operations need to know which spreadsheet to talk to.
    pub fn require_spreadsheet(&self) -> AppResult<()> {
        if self.spreadsheet_id.trim().is_empty() {
            return Err(AppError::Config(
                "spreadsheet_id is not set (edit the config file or set RSHEETCRUD_SPREADSHEET_ID)"
                    .to_string(),
            ));
        }
        if self.sheet_name.trim().is_empty() {
            return Err(AppError::Config("sheet_name is empty".to_string()));
        }
        Ok(())
    }

    /// Write the configuration file unless in test mode. An existing file is kept.
    pub fn init_all(&self, is_test: bool) -> AppResult<()> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        if !is_test {
            let path = Self::config_file();
            if path.exists() {
                println!("ℹ️ Config file already exists, left untouched: {:?}", path);
            } else {
                let yaml = serde_yaml::to_string(self).map_err(|_| AppError::ConfigSave)?;
                let mut file = fs::File::create(&path)?;
                file.write_all(yaml.as_bytes())?;
                println!("✅ Config file: {:?}", path);
            }
        }

        println!("✅ State DB:    {:?}", self.state_db);
        Ok(())
    }
}

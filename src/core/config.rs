use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Persisted preferences. Every field is optional; CLI flags override
/// config values, which override built-in defaults.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Config {
    /// UI theme id (e.g. "nebula", "mono")
    pub theme: Option<String>,
    /// Gemini model id (e.g. "gemini-2.5-flash")
    pub model: Option<String>,
    /// API base URL override, for proxies
    pub base_url: Option<String>,
}

impl Config {
    pub fn load() -> Result<Config, Box<dyn std::error::Error>> {
        let config_path = Self::get_config_path();
        Self::load_from_path(&config_path)
    }

    pub fn load_from_path(config_path: &PathBuf) -> Result<Config, Box<dyn std::error::Error>> {
        if config_path.exists() {
            let contents = fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save_to_path(&self, config_path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    fn get_config_path() -> PathBuf {
        let proj_dirs =
            ProjectDirs::from("org", "banter", "banter").expect("Failed to determine config directory");
        proj_dirs.config_dir().join("config.toml")
    }
}

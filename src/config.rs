//! User configuration at `~/.omniscope/config.json`.
//!
//! Every field has a default, so a missing or partial file still yields a
//! usable `Config`.

use std::fs;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Backend origin, e.g. `https://crm.example.com`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    /// Bearer token sent with every request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    /// IANA timezone used to decide which day/week a timestamp belongs to.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// How many entries the top-N rollup lists keep.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Overrides `~/.omniscope/omniscope.db`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<String>,
    /// Request timeout for the remote client.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_top_n() -> usize {
    5
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: None,
            api_token: None,
            timezone: default_timezone(),
            top_n: default_top_n(),
            db_path: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Config {
    /// Parsed timezone; unknown names fall back to UTC.
    pub fn tz(&self) -> Tz {
        match self.timezone.parse::<Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                log::warn!("Unknown timezone '{}'; using UTC", self.timezone);
                Tz::UTC
            }
        }
    }

    pub fn db_path(&self) -> Option<PathBuf> {
        self.db_path.as_deref().map(PathBuf::from)
    }
}

/// Get the canonical config file path (~/.omniscope/config.json)
pub fn config_path() -> Result<PathBuf, String> {
    let home = dirs::home_dir().ok_or("Could not find home directory")?;
    Ok(home.join(".omniscope").join("config.json"))
}

/// Load configuration from ~/.omniscope/config.json
pub fn load_config() -> Result<Config, String> {
    load_config_from(&config_path()?)
}

/// Load configuration from an explicit path. A missing file yields defaults.
pub fn load_config_from(path: &Path) -> Result<Config, String> {
    if !path.exists() {
        log::info!("No config at {}; using defaults", path.display());
        return Ok(Config::default());
    }

    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read config: {}", e))?;

    serde_json::from_str(&content).map_err(|e| format!("Failed to parse config: {}", e))
}

/// Load `path`, apply the mutator, and write the result back.
///
/// Creates the file (and its directory) on first use.
pub fn create_or_update_config(
    path: &Path,
    mutator: impl FnOnce(&mut Config),
) -> Result<Config, String> {
    let mut config = load_config_from(path)?;
    mutator(&mut config);

    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config dir: {}", e))?;
        }
    }

    let content = serde_json::to_string_pretty(&config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;
    fs::write(path, content).map_err(|e| format!("Failed to write config: {}", e))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.top_n, 5);
        assert_eq!(config.tz(), Tz::UTC);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"apiBaseUrl": "https://crm.example.com", "timezone": "Europe/London"}"#)
            .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.api_base_url.as_deref(), Some("https://crm.example.com"));
        assert_eq!(config.tz(), chrono_tz::Europe::London);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{").unwrap();
        assert!(load_config_from(&path).unwrap_err().contains("Failed to parse config"));
    }

    #[test]
    fn test_unknown_timezone_falls_back_to_utc() {
        let config = Config {
            timezone: "Mars/Olympus".to_string(),
            ..Config::default()
        };
        assert_eq!(config.tz(), Tz::UTC);
    }

    #[test]
    fn test_create_or_update_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = create_or_update_config(&path, |c| c.top_n = 3).unwrap();
        assert_eq!(config.top_n, 3);

        let updated = create_or_update_config(&path, |c| c.timezone = "Asia/Tokyo".into()).unwrap();
        assert_eq!(updated.top_n, 3, "earlier edits survive");
        assert_eq!(load_config_from(&path).unwrap(), updated);
    }
}

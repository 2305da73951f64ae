use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::db::DB_FILE;
use crate::error::{BasketError, Result};

pub const DEFAULT_SEARCH: &str =
    "{from:order-update@amazon.com} 'your delivery is complete' 'Grand total'";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub data_dir: String,
    #[serde(default = "default_mailbox_dir")]
    pub mailbox_dir: String,
    #[serde(default = "default_search_query")]
    pub search_query: String,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_write_snapshot")]
    pub write_snapshot: bool,
}

fn default_mailbox_dir() -> String {
    default_data_dir().join("mail").to_string_lossy().to_string()
}

fn default_search_query() -> String {
    DEFAULT_SEARCH.to_string()
}

fn default_max_results() -> usize {
    10
}

fn default_write_snapshot() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir().to_string_lossy().to_string(),
            mailbox_dir: default_mailbox_dir(),
            search_query: default_search_query(),
            max_results: default_max_results(),
            write_snapshot: default_write_snapshot(),
        }
    }
}

impl Settings {
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(DB_FILE)
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("basket")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("basket")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| BasketError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

pub fn expand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::path::absolute(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.max_results, 10);
        assert!(s.write_snapshot);
        assert_eq!(s.search_query, DEFAULT_SEARCH);
        assert!(s.db_path().ends_with("basket.db"));
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"data_dir": "/tmp/basket", "max_results": 25}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.data_dir, "/tmp/basket");
        assert_eq!(s.max_results, 25);
        assert_eq!(s.search_query, DEFAULT_SEARCH);
        assert!(s.write_snapshot);
    }

    #[test]
    fn test_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            data_dir: "/srv/basket".to_string(),
            mailbox_dir: "/srv/mail".to_string(),
            search_query: "from:shop@example.com".to_string(),
            max_results: 3,
            write_snapshot: false,
        };
        std::fs::write(&path, serde_json::to_string_pretty(&settings).unwrap()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let loaded: Settings = serde_json::from_str(&content).unwrap();
        assert_eq!(loaded.mailbox_dir, "/srv/mail");
        assert_eq!(loaded.max_results, 3);
        assert!(!loaded.write_snapshot);
    }

    #[test]
    fn test_expand_path_absolute_passthrough() {
        assert_eq!(expand_path("/var/mail"), "/var/mail");
    }
}

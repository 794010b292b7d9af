use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};

/// Root configuration for lembrete.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub storage: StorageConfig,
    pub scheduler: SchedulerConfig,
    pub notifications: NotificationsConfig,
    pub speech: SpeechConfig,
}

impl Config {
    /// Get expanded reminder store path.
    pub fn store_path(&self) -> PathBuf {
        let path = &self.storage.path;
        if path.starts_with("~/") || path.starts_with("~\\") {
            if let Some(home) = dirs::home_dir() {
                return home.join(&path[2..]);
            }
        }
        PathBuf::from(path)
    }

    /// Interval between periodic sweeps, never shorter than one second.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.scheduler.sweep_interval_secs.max(1))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageConfig {
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "~/.lembrete/reminders.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchedulerConfig {
    pub sweep_interval_secs: u64,
    pub timers_enabled: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: 60,
            timers_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationsConfig {
    pub enabled: bool,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpeechConfig {
    pub enabled: bool,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

// ====== Config loading/saving ======

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Load configuration from environment variables.
///
/// Priority:
/// 1. `LEMBRETE_CONFIG` env var: full JSON config
/// 2. File config (`~/.lembrete/config.json`), or defaults
/// 3. Individual env vars, merged on top of the file config
pub fn load_config_from_env() -> Config {
    if let Ok(json) = std::env::var("LEMBRETE_CONFIG") {
        match serde_json::from_str::<Config>(&json) {
            Ok(config) => return config,
            Err(e) => {
                tracing::warn!("Failed to parse LEMBRETE_CONFIG: {}", e);
            }
        }
    }

    let mut cfg = load_config(None);

    if let Ok(v) = std::env::var("LEMBRETE_STORE_PATH") {
        if !v.trim().is_empty() {
            cfg.storage.path = v;
        }
    }
    if let Ok(v) = std::env::var("LEMBRETE_SWEEP_INTERVAL") {
        match v.trim().parse::<u64>() {
            Ok(secs) => cfg.scheduler.sweep_interval_secs = secs,
            Err(_) => tracing::warn!("Ignoring invalid LEMBRETE_SWEEP_INTERVAL: {}", v),
        }
    }
    if let Ok(v) = std::env::var("LEMBRETE_NOTIFICATIONS") {
        if let Some(flag) = parse_flag(&v) {
            cfg.notifications.enabled = flag;
        }
    }
    if let Ok(v) = std::env::var("LEMBRETE_SPEECH") {
        if let Some(flag) = parse_flag(&v) {
            cfg.speech.enabled = flag;
        }
    }

    cfg
}

/// Get the default configuration file path.
pub fn get_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".lembrete")
        .join("config.json")
}

/// Load configuration from file or create default.
pub fn load_config(config_path: Option<&Path>) -> Config {
    let path = config_path
        .map(|p| p.to_path_buf())
        .unwrap_or_else(get_config_path);

    if path.exists() {
        match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Config>(&content) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to parse config from {}: {}", path.display(), e);
                    tracing::warn!("Using default configuration.");
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config from {}: {}", path.display(), e);
                tracing::warn!("Using default configuration.");
            }
        }
    }

    Config::default()
}

/// Save configuration to file.
pub fn save_config(config: &Config, config_path: Option<&Path>) -> Result<()> {
    let path = config_path
        .map(|p| p.to_path_buf())
        .unwrap_or_else(get_config_path);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config).map_err(ConfigError::from)?;
    std::fs::write(&path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.storage.path, "~/.lembrete/reminders.json");
        assert_eq!(cfg.scheduler.sweep_interval_secs, 60);
        assert!(cfg.scheduler.timers_enabled);
        assert!(cfg.notifications.enabled);
        assert!(cfg.speech.enabled);
    }

    #[test]
    fn test_config_camelcase_compat() {
        let json = r#"{
            "storage": { "path": "/tmp/lembretes.json" },
            "scheduler": { "sweepIntervalSecs": 15, "timersEnabled": false }
        }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.storage.path, "/tmp/lembretes.json");
        assert_eq!(cfg.scheduler.sweep_interval_secs, 15);
        assert!(!cfg.scheduler.timers_enabled);
        // Missing sections fall back to defaults
        assert!(cfg.notifications.enabled);
    }

    #[test]
    fn test_sweep_interval_floor() {
        let mut cfg = Config::default();
        assert_eq!(cfg.sweep_interval(), Duration::from_secs(60));
        cfg.scheduler.sweep_interval_secs = 0;
        assert_eq!(cfg.sweep_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_store_path_expansion() {
        let cfg = Config::default();
        let path = cfg.store_path();
        assert!(!path.to_str().unwrap().starts_with("~/"));
        assert!(path.ends_with(".lembrete/reminders.json"));
    }

    #[test]
    fn test_save_and_load_config() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");

        let mut cfg = Config::default();
        cfg.scheduler.sweep_interval_secs = 5;
        cfg.speech.enabled = false;
        save_config(&cfg, Some(&path)).unwrap();

        assert!(path.exists());
        let loaded = load_config(Some(&path));
        assert_eq!(loaded.scheduler.sweep_interval_secs, 5);
        assert!(!loaded.speech.enabled);
    }

    #[test]
    fn test_save_config_reports_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();

        let result = save_config(&Config::default(), Some(&blocker.join("config.json")));
        assert!(matches!(result, Err(crate::error::LembreteError::Io(_))));
    }

    #[test]
    fn test_load_config_missing_file() {
        let path = Path::new("/tmp/nonexistent_lembrete_test.json");
        let cfg = load_config(Some(path));
        assert_eq!(cfg.scheduler.sweep_interval_secs, 60);
    }

    #[test]
    fn test_load_config_from_env() {
        // Env vars are process-global: keep every env assertion in this test.
        std::env::set_var(
            "LEMBRETE_CONFIG",
            r#"{ "scheduler": { "sweepIntervalSecs": 30 } }"#,
        );
        let cfg = load_config_from_env();
        assert_eq!(cfg.scheduler.sweep_interval_secs, 30);
        std::env::remove_var("LEMBRETE_CONFIG");

        std::env::set_var("LEMBRETE_STORE_PATH", "/tmp/lembrete-env.json");
        std::env::set_var("LEMBRETE_SWEEP_INTERVAL", "10");
        std::env::set_var("LEMBRETE_NOTIFICATIONS", "off");
        let cfg = load_config_from_env();
        assert_eq!(cfg.storage.path, "/tmp/lembrete-env.json");
        assert_eq!(cfg.scheduler.sweep_interval_secs, 10);
        assert!(!cfg.notifications.enabled);

        std::env::remove_var("LEMBRETE_STORE_PATH");
        std::env::remove_var("LEMBRETE_SWEEP_INTERVAL");
        std::env::remove_var("LEMBRETE_NOTIFICATIONS");
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" 0 "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}

// Configuration Storage Service
// Handles config file read/write and version backup

use crate::models::HumanizeParameters;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_DETECTION_URL: &str = "http://127.0.0.1:1234/detect";
pub const DEFAULT_PLAGIARISM_URL: &str = "http://127.0.0.1:5000/plagiarism";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default = "default_detection_url")]
    pub detection_api_url: String,
    #[serde(default = "default_plagiarism_url")]
    pub plagiarism_api_url: String,
    #[serde(default)]
    pub humanize: HumanizeParameters,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            detection_api_url: default_detection_url(),
            plagiarism_api_url: default_plagiarism_url(),
            humanize: HumanizeParameters::default(),
            timeouts: TimeoutConfig::default(),
        }
    }
}

impl AppConfig {
    /// Apply `DETECTION_API_URL` / `PLAGIARISM_API_URL` overrides.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = env::var("DETECTION_API_URL") {
            if !url.trim().is_empty() {
                self.detection_api_url = url;
            }
        }
        if let Ok(url) = env::var("PLAGIARISM_API_URL") {
            if !url.trim().is_empty() {
                self.plagiarism_api_url = url;
            }
        }
        self
    }
}

/// Per-call timeouts, in seconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeoutConfig {
    #[serde(default = "default_detection_secs")]
    pub detection_secs: u64,
    #[serde(default = "default_plagiarism_secs")]
    pub plagiarism_secs: u64,
    #[serde(default = "default_humanize_secs")]
    pub humanize_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            detection_secs: default_detection_secs(),
            plagiarism_secs: default_plagiarism_secs(),
            humanize_secs: default_humanize_secs(),
        }
    }
}

fn default_detection_url() -> String { DEFAULT_DETECTION_URL.to_string() }
fn default_plagiarism_url() -> String { DEFAULT_PLAGIARISM_URL.to_string() }
fn default_detection_secs() -> u64 { 60 }
fn default_plagiarism_secs() -> u64 { 300 }
fn default_humanize_secs() -> u64 { 30 }

pub struct ConfigStore {
    config_dir: PathBuf,
    config_file: PathBuf,
}

impl ConfigStore {
    pub fn new(config_dir: PathBuf) -> Self {
        let config_file = config_dir.join("config.json");
        Self { config_dir, config_file }
    }

    /// Get default config directory
    pub fn default_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("rephraseAI"))
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Ensure config directory exists
    pub fn ensure_dir(&self) -> Result<(), String> {
        fs::create_dir_all(&self.config_dir)
            .map_err(|e| format!("Failed to create config dir: {}", e))
    }

    /// Load configuration from file; a missing file yields defaults
    pub fn load(&self) -> Result<AppConfig, String> {
        if !self.config_file.exists() {
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.config_file)
            .map_err(|e| format!("Failed to read config: {}", e))?;

        let config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config: {}", e))?;

        Ok(AppConfig {
            humanize: config.humanize.clamped(),
            ..config
        })
    }

    /// Save configuration to file
    pub fn save(&self, config: &AppConfig) -> Result<(), String> {
        self.ensure_dir()?;

        if self.config_file.exists() {
            self.create_backup()?;
        }

        let content = serde_json::to_string_pretty(config)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        fs::write(&self.config_file, content)
            .map_err(|e| format!("Failed to write config: {}", e))
    }

    /// Update the default humanize parameters
    pub fn set_humanize_defaults(&self, params: HumanizeParameters) -> Result<(), String> {
        let mut config = self.load()?;
        config.humanize = params.clamped();
        self.save(&config)
    }

    /// Point the analysis at different service endpoints
    pub fn set_service_urls(&self, detection: &str, plagiarism: &str) -> Result<(), String> {
        let mut config = self.load()?;
        config.detection_api_url = detection.to_string();
        config.plagiarism_api_url = plagiarism.to_string();
        self.save(&config)
    }

    fn create_backup(&self) -> Result<(), String> {
        let backup_dir = self.config_dir.join("backups");
        fs::create_dir_all(&backup_dir)
            .map_err(|e| format!("Failed to create backup dir: {}", e))?;

        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S%.3f");
        let backup_file = backup_dir.join(format!("config_{}.json", timestamp));

        fs::copy(&self.config_file, &backup_file)
            .map_err(|e| format!("Failed to create backup: {}", e))?;

        cleanup_old_backups(&backup_dir, 10)
    }
}

/// Remove old backups, keeping only the most recent `keep`
fn cleanup_old_backups(backup_dir: &Path, keep: usize) -> Result<(), String> {
    let mut entries: Vec<_> = fs::read_dir(backup_dir)
        .map_err(|e| format!("Failed to read backup dir: {}", e))?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().map_or(false, |ext| ext == "json"))
        .collect();

    if entries.len() <= keep {
        return Ok(());
    }

    // Timestamped names sort oldest first
    entries.sort_by_key(|e| e.file_name());

    for entry in entries.iter().take(entries.len() - keep) {
        let _ = fs::remove_file(entry.path());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.detection_api_url, DEFAULT_DETECTION_URL);
        assert_eq!(config.plagiarism_api_url, DEFAULT_PLAGIARISM_URL);
        assert_eq!(config.humanize.synonym_intensity, 0.2);
        assert_eq!(config.timeouts.plagiarism_secs, 300);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed: AppConfig =
            serde_json::from_str(r#"{"detectionApiUrl":"http://localhost:9/x"}"#).unwrap();
        assert_eq!(parsed.detection_api_url, "http://localhost:9/x");
        assert_eq!(parsed.plagiarism_api_url, DEFAULT_PLAGIARISM_URL);
        assert_eq!(parsed.timeouts.humanize_secs, 30);
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("cfg"));
        let config = store.load().unwrap();
        assert_eq!(config.detection_api_url, DEFAULT_DETECTION_URL);
    }

    #[test]
    fn test_save_and_reload_with_backup() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().to_path_buf());

        store.save(&AppConfig::default()).unwrap();
        store.set_humanize_defaults(HumanizeParameters::new(0.7, 2.0)).unwrap();

        let config = store.load().unwrap();
        assert_eq!(config.humanize.synonym_intensity, 0.7);
        assert_eq!(config.humanize.transition_frequency, 1.0);

        let backups = fs::read_dir(dir.path().join("backups")).unwrap().count();
        assert_eq!(backups, 1);
    }

    #[test]
    fn test_backups_are_capped() {
        let dir = tempfile::tempdir().unwrap();
        let backup_dir = dir.path().join("backups");
        fs::create_dir_all(&backup_dir).unwrap();
        for i in 0..13 {
            fs::write(backup_dir.join(format!("config_2024010{:02}.json", i)), "{}").unwrap();
        }
        cleanup_old_backups(&backup_dir, 10).unwrap();
        let mut left: Vec<String> = fs::read_dir(&backup_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        left.sort();
        assert_eq!(left.len(), 10);
        assert_eq!(left[0], "config_202401003.json");
    }

    #[test]
    fn test_bad_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.json"), "{not json").unwrap();
        let err = ConfigStore::new(dir.path().to_path_buf()).load().unwrap_err();
        assert!(err.starts_with("Failed to parse config"));
    }
}

/// Runtime settings
///
/// Defaults, then ~/.cartwhisper/cartwhisper.toml, then environment
/// variables. Later layers win. Everything has a sane default except the
/// API key, which stays None until the user supplies one.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Settings {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub database_path: Option<PathBuf>,
    pub request_timeout_secs: u64,
    pub history_window: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: "gemini-1.5-pro".into(),
            gemini_base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
            database_path: None,
            request_timeout_secs: 15,
            history_window: 50,
        }
    }
}

impl Settings {
    /// Database file to open, explicit path or the default location
    pub fn resolved_db_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| default_data_dir().join("shopping.db"))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(config_file_path()) {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            apply_file_settings(&mut settings, &file_cfg);
        }
    }

    // Environment wins over the config file
    if let Ok(v) = env::var("GEMINI_API_KEY") {
        settings.gemini_api_key = Some(v);
    }
    if let Ok(v) = env::var("CARTWHISPER_MODEL") {
        settings.gemini_model = v;
    }
    if let Ok(v) = env::var("CARTWHISPER_BASE_URL") {
        settings.gemini_base_url = v;
    }
    if let Ok(v) = env::var("CARTWHISPER_DB") {
        settings.database_path = Some(PathBuf::from(v));
    }
    if let Ok(v) = env::var("CARTWHISPER_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }
    if let Ok(v) = env::var("CARTWHISPER_HISTORY_WINDOW") {
        if let Ok(parsed) = v.parse::<i64>() {
            settings.history_window = parsed;
        }
    }

    settings
}

fn apply_file_settings(settings: &mut Settings, file_cfg: &HashMap<String, String>) {
    if let Some(v) = file_cfg.get("api_key") {
        settings.gemini_api_key = Some(v.clone());
    }
    if let Some(v) = file_cfg.get("model") {
        settings.gemini_model = v.clone();
    }
    if let Some(v) = file_cfg.get("base_url") {
        settings.gemini_base_url = v.clone();
    }
    if let Some(v) = file_cfg.get("database_path") {
        settings.database_path = Some(PathBuf::from(v));
    }
    if let Some(v) = file_cfg.get("timeout_secs") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }
    if let Some(v) = file_cfg.get("history_window") {
        if let Ok(parsed) = v.parse::<i64>() {
            settings.history_window = parsed;
        }
    }
}

/// Where cartwhisper keeps its database and config
///
/// Falls back to the current directory when there is no home, which only
/// really happens in stripped-down containers.
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".cartwhisper")
}

pub fn config_file_path() -> PathBuf {
    default_data_dir().join("cartwhisper.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();

        assert!(settings.gemini_api_key.is_none());
        assert_eq!(settings.gemini_model, "gemini-1.5-pro");
        assert_eq!(settings.request_timeout_secs, 15);
        assert_eq!(settings.history_window, 50);
    }

    #[test]
    fn test_file_settings_override_defaults() {
        let mut settings = Settings::default();
        let mut file_cfg = HashMap::new();
        file_cfg.insert("api_key".to_string(), "abc123".to_string());
        file_cfg.insert("model".to_string(), "gemini-1.5-flash".to_string());
        file_cfg.insert("timeout_secs".to_string(), "30".to_string());

        apply_file_settings(&mut settings, &file_cfg);

        assert_eq!(settings.gemini_api_key.as_deref(), Some("abc123"));
        assert_eq!(settings.gemini_model, "gemini-1.5-flash");
        assert_eq!(settings.request_timeout_secs, 30);
    }

    #[test]
    fn test_unparseable_numbers_keep_defaults() {
        let mut settings = Settings::default();
        let mut file_cfg = HashMap::new();
        file_cfg.insert("timeout_secs".to_string(), "soon".to_string());
        file_cfg.insert("history_window".to_string(), "lots".to_string());

        apply_file_settings(&mut settings, &file_cfg);

        assert_eq!(settings.request_timeout_secs, 15);
        assert_eq!(settings.history_window, 50);
    }

    #[test]
    fn test_resolved_db_path_prefers_explicit() {
        let mut settings = Settings::default();
        settings.database_path = Some(PathBuf::from("/tmp/mylist.db"));

        assert_eq!(settings.resolved_db_path(), PathBuf::from("/tmp/mylist.db"));
    }

    #[test]
    fn test_resolved_db_path_default_location() {
        let settings = Settings::default();
        let path = settings.resolved_db_path();

        assert!(path.ends_with(".cartwhisper/shopping.db"));
    }

    #[test]
    fn test_request_timeout_conversion() {
        let settings = Settings::default();
        assert_eq!(settings.request_timeout(), Duration::from_secs(15));
    }
}

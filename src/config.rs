use rocket::figment::Figment;
use serde::Deserialize;
use std::time::Duration;

/// Environment variable that overrides `app.gemini_api_key`.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// The `[default.app]` table of `Rocket.toml` (or `ROCKET_APP={...}`).
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub db_path: String,
    pub gemini_model: String,
    pub gemini_api_key: Option<String>,
    pub request_timeout_secs: u64,
    pub session_idle_minutes: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            db_path: "data/cta-strategist.db".to_string(),
            gemini_model: "gemini-2.5-pro".to_string(),
            gemini_api_key: None,
            request_timeout_secs: 180,
            session_idle_minutes: 240,
        }
    }
}

impl AppConfig {
    /// Read the `app` table, falling back to defaults when it is absent or
    /// malformed, then apply the environment key override.
    pub fn from_figment(figment: &Figment) -> Self {
        let mut config = match figment.extract_inner::<AppConfig>("app") {
            Ok(c) => c,
            Err(e) => {
                if !e.missing() {
                    log::warn!("Invalid [app] config, using defaults: {}", e);
                }
                AppConfig::default()
            }
        };
        config.apply_env_key(std::env::var(API_KEY_ENV).ok());
        config
    }

    fn apply_env_key(&mut self, env_key: Option<String>) {
        if let Some(key) = env_key.filter(|k| !k.trim().is_empty()) {
            self.gemini_api_key = Some(key);
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocket::figment::providers::{Format, Toml};

    #[test]
    fn missing_table_gives_defaults() {
        let figment = Figment::new();
        let mut config = figment.extract_inner::<AppConfig>("app").unwrap_or_default();
        config.apply_env_key(None);
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.request_timeout(), Duration::from_secs(180));
    }

    #[test]
    fn partial_table_keeps_other_defaults() {
        let figment = Figment::from(Toml::string(
            "[app]\ngemini_model = \"gemini-2.5-flash\"\nsession_idle_minutes = 30\n",
        ));
        let config: AppConfig = figment.extract_inner("app").unwrap();
        assert_eq!(config.gemini_model, "gemini-2.5-flash");
        assert_eq!(config.session_idle_minutes, 30);
        assert_eq!(config.db_path, "data/cta-strategist.db");
    }

    #[test]
    fn env_key_overrides_file_key() {
        let mut config = AppConfig {
            gemini_api_key: Some("from-file".into()),
            ..AppConfig::default()
        };
        config.apply_env_key(Some("  ".into()));
        assert_eq!(config.gemini_api_key.as_deref(), Some("from-file"));
        config.apply_env_key(Some("from-env".into()));
        assert_eq!(config.gemini_api_key.as_deref(), Some("from-env"));
    }
}

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub notices: NoticeConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SessionConfig {
    /// Rolling expiry window for a login, in hours.
    pub duration_hours: i64,
    /// Interval of the background expiry sweep, in minutes.
    pub liveness_check_minutes: u64,
    /// Path of the JSON file backing the persisted session store.
    pub store_path: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NoticeConfig {
    pub success_seconds: i64,
    pub error_seconds: i64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub json_format: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_hours: 24,
            liveness_check_minutes: 5,
            store_path: ".estate-session.json".to_string(),
        }
    }
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self {
            success_seconds: 3,
            error_seconds: 5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            session: SessionConfig::default(),
            notices: NoticeConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl SessionConfig {
    pub fn duration(&self) -> chrono::Duration {
        chrono::Duration::hours(self.duration_hours)
    }

    pub fn liveness_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.liveness_check_minutes.max(1) * 60)
    }
}

impl Config {
    /// Load configuration from multiple sources in priority order:
    /// 1. Estate.toml (base configuration file)
    /// 2. Environment variables (prefixed with ESTATE_)
    pub fn load() -> Result<Self, figment::Error> {
        let figment = Figment::new()
            // Start with defaults
            .merge(Toml::string(&toml::to_string(&Config::default()).unwrap()).nested())
            // Layer on Estate.toml if it exists
            .merge(Toml::file("Estate.toml").nested())
            // Layer on environment variables (e.g., ESTATE_API_BASE_URL)
            .merge(Env::prefixed("ESTATE_").split("_"));

        figment.extract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.session.duration_hours, 24);
        assert_eq!(config.session.duration(), chrono::Duration::hours(24));
        assert_eq!(config.notices.success_seconds, 3);
        assert_eq!(config.notices.error_seconds, 5);
        assert!(config.api.base_url.ends_with("/api"));
    }

    #[test]
    fn liveness_interval_has_floor() {
        let mut session = SessionConfig::default();
        session.liveness_check_minutes = 0;
        assert_eq!(session.liveness_interval(), std::time::Duration::from_secs(60));
    }
}

//! Application configuration read from the environment

use std::env;
use tracing::{info, warn};

/// Default chat-completions endpoint
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model used by the analyzers and the assistant
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

/// Smaller vision-capable model used for report text extraction
pub const DEFAULT_OCR_MODEL: &str = "gpt-4o-mini";

/// Runtime configuration for the server and its outbound clients
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub app_env: String,
    pub data_dir: String,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub ocr_model: String,
    pub google_maps_api_key: Option<String>,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            app_env: "development".to_string(),
            data_dir: "data".to_string(),
            openai_api_key: None,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            ocr_model: DEFAULT_OCR_MODEL.to_string(),
            google_maps_api_key: None,
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Build the configuration from environment variables
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);

        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let data_dir = env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string());

        let openai_api_key = usable_api_key("OPENAI_API_KEY", env::var("OPENAI_API_KEY").ok());
        if openai_api_key.is_none() {
            warn!("OPENAI_API_KEY is not set to a real key, AI endpoints will return stub data or errors");
        }

        let google_maps_api_key = env::var("GOOGLE_MAPS_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let config = Self {
            port,
            app_env,
            data_dir,
            openai_api_key,
            openai_base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string()),
            openai_model: env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_MODEL.to_string()),
            ocr_model: env::var("OPENAI_OCR_MODEL")
                .unwrap_or_else(|_| DEFAULT_OCR_MODEL.to_string()),
            google_maps_api_key,
            cors_allowed_origins,
        };

        info!(
            "Configuration loaded: port={}, env={}, ai_enabled={}, maps_enabled={}",
            config.port,
            config.app_env,
            config.openai_api_key.is_some(),
            config.google_maps_api_key.is_some()
        );

        config
    }

    pub fn ai_enabled(&self) -> bool {
        self.openai_api_key.is_some()
    }

    pub fn maps_enabled(&self) -> bool {
        self.google_maps_api_key.is_some()
    }
}

/// Whether an API key is absent or still a placeholder from an example env file
pub fn is_key_missing(var_name: &str, key: Option<&str>) -> bool {
    match key {
        None => true,
        Some(k) => k == var_name || k.starts_with("your_") || k.len() < 20,
    }
}

fn usable_api_key(var_name: &str, key: Option<String>) -> Option<String> {
    if is_key_missing(var_name, key.as_deref()) {
        None
    } else {
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_keys_are_missing() {
        assert!(is_key_missing("OPENAI_API_KEY", None));
        assert!(is_key_missing("OPENAI_API_KEY", Some("OPENAI_API_KEY")));
        assert!(is_key_missing("OPENAI_API_KEY", Some("your_openai_key_goes_here_please")));
        assert!(is_key_missing("OPENAI_API_KEY", Some("sk-short")));
        assert!(!is_key_missing("OPENAI_API_KEY", Some("sk-0123456789abcdefghijklmnop")));
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.openai_model, "gpt-4o");
        assert!(!config.ai_enabled());
        assert!(!config.maps_enabled());
    }
}

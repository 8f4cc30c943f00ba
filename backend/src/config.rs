// backend/src/config.rs

use serde::Deserialize;

#[derive(Deserialize, Clone)]
pub struct Config {
    // Server Config
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_cors_allowed_origin")]
    pub cors_allowed_origin: String,

    // Ollama Config
    #[serde(default = "default_ollama_base_url")]
    pub ollama_base_url: String,
    #[serde(default = "default_ollama_model")]
    pub ollama_model: String,
    #[serde(default = "default_llm_timeout_seconds")]
    pub llm_timeout_seconds: u64,

    // Google Maps Config - collaborator is disabled when no key is supplied
    pub google_maps_api_key: Option<String>,
    #[serde(default = "default_google_maps_base_url")]
    pub google_maps_base_url: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("cors_allowed_origin", &self.cors_allowed_origin)
            .field("ollama_base_url", &self.ollama_base_url)
            .field("ollama_model", &self.ollama_model)
            .field("llm_timeout_seconds", &self.llm_timeout_seconds)
            .field(
                "google_maps_api_key",
                &self.google_maps_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("google_maps_base_url", &self.google_maps_base_url)
            .finish()
    }
}

// Default value functions for serde
const fn default_port() -> u16 {
    8000
}
fn default_cors_allowed_origin() -> String {
    "http://localhost:5173".to_string()
}
fn default_ollama_base_url() -> String {
    "http://localhost:11434".to_string()
}
fn default_ollama_model() -> String {
    "llama3.2".to_string()
}
const fn default_llm_timeout_seconds() -> u64 {
    30
}
fn default_google_maps_base_url() -> String {
    "https://maps.googleapis.com".to_string()
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `anyhow::Error` when an environment variable is present but
    /// cannot be parsed into the expected type.
    pub fn load() -> Result<Self, anyhow::Error> {
        envy::from_env::<Self>().map_err(anyhow::Error::from)
    }

    /// Whether the Google Maps collaborator is configured.
    pub fn maps_enabled(&self) -> bool {
        self.google_maps_api_key
            .as_ref()
            .is_some_and(|key| !key.is_empty())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            cors_allowed_origin: default_cors_allowed_origin(),
            ollama_base_url: default_ollama_base_url(),
            ollama_model: default_ollama_model(),
            llm_timeout_seconds: default_llm_timeout_seconds(),
            google_maps_api_key: None,
            google_maps_base_url: default_google_maps_base_url(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_deployment() {
        let config = Config::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.ollama_base_url, "http://localhost:11434");
        assert_eq!(config.ollama_model, "llama3.2");
        assert!(!config.maps_enabled());
    }

    #[test]
    fn maps_enabled_requires_non_empty_key() {
        let mut config = Config::default();
        config.google_maps_api_key = Some(String::new());
        assert!(!config.maps_enabled());
        config.google_maps_api_key = Some("test-key".to_string());
        assert!(config.maps_enabled());
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = Config {
            google_maps_api_key: Some("very-secret".to_string()),
            ..Config::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("very-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}

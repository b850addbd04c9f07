//! Service configuration, loaded from environment variables.

use chat_core::{ChatError, Result};
use std::env;

/// Chat service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub openai_api_key: String,
    /// Optional OpenAI API base URL override (proxies, mock servers).
    pub openai_base_url: Option<String>,
    pub model: String,
    pub assistant_name: String,
    pub persona_file: String,
    /// Interval between persona file mtime checks.
    pub persona_poll_interval_secs: u64,
    /// Interval between run status polls. The attempt budget stays fixed, so
    /// shrinking this only shortens the worst-case wait.
    pub run_poll_interval_ms: u64,
    pub host: String,
    pub port: u16,
    pub log_file: Option<String>,
}

impl ServiceConfig {
    /// Loads configuration from environment variables.
    /// `OPENAI_API_KEY` is required; everything else has a default.
    pub fn load() -> Result<Self> {
        let openai_api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| ChatError::Config("OPENAI_API_KEY not set".to_string()))?;
        let openai_base_url = env::var("OPENAI_BASE_URL").ok();
        let model = env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4-turbo-preview".to_string());
        let assistant_name =
            env::var("ASSISTANT_NAME").unwrap_or_else(|_| "Chatbot Assistant".to_string());
        let persona_file = env::var("PERSONA_FILE").unwrap_or_else(|_| "./persona.txt".to_string());
        let persona_poll_interval_secs = env::var("PERSONA_POLL_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);
        let run_poll_interval_ms = env::var("RUN_POLL_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(1000);
        let host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("SERVER_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8080);
        let log_file = env::var("LOG_FILE").ok();

        Ok(Self {
            openai_api_key,
            openai_base_url,
            model,
            assistant_name,
            persona_file,
            persona_poll_interval_secs,
            run_poll_interval_ms,
            host,
            port,
            log_file,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        env::remove_var("OPENAI_API_KEY");
        env::remove_var("OPENAI_BASE_URL");
        env::remove_var("OPENAI_MODEL");
        env::remove_var("ASSISTANT_NAME");
        env::remove_var("PERSONA_FILE");
        env::remove_var("PERSONA_POLL_INTERVAL_SECS");
        env::remove_var("RUN_POLL_INTERVAL_MS");
        env::remove_var("SERVER_HOST");
        env::remove_var("SERVER_PORT");
        env::remove_var("LOG_FILE");
    }

    #[test]
    #[serial]
    fn test_load_with_defaults() {
        clear_env();
        env::set_var("OPENAI_API_KEY", "test_key");

        let config = ServiceConfig::load().unwrap();

        assert_eq!(config.openai_api_key, "test_key");
        assert!(config.openai_base_url.is_none());
        assert_eq!(config.model, "gpt-4-turbo-preview");
        assert_eq!(config.assistant_name, "Chatbot Assistant");
        assert_eq!(config.persona_file, "./persona.txt");
        assert_eq!(config.persona_poll_interval_secs, 60);
        assert_eq!(config.run_poll_interval_ms, 1000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert!(config.log_file.is_none());
    }

    #[test]
    #[serial]
    fn test_load_with_custom_values() {
        clear_env();
        env::set_var("OPENAI_API_KEY", "custom_key");
        env::set_var("OPENAI_BASE_URL", "http://localhost:9999");
        env::set_var("OPENAI_MODEL", "gpt-4o");
        env::set_var("ASSISTANT_NAME", "Support Bot");
        env::set_var("PERSONA_FILE", "/etc/persona.txt");
        env::set_var("PERSONA_POLL_INTERVAL_SECS", "5");
        env::set_var("RUN_POLL_INTERVAL_MS", "250");
        env::set_var("SERVER_PORT", "9090");

        let config = ServiceConfig::load().unwrap();

        assert_eq!(config.openai_base_url.as_deref(), Some("http://localhost:9999"));
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.assistant_name, "Support Bot");
        assert_eq!(config.persona_file, "/etc/persona.txt");
        assert_eq!(config.persona_poll_interval_secs, 5);
        assert_eq!(config.run_poll_interval_ms, 250);
        assert_eq!(config.port, 9090);
    }

    #[test]
    #[serial]
    fn test_load_requires_api_key() {
        clear_env();

        let result = ServiceConfig::load();

        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_load_ignores_unparsable_port() {
        clear_env();
        env::set_var("OPENAI_API_KEY", "test_key");
        env::set_var("SERVER_PORT", "not-a-port");

        let config = ServiceConfig::load().unwrap();

        assert_eq!(config.port, 8080);
    }
}

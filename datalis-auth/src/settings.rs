use config::{Config, ConfigError, File, FileFormat};
use serde::Deserialize;

const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

#[derive(Deserialize, Clone)]
pub struct Settings {
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Base URL of the hosted identity service.
    #[serde(default)]
    pub auth_url: String,

    /// Public (anon) key of the hosted identity service.
    #[serde(default)]
    pub auth_anon_key: String,

    /// Where verification emails send the user back to.
    #[serde(default)]
    pub email_redirect_to: Option<String>,
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            auth_url: String::new(),
            auth_anon_key: String::new(),
            email_redirect_to: None,
        }
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("backend_url", &self.backend_url)
            .field("auth_url", &self.auth_url)
            .field("auth_anon_key", &"[redacted]")
            .field("email_redirect_to", &self.email_redirect_to)
            .finish()
    }
}

impl Settings {
    /// Load from `config.toml` (or the file named by `DATALIS_CONFIG`) and
    /// `DATALIS_*` environment variables, the latter taking precedence.
    pub fn new() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("DATALIS_CONFIG").unwrap_or_else(|_| "config.toml".to_string());

        let settings = Config::builder()
            .add_source(File::with_name(&config_path).required(false))
            .add_source(config::Environment::with_prefix("DATALIS").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.backend_url.is_empty() {
            return Err("backend_url is required".to_string());
        }
        if !self.backend_url.starts_with("http") {
            return Err("backend_url must be a valid HTTP(S) URL".to_string());
        }
        if !self.auth_url.is_empty() && !self.auth_url.starts_with("http") {
            return Err("auth_url must be a valid HTTP(S) URL".to_string());
        }
        Ok(())
    }

    /// Check the identity service settings needed to sign in.
    pub fn validate_auth(&self) -> Result<(), String> {
        if self.auth_url.is_empty() {
            return Err("auth_url is required to sign in".to_string());
        }
        if self.auth_anon_key.is_empty() {
            return Err("auth_anon_key is required to sign in".to_string());
        }
        self.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_url_defaults_to_local_development() {
        let settings = Settings::from_toml("auth_url = \"https://id.example.com\"").unwrap();
        assert_eq!(settings.backend_url, "http://localhost:8000");
        assert_eq!(settings.auth_url, "https://id.example.com");
        assert!(settings.email_redirect_to.is_none());
    }

    #[test]
    fn validate_rejects_non_http_urls() {
        let settings = Settings {
            backend_url: "localhost:8000".to_string(),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());

        let settings = Settings {
            auth_url: "id.example.com".to_string(),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn sign_in_needs_identity_service() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert!(settings.validate_auth().is_err());

        let settings = Settings {
            auth_url: "https://id.example.com".to_string(),
            auth_anon_key: "anon".to_string(),
            ..Settings::default()
        };
        assert!(settings.validate_auth().is_ok());
    }

    #[test]
    fn debug_output_hides_anon_key() {
        let settings = Settings {
            auth_anon_key: "super-secret".to_string(),
            ..Settings::default()
        };
        assert!(!format!("{settings:?}").contains("super-secret"));
    }
}

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub google: GoogleConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// OAuth client credentials and callback location.
/// `client_id`/`client_secret` come from the Google Cloud console and
/// are opaque to this service.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default = "default_redirect_base_url")]
    pub redirect_base_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub cookie_secure: bool,
    #[serde(default = "default_access_token_ttl")]
    pub access_token_ttl_secs: u64,
    #[serde(default = "default_refresh_token_ttl")]
    pub refresh_token_ttl_days: u64,
}

// Default values
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_redirect_base_url() -> String {
    "http://localhost:3000/api/auth/callback".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_access_token_ttl() -> u64 {
    3600 // 1 hour
}

fn default_refresh_token_ttl() -> u64 {
    30 // 30 days
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_base_url: default_redirect_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            cookie_secure: false,
            access_token_ttl_secs: default_access_token_ttl(),
            refresh_token_ttl_days: default_refresh_token_ttl(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            google: GoogleConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

impl GoogleConfig {
    /// Redirect URI registered with the provider: configured base plus
    /// the fixed provider suffix. The exchange step must reuse this
    /// exact string.
    pub fn redirect_uri(&self) -> String {
        format!("{}/google", self.redirect_base_url.trim_end_matches('/'))
    }
}

impl Config {
    /// Load configuration from file and environment variables
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::load_from_file()?;
        config.apply_env_overrides();
        if config.google.client_id.is_empty() || config.google.client_secret.is_empty() {
            tracing::warn!("Google client credentials not configured; authorization will fail");
        }
        Ok(config)
    }

    /// Load configuration from config.toml if present
    fn load_from_file() -> anyhow::Result<Self> {
        let config_paths = ["config.toml", "data/config.toml"];

        for path in config_paths {
            if Path::new(path).exists() {
                let content = fs::read_to_string(path)?;
                let config: Config = toml::from_str(&content)?;
                tracing::info!("Loaded configuration from {}", path);
                return Ok(config);
            }
        }

        tracing::info!("No configuration file found, using defaults");
        Ok(Config::default())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // Server overrides
        if let Ok(val) = env::var("SERVER_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = env::var("SERVER_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }

        // Google overrides
        if let Ok(val) = env::var("GOOGLE_CLIENT_ID") {
            self.google.client_id = val;
        }
        if let Ok(val) = env::var("GOOGLE_CLIENT_SECRET") {
            self.google.client_secret = val;
        }
        if let Ok(val) = env::var("DRIVE_REDIRECT_BASE_URL") {
            if !val.trim().is_empty() {
                self.google.redirect_base_url = val;
            }
        }
        if let Ok(val) = env::var("DRIVE_REQUEST_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                self.google.request_timeout_secs = secs;
            }
        }

        // Auth overrides
        if let Ok(val) = env::var("COOKIE_SECURE") {
            if let Ok(v) = val.parse() {
                self.auth.cookie_secure = v;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_uri_appends_provider_suffix() {
        let config = GoogleConfig {
            redirect_base_url: "https://portal.example.com/api/auth/callback".to_string(),
            ..GoogleConfig::default()
        };
        assert_eq!(
            config.redirect_uri(),
            "https://portal.example.com/api/auth/callback/google"
        );
    }

    #[test]
    fn redirect_uri_tolerates_trailing_slash() {
        let config = GoogleConfig {
            redirect_base_url: "http://localhost:3000/api/auth/callback/".to_string(),
            ..GoogleConfig::default()
        };
        assert_eq!(
            config.redirect_uri(),
            "http://localhost:3000/api/auth/callback/google"
        );
    }

    #[test]
    fn defaults_match_documented_ttls() {
        let config = Config::default();
        assert_eq!(config.auth.access_token_ttl_secs, 3600);
        assert_eq!(config.auth.refresh_token_ttl_days, 30);
        assert!(!config.auth.cookie_secure);
    }
}

use anyhow::Result;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Endpoint and transport settings for a [`crate::UmlsClient`].
///
/// The API key is deliberately not part of this; callers supply it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the UTS login service
    pub auth_base_url: String,

    /// Path the API key is posted to
    pub auth_endpoint: String,

    /// Service identifier sent when requesting service tickets
    pub service: String,

    /// User-Agent header sent on the authentication requests
    pub user_agent: String,

    /// Per-request timeout. `None` keeps the HTTP client's default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// How long the server honours a ticket-granting ticket
    pub tgt_lifetime_hours: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            auth_base_url: "https://utslogin.nlm.nih.gov".to_string(),
            auth_endpoint: "/cas/v1/api-key".to_string(),
            service: "http://umlsks.nlm.nih.gov".to_string(),
            user_agent: concat!("umls-client/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: None,
            tgt_lifetime_hours: 8,
        }
    }
}

impl ClientConfig {
    /// Full URL of the ticket-granting endpoint
    pub fn auth_url(&self) -> String {
        format!(
            "{}/{}",
            self.auth_base_url.trim_end_matches('/'),
            self.auth_endpoint.trim_start_matches('/')
        )
    }

    pub fn tgt_lifetime(&self) -> Duration {
        Duration::hours(i64::from(self.tgt_lifetime_hours))
    }

    /// Load config from the default location, falling back to defaults
    /// when no file exists
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("umls-client").join("config.toml"))
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        format!(
            r#"# UMLS client configuration
# Location: ~/.config/umls-client/config.toml (Linux)
#           ~/Library/Application Support/umls-client/config.toml (macOS)
#           %APPDATA%\umls-client\config.toml (Windows)
#
# The API key is never read from this file.

# UTS login service
auth_base_url = "https://utslogin.nlm.nih.gov"
auth_endpoint = "/cas/v1/api-key"

# Service identifier for service ticket requests
service = "http://umlsks.nlm.nih.gov"

user_agent = "umls-client/{}"

# Request timeout in seconds (leave commented for the HTTP client default)
# timeout_secs = 30

# Ticket-granting tickets older than this are reported in the logs
tgt_lifetime_hours = 8
"#,
            env!("CARGO_PKG_VERSION")
        )
    }
}

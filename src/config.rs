use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// HMAC secret for signing access tokens; override in production
    #[serde(default = "default_secret_key")]
    pub secret_key: String,

    /// Access token lifetime in minutes
    #[serde(default = "default_access_token_expire_minutes")]
    pub access_token_expire_minutes: i64,

    /// Result cap used when a request does not specify top_k
    #[serde(default = "default_top_k")]
    pub default_top_k: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_secret_key() -> String {
    "super-secret-key-change-me".to_string()
}

fn default_access_token_expire_minutes() -> i64 {
    60 * 24
}

fn default_top_k() -> usize {
    5
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            secret_key: default_secret_key(),
            access_token_expire_minutes: default_access_token_expire_minutes(),
            default_top_k: default_top_k(),
        }
    }
}

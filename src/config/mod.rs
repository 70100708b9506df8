use anyhow::{bail, Result};
use std::env;

/// Variables that must be present for the server to start
const REQUIRED: [&str; 4] = [
    "CHECKMK_URL",
    "CHECKMK_SITE",
    "CHECKMK_USERNAME",
    "CHECKMK_PASSWORD",
];

/// Config holds all application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub checkmk_url: String,
    pub checkmk_site: String,
    pub checkmk_username: String,
    pub checkmk_password: String,
    pub ignore_ssl: bool,
    pub request_timeout_secs: u64,
    pub listen_addr: String,
    pub frontend_dir: String,
}

impl Config {
    /// Load configuration from environment variables with defaults.
    ///
    /// Fails if any Checkmk connection variable is missing or empty.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let missing: Vec<&str> = REQUIRED
            .iter()
            .copied()
            .filter(|&key| get(key).is_none())
            .collect();
        if !missing.is_empty() {
            bail!(
                "Missing required environment variables: {}",
                missing.join(", ")
            );
        }

        let listen_addr = get("LISTEN_ADDR").unwrap_or_else(|| {
            format!("0.0.0.0:{}", get("PORT").unwrap_or_else(|| "3000".to_string()))
        });

        Ok(Self {
            checkmk_url: get("CHECKMK_URL").unwrap_or_default(),
            checkmk_site: get("CHECKMK_SITE").unwrap_or_default(),
            checkmk_username: get("CHECKMK_USERNAME").unwrap_or_default(),
            checkmk_password: get("CHECKMK_PASSWORD").unwrap_or_default(),
            ignore_ssl: get("CHECKMK_IGNORE_SSL").as_deref() == Some("true"),
            request_timeout_secs: get("CHECKMK_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            listen_addr,
            frontend_dir: get("FRONTEND_DIR").unwrap_or_else(|| "public".to_string()),
        })
    }

    /// Base URL of the Checkmk REST API for the configured site
    pub fn api_base(&self) -> String {
        format!(
            "{}/{}/check_mk/api/1.0",
            self.checkmk_url.trim_end_matches('/'),
            self.checkmk_site
        )
    }

    /// Value of the Authorization header for automation users
    pub fn auth_header(&self) -> String {
        format!("Bearer {} {}", self.checkmk_username, self.checkmk_password)
    }
}

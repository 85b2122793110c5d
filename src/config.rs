use std::time::Duration;

use anyhow::anyhow;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppInfo {
    pub title: String,
    pub version: String,
    pub description: String,
    pub contact_name: String,
    pub contact_email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub allow_credentials: bool,
    pub allow_methods: Vec<String>,
    pub allow_headers: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppInfo,
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
    pub database: DatabaseConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup; `from_env` passes the process env.
    pub fn from_vars<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let app = AppInfo {
            title: or("TITLE", "Users API"),
            version: or("VERSION", env!("CARGO_PKG_VERSION")),
            description: or("DESCRIPTION", "User registry backend"),
            contact_name: or("CONTACT_NAME", "John Doe"),
            contact_email: or("CONTACT_EMAIL", "johndoe@gmail.com"),
        };

        let cors = CorsConfig {
            allow_origins: split_list(&or("CORS_ALLOW_ORIGINS", "*")),
            allow_credentials: var("CORS_ALLOW_CREDENTIALS")
                .map(|v| parse_bool(&v))
                .unwrap_or(true),
            allow_methods: split_list(&or("CORS_ALLOW_METHODS", "*")),
            allow_headers: split_list(&or("CORS_ALLOW_HEADERS", "*")),
        };

        let database = DatabaseConfig {
            url: database_url(&var)?,
            max_connections: var("DB_MAX_CONNECTIONS")
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(10),
            acquire_timeout: Duration::from_secs(
                var("DB_ACQUIRE_TIMEOUT_SECS")
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(5),
            ),
        };

        Ok(Self {
            app,
            host: or("APP_HOST", "0.0.0.0"),
            port: var("APP_PORT")
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(8080),
            cors,
            database,
        })
    }
}

/// `DB_OVERRIDE_URL` wins; otherwise every piece of the URL must be set.
fn database_url<F>(var: &F) -> anyhow::Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = var("DB_OVERRIDE_URL").filter(|v| !v.is_empty()) {
        return Ok(url);
    }

    let need = |key: &str| match var(key).filter(|v| !v.is_empty()) {
        Some(v) => Ok(v),
        None => Err(anyhow!("database settings not set (missing {key})")),
    };
    let driver = need("DB_DRIVER")?;
    let user = need("DB_USER")?;
    let password = need("DB_PASSWORD")?;
    let host = need("DB_HOST")?;
    let port = need("DB_PORT")?;
    let name = need("DB_NAME")?;
    Ok(format!("{driver}://{user}:{password}@{host}:{port}/{name}"))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_bool(raw: &str) -> bool {
    parse_flag(raw).unwrap_or(false)
}

/// `None` when the value is not a recognised boolean spelling.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

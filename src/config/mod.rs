pub mod credentials;

pub use credentials::ClientCredentials;

use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Source of raw configuration values, normally the process environment
pub type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("invalid API_HOST {0}")]
    InvalidHost(String),

    #[error("invalid HTTPS_PROXY {0}")]
    InvalidProxy(String),

    #[error("malformed FALLBACK_NETWORK_IDS {0:?}: empty network id")]
    MalformedFallbackList(String),

    #[error("cannot read {path}: {source}")]
    CredentialFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid client certificate or key: {0}")]
    InvalidIdentity(String),

    #[error("cannot build upstream client: {0}")]
    Client(String),
}

#[derive(Debug, Clone)]
pub struct GateConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub api_host: Url,
    pub credentials: ClientCredentials,
    pub https_proxy: Option<Url>,
    pub timeout_ms: u64,
    pub fallback_network_ids: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub token_hours: u64,
}

impl Environment {
    pub fn from_lookup(lookup: Lookup) -> Self {
        match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        }
    }

    fn default_timeout_ms(self) -> u64 {
        match self {
            Environment::Development => 30_000,
            Environment::Staging => 15_000,
            Environment::Production => 10_000,
        }
    }

    fn default_token_hours(self) -> u64 {
        match self {
            Environment::Development => 24 * 7,
            Environment::Staging => 24,
            Environment::Production => 4,
        }
    }

    fn default_jwt_secret(self) -> Option<&'static str> {
        match self {
            Environment::Development => Some("nms-gate-development-secret"),
            Environment::Staging | Environment::Production => None,
        }
    }
}

impl GateConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: Lookup) -> Result<Self, ConfigError> {
        let environment = Environment::from_lookup(lookup);

        Ok(Self {
            environment,
            server: ServerConfig::from_lookup(lookup)?,
            upstream: UpstreamConfig::from_lookup(environment, lookup)?,
            security: SecurityConfig::from_lookup(environment, lookup)?,
        })
    }
}

impl ServerConfig {
    pub fn from_lookup(lookup: Lookup) -> Result<Self, ConfigError> {
        let port = match var(lookup, "NMS_GATE_PORT") {
            Some(_) => parse_or(lookup, "NMS_GATE_PORT", 8081)?,
            None => parse_or(lookup, "PORT", 8081)?,
        };

        Ok(Self {
            bind: parse_or(lookup, "NMS_GATE_BIND", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?,
            port,
        })
    }
}

impl UpstreamConfig {
    pub fn from_lookup(environment: Environment, lookup: Lookup) -> Result<Self, ConfigError> {
        let api_host = var(lookup, "API_HOST").ok_or(ConfigError::Missing("API_HOST"))?;

        let https_proxy = var(lookup, "HTTPS_PROXY")
            .map(|raw| Url::parse(&raw).map_err(|e| ConfigError::InvalidProxy(format!("{}: {}", raw, e))))
            .transpose()?;

        let fallback_network_ids = match var(lookup, "FALLBACK_NETWORK_IDS") {
            Some(raw) => parse_fallback_list(&raw)?,
            None => Vec::new(),
        };

        Ok(Self {
            api_host: parse_api_host(&api_host)?,
            credentials: ClientCredentials::from_lookup(lookup)?,
            https_proxy,
            timeout_ms: parse_or(lookup, "API_TIMEOUT_MS", environment.default_timeout_ms())?,
            fallback_network_ids,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl SecurityConfig {
    pub fn from_lookup(environment: Environment, lookup: Lookup) -> Result<Self, ConfigError> {
        let jwt_secret = var(lookup, "SESSION_JWT_SECRET")
            .or_else(|| environment.default_jwt_secret().map(str::to_string))
            .ok_or(ConfigError::Missing("SESSION_JWT_SECRET"))?;

        Ok(Self {
            jwt_secret,
            token_hours: parse_or(lookup, "SESSION_TOKEN_HOURS", environment.default_token_hours())?,
        })
    }
}

/// Accepts `host[:port]` (assumed HTTPS) or a full URL.
pub fn parse_api_host(raw: &str) -> Result<Url, ConfigError> {
    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    };

    let url = Url::parse(&candidate).map_err(|e| ConfigError::InvalidHost(format!("{}: {}", raw, e)))?;
    if url.host_str().is_none() || !matches!(url.scheme(), "https" | "http") {
        return Err(ConfigError::InvalidHost(raw.to_string()));
    }
    Ok(url)
}

/// Comma-separated network IDs. Blank input means no fallback; a blank entry
/// between commas is an error.
pub fn parse_fallback_list(raw: &str) -> Result<Vec<String>, ConfigError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    raw.split(',')
        .map(|id| match id.trim() {
            "" => Err(ConfigError::MalformedFallbackList(raw.to_string())),
            id => Ok(id.to_string()),
        })
        .collect()
}

fn var(lookup: Lookup, key: &str) -> Option<String> {
    lookup(key).filter(|v| !v.trim().is_empty())
}

fn parse_or<T: FromStr>(lookup: Lookup, key: &'static str, default: T) -> Result<T, ConfigError> {
    match var(lookup, key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        None => Ok(default),
    }
}

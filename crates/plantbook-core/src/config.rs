use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{PlantbookError, PlantbookResult};

/// Prefix for every environment override (e.g. `OPENPLANTBOOK_API_KEY`)
pub const ENV_PREFIX: &str = "OPENPLANTBOOK_";

/// Top-level server configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantbookConfig {
    pub auth: AuthConfig,
    pub api: ApiConfig,
    pub cache: CacheConfig,
    pub log: LogConfig,
    pub tools: ToolsConfig,
}

/// Upstream credentials. Exactly one method must be configured.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// API key (read-only endpoints)
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// OAuth2 client id
    pub client_id: Option<String>,
    /// OAuth2 client secret
    #[serde(skip_serializing)]
    pub client_secret: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// The authentication method selected from [`AuthConfig`]
#[derive(Clone, PartialEq, Eq)]
pub enum AuthMethod {
    ApiKey(String),
    OAuth2 {
        client_id: String,
        client_secret: String,
    },
}

impl AuthMethod {
    pub fn name(&self) -> &'static str {
        match self {
            AuthMethod::ApiKey(_) => "api_key",
            AuthMethod::OAuth2 { .. } => "oauth2",
        }
    }
}

impl std::fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuthMethod::{}", self.name())
    }
}

impl AuthConfig {
    /// Resolve the configured credentials into a single method.
    pub fn method(&self) -> PlantbookResult<AuthMethod> {
        let api_key = non_empty(&self.api_key);
        let oauth = match (non_empty(&self.client_id), non_empty(&self.client_secret)) {
            (Some(id), Some(secret)) => Some((id, secret)),
            _ => None,
        };

        match (api_key, oauth) {
            (Some(_), Some(_)) => Err(PlantbookError::Config(
                "multiple authentication methods provided: use either api_key OR OAuth2, not both"
                    .into(),
            )),
            (Some(key), None) => Ok(AuthMethod::ApiKey(key.to_string())),
            (None, Some((id, secret))) => Ok(AuthMethod::OAuth2 {
                client_id: id.to_string(),
                client_secret: secret.to_string(),
            }),
            (None, None) => Err(PlantbookError::Config(
                "authentication required: provide either api_key OR (client_id and client_secret)"
                    .into(),
            )),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Open Plantbook REST base URL
    pub base_url: String,
    /// Per-request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// Language used for detail lookups when the caller gives none
    pub default_language: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://open.plantbook.io/api/v1".into(),
            timeout_secs: 30,
            default_language: "en".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache upstream responses in memory (default: true)
    pub enabled: bool,
    /// Cache entry lifetime in hours (default: 24)
    pub ttl_hours: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_hours: 24,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level: trace, debug, info, warn, error (default: info)
    pub level: String,
    /// Log format: "json" or "text"
    pub format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

impl LogConfig {
    /// The configured level, falling back to `info` for unrecognised values
    pub fn effective_level(&self) -> &str {
        match self.level.trim().to_ascii_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "warn" | "warning" => "warn",
            "error" => "error",
            _ => "info",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Reject non-numeric sensor values instead of skipping them
    pub strict_conditions: bool,
    /// Result count for `search_plants` when no limit is given
    pub default_search_limit: usize,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            strict_conditions: false,
            default_search_limit: 10,
        }
    }
}

impl PlantbookConfig {
    /// Load configuration with precedence: environment > config file > defaults.
    ///
    /// An explicitly given path must exist. When `path` is `None` the default
    /// location is tried and silently skipped if absent.
    pub fn load(path: Option<&Path>) -> PlantbookResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = default_config_path();
                if default.exists() {
                    Self::from_file(&default)?
                } else {
                    tracing::debug!(path = %default.display(), "no config file, using defaults");
                    Self::default()
                }
            }
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.auth.method()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> PlantbookResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PlantbookError::Config(format!("reading config {}: {e}", path.display()))
        })?;
        toml::from_str(&content)
            .map_err(|e| PlantbookError::Config(format!("parsing config {}: {e}", path.display())))
    }

    /// Overlay `OPENPLANTBOOK_*` variables. Unparseable numeric or boolean
    /// values are ignored with a warning.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}")).filter(|v| !v.is_empty());

        if let Some(v) = var("API_KEY") {
            self.auth.api_key = Some(v);
        }
        if let Some(v) = var("CLIENT_ID") {
            self.auth.client_id = Some(v);
        }
        if let Some(v) = var("CLIENT_SECRET") {
            self.auth.client_secret = Some(v);
        }
        if let Some(v) = var("BASE_URL") {
            self.api.base_url = v;
        }
        if let Some(v) = var("DEFAULT_LANGUAGE") {
            self.api.default_language = v;
        }
        if let Some(v) = var("LOG_LEVEL") {
            self.log.level = v;
        }
        if let Some(v) = var("CACHE_ENABLED") {
            match parse_bool(&v) {
                Some(enabled) => self.cache.enabled = enabled,
                None => tracing::warn!(value = %v, "ignoring invalid {ENV_PREFIX}CACHE_ENABLED"),
            }
        }
        if let Some(v) = var("CACHE_TTL_HOURS") {
            match v.trim().parse() {
                Ok(hours) => self.cache.ttl_hours = hours,
                Err(_) => tracing::warn!(value = %v, "ignoring invalid {ENV_PREFIX}CACHE_TTL_HOURS"),
            }
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// `$XDG_CONFIG_HOME/plantbook-mcp/config.toml`, falling back to `~/.config`
pub fn default_config_path() -> PathBuf {
    config_dir().join("plantbook-mcp").join("config.toml")
}

fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
[auth]
client_id = "my-client"
client_secret = "my-secret"

[api]
base_url = "http://localhost:8080/api/v1"
timeout_secs = 5
default_language = "de"

[cache]
enabled = false
ttl_hours = 1

[log]
level = "debug"
format = "json"

[tools]
strict_conditions = true
default_search_limit = 25
"#;
        let config: PlantbookConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(config.api.base_url, "http://localhost:8080/api/v1");
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.api.default_language, "de");
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.ttl_hours, 1);
        assert_eq!(config.log.effective_level(), "debug");
        assert_eq!(config.log.format, "json");
        assert!(config.tools.strict_conditions);
        assert_eq!(config.tools.default_search_limit, 25);
        assert_eq!(
            config.auth.method().unwrap(),
            AuthMethod::OAuth2 {
                client_id: "my-client".into(),
                client_secret: "my-secret".into(),
            }
        );
    }

    #[test]
    fn test_parse_defaults() {
        let config: PlantbookConfig = toml::from_str("").unwrap();

        assert_eq!(config.api.base_url, "https://open.plantbook.io/api/v1");
        assert_eq!(config.api.default_language, "en");
        assert!(config.cache.enabled);
        assert_eq!(config.cache.ttl_hours, 24);
        assert_eq!(config.log.level, "info");
        assert!(!config.tools.strict_conditions);
        assert_eq!(config.tools.default_search_limit, 10);
    }

    #[test]
    fn test_missing_auth_rejected() {
        let err = AuthConfig::default().method().unwrap_err();
        assert!(err.to_string().contains("authentication required"));

        // A lone client id is not a complete OAuth2 configuration
        let partial = AuthConfig {
            client_id: Some("id".into()),
            ..Default::default()
        };
        assert!(partial.method().is_err());
    }

    #[test]
    fn test_multiple_auth_rejected() {
        let auth = AuthConfig {
            api_key: Some("key".into()),
            client_id: Some("id".into()),
            client_secret: Some("secret".into()),
        };
        let err = auth.method().unwrap_err();
        assert!(err.to_string().contains("multiple authentication methods"));
    }

    #[test]
    fn test_blank_values_are_unset() {
        let auth = AuthConfig {
            api_key: Some("  ".into()),
            client_id: Some("id".into()),
            client_secret: Some("secret".into()),
        };
        assert_eq!(auth.method().unwrap().name(), "oauth2");
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config: PlantbookConfig = toml::from_str(
            r#"
[auth]
api_key = "from-file"

[cache]
ttl_hours = 48
"#,
        )
        .unwrap();

        config.apply_env(env(&[
            ("OPENPLANTBOOK_API_KEY", "from-env"),
            ("OPENPLANTBOOK_CACHE_ENABLED", "false"),
            ("OPENPLANTBOOK_CACHE_TTL_HOURS", "not-a-number"),
            ("OPENPLANTBOOK_DEFAULT_LANGUAGE", "es"),
        ]));

        assert_eq!(
            config.auth.method().unwrap(),
            AuthMethod::ApiKey("from-env".into())
        );
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.ttl_hours, 48);
        assert_eq!(config.api.default_language, "es");
    }

    #[test]
    fn test_unknown_log_level_falls_back_to_info() {
        let log = LogConfig {
            level: "verbose".into(),
            ..Default::default()
        };
        assert_eq!(log.effective_level(), "info");
    }

    #[test]
    fn test_from_file_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[auth]\napi_key = \"abc\"\n").unwrap();

        let config = PlantbookConfig::from_file(&path).unwrap();
        assert_eq!(config.auth.method().unwrap().name(), "api_key");

        let missing = PlantbookConfig::from_file(&dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(PlantbookError::Config(_))));
    }

    #[test]
    fn test_secrets_not_serialized() {
        let config = PlantbookConfig {
            auth: AuthConfig {
                api_key: Some("super-secret".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let toml_str = toml::to_string(&config).unwrap();
        assert!(!toml_str.contains("super-secret"));
        assert!(!format!("{config:?}").contains("super-secret"));
    }
}

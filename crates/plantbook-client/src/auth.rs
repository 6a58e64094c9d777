//! Upstream authentication: static API key or OAuth2 client credentials.
//!
//! OAuth2 access tokens are fetched lazily and reused until shortly before
//! they expire. The token slot is a tokio mutex held across the refresh so
//! concurrent tool calls trigger a single token request.

use std::time::{Duration, Instant};

use plantbook_core::config::AuthMethod;
use plantbook_core::{PlantbookError, PlantbookResult};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::Mutex;

/// Refresh this long before the upstream-reported expiry
pub const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Upper bound on how long an access token is trusted, whatever the
/// upstream reports
pub const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(24 * 3600);

/// Upstream credentials; secrets never appear in `Debug` output.
#[derive(Debug)]
pub enum Credentials {
    ApiKey(SecretString),
    OAuth2 {
        client_id: String,
        client_secret: SecretString,
    },
}

impl Credentials {
    pub fn method_name(&self) -> &'static str {
        match self {
            Credentials::ApiKey(_) => "api_key",
            Credentials::OAuth2 { .. } => "oauth2",
        }
    }
}

impl From<AuthMethod> for Credentials {
    fn from(method: AuthMethod) -> Self {
        match method {
            AuthMethod::ApiKey(key) => Credentials::ApiKey(SecretString::from(key)),
            AuthMethod::OAuth2 {
                client_id,
                client_secret,
            } => Credentials::OAuth2 {
                client_id,
                client_secret: SecretString::from(client_secret),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

struct AccessToken {
    value: SecretString,
    expires_at: Instant,
}

impl AccessToken {
    fn expiry(now: Instant, expires_in: u64) -> Instant {
        let lifetime = Duration::from_secs(expires_in).min(MAX_TOKEN_LIFETIME);
        now.checked_add(lifetime).unwrap_or(now)
    }

    fn is_fresh(&self, now: Instant) -> bool {
        now + TOKEN_EXPIRY_MARGIN < self.expires_at
    }
}

pub struct Authenticator {
    credentials: Credentials,
    token: Mutex<Option<AccessToken>>,
}

impl Authenticator {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            token: Mutex::new(None),
        }
    }

    pub fn method_name(&self) -> &'static str {
        self.credentials.method_name()
    }

    /// Value for the `Authorization` header of an API request.
    pub async fn authorization(
        &self,
        http: &reqwest::Client,
        token_url: reqwest::Url,
    ) -> PlantbookResult<String> {
        match &self.credentials {
            Credentials::ApiKey(key) => Ok(format!("Token {}", key.expose_secret())),
            Credentials::OAuth2 {
                client_id,
                client_secret,
            } => {
                let mut slot = self.token.lock().await;
                if let Some(token) = slot.as_ref().filter(|t| t.is_fresh(Instant::now())) {
                    return Ok(format!("Bearer {}", token.value.expose_secret()));
                }

                let token = fetch_token(http, token_url, client_id, client_secret).await?;
                let header = format!("Bearer {}", token.value.expose_secret());
                *slot = Some(token);
                Ok(header)
            }
        }
    }

    /// Drop any cached access token, forcing a refresh on the next request.
    pub async fn invalidate(&self) {
        self.token.lock().await.take();
    }
}

async fn fetch_token(
    http: &reqwest::Client,
    token_url: reqwest::Url,
    client_id: &str,
    client_secret: &SecretString,
) -> PlantbookResult<AccessToken> {
    tracing::debug!(client_id, "requesting OAuth2 access token");

    let response = http
        .post(token_url)
        .form(&[
            ("grant_type", "client_credentials"),
            ("client_id", client_id),
            ("client_secret", client_secret.expose_secret()),
        ])
        .send()
        .await
        .map_err(|e| PlantbookError::Transport(format!("token request: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(PlantbookError::Auth(format!(
            "token endpoint returned {status}: {}",
            body.trim()
        )));
    }

    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| PlantbookError::Decode(format!("token response: {e}")))?;

    tracing::info!(expires_in = token.expires_in, "OAuth2 access token acquired");

    Ok(AccessToken {
        value: SecretString::from(token.access_token),
        expires_at: AccessToken::expiry(Instant::now(), token.expires_in),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_freshness_respects_margin() {
        let now = Instant::now();
        let fresh = AccessToken {
            value: SecretString::from("t".to_string()),
            expires_at: now + Duration::from_secs(3600),
        };
        let nearly_expired = AccessToken {
            value: SecretString::from("t".to_string()),
            expires_at: now + Duration::from_secs(30),
        };
        assert!(fresh.is_fresh(now));
        assert!(!nearly_expired.is_fresh(now));
    }

    #[test]
    fn token_expiry_is_clamped() {
        let now = Instant::now();
        assert_eq!(
            AccessToken::expiry(now, 3600),
            now + Duration::from_secs(3600)
        );
        assert_eq!(AccessToken::expiry(now, u64::MAX), now + MAX_TOKEN_LIFETIME);
        assert_eq!(AccessToken::expiry(now, 0), now);
    }

    #[test]
    fn credentials_from_auth_method() {
        let creds = Credentials::from(AuthMethod::OAuth2 {
            client_id: "id".into(),
            client_secret: "shh".into(),
        });
        assert_eq!(creds.method_name(), "oauth2");
        assert!(!format!("{creds:?}").contains("shh"));
    }

    #[tokio::test]
    async fn api_key_header() {
        let auth = Authenticator::new(Credentials::ApiKey(SecretString::from(
            "abc123".to_string(),
        )));
        let url = reqwest::Url::parse("http://127.0.0.1:9/token/").unwrap();
        let header = auth
            .authorization(&reqwest::Client::new(), url)
            .await
            .unwrap();
        assert_eq!(header, "Token abc123");
    }
}

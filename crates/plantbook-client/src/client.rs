//! Open Plantbook REST client

use std::time::Duration;

use async_trait::async_trait;
use plantbook_core::config::PlantbookConfig;
use plantbook_core::types::{PlantDetails, PlantSearchResult, SearchPage};
use plantbook_core::{PlantbookError, PlantbookResult};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::auth::{Authenticator, Credentials};
use crate::cache::TtlCache;
use crate::PlantProvider;

/// Longest upstream error body quoted back to the caller
const MAX_ERROR_BODY: usize = 200;

/// Everything needed to build an [`OpenPlantbookClient`]
#[derive(Debug)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub credentials: Credentials,
    /// Response cache lifetime; `None` disables caching
    pub cache_ttl: Option<Duration>,
}

impl ClientConfig {
    /// Derive client settings from the loaded server configuration.
    pub fn from_core(config: &PlantbookConfig) -> PlantbookResult<Self> {
        let credentials = Credentials::from(config.auth.method()?);
        let cache_ttl = (config.cache.enabled && config.cache.ttl_hours > 0)
            .then(|| Duration::from_secs(config.cache.ttl_hours.saturating_mul(3600)));

        Ok(Self {
            base_url: config.api.base_url.clone(),
            timeout: Duration::from_secs(config.api.timeout_secs.max(1)),
            credentials,
            cache_ttl,
        })
    }
}

type SearchKey = (String, usize);
type DetailKey = (String, String);

pub struct OpenPlantbookClient {
    http: reqwest::Client,
    base_url: Url,
    auth: Authenticator,
    search_cache: Option<TtlCache<SearchKey, Vec<PlantSearchResult>>>,
    detail_cache: Option<TtlCache<DetailKey, PlantDetails>>,
}

impl OpenPlantbookClient {
    pub fn new(config: ClientConfig) -> PlantbookResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            PlantbookError::Config(format!("invalid base_url {:?}: {e}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(PlantbookError::Config(format!(
                "invalid base_url {:?}: not a hierarchical URL",
                config.base_url
            )));
        }
        if base_url.scheme() == "http" {
            tracing::warn!(
                base_url = %base_url,
                "API base URL uses plaintext HTTP; credentials are transmitted unencrypted"
            );
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("plantbook-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PlantbookError::Transport(format!("building HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            auth: Authenticator::new(config.credentials),
            search_cache: config.cache_ttl.map(TtlCache::new),
            detail_cache: config.cache_ttl.map(TtlCache::new),
        })
    }

    pub fn auth_method(&self) -> &'static str {
        self.auth.method_name()
    }

    pub fn cache_enabled(&self) -> bool {
        self.detail_cache.is_some()
    }

    /// `base_url` joined with the given path segments. An empty final
    /// segment produces the trailing slash the API expects.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        endpoint(&self.base_url, segments)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
        pid: Option<&str>,
    ) -> PlantbookResult<T> {
        let token_url = self.endpoint(&["token", ""]);
        let authorization = self.auth.authorization(&self.http, token_url).await?;

        tracing::debug!(url = %url, "upstream request");
        let response = self
            .http
            .get(url)
            .query(query)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .send()
            .await
            .map_err(|e| PlantbookError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            if status == StatusCode::UNAUTHORIZED {
                self.auth.invalidate().await;
            }
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body, pid));
        }

        response
            .json()
            .await
            .map_err(|e| PlantbookError::Decode(e.to_string()))
    }
}

pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Map a non-success upstream response onto the crate error type.
pub(crate) fn status_error(status: StatusCode, body: &str, pid: Option<&str>) -> PlantbookError {
    match (status, pid) {
        (StatusCode::NOT_FOUND, Some(pid)) => PlantbookError::NotFound(pid.to_string()),
        (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN, _) => {
            PlantbookError::Auth(format!("upstream rejected credentials ({status})"))
        }
        _ => {
            let mut message: String = body.trim().chars().take(MAX_ERROR_BODY).collect();
            if message.is_empty() {
                message = status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string();
            }
            PlantbookError::Upstream {
                status: status.as_u16(),
                message,
            }
        }
    }
}

#[async_trait]
impl PlantProvider for OpenPlantbookClient {
    async fn search(&self, query: &str, limit: usize) -> PlantbookResult<Vec<PlantSearchResult>> {
        let key = (query.to_string(), limit);
        if let Some(hit) = self.search_cache.as_ref().and_then(|c| c.get(&key)) {
            tracing::debug!(query, limit, "search cache hit");
            return Ok(hit);
        }

        let limit_param = limit.to_string();
        let page: SearchPage = self
            .get_json(
                self.endpoint(&["plant", "search"]),
                &[("alias", query), ("limit", &limit_param)],
                None,
            )
            .await?;

        // The API treats limit as a hint; enforce it.
        let mut results = page.results;
        results.truncate(limit);

        if let Some(cache) = &self.search_cache {
            cache.insert(key, results.clone());
        }
        Ok(results)
    }

    async fn details(&self, pid: &str, language: &str) -> PlantbookResult<PlantDetails> {
        let key = (pid.to_string(), language.to_string());
        if let Some(hit) = self.detail_cache.as_ref().and_then(|c| c.get(&key)) {
            tracing::debug!(pid, language, "detail cache hit");
            return Ok(hit);
        }

        let url = self.endpoint(&["plant", "detail", pid, ""]);
        let lang = [("lang", language)];
        let query = if language.is_empty() { &lang[..0] } else { &lang[..] };
        let details: PlantDetails = self.get_json(url, query, Some(pid)).await?;

        if let Some(cache) = &self.detail_cache {
            cache.insert(key, details.clone());
        }
        Ok(details)
    }
}

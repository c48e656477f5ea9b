//! Single-shot HTTP fetcher.
//!
//! No retries and no redirect policy beyond reqwest's defaults. A timeout is
//! applied only when one is configured explicitly.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};

use crate::types::{FetchError, FetchOutcome, FetchResult, HttpMethod, RequestSpec};

pub const USER_AGENT: &str = concat!("pagefetch/", env!("CARGO_PKG_VERSION"));

const JSON_CONTENT_TYPE: &str = "application/json";

/// Anything that can turn a [`RequestSpec`] into a [`FetchResult`].
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, spec: &RequestSpec) -> FetchOutcome<FetchResult>;
}

/// Fetcher backed by a shared `reqwest::Client`.
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    /// Client with the transport's default timeout behaviour.
    pub fn new() -> FetchOutcome<Self> {
        Self::build(None)
    }

    /// Client with an overall per-request timeout.
    pub fn with_timeout(timeout: Duration) -> FetchOutcome<Self> {
        Self::build(Some(timeout))
    }

    fn build(timeout: Option<Duration>) -> FetchOutcome<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| FetchError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, spec: &RequestSpec) -> FetchOutcome<FetchResult> {
        let headers = merge_headers(&spec.headers)?;

        tracing::debug!("{} {}", spec.method, spec.url);

        let mut request = self
            .client
            .request(spec.method.into(), spec.url.clone())
            .headers(headers);

        if let Some(body) = &spec.body {
            if spec.method == HttpMethod::Get {
                tracing::warn!("Ignoring request body on GET {}", spec.url);
            } else {
                request = request.body(body.clone());
            }
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("{} {} returned {}", spec.method, spec.url, status);
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains(JSON_CONTENT_TYPE));

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(format!("failed to read response body: {e}")))?;

        if is_json {
            serde_json::from_str(&body)
                .map(FetchResult::Json)
                .map_err(|e| FetchError::Decode(e.to_string()))
        } else {
            Ok(FetchResult::Text(body))
        }
    }
}

/// Build outgoing headers: caller headers first, then the fixed JSON content type.
///
/// The fixed `Content-Type` replaces any caller-supplied one.
pub fn merge_headers(headers: &HashMap<String, String>) -> FetchOutcome<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len() + 1);

    for (name, value) in headers {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| FetchError::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| FetchError::InvalidHeader {
            name: name.clone(),
            reason: e.to_string(),
        })?;
        map.insert(header_name, header_value);
    }

    map.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    Ok(map)
}

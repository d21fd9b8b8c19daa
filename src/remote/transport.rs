//! HTTP transport for the JYP API.
//!
//! # Security Note - Logging
//!
//! The bearer token is read from the credential store per request and the
//! resulting header is marked sensitive, so reqwest and `http` print it as
//! `Sensitive` even with debug logging enabled.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{self, HeaderValue};
use reqwest::{Client, Method};
use secrecy::ExposeSecret;
use serde_json::Value;
use url::Url;

use crate::config::Config;
use crate::error::{JypError, Result};
use crate::storage::{CredentialKey, CredentialStore};

use super::Envelope;

/// One API call: method, path segments under the base URL and optional
/// JSON body.
///
/// Segments are kept apart until the URL is built, so an id containing `/`,
/// `?` or `#` stays inside its own segment.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub segments: Vec<String>,
    pub body: Option<Value>,
    /// Attach the stored access token
    pub authenticated: bool,
}

impl ApiRequest {
    pub fn new<I, S>(method: Method, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            body: None,
            authenticated: true,
        }
    }

    pub fn get<I: IntoIterator<Item = S>, S: Into<String>>(segments: I) -> Self {
        Self::new(Method::GET, segments)
    }

    pub fn post<I: IntoIterator<Item = S>, S: Into<String>>(segments: I) -> Self {
        Self::new(Method::POST, segments)
    }

    pub fn patch<I: IntoIterator<Item = S>, S: Into<String>>(segments: I) -> Self {
        Self::new(Method::PATCH, segments)
    }

    pub fn put<I: IntoIterator<Item = S>, S: Into<String>>(segments: I) -> Self {
        Self::new(Method::PUT, segments)
    }

    pub fn delete<I: IntoIterator<Item = S>, S: Into<String>>(segments: I) -> Self {
        Self::new(Method::DELETE, segments)
    }

    pub fn json(mut self, body: &impl serde::Serialize) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn anonymous(mut self) -> Self {
        self.authenticated = false;
        self
    }

    /// Segments joined with `/`, unescaped. For logs and mock routing.
    pub fn path(&self) -> String {
        self.segments.join("/")
    }

    /// Reject segments that would be empty or resolve as `.`/`..`.
    pub fn check_segments(&self) -> Result<()> {
        match self
            .segments
            .iter()
            .find(|s| s.is_empty() || s.as_str() == "." || s.as_str() == "..")
        {
            Some(segment) => Err(JypError::InvalidPathSegment(segment.clone())),
            None => Ok(()),
        }
    }
}

/// Sends API requests and returns the raw envelope.
///
/// Each call resolves to the response of that request only.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<Envelope<Value>>;
}

/// reqwest-backed transport.
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    credentials: Arc<dyn CredentialStore>,
}

impl HttpTransport {
    /// Build a transport from configuration.
    ///
    /// Configures the HTTP client with the configured request timeout and a
    /// 10s connect timeout.
    pub fn from_config(config: &Config, credentials: Arc<dyn CredentialStore>) -> Result<Self> {
        Self::new(&config.api_base_url(), config.request_timeout(), credentials)
    }

    pub fn new(
        base_url: &str,
        timeout: Duration,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url)?;

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    /// Append the request's segments to the base URL, percent-encoding each.
    pub fn url_for(&self, request: &ApiRequest) -> Result<Url> {
        request.check_segments()?;
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| JypError::Config(format!("API base URL '{}' cannot have a path", self.base_url)))?
            .pop_if_empty()
            .extend(&request.segments);
        Ok(url)
    }

    fn bearer(&self) -> Result<HeaderValue> {
        let token = self
            .credentials
            .get(CredentialKey::AccessToken)
            .ok_or(JypError::Unauthenticated)?;
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|_| JypError::Other("access token is not a valid header value".to_string()))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<Envelope<Value>> {
        let url = self.url_for(&request)?;
        tracing::debug!(method = %request.method, %url, "API request");

        let mut builder = self.client.request(request.method.clone(), url);
        if request.authenticated {
            builder = builder.header(header::AUTHORIZATION, self.bearer()?);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        match serde_json::from_slice::<Envelope<Value>>(&bytes) {
            Ok(envelope) => {
                if !envelope.is_success() {
                    tracing::debug!(code = %envelope.code, "API returned error envelope");
                }
                Ok(envelope)
            }
            Err(e) if status.is_success() => Err(JypError::Json(e)),
            Err(_) => Err(JypError::server(
                status.as_u16().to_string(),
                status
                    .canonical_reason()
                    .unwrap_or("unexpected response")
                    .to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryCredentialStore;

    fn transport(base: &str) -> HttpTransport {
        HttpTransport::new(
            base,
            Duration::from_secs(5),
            Arc::new(MemoryCredentialStore::new()),
        )
        .unwrap()
    }

    fn url(t: &HttpTransport, segments: &[&str]) -> Result<String> {
        t.url_for(&ApiRequest::get(segments.iter().copied()))
            .map(|u| u.to_string())
    }

    #[test]
    fn test_url_keeps_base_path() {
        for base in ["https://api.example.test/v1", "https://api.example.test/v1/"] {
            let t = transport(base);
            assert_eq!(
                url(&t, &["journeys", "j1"]).unwrap(),
                "https://api.example.test/v1/journeys/j1"
            );
            assert_eq!(
                url(&t, &["users", "me"]).unwrap(),
                "https://api.example.test/v1/users/me"
            );
        }
    }

    #[test]
    fn test_ids_stay_inside_their_segment() {
        let t = transport("https://api.example.test/v1");
        assert_eq!(
            url(&t, &["journeys", "../../admin"]).unwrap(),
            "https://api.example.test/v1/journeys/..%2F..%2Fadmin"
        );
        assert_eq!(
            url(&t, &["journeys", "abc?x=1"]).unwrap(),
            "https://api.example.test/v1/journeys/abc%3Fx=1"
        );
        assert_eq!(
            url(&t, &["journeys", "abc#frag"]).unwrap(),
            "https://api.example.test/v1/journeys/abc%23frag"
        );
    }

    #[test]
    fn test_dot_and_empty_segments_rejected() {
        let t = transport("https://api.example.test/v1");
        for segment in ["..", ".", ""] {
            assert!(matches!(
                url(&t, &["journeys", segment]),
                Err(JypError::InvalidPathSegment(s)) if s == segment
            ));
        }
    }

    #[test]
    fn test_bearer_requires_token() {
        let t = transport("https://api.example.test/");
        assert!(matches!(t.bearer(), Err(JypError::Unauthenticated)));

        t.credentials
            .set(CredentialKey::AccessToken, "tok-1")
            .unwrap();
        let value = t.bearer().unwrap();
        assert!(value.is_sensitive());
        assert_eq!(value.to_str().unwrap(), "Bearer tok-1");
    }

    #[test]
    fn test_request_builders() {
        let req = ApiRequest::post(["auth", "kakao"])
            .json(&serde_json::json!({"token": "t"}))
            .unwrap()
            .anonymous();
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.path(), "auth/kakao");
        assert!(!req.authenticated);
        assert_eq!(req.body, Some(serde_json::json!({"token": "t"})));
    }
}

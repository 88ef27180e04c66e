//! REST Context
//!
//! Shared request plumbing for all API modules: URL/query building, session
//! cookie binding, and response classification.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::core::transport::{HttpMethod, HttpRequest, HttpTransport};
use crate::error::{classify_status, ConfigError, IikoServerError, ProtocolError};

/// Cookie carrying the session key on authenticated requests.
pub const AUTH_COOKIE: &str = "iikoCookieAuth";

/// Shared slot holding the current session token.
///
/// Written only by the token authority's fetch protocol, read by every
/// outbound request. The cookie header is rebuilt from this slot per request,
/// so a completed refresh is visible to all subsequent calls immediately.
#[derive(Clone, Default)]
pub struct TokenSlot {
    inner: Arc<RwLock<Option<String>>>,
}

impl TokenSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<String> {
        self.inner.read().unwrap().clone()
    }

    pub fn set(&self, token: String) {
        *self.inner.write().unwrap() = Some(token);
    }

    pub fn clear(&self) {
        *self.inner.write().unwrap() = None;
    }

    pub fn is_present(&self) -> bool {
        self.inner.read().unwrap().is_some()
    }
}

/// Request context bound to one server and one credential's token slot.
pub struct RestContext<T: HttpTransport> {
    base_url: String,
    transport: Arc<T>,
    slot: TokenSlot,
    timeout: Duration,
}

impl<T: HttpTransport> RestContext<T> {
    pub fn new(host: &str, transport: Arc<T>, slot: TokenSlot) -> Result<Self, IikoServerError> {
        let parsed = Url::parse(host).map_err(|_| {
            IikoServerError::Config(ConfigError::InvalidHost {
                host: host.to_string(),
            })
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(IikoServerError::Config(ConfigError::InvalidHost {
                host: host.to_string(),
            }));
        }

        Ok(Self {
            base_url: host.trim_end_matches('/').to_string(),
            transport,
            slot,
            timeout: Duration::from_secs(30),
        })
    }

    pub fn slot(&self) -> &TokenSlot {
        &self.slot
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, path: &str, query: &[(&str, String)]) -> String {
        let mut url = format!("{}{}", self.base_url, path);
        if !query.is_empty() {
            let encoded: Vec<String> = query
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect();
            url.push('?');
            url.push_str(&encoded.join("&"));
        }
        url
    }

    fn build_headers(&self, json_body: bool) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        if let Some(token) = self.slot.get() {
            headers.insert("cookie".to_string(), format!("{}={}", AUTH_COOKIE, token));
        }
        if json_body {
            headers.insert("content-type".to_string(), "application/json".to_string());
        }
        headers
    }

    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        query: &[(&str, String)],
        body: Option<String>,
    ) -> Result<String, IikoServerError> {
        let request = HttpRequest {
            method,
            url: self.build_url(path, query),
            headers: self.build_headers(body.is_some()),
            body,
            timeout: Some(self.timeout),
        };

        let response = self.transport.send(request).await?;
        if !(200..300).contains(&response.status) {
            return Err(classify_status(response.status, &response.body));
        }
        Ok(response.body)
    }

    /// GET returning the raw body (token strings, XML search results).
    pub async fn get_text(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<String, IikoServerError> {
        self.send(HttpMethod::Get, path, query, None).await
    }

    /// GET returning a JSON-decoded body.
    pub async fn get_json<R: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<R, IikoServerError> {
        let body = self.send(HttpMethod::Get, path, query, None).await?;
        decode_json(&body)
    }

    /// POST with a JSON body, returning a JSON-decoded body.
    pub async fn post_json<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> Result<R, IikoServerError> {
        let encoded = serde_json::to_string(body).map_err(|e| {
            IikoServerError::Protocol(ProtocolError::InvalidJson {
                message: e.to_string(),
            })
        })?;
        let body = self
            .send(HttpMethod::Post, path, query, Some(encoded))
            .await?;
        decode_json(&body)
    }
}

fn decode_json<R: DeserializeOwned>(body: &str) -> Result<R, IikoServerError> {
    serde_json::from_str(body).map_err(|e| {
        IikoServerError::Protocol(ProtocolError::InvalidJson {
            message: e.to_string(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transport::MockHttpTransport;

    fn context(transport: Arc<MockHttpTransport>) -> RestContext<MockHttpTransport> {
        RestContext::new("https://srv.example/", transport, TokenSlot::new()).unwrap()
    }

    #[test]
    fn test_rejects_invalid_host() {
        let transport = Arc::new(MockHttpTransport::new());
        assert!(RestContext::new("not a url", transport.clone(), TokenSlot::new()).is_err());
        assert!(RestContext::new("ftp://srv.example", transport, TokenSlot::new()).is_err());
    }

    #[tokio::test]
    async fn test_cookie_bound_from_slot() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.set_default_response(200, "ok");
        let ctx = context(transport.clone());

        ctx.get_text("/resto/api/ping", &[]).await.unwrap();
        let without_token = transport.last_request().unwrap();
        assert!(!without_token.headers.contains_key("cookie"));

        ctx.slot().set("session-1".to_string());
        ctx.get_text("/resto/api/ping", &[]).await.unwrap();
        let with_token = transport.last_request().unwrap();
        assert_eq!(
            with_token.headers.get("cookie").unwrap(),
            "iikoCookieAuth=session-1"
        );
    }

    #[tokio::test]
    async fn test_query_encoding_and_repeated_params() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.set_default_response(200, "[]");
        let ctx = context(transport.clone());

        ctx.get_text(
            "/resto/api/v2/entities/list",
            &[
                ("rootType", "Discount Type".to_string()),
                ("ids", "a".to_string()),
                ("ids", "b".to_string()),
            ],
        )
        .await
        .unwrap();

        let url = transport.last_request().unwrap().url;
        assert!(url.contains("rootType=Discount%20Type"));
        assert!(url.contains("ids=a&ids=b"));
    }

    #[tokio::test]
    async fn test_non_2xx_classified() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_response(401, "expired");
        let ctx = context(transport);

        let err = ctx.get_text("/resto/api/ping", &[]).await.unwrap_err();
        assert!(err.is_unauthorized());
    }
}

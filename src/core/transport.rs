//! HTTP Transport
//!
//! HTTP client interface and implementations. The transport carries no
//! implicit session state: the session cookie is set explicitly on every
//! request from the token authority's slot.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

use crate::error::{IikoServerError, NetworkError, ProtocolError};

/// HTTP request definition.
#[derive(Clone, Debug)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
    pub timeout: Option<Duration>,
}

/// HTTP method. The iiko server API uses only GET and POST.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// HTTP response definition.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// HTTP transport interface (for dependency injection).
#[async_trait]
pub trait HttpTransport: Send + Sync + 'static {
    /// Send an HTTP request.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, IikoServerError>;
}

/// Default reqwest-based HTTP transport.
///
/// Built without a cookie store: the explicit token slot is the single source
/// of truth for the session, never an implicit cookie jar.
pub struct ReqwestHttpTransport {
    client: reqwest::Client,
    default_timeout: Duration,
}

impl ReqwestHttpTransport {
    /// Create new transport with default settings.
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Create transport with a custom default timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .cookie_store(false)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            default_timeout: timeout,
        }
    }
}

impl Default for ReqwestHttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestHttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, IikoServerError> {
        let timeout = request.timeout.unwrap_or(self.default_timeout);

        let mut req_builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        for (key, value) in &request.headers {
            req_builder = req_builder.header(key, value);
        }

        if let Some(body) = request.body {
            req_builder = req_builder.body(body);
        }

        let response = req_builder.timeout(timeout).send().await.map_err(|e| {
            if e.is_timeout() {
                IikoServerError::Network(NetworkError::Timeout { timeout })
            } else {
                IikoServerError::Network(NetworkError::ConnectionFailed {
                    message: e.to_string(),
                })
            }
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            IikoServerError::Protocol(ProtocolError::InvalidResponse {
                message: e.to_string(),
            })
        })?;

        Ok(HttpResponse { status, body })
    }
}

/// Mock HTTP transport for testing.
///
/// Responses are served in FIFO order; `set_latency` delays every send so
/// concurrency tests can overlap in-flight requests.
#[derive(Default)]
pub struct MockHttpTransport {
    responses: std::sync::Mutex<std::collections::VecDeque<HttpResponse>>,
    request_history: std::sync::Mutex<Vec<HttpRequest>>,
    default_response: std::sync::Mutex<Option<HttpResponse>>,
    latency: std::sync::Mutex<Option<Duration>>,
}

impl MockHttpTransport {
    /// Create new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response to return.
    pub fn queue_response(&self, status: u16, body: impl Into<String>) -> &Self {
        self.responses.lock().unwrap().push_back(HttpResponse {
            status,
            body: body.into(),
        });
        self
    }

    /// Queue a JSON response.
    pub fn queue_json_response<T: serde::Serialize>(&self, status: u16, body: &T) -> &Self {
        self.queue_response(status, serde_json::to_string(body).unwrap())
    }

    /// Set default response when queue is empty.
    pub fn set_default_response(&self, status: u16, body: impl Into<String>) -> &Self {
        *self.default_response.lock().unwrap() = Some(HttpResponse {
            status,
            body: body.into(),
        });
        self
    }

    /// Delay every send by the given duration.
    pub fn set_latency(&self, latency: Duration) -> &Self {
        *self.latency.lock().unwrap() = Some(latency);
        self
    }

    /// Get request history.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.request_history.lock().unwrap().clone()
    }

    /// Count of requests whose URL contains the given fragment.
    pub fn request_count(&self, url_fragment: &str) -> usize {
        self.request_history
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url.contains(url_fragment))
            .count()
    }

    /// Get last request.
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.request_history.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl HttpTransport for MockHttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, IikoServerError> {
        self.request_history.lock().unwrap().push(request);

        let latency = *self.latency.lock().unwrap();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .or_else(|| self.default_response.lock().unwrap().clone());

        response.ok_or_else(|| {
            IikoServerError::Network(NetworkError::ConnectionFailed {
                message: "No mock response available".to_string(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_transport_fifo() {
        let transport = MockHttpTransport::new();
        transport.queue_response(200, "first");
        transport.queue_response(200, "second");

        let request = HttpRequest {
            method: HttpMethod::Get,
            url: "https://example.com/resto/api/auth".to_string(),
            headers: HashMap::new(),
            body: None,
            timeout: None,
        };

        let first = transport.send(request.clone()).await.unwrap();
        let second = transport.send(request).await.unwrap();
        assert_eq!(first.body, "first");
        assert_eq!(second.body, "second");
        assert_eq!(transport.request_count("/resto/api/auth"), 2);
    }

    #[tokio::test]
    async fn test_mock_transport_default_response() {
        let transport = MockHttpTransport::new();
        transport.set_default_response(200, "fallback");

        let request = HttpRequest {
            method: HttpMethod::Post,
            url: "https://example.com/x".to_string(),
            headers: HashMap::new(),
            body: Some("{}".to_string()),
            timeout: None,
        };

        let response = transport.send(request).await.unwrap();
        assert_eq!(response.body, "fallback");
    }

    #[test]
    fn test_http_method_as_str() {
        assert_eq!(HttpMethod::Get.as_str(), "GET");
        assert_eq!(HttpMethod::Post.as_str(), "POST");
    }
}

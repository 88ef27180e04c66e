//! Session API
//!
//! Remote auth and logout endpoints. Error interpretation (invalid
//! credentials vs transient failure) is the token authority's job.

use std::sync::Arc;

use crate::core::{HttpTransport, RestContext};
use crate::error::IikoServerError;

pub const AUTH_PATH: &str = "/resto/api/auth";
pub const LOGOUT_PATH: &str = "/resto/api/logout";

pub struct SessionApi<T: HttpTransport> {
    ctx: Arc<RestContext<T>>,
}

impl<T: HttpTransport> SessionApi<T> {
    pub fn new(ctx: Arc<RestContext<T>>) -> Self {
        Self { ctx }
    }

    /// Exchange login + SHA1(password) for an opaque session key.
    pub async fn auth(&self, login: &str, password_hash: &str) -> Result<String, IikoServerError> {
        let body = self
            .ctx
            .get_text(
                AUTH_PATH,
                &[
                    ("login", login.to_string()),
                    ("pass", password_hash.to_string()),
                ],
            )
            .await?;
        // The server returns the bare key, possibly with surrounding
        // whitespace or quotes.
        Ok(body.trim().trim_matches('"').to_string())
    }

    /// Invalidate a session key server-side, releasing its license seat.
    pub async fn logout(&self, key: &str) -> Result<(), IikoServerError> {
        self.ctx
            .get_text(LOGOUT_PATH, &[("key", key.to_string())])
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MockHttpTransport, TokenSlot};

    fn session(transport: Arc<MockHttpTransport>) -> SessionApi<MockHttpTransport> {
        let ctx = RestContext::new("https://srv.example", transport, TokenSlot::new()).unwrap();
        SessionApi::new(Arc::new(ctx))
    }

    #[tokio::test]
    async fn test_auth_builds_query_and_trims_token() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_response(200, "\"session-key\"\n");
        let api = session(transport.clone());

        let token = api.auth("admin", "deadbeef").await.unwrap();
        assert_eq!(token, "session-key");

        let url = transport.last_request().unwrap().url;
        assert!(url.starts_with("https://srv.example/resto/api/auth?"));
        assert!(url.contains("login=admin"));
        assert!(url.contains("pass=deadbeef"));
    }

    #[tokio::test]
    async fn test_logout_passes_key() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_response(200, "");
        let api = session(transport.clone());

        api.logout("session-key").await.unwrap();
        let url = transport.last_request().unwrap().url;
        assert!(url.contains("/resto/api/logout?key=session-key"));
    }
}

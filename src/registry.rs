//! Client Registry
//!
//! One client facade per credential key, created on demand. The registry
//! composes the authority registry so clients sharing a key also share one
//! token authority and one session.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::client::IikoServerClient;
use crate::config::IikoServerConfig;
use crate::core::{
    CredentialKey, Credentials, HttpTransport, ReqwestHttpTransport, RestContext, TokenSlot,
};
use crate::error::IikoServerResult;
use crate::token::AuthorityRegistry;

pub struct ClientRegistry<T: HttpTransport> {
    authorities: AuthorityRegistry<T>,
    clients: Mutex<HashMap<CredentialKey, Arc<IikoServerClient<T>>>>,
}

impl<T: HttpTransport> Default for ClientRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientRegistry<ReqwestHttpTransport> {
    /// Look up or create a client over the default reqwest transport.
    pub async fn get_or_create_from_config(
        &self,
        config: &IikoServerConfig,
    ) -> IikoServerResult<Arc<IikoServerClient<ReqwestHttpTransport>>> {
        self.get_or_create(
            &config.credentials(),
            Arc::new(ReqwestHttpTransport::new()),
        )
        .await
    }
}

impl<T: HttpTransport> ClientRegistry<T> {
    pub fn new() -> Self {
        Self {
            authorities: AuthorityRegistry::new(),
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Return the client for this credential, creating it on first use.
    /// `transport` is only consulted when a new client is built.
    pub async fn get_or_create(
        &self,
        credentials: &Credentials,
        transport: Arc<T>,
    ) -> IikoServerResult<Arc<IikoServerClient<T>>> {
        let key = credentials.key();
        let mut clients = self.clients.lock().await;
        if let Some(existing) = clients.get(&key) {
            return Ok(Arc::clone(existing));
        }

        debug!(key = %key, "creating client");
        let ctx = Arc::new(RestContext::new(
            &credentials.host,
            transport,
            TokenSlot::new(),
        )?);
        let authority = self.authorities.get_or_create(credentials, &ctx).await;
        let client = IikoServerClient::with_authority(credentials, ctx, authority);
        clients.insert(key, Arc::clone(&client));
        Ok(client)
    }

    pub async fn len(&self) -> usize {
        self.clients.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.clients.lock().await.is_empty()
    }

    /// Log out every session and drop all clients. Sessions are released
    /// before the clients (and their transports) go away; later lookups get
    /// fresh instances.
    pub async fn close_all(&self) {
        self.authorities.release_all().await;
        let count = {
            let mut clients = self.clients.lock().await;
            let count = clients.len();
            clients.clear();
            count
        };
        info!(count, "all clients closed");
    }
}

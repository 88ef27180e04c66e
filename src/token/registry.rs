//! Authority Registry
//!
//! One token authority per credential key, created on demand. Repeated
//! lookups for the same key return the same instance so all callers share
//! one token slot, one version counter and one exclusive section.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::core::{CredentialKey, Credentials, HttpTransport, RestContext};
use crate::token::authority::TokenAuthority;

pub struct AuthorityRegistry<T: HttpTransport> {
    authorities: Mutex<HashMap<CredentialKey, Arc<TokenAuthority<T>>>>,
}

impl<T: HttpTransport> Default for AuthorityRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: HttpTransport> AuthorityRegistry<T> {
    pub fn new() -> Self {
        Self {
            authorities: Mutex::new(HashMap::new()),
        }
    }

    /// Return the authority for this credential, creating it on first use.
    /// Creation performs no network call; the token stays lazy.
    pub async fn get_or_create(
        &self,
        credentials: &Credentials,
        ctx: &Arc<RestContext<T>>,
    ) -> Arc<TokenAuthority<T>> {
        let key = credentials.key();
        let mut authorities = self.authorities.lock().await;
        if let Some(existing) = authorities.get(&key) {
            return Arc::clone(existing);
        }

        debug!(key = %key, "creating token authority");
        let authority = TokenAuthority::new(credentials, Arc::clone(ctx));
        authorities.insert(key, Arc::clone(&authority));
        authority
    }

    pub async fn len(&self) -> usize {
        self.authorities.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.authorities.lock().await.is_empty()
    }

    /// Log out every registered authority and drop them. Authorities created
    /// afterwards start over with a fresh lazy token.
    pub async fn release_all(&self) {
        let authorities: Vec<_> = self.authorities.lock().await.drain().collect();
        for (key, authority) in authorities {
            authority.logout().await;
            info!(key = %key, "authority released");
        }
    }
}

//! Token Authority
//!
//! Owns one credential's session token: lazy acquisition, exactly-once
//! refresh on 401, and coalescing of concurrent refresh attempts so the auth
//! endpoint is hit at most once per invalidation.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::{debug, error, info, warn};

use crate::api::SessionApi;
use crate::core::{CredentialKey, Credentials, HttpTransport, RestContext, TokenSlot};
use crate::error::{AuthError, IikoServerError, IikoServerResult};

/// Outcome of a refresh request triggered by a failed call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The error was not an authorization failure; the caller must propagate
    /// it unchanged.
    NotApplicable,
    /// A concurrent refresh already produced a token fresher than the
    /// caller's snapshot; just retry the call.
    AlreadyRefreshed,
    /// This invocation performed the fetch and installed a new token.
    RefreshedNow,
}

/// Per-credential session token owner.
///
/// All token/version mutations happen inside the exclusive section
/// (`refresh_lock`); the ready signal is lowered for the duration of any
/// in-flight auth request so waiters can piggyback on its result.
pub struct TokenAuthority<T: HttpTransport> {
    key: CredentialKey,
    login: String,
    password_hash: String,
    session: SessionApi<T>,
    slot: TokenSlot,
    version: AtomicU64,
    refresh_lock: Mutex<()>,
    ready: watch::Sender<bool>,
}

impl<T: HttpTransport> TokenAuthority<T> {
    /// Create an authority for one credential. The token is fetched lazily
    /// on first use, not here. Only the password hash is retained.
    pub fn new(credentials: &Credentials, ctx: Arc<RestContext<T>>) -> Arc<Self> {
        let (ready, _) = watch::channel(true);
        Arc::new(Self {
            key: credentials.key(),
            login: credentials.login.clone(),
            password_hash: credentials.password_hash(),
            slot: ctx.slot().clone(),
            session: SessionApi::new(ctx),
            version: AtomicU64::new(0),
            refresh_lock: Mutex::new(()),
            ready,
        })
    }

    pub fn key(&self) -> &CredentialKey {
        &self.key
    }

    /// Monotonic token version; incremented on every successful acquisition.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    pub fn has_token(&self) -> bool {
        self.slot.is_present()
    }

    /// Acquire a token if none is held yet. No network call when a token is
    /// already present.
    pub async fn ensure_token(self: &Arc<Self>) -> IikoServerResult<()> {
        if self.slot.is_present() {
            return Ok(());
        }

        let this = Arc::clone(self);
        spawn_guarded(async move { this.acquire_initial().await }).await
    }

    async fn acquire_initial(self: Arc<Self>) -> IikoServerResult<()> {
        let _guard = self.refresh_lock.lock().await;
        // Re-check: another caller may have finished while we waited.
        if self.slot.is_present() {
            return Ok(());
        }
        self.run_fetch().await
    }

    /// Decide whether `error`, observed after a call made at
    /// `version_snapshot`, warrants a refresh, and perform one if so.
    ///
    /// Guarantees at most one outstanding auth request per authority: callers
    /// arriving while a refresh is in flight wait on the ready signal, and
    /// callers that reach the exclusive section after a completed refresh
    /// detect the version advance and skip the network call.
    pub async fn refresh_if_unauthorized(
        self: &Arc<Self>,
        error: &IikoServerError,
        version_snapshot: u64,
    ) -> IikoServerResult<RefreshOutcome> {
        if !error.is_unauthorized() {
            debug!(key = %self.key, "error is not an authorization failure, skipping refresh");
            return Ok(RefreshOutcome::NotApplicable);
        }

        if !*self.ready.borrow() {
            debug!(key = %self.key, "refresh already in flight, waiting");
            let mut rx = self.ready.subscribe();
            // The sender lives in `self`, so this cannot fail while we hold
            // a reference to the authority.
            let _ = rx.wait_for(|ready| *ready).await;
            return Ok(RefreshOutcome::AlreadyRefreshed);
        }

        let this = Arc::clone(self);
        spawn_guarded(async move { this.refresh_after(version_snapshot).await }).await
    }

    async fn refresh_after(
        self: Arc<Self>,
        version_snapshot: u64,
    ) -> IikoServerResult<RefreshOutcome> {
        let _guard = self.refresh_lock.lock().await;
        let current = self.version();
        if current != version_snapshot {
            debug!(
                key = %self.key,
                from = version_snapshot,
                to = current,
                "token already refreshed by a concurrent caller"
            );
            return Ok(RefreshOutcome::AlreadyRefreshed);
        }

        self.run_fetch().await.map(|()| RefreshOutcome::RefreshedNow)
    }

    /// Fetch protocol. Must be called with `refresh_lock` held; lowers the
    /// ready signal for the duration and always restores it.
    async fn run_fetch(&self) -> IikoServerResult<()> {
        self.ready.send_replace(false);
        let result = self.fetch_token().await;
        let outcome = match result {
            Ok(token) => {
                self.slot.set(token);
                let version = self.version.fetch_add(1, Ordering::AcqRel) + 1;
                info!(key = %self.key, version, "session token acquired");
                Ok(())
            }
            Err(err) => {
                // Force the next caller to start from scratch.
                self.slot.clear();
                Err(err)
            }
        };
        self.ready.send_replace(true);
        outcome
    }

    async fn fetch_token(&self) -> IikoServerResult<String> {
        // No stale session state may accompany the auth request.
        self.slot.clear();
        debug!(key = %self.key, "requesting session token");

        match self.session.auth(&self.login, &self.password_hash).await {
            Ok(token) => Ok(token),
            Err(err) if err.is_unauthorized() => {
                error!(key = %self.key, "auth endpoint returned 401: invalid credentials");
                Err(IikoServerError::Auth(AuthError::InvalidCredentials))
            }
            Err(err) => {
                error!(key = %self.key, error = %err, "token fetch failed");
                Err(IikoServerError::Auth(AuthError::TokenFetch {
                    message: err.to_string(),
                }))
            }
        }
    }

    /// Release the server-side session (license seat). Failures are logged
    /// and swallowed; local state is cleared regardless.
    pub async fn logout(&self) {
        let Some(token) = self.slot.get() else {
            return;
        };

        match self.session.logout(&token).await {
            Ok(()) => info!(key = %self.key, "logged out"),
            Err(err) => {
                warn!(key = %self.key, error = %err, "logout failed, clearing local session anyway")
            }
        }
        self.slot.clear();
    }
}

/// Run a token-protocol step on a detached task so cancellation of the
/// initiating caller cannot abandon the fetch mid-mutation or leave the
/// ready signal lowered.
async fn spawn_guarded<R, F>(fut: F) -> IikoServerResult<R>
where
    R: Send + 'static,
    F: Future<Output = IikoServerResult<R>> + Send + 'static,
{
    match tokio::spawn(fut).await {
        Ok(result) => result,
        Err(err) => Err(IikoServerError::Auth(AuthError::TokenFetch {
            message: format!("token task failed: {}", err),
        })),
    }
}

//! Session management
//!
//! `SessionManager` is the single owner of "who is logged in right now". It
//! keeps the persisted token and the in-memory session in step, and publishes
//! every change through a watch channel. Readers subscribe or take snapshots;
//! nothing outside the manager can write the session.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::auth::backend::AuthBackend;
use crate::auth::models::{LoginRequest, RegisterRequest, Role, User};
use crate::auth::store::CredentialStore;
use crate::auth::token::{self, Claims};
use crate::error::AuthError;

/// Observable session state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Bootstrap has not resolved yet; guards must not trust the session
    Pending,
    Unauthenticated,
    Authenticated(Claims),
}

impl SessionState {
    pub fn claims(&self) -> Option<&Claims> {
        match self {
            SessionState::Authenticated(claims) => Some(claims),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, SessionState::Pending)
    }
}

struct Inner {
    store: Arc<dyn CredentialStore>,
    backend: Arc<dyn AuthBackend>,
    state: watch::Sender<SessionState>,
    /// Bumped by every login attempt and logout. A login applies its result
    /// only if no newer intent was registered while it was in flight.
    intent: Mutex<u64>,
    bootstrapped: AtomicBool,
}

/// Owner of the current session
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

impl SessionManager {
    /// Create a manager in the `Pending` state
    pub fn new(store: Arc<dyn CredentialStore>, backend: Arc<dyn AuthBackend>) -> Self {
        let (state, _) = watch::channel(SessionState::Pending);
        Self {
            inner: Arc::new(Inner {
                store,
                backend,
                state,
                intent: Mutex::new(0),
                bootstrapped: AtomicBool::new(false),
            }),
        }
    }

    /// Restore the session from the credential store. Runs once; later calls
    /// return the current state unchanged.
    pub fn bootstrap(&self) -> SessionState {
        if self.inner.bootstrapped.swap(true, Ordering::SeqCst) {
            debug!("Session bootstrap already ran");
            return self.state();
        }

        let now = chrono::Utc::now().timestamp();
        let restored = match self.inner.store.load() {
            Ok(Some(raw)) => match token::decode_active(&raw, now) {
                Ok(claims) => {
                    info!("Restored session for {} ({})", claims.sub, claims.role);
                    SessionState::Authenticated(claims)
                }
                Err(e) => {
                    info!("Discarding stored token: {}", e);
                    self.clear_store();
                    SessionState::Unauthenticated
                }
            },
            Ok(None) => {
                debug!("No stored token");
                SessionState::Unauthenticated
            }
            Err(e) => {
                warn!("Failed to read credential store, resetting it: {}", e);
                self.clear_store();
                SessionState::Unauthenticated
            }
        };

        // A login or logout that resolved first reflects newer intent.
        self.inner.state.send_if_modified(|state| {
            if state.is_pending() {
                *state = restored;
                true
            } else {
                false
            }
        });

        self.state()
    }

    /// Authenticate against the backend and establish a session.
    ///
    /// On failure the current session is left as it was. A login overtaken by
    /// a newer login or a logout while the backend call was in flight is
    /// discarded and reports `AuthError::Superseded`.
    pub async fn login(
        &self,
        identifier: &str,
        secret: &str,
        claimed_role: Role,
    ) -> Result<(), AuthError> {
        if identifier.trim().is_empty() || secret.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let attempt = {
            let mut intent = self.lock_intent();
            *intent += 1;
            *intent
        };

        let request = LoginRequest {
            email: identifier.trim().to_string(),
            password: secret.to_string(),
            role: claimed_role,
        };

        let raw = match self.inner.backend.login(&request).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Login failed for {}: {}", request.email, e);
                return Err(e);
            }
        };

        let intent = self.lock_intent();
        if *intent != attempt {
            info!("Discarding stale login for {}", request.email);
            return Err(AuthError::Superseded);
        }

        let claims = token::decode_active(&raw, chrono::Utc::now().timestamp()).map_err(|e| {
            warn!("Login for {} returned an unusable token: {}", request.email, e);
            AuthError::InvalidCredentials
        })?;

        if let Err(e) = self.inner.store.save(&raw) {
            warn!("Failed to persist session token: {}", e);
        }
        info!("Logged in {} as {}", claims.sub, claims.role);
        self.inner
            .state
            .send_replace(SessionState::Authenticated(claims));
        drop(intent);

        Ok(())
    }

    /// Create an account on the backend. Does not log in.
    pub async fn register(
        &self,
        identifier: &str,
        secret: &str,
        role: Role,
    ) -> Result<(), AuthError> {
        if identifier.trim().is_empty() || secret.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let request = RegisterRequest {
            email: identifier.trim().to_string(),
            password: secret.to_string(),
            role,
        };
        self.inner.backend.register(&request).await?;
        info!("Registered {} as {}", request.email, role);
        Ok(())
    }

    /// End the session. Idempotent.
    pub fn logout(&self) {
        let mut intent = self.lock_intent();
        *intent += 1;

        self.clear_store();
        let previous = self.inner.state.send_replace(SessionState::Unauthenticated);
        if let SessionState::Authenticated(claims) = previous {
            info!("Logged out {}", claims.sub);
        }
    }

    /// Snapshot of the current claims. Never blocks on I/O.
    pub fn current_session(&self) -> Option<Claims> {
        self.inner.state.borrow().claims().cloned()
    }

    pub fn current_user(&self) -> Option<User> {
        self.inner.state.borrow().claims().map(Claims::user)
    }

    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    pub fn is_pending(&self) -> bool {
        self.inner.state.borrow().is_pending()
    }

    /// Receive every future session change
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Current claims if they are still valid at `now`. An expired session is
    /// ended here: the store is cleared and the state drops to
    /// `Unauthenticated`.
    pub fn active_session_at(&self, now: i64) -> Option<Claims> {
        let claims = self.current_session()?;
        if !claims.is_expired_at(now) {
            return Some(claims);
        }

        let _intent = self.lock_intent();
        let expired = self.inner.state.send_if_modified(|state| {
            if state.claims() == Some(&claims) {
                *state = SessionState::Unauthenticated;
                true
            } else {
                false
            }
        });
        if expired {
            info!("Session for {} expired", claims.sub);
            self.clear_store();
        }
        None
    }

    /// `active_session_at` against the wall clock
    pub fn active_session(&self) -> Option<Claims> {
        self.active_session_at(chrono::Utc::now().timestamp())
    }

    fn lock_intent(&self) -> std::sync::MutexGuard<'_, u64> {
        self.inner
            .intent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn clear_store(&self) {
        if let Err(e) = self.inner.store.clear() {
            warn!("Failed to clear credential store: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::backend::MockAuthBackend;
    use crate::auth::store::MemoryCredentialStore;
    use async_trait::async_trait;
    use tokio::sync::Notify;

    /// Backend that parks every login until released
    struct GatedBackend {
        entered: Notify,
        release: Notify,
        inner: MockAuthBackend,
    }

    #[async_trait]
    impl AuthBackend for GatedBackend {
        async fn login(&self, request: &LoginRequest) -> Result<String, AuthError> {
            self.entered.notify_one();
            self.release.notified().await;
            self.inner.login(request).await
        }

        async fn register(&self, request: &RegisterRequest) -> Result<(), AuthError> {
            self.inner.register(request).await
        }
    }

    /// Gated backend whose token cannot be decoded
    struct GatedGarbageBackend {
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl AuthBackend for GatedGarbageBackend {
        async fn login(&self, _request: &LoginRequest) -> Result<String, AuthError> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok("not-a-token".to_string())
        }

        async fn register(&self, _request: &RegisterRequest) -> Result<(), AuthError> {
            Ok(())
        }
    }

    fn token_for(role: Role, ttl: i64) -> String {
        token::issue("u-1", None, role, ttl, "test-secret").unwrap()
    }

    fn manager_with(store: Arc<MemoryCredentialStore>) -> SessionManager {
        SessionManager::new(store, Arc::new(MockAuthBackend::default()))
    }

    #[test]
    fn test_starts_pending() {
        let manager = manager_with(Arc::new(MemoryCredentialStore::new()));
        assert!(manager.is_pending());
        assert!(manager.current_session().is_none());
    }

    #[test]
    fn test_bootstrap_runs_once() {
        let store = Arc::new(MemoryCredentialStore::new());
        let manager = manager_with(store.clone());

        assert_eq!(manager.bootstrap(), SessionState::Unauthenticated);

        store.save(&token_for(Role::Admin, 3600)).unwrap();
        assert_eq!(manager.bootstrap(), SessionState::Unauthenticated);
    }

    #[test]
    fn test_bootstrap_clears_garbage_token() {
        let store = Arc::new(MemoryCredentialStore::with_token("garbage"));
        let manager = manager_with(store.clone());

        assert_eq!(manager.bootstrap(), SessionState::Unauthenticated);
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_lazy_expiry_detection() {
        let store = Arc::new(MemoryCredentialStore::with_token(token_for(Role::Staff, 60)));
        let manager = manager_with(store.clone());
        manager.bootstrap();

        let claims = manager.current_session().unwrap();
        assert!(manager.active_session_at(claims.exp - 1).is_some());
        assert!(store.load().unwrap().is_some());

        assert!(manager.active_session_at(claims.exp).is_none());
        assert_eq!(manager.state(), SessionState::Unauthenticated);
        assert_eq!(store.load().unwrap(), None);
    }

    #[tokio::test]
    async fn test_login_rejects_empty_fields() {
        let manager = manager_with(Arc::new(MemoryCredentialStore::new()));
        manager.bootstrap();

        assert_eq!(
            manager.login("", "demo", Role::Admin).await,
            Err(AuthError::MissingCredentials)
        );
        assert_eq!(
            manager.login("a@b.com", "", Role::Admin).await,
            Err(AuthError::MissingCredentials)
        );
    }

    #[tokio::test]
    async fn test_subscribers_see_login_and_logout() {
        let manager = manager_with(Arc::new(MemoryCredentialStore::new()));
        let mut rx = manager.subscribe();
        manager.bootstrap();

        manager.login("a@b.com", "demo", Role::Doctor).await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().claims().map(|c| c.role), Some(Role::Doctor));

        manager.logout();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_login_superseded_by_logout_is_discarded() {
        let store = Arc::new(MemoryCredentialStore::new());
        let backend = Arc::new(GatedBackend {
            entered: Notify::new(),
            release: Notify::new(),
            inner: MockAuthBackend::default(),
        });
        let manager = SessionManager::new(store.clone(), backend.clone());
        manager.bootstrap();

        let pending = {
            let manager = manager.clone();
            tokio::spawn(async move { manager.login("a@b.com", "demo", Role::Admin).await })
        };

        backend.entered.notified().await;
        manager.logout();
        backend.release.notify_one();

        assert_eq!(pending.await.unwrap(), Err(AuthError::Superseded));
        assert!(manager.current_session().is_none());
        assert_eq!(store.load().unwrap(), None);
    }

    #[tokio::test]
    async fn test_superseded_login_with_bad_token_reports_superseded() {
        let store = Arc::new(MemoryCredentialStore::new());
        let backend = Arc::new(GatedGarbageBackend {
            entered: Notify::new(),
            release: Notify::new(),
        });
        let manager = SessionManager::new(store.clone(), backend.clone());
        manager.bootstrap();

        let pending = {
            let manager = manager.clone();
            tokio::spawn(async move { manager.login("a@b.com", "demo", Role::Admin).await })
        };

        backend.entered.notified().await;
        manager.logout();
        backend.release.notify_one();

        assert_eq!(pending.await.unwrap(), Err(AuthError::Superseded));
        assert_eq!(manager.state(), SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_bad_token_is_invalid_credentials() {
        let backend = Arc::new(GatedGarbageBackend {
            entered: Notify::new(),
            release: Notify::new(),
        });
        backend.release.notify_one();
        let store = Arc::new(MemoryCredentialStore::new());
        let manager = SessionManager::new(store.clone(), backend);
        manager.bootstrap();

        assert_eq!(
            manager.login("a@b.com", "demo", Role::Admin).await,
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(store.load().unwrap(), None);
    }

    #[tokio::test]
    async fn test_login_before_bootstrap_wins() {
        let store = Arc::new(MemoryCredentialStore::new());
        let manager = manager_with(store.clone());

        manager.login("a@b.com", "demo", Role::Staff).await.unwrap();
        let state = manager.bootstrap();

        assert_eq!(state.claims().map(|c| c.role), Some(Role::Staff));
    }
}

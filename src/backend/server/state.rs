/**
 * Application State Management
 *
 * `AppState` is the central state container handed to every Axum handler.
 *
 * # Contents
 *
 * - `store` - the persistence backend, shared behind `Arc<dyn BoardStore>`
 * - `tokens` - session token issuer/verifier
 * - `dispatcher` - per-board lanes and the connection registry
 * - `config` - immutable runtime configuration
 *
 * Everything inside is cheap to clone (`Arc`s and `DashMap` handles), which
 * is what Axum's `State` extractor expects.
 *
 * # State Extraction
 *
 * The `FromRef` implementations let a handler take only the piece it needs:
 *
 * ```rust,ignore
 * async fn handler(State(dispatcher): State<Dispatcher>) { /* ... */ }
 * ```
 */

use std::sync::Arc;

use axum::extract::FromRef;

use crate::backend::access::AccessGuard;
use crate::backend::auth::sessions::TokenService;
use crate::backend::realtime::{ConnectionRegistry, Dispatcher};
use crate::backend::store::BoardStore;
use crate::shared::AppConfig;

#[derive(Clone)]
pub struct AppState {
    /// Persistence backend (Postgres or in-memory)
    pub store: Arc<dyn BoardStore>,

    /// Issues tokens at login and verifies them on every request and handshake
    pub tokens: TokenService,

    /// Broadcast fan-out, owns the connection registry
    pub dispatcher: Dispatcher,

    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn BoardStore>) -> Self {
        let tokens = TokenService::new(&config.jwt_secret, config.jwt_expire_minutes);
        Self {
            store,
            tokens,
            dispatcher: Dispatcher::new(ConnectionRegistry::new()),
            config: Arc::new(config),
        }
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        self.dispatcher.registry()
    }

    /// Authorization checks bound to this state's store
    pub fn guard(&self) -> AccessGuard<'_> {
        AccessGuard::new(self.store.as_ref())
    }
}

impl FromRef<AppState> for Arc<dyn BoardStore> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.store.clone()
    }
}

impl FromRef<AppState> for TokenService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.tokens.clone()
    }
}

impl FromRef<AppState> for Dispatcher {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.dispatcher.clone()
    }
}

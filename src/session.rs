use std::sync::Arc;

use tokio::sync::RwLock;

use crate::authz::Principal;

/// Current session: the authenticated principal plus their bearer token.
#[derive(Debug, Clone)]
pub struct Session {
    pub principal: Principal,
    pub token: String,
}

/// Process-wide session store, constructed at the composition root and
/// injected wherever the current principal is needed. Populated at login,
/// cleared at logout; read-only for everyone else.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set(&self, principal: Principal, token: String) {
        let mut guard = self.inner.write().await;
        *guard = Some(Session { principal, token });
    }

    pub async fn clear(&self) {
        let mut guard = self.inner.write().await;
        *guard = None;
    }

    pub async fn principal(&self) -> Option<Principal> {
        self.inner.read().await.as_ref().map(|s| s.principal.clone())
    }

    pub async fn token(&self) -> Option<String> {
        self.inner.read().await.as_ref().map(|s| s.token.clone())
    }
}

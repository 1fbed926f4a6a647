use bharatbit_core::{Backend, PriceApi, User};
use bharatbit_session::{AuthContext, AuthError, SessionStore};
use std::sync::Arc;

/// Shared state handed to every screen: the backend and the auth context.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn Backend>,
    pub prices: Arc<dyn PriceApi>,
    pub auth: Arc<AuthContext>,
}

impl AppState {
    pub fn new<B>(backend: Arc<B>, store: Arc<dyn SessionStore>) -> Self
    where
        B: Backend + 'static,
    {
        let auth = Arc::new(AuthContext::new(backend.clone(), store));
        Self {
            prices: backend.clone(),
            backend,
            auth,
        }
    }

    /// Bearer token of the signed-in user.
    pub fn token(&self) -> Result<String, AuthError> {
        self.auth.require_token()
    }

    pub fn user(&self) -> Option<User> {
        self.auth.user()
    }
}

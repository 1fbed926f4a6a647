use crate::store::{SessionStore, StoreError};
use bharatbit_core::*;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

/// Errors surfaced by [`AuthContext`] operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Session storage error: {0}")]
    Store(#[from] StoreError),
    #[error("Not signed in")]
    NotAuthenticated,
}

impl AuthError {
    /// Message to show the user, falling back for non-backend failures.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AuthError::Api(e) => e.user_message(fallback),
            AuthError::Store(_) => fallback.to_string(),
            AuthError::NotAuthenticated => "Please sign in to continue".to_string(),
        }
    }
}

/// Result of a password login.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    /// The backend issued a session straight away.
    SignedIn(Session),
    /// A one-time code was sent. Complete with [`AuthContext::verify_two_factor`].
    TwoFactorRequired {
        mobile: String,
        email_sent: bool,
        sms_sent: bool,
    },
}

/// Holds the current session and exposes the login/logout/refresh operations.
///
/// The session is mirrored to a [`SessionStore`] whenever it changes. Screens
/// observe changes through [`AuthContext::subscribe`].
pub struct AuthContext {
    api: Arc<dyn AuthApi>,
    store: Arc<dyn SessionStore>,
    state: watch::Sender<Option<Session>>,
}

impl AuthContext {
    pub fn new(api: Arc<dyn AuthApi>, store: Arc<dyn SessionStore>) -> Self {
        let (state, _) = watch::channel(None);
        Self { api, store, state }
    }

    // -----------------------------------------------------------------------
    // State
    // -----------------------------------------------------------------------

    pub fn session(&self) -> Option<Session> {
        self.state.borrow().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().as_ref().map(|s| s.user.clone())
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().as_ref().map(|s| s.token.clone())
    }

    /// The current bearer token, or [`AuthError::NotAuthenticated`].
    pub fn require_token(&self) -> Result<String, AuthError> {
        self.token().ok_or(AuthError::NotAuthenticated)
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_some()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.state.subscribe()
    }

    /// Persists the session, then publishes it.
    async fn establish(&self, session: Session) -> Result<Session, AuthError> {
        self.store.save(&session).await?;
        info!(user_id = %session.user.id, role = ?session.user.role, "Signed in");
        self.state.send_replace(Some(session.clone()));
        Ok(session)
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Load the persisted session. Unreadable storage counts as signed out.
    pub async fn restore(&self) -> Option<Session> {
        match self.store.load().await {
            Ok(session) => {
                if let Some(s) = &session {
                    info!(user_id = %s.user.id, "Restored session");
                }
                self.state.send_replace(session.clone());
                session
            }
            Err(e) => {
                warn!(error = %e, "Discarding unreadable session");
                if let Err(e) = self.store.clear().await {
                    warn!(error = %e, "Failed to clear session storage");
                }
                self.state.send_replace(None);
                None
            }
        }
    }

    /// Create an account. No session is issued until the OTP is verified.
    pub async fn register(&self, req: &RegisterRequest) -> Result<RegisterReceipt, AuthError> {
        let receipt = self.api.register(req).await?;
        info!(
            email = %receipt.email,
            email_sent = receipt.email_sent,
            sms_sent = receipt.sms_sent,
            "Registration accepted"
        );
        Ok(receipt)
    }

    /// Submit a one-time code. Returns the session when the backend issued one.
    pub async fn verify_otp(
        &self,
        identifier: &str,
        code: &str,
        purpose: OtpPurpose,
    ) -> Result<Option<Session>, AuthError> {
        let reply = self
            .api
            .verify_otp(&VerifyOtpRequest {
                identifier: identifier.to_string(),
                otp: code.to_string(),
                purpose,
            })
            .await?;
        match reply.into_session() {
            Some(session) => Ok(Some(self.establish(session).await?)),
            None => Ok(None),
        }
    }

    pub async fn login(&self, identifier: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let reply = self
            .api
            .login(&LoginRequest {
                identifier: identifier.to_string(),
                password: password.to_string(),
            })
            .await?;

        if reply.requires_2fa {
            let mobile = reply.mobile.unwrap_or_else(|| identifier.to_string());
            info!(
                email_sent = reply.email_sent,
                sms_sent = reply.sms_sent,
                "Two-factor code requested"
            );
            return Ok(LoginOutcome::TwoFactorRequired {
                mobile,
                email_sent: reply.email_sent,
                sms_sent: reply.sms_sent,
            });
        }

        match (reply.token, reply.user) {
            (Some(token), Some(user)) => Ok(LoginOutcome::SignedIn(
                self.establish(Session::new(token, user)).await?,
            )),
            _ => Err(ApiError::Decode(
                "login reply carried neither a session nor a two-factor challenge".to_string(),
            )
            .into()),
        }
    }

    pub async fn verify_two_factor(&self, mobile: &str, code: &str) -> Result<Session, AuthError> {
        let reply = self
            .api
            .verify_two_factor(&VerifyTwoFactorRequest {
                mobile: mobile.to_string(),
                otp: code.to_string(),
            })
            .await?;
        let session = reply.into_session().ok_or_else(|| {
            ApiError::Decode("two-factor reply is missing the token or user".to_string())
        })?;
        self.establish(session).await
    }

    /// Clear memory and storage. Memory is cleared even when storage fails.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.state.send_replace(None);
        self.store.clear().await?;
        info!("Signed out");
        Ok(())
    }

    /// Re-fetch the profile and replace the cached user. No-op when signed out.
    pub async fn refresh_user(&self) -> Result<Option<User>, AuthError> {
        let Some(token) = self.token() else {
            return Ok(None);
        };
        let user = self.api.me(&token).await?;
        let session = Session::new(token, user.clone());
        self.store.save(&session).await?;
        self.state.send_replace(Some(session));
        Ok(Some(user))
    }

    pub async fn forgot_password(&self, email: &str) -> Result<PasswordResetReceipt, AuthError> {
        Ok(self
            .api
            .forgot_password(&ForgotPasswordRequest {
                email: email.to_string(),
            })
            .await?)
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<Ack, AuthError> {
        Ok(self
            .api
            .reset_password(&ResetPasswordRequest {
                token: token.to_string(),
                new_password: new_password.to_string(),
            })
            .await?)
    }

    /// Register a device push token. Failures are logged, never raised.
    pub async fn register_push_token(&self, push_token: &str) -> bool {
        let Some(token) = self.token() else {
            return false;
        };
        let req = PushTokenRequest {
            push_token: push_token.to_string(),
        };
        match self.api.register_push_token(&token, &req).await {
            Ok(ack) => ack.success,
            Err(e) => {
                warn!(error = %e, "Push token registration failed");
                false
            }
        }
    }
}

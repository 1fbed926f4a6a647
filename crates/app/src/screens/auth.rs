use super::ScreenError;
use crate::{home_route, AppState, Banner, Route};
use bharatbit_core::OtpPurpose;
use bharatbit_forms::{ForgotPasswordDraft, LoginDraft, OtpInput, RegisterDraft, ResetPasswordDraft};
use bharatbit_session::LoginOutcome;
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct LoginScreen {
    pub draft: LoginDraft,
    pub loading: bool,
    pub banner: Option<Banner>,
}

impl LoginScreen {
    pub async fn submit(&mut self, app: &AppState) -> Option<Route> {
        self.loading = true;
        let result = self.try_submit(app).await;
        self.loading = false;
        match result {
            Ok(route) => Some(route),
            Err(e) => {
                warn!(error = %e, "Login failed");
                self.banner = Some(e.banner("Login failed"));
                None
            }
        }
    }

    async fn try_submit(&mut self, app: &AppState) -> Result<Route, ScreenError> {
        let (identifier, password) = self.draft.validate()?;
        match app.auth.login(&identifier, &password).await? {
            LoginOutcome::SignedIn(session) => {
                self.draft.password.clear();
                Ok(home_route(&session.user))
            }
            LoginOutcome::TwoFactorRequired { mobile, .. } => {
                self.draft.password.clear();
                Ok(Route::VerifyTwoFactor { mobile })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct RegisterScreen {
    pub draft: RegisterDraft,
    pub loading: bool,
    pub banner: Option<Banner>,
}

impl RegisterScreen {
    pub async fn submit(&mut self, app: &AppState) -> Option<Route> {
        self.loading = true;
        let result = self.try_submit(app).await;
        self.loading = false;
        match result {
            Ok(route) => {
                self.banner = Some(Banner::success("OTP sent to your email"));
                Some(route)
            }
            Err(e) => {
                self.banner = Some(e.banner("Registration failed"));
                None
            }
        }
    }

    async fn try_submit(&mut self, app: &AppState) -> Result<Route, ScreenError> {
        let req = self.draft.validate()?;
        let receipt = app.auth.register(&req).await?;
        Ok(Route::VerifyOtp {
            identifier: receipt.email,
            purpose: OtpPurpose::Registration,
        })
    }
}

// ---------------------------------------------------------------------------
// One-time codes
// ---------------------------------------------------------------------------

/// Code entry after registration.
#[derive(Debug, Clone)]
pub struct VerifyOtpScreen {
    pub identifier: String,
    pub purpose: OtpPurpose,
    pub code: OtpInput,
    pub loading: bool,
    pub banner: Option<Banner>,
}

impl VerifyOtpScreen {
    pub fn new(identifier: impl Into<String>, purpose: OtpPurpose) -> Self {
        Self {
            identifier: identifier.into(),
            purpose,
            code: OtpInput::default(),
            loading: false,
            banner: None,
        }
    }

    /// Verified with a session goes home; the dashboard prompts for KYC.
    /// Without a session the user signs in manually.
    pub async fn submit(&mut self, app: &AppState) -> Option<Route> {
        self.loading = true;
        let result = self.try_submit(app).await;
        self.loading = false;
        match result {
            Ok(Some(session)) => Some(home_route(&session.user)),
            Ok(None) => {
                self.banner = Some(Banner::success("Verification successful. Please sign in."));
                Some(Route::Login)
            }
            Err(e) => {
                self.banner = Some(e.banner("OTP verification failed"));
                None
            }
        }
    }

    async fn try_submit(
        &self,
        app: &AppState,
    ) -> Result<Option<bharatbit_core::Session>, ScreenError> {
        let code = self.code.validate()?;
        Ok(app
            .auth
            .verify_otp(&self.identifier, &code, self.purpose)
            .await?)
    }
}

/// Second factor after a password login.
#[derive(Debug, Clone)]
pub struct TwoFactorScreen {
    pub mobile: String,
    pub code: OtpInput,
    pub loading: bool,
    pub banner: Option<Banner>,
}

impl TwoFactorScreen {
    pub fn new(mobile: impl Into<String>) -> Self {
        Self {
            mobile: mobile.into(),
            code: OtpInput::default(),
            loading: false,
            banner: None,
        }
    }

    pub async fn submit(&mut self, app: &AppState) -> Option<Route> {
        self.loading = true;
        let result = self.try_submit(app).await;
        self.loading = false;
        match result {
            Ok(route) => Some(route),
            Err(e) => {
                self.banner = Some(e.banner("2FA verification failed"));
                None
            }
        }
    }

    async fn try_submit(&self, app: &AppState) -> Result<Route, ScreenError> {
        let code = self.code.validate()?;
        let session = app.auth.verify_two_factor(&self.mobile, &code).await?;
        Ok(home_route(&session.user))
    }
}

// ---------------------------------------------------------------------------
// Password recovery
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct ForgotPasswordScreen {
    pub draft: ForgotPasswordDraft,
    pub loading: bool,
    pub banner: Option<Banner>,
}

impl ForgotPasswordScreen {
    pub async fn submit(&mut self, app: &AppState) -> Option<Route> {
        self.loading = true;
        let result = self.try_submit(app).await;
        self.loading = false;
        match result {
            Ok(route) => {
                self.banner = Some(Banner::success(
                    "A password reset OTP has been sent to your email",
                ));
                Some(route)
            }
            Err(e) => {
                self.banner = Some(e.banner("Failed to send OTP"));
                None
            }
        }
    }

    async fn try_submit(&self, app: &AppState) -> Result<Route, ScreenError> {
        let email = self.draft.validate()?;
        app.auth.forgot_password(&email).await?;
        info!("Password reset code requested");
        Ok(Route::ResetPassword { email })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResetPasswordScreen {
    pub email: String,
    pub draft: ResetPasswordDraft,
    pub loading: bool,
    pub banner: Option<Banner>,
}

impl ResetPasswordScreen {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
    }

    pub async fn submit(&mut self, app: &AppState) -> Option<Route> {
        self.loading = true;
        let result = self.try_submit(app).await;
        self.loading = false;
        match result {
            Ok(()) => {
                self.banner = Some(Banner::success("Your password has been reset successfully"));
                Some(Route::Login)
            }
            Err(e) => {
                self.banner = Some(e.banner("Failed to reset password"));
                None
            }
        }
    }

    async fn try_submit(&self, app: &AppState) -> Result<(), ScreenError> {
        let (code, password) = self.draft.validate()?;
        app.auth.reset_password(&code, &password).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ack, api_error, app, user, StubBackend};
    use bharatbit_core::{KycStatus, LoginReply, OtpReply, RegisterReceipt, Role};

    fn login_screen(identifier: &str, password: &str) -> LoginScreen {
        LoginScreen {
            draft: LoginDraft {
                identifier: identifier.to_string(),
                password: password.to_string(),
            },
            ..LoginScreen::default()
        }
    }

    #[tokio::test]
    async fn test_invalid_credentials_stay_on_login() {
        let (app, backend) = app(StubBackend {
            login: Some(Err(api_error(401, "Invalid credentials"))),
            ..Default::default()
        });
        let mut screen = login_screen("trader@example.com", "wrong-pass");

        assert_eq!(screen.submit(&app).await, None);
        assert_eq!(screen.banner, Some(Banner::error("Invalid credentials")));
        assert!(!screen.loading);
        assert!(!app.auth.is_authenticated());
        assert_eq!(backend.called("login"), 1);
    }

    #[tokio::test]
    async fn test_login_transport_failure_uses_fallback() {
        let (app, _) = app(StubBackend::default());
        let mut screen = login_screen("trader@example.com", "secret123");
        assert_eq!(screen.submit(&app).await, None);
        assert_eq!(screen.banner, Some(Banner::error("Login failed")));
    }

    #[tokio::test]
    async fn test_login_blank_fields_skip_network() {
        let (app, backend) = app(StubBackend::default());
        let mut screen = login_screen(" ", "");
        assert_eq!(screen.submit(&app).await, None);
        assert_eq!(screen.banner, Some(Banner::error("Please fill all fields")));
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_login_two_factor_challenge() {
        let (app, _) = app(StubBackend {
            login: Some(Ok(LoginReply {
                success: true,
                requires_2fa: true,
                mobile: Some("+919876543210".to_string()),
                sms_sent: true,
                ..Default::default()
            })),
            ..Default::default()
        });
        let mut screen = login_screen("trader@example.com", "secret123");
        assert_eq!(
            screen.submit(&app).await,
            Some(Route::VerifyTwoFactor {
                mobile: "+919876543210".to_string()
            })
        );
        assert!(screen.draft.password.is_empty());
    }

    #[tokio::test]
    async fn test_two_factor_success_persists_and_opens_dashboard() {
        let (app, _) = app(StubBackend {
            verify_two_factor: Some(Ok(OtpReply {
                success: true,
                token: Some("tok-2fa".to_string()),
                user: Some(user(KycStatus::Approved)),
                ..Default::default()
            })),
            ..Default::default()
        });
        let mut screen = TwoFactorScreen::new("+919876543210");
        screen.code.set("123456");

        assert_eq!(screen.submit(&app).await, Some(Route::Dashboard));
        assert_eq!(app.auth.token().as_deref(), Some("tok-2fa"));

        // Written through to the store.
        assert!(app.auth.restore().await.is_some());
    }

    #[tokio::test]
    async fn test_two_factor_admin_opens_console() {
        let mut admin = user(KycStatus::Approved);
        admin.role = Role::Admin;
        let (app, _) = app(StubBackend {
            verify_two_factor: Some(Ok(OtpReply {
                success: true,
                token: Some("tok-admin".to_string()),
                user: Some(admin),
                ..Default::default()
            })),
            ..Default::default()
        });
        let mut screen = TwoFactorScreen::new("+919876543210");
        screen.code.set("654321");
        assert_eq!(screen.submit(&app).await, Some(Route::Admin));
    }

    #[tokio::test]
    async fn test_short_code_is_rejected_locally() {
        let (app, backend) = app(StubBackend::default());
        let mut screen = TwoFactorScreen::new("+919876543210");
        screen.code.set("123");
        assert_eq!(screen.submit(&app).await, None);
        assert_eq!(
            screen.banner,
            Some(Banner::error("Please enter a valid 6-digit OTP"))
        );
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_password_mismatch_blocks_registration() {
        let (app, backend) = app(StubBackend::default());
        let mut screen = RegisterScreen::default();
        screen.draft.mobile = "9876543210".to_string();
        screen.draft.email = "trader@example.com".to_string();
        screen.draft.password = "secret123".to_string();
        screen.draft.confirm_password = "secret124".to_string();

        assert_eq!(screen.submit(&app).await, None);
        assert_eq!(screen.banner, Some(Banner::error("Passwords do not match")));
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_registration_moves_to_otp() {
        let (app, _) = app(StubBackend {
            register: Some(Ok(RegisterReceipt {
                success: true,
                message: None,
                user_id: Some("u-1".to_string()),
                client_uid: None,
                email: "trader@example.com".to_string(),
                email_sent: true,
                sms_sent: false,
            })),
            ..Default::default()
        });
        let mut screen = RegisterScreen::default();
        screen.draft.mobile = "9876543210".to_string();
        screen.draft.email = "trader@example.com".to_string();
        screen.draft.password = "secret123".to_string();
        screen.draft.confirm_password = "secret123".to_string();

        assert_eq!(
            screen.submit(&app).await,
            Some(Route::VerifyOtp {
                identifier: "trader@example.com".to_string(),
                purpose: OtpPurpose::Registration,
            })
        );
    }

    #[tokio::test]
    async fn test_registration_otp_opens_dashboard() {
        let (app, _) = app(StubBackend {
            verify_otp: Some(Ok(OtpReply {
                success: true,
                token: Some("tok-new".to_string()),
                user: Some(user(KycStatus::Pending)),
                ..Default::default()
            })),
            ..Default::default()
        });
        let mut screen = VerifyOtpScreen::new("trader@example.com", OtpPurpose::Registration);
        screen.code.set("111111");
        assert_eq!(screen.submit(&app).await, Some(Route::Dashboard));
        assert!(app.auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_otp_without_session_asks_for_sign_in() {
        let (app, _) = app(StubBackend {
            verify_otp: Some(Ok(OtpReply {
                success: true,
                ..Default::default()
            })),
            ..Default::default()
        });
        let mut screen = VerifyOtpScreen::new("trader@example.com", OtpPurpose::Registration);
        screen.code.set("111111");
        assert_eq!(screen.submit(&app).await, Some(Route::Login));
        assert!(!app.auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_password_recovery_flow() {
        let (app, _) = app(StubBackend {
            forgot_password: Some(Ok(Default::default())),
            reset_password: Some(ack()),
            ..Default::default()
        });

        let mut forgot = ForgotPasswordScreen::default();
        forgot.draft.email = "not-an-email".to_string();
        assert_eq!(forgot.submit(&app).await, None);
        assert_eq!(
            forgot.banner,
            Some(Banner::error("Please enter a valid email address"))
        );

        forgot.draft.email = "trader@example.com".to_string();
        let Some(Route::ResetPassword { email }) = forgot.submit(&app).await else {
            panic!("expected reset route");
        };

        let mut reset = ResetPasswordScreen::new(email);
        reset.draft.code = "123456".to_string();
        reset.draft.new_password = "newsecret1".to_string();
        reset.draft.confirm_password = "newsecret1".to_string();
        assert_eq!(reset.submit(&app).await, Some(Route::Login));
    }

    #[tokio::test]
    async fn test_reset_failure_shows_backend_detail() {
        let (app, _) = app(StubBackend {
            reset_password: Some(Err(api_error(400, "Invalid or expired OTP"))),
            ..Default::default()
        });
        let mut reset = ResetPasswordScreen::new("trader@example.com");
        reset.draft.code = "000000".to_string();
        reset.draft.new_password = "newsecret1".to_string();
        reset.draft.confirm_password = "newsecret1".to_string();
        assert_eq!(reset.submit(&app).await, None);
        assert_eq!(reset.banner, Some(Banner::error("Invalid or expired OTP")));
    }
}

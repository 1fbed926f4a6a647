//! One module per area of the app. Handlers set the screen's banner and
//! return `Some(route)` when the screen navigates away.

pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod kyc;
pub mod orders;
pub mod prices;
pub mod wallets;

pub use admin::{AdminConsole, AdminTab};
pub use auth::{
    ForgotPasswordScreen, LoginScreen, RegisterScreen, ResetPasswordScreen, TwoFactorScreen,
    VerifyOtpScreen,
};
pub use dashboard::{DashboardScreen, ProfileScreen};
pub use kyc::{KycPendingScreen, KycScreen};
pub use orders::{CreateOrderScreen, OrderDetailScreen, OrdersScreen};
pub use prices::PriceCard;
pub use wallets::{AddWalletScreen, WalletScreen, WalletsScreen};

use crate::Banner;
use bharatbit_core::ApiError;
use bharatbit_forms::FormError;
use bharatbit_session::AuthError;

/// Anything a screen handler can fail with.
#[derive(Debug, thiserror::Error)]
pub enum ScreenError {
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ScreenError {
    /// Validation text verbatim, otherwise the backend's message or `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ScreenError::Form(e) => e.to_string(),
            ScreenError::Auth(e) => e.user_message(fallback),
            ScreenError::Api(e) => e.user_message(fallback),
        }
    }

    pub fn banner(&self, fallback: &str) -> Banner {
        Banner::Error(self.user_message(fallback))
    }
}

use crate::models::*;
use crate::requests::*;
use async_trait::async_trait;

// ---------------------------------------------------------------------------
// API Error
// ---------------------------------------------------------------------------

/// Errors that can occur when talking to the desk backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("Transport error: {0}")]
    Transport(String),
    /// The backend answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    /// The response body did not match the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Message to show the user: the backend's own wording when it gave one,
    /// otherwise the screen's fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Api { message, .. } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The bearer token was missing, expired, or revoked.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// Registration, login, and account recovery. The `token` argument is the
/// bearer token of the current session.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn register(&self, req: &RegisterRequest) -> ApiResult<RegisterReceipt>;

    async fn verify_otp(&self, req: &VerifyOtpRequest) -> ApiResult<OtpReply>;

    async fn login(&self, req: &LoginRequest) -> ApiResult<LoginReply>;

    async fn verify_two_factor(&self, req: &VerifyTwoFactorRequest) -> ApiResult<OtpReply>;

    /// Current profile of the token's owner.
    async fn me(&self, token: &str) -> ApiResult<User>;

    async fn forgot_password(&self, req: &ForgotPasswordRequest)
        -> ApiResult<PasswordResetReceipt>;

    async fn reset_password(&self, req: &ResetPasswordRequest) -> ApiResult<Ack>;

    async fn register_push_token(&self, token: &str, req: &PushTokenRequest) -> ApiResult<Ack>;
}

// ---------------------------------------------------------------------------
// KYC
// ---------------------------------------------------------------------------

#[async_trait]
pub trait KycApi: Send + Sync {
    async fn submit_kyc(&self, token: &str, submission: &KycSubmission) -> ApiResult<Ack>;

    async fn kyc_status(&self, token: &str) -> ApiResult<KycStatusReport>;
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[async_trait]
pub trait OrderApi: Send + Sync {
    async fn create_order(&self, token: &str, req: &CreateOrderRequest) -> ApiResult<Order>;

    async fn my_orders(&self, token: &str) -> ApiResult<Vec<Order>>;

    async fn order(&self, token: &str, order_id: &str) -> ApiResult<Order>;

    async fn update_order(
        &self,
        token: &str,
        order_id: &str,
        req: &OrderUpdateRequest,
    ) -> ApiResult<Ack>;
}

// ---------------------------------------------------------------------------
// Wallets
// ---------------------------------------------------------------------------

#[async_trait]
pub trait WalletApi: Send + Sync {
    async fn save_wallet(&self, token: &str, req: &SaveWalletRequest) -> ApiResult<SavedWallet>;

    async fn my_wallets(&self, token: &str) -> ApiResult<Vec<SavedWallet>>;

    async fn verified_wallets(&self, token: &str) -> ApiResult<Vec<SavedWallet>>;

    async fn set_primary_wallet(&self, token: &str, wallet_id: &str) -> ApiResult<Ack>;

    async fn delete_wallet(&self, token: &str, wallet_id: &str) -> ApiResult<Ack>;

    async fn balances(&self, token: &str) -> ApiResult<Vec<WalletBalance>>;

    async fn ledger(&self, token: &str) -> ApiResult<Vec<LedgerEntry>>;
}

// ---------------------------------------------------------------------------
// Rates
// ---------------------------------------------------------------------------

#[async_trait]
pub trait RateApi: Send + Sync {
    async fn rates(&self, token: &str) -> ApiResult<Vec<AssetRate>>;

    async fn bank_details(&self, token: &str) -> ApiResult<BankDetails>;

    async fn upi_details(&self, token: &str) -> ApiResult<UpiDetails>;
}

// ---------------------------------------------------------------------------
// Prices
// ---------------------------------------------------------------------------

/// Live market prices relayed by the desk.
#[async_trait]
pub trait PriceApi: Send + Sync {
    /// An empty `symbols` slice asks for every supported symbol.
    async fn prices(&self, token: &str, symbols: &[String]) -> ApiResult<PriceSnapshot>;

    async fn price_history(&self, token: &str, symbol: &str, days: u32)
        -> ApiResult<PriceHistory>;
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn analytics(&self, token: &str) -> ApiResult<Analytics>;

    async fn pending_kyc(&self, token: &str) -> ApiResult<Vec<KycRecord>>;

    async fn kyc_detail(&self, token: &str, kyc_id: &str) -> ApiResult<KycRecord>;

    async fn kyc_action(&self, token: &str, req: &KycActionRequest) -> ApiResult<Ack>;

    async fn all_orders(&self, token: &str) -> ApiResult<Vec<Order>>;

    async fn update_order_status(&self, token: &str, req: &AdminOrderUpdate) -> ApiResult<Ack>;

    async fn admin_rates(&self, token: &str) -> ApiResult<Vec<AssetRate>>;

    async fn update_rate(&self, token: &str, req: &RateUpdateRequest) -> ApiResult<Ack>;

    async fn users(&self, token: &str) -> ApiResult<Vec<User>>;

    async fn freeze_user(&self, token: &str, user_id: &str) -> ApiResult<Ack>;

    async fn assign_rm(&self, token: &str, user_id: &str, req: &AssignRmRequest)
        -> ApiResult<Ack>;

    async fn pending_wallets(&self, token: &str) -> ApiResult<Vec<SavedWallet>>;

    async fn wallet_action(&self, token: &str, req: &WalletActionRequest) -> ApiResult<Ack>;

    async fn manual_ledger_entry(&self, token: &str, req: &ManualLedgerEntry) -> ApiResult<Ack>;
}

/// Every API surface of the desk backend.
pub trait Backend:
    AuthApi + KycApi + OrderApi + WalletApi + RateApi + PriceApi + AdminApi
{
}

impl<T> Backend for T where
    T: AuthApi + KycApi + OrderApi + WalletApi + RateApi + PriceApi + AdminApi
{
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_backend_detail() {
        let err = ApiError::Api {
            status: 401,
            message: "Invalid credentials".to_string(),
        };
        assert_eq!(err.user_message("Login failed"), "Invalid credentials");
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_user_message_falls_back() {
        let err = ApiError::Transport("connection refused".to_string());
        assert_eq!(err.user_message("Login failed"), "Login failed");

        let blank = ApiError::Api {
            status: 500,
            message: "  ".to_string(),
        };
        assert_eq!(blank.user_message("Failed to create order"), "Failed to create order");
    }
}

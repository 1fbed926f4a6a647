use crate::HttpBackend;
use async_trait::async_trait;
use bharatbit_core::*;
use serde::Deserialize;

fn segment(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes()).collect()
}

/// `/crypto/prices/{symbol}/history` answers 200 with `success: false` for
/// unsupported symbols.
#[derive(Deserialize)]
struct HistoryEnvelope {
    #[serde(default = "default_true")]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(flatten)]
    history: PriceHistory,
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[async_trait]
impl AuthApi for HttpBackend {
    async fn register(&self, req: &RegisterRequest) -> ApiResult<RegisterReceipt> {
        self.post("/auth/register", None, req).await
    }

    async fn verify_otp(&self, req: &VerifyOtpRequest) -> ApiResult<OtpReply> {
        self.post("/auth/verify-otp", None, req).await
    }

    async fn login(&self, req: &LoginRequest) -> ApiResult<LoginReply> {
        self.post("/auth/login", None, req).await
    }

    async fn verify_two_factor(&self, req: &VerifyTwoFactorRequest) -> ApiResult<OtpReply> {
        self.post("/auth/verify-2fa", None, req).await
    }

    async fn me(&self, token: &str) -> ApiResult<User> {
        self.get("/auth/me", Some(token)).await
    }

    async fn forgot_password(
        &self,
        req: &ForgotPasswordRequest,
    ) -> ApiResult<PasswordResetReceipt> {
        self.post("/auth/forgot-password", None, req).await
    }

    async fn reset_password(&self, req: &ResetPasswordRequest) -> ApiResult<Ack> {
        self.post("/auth/reset-password", None, req).await
    }

    async fn register_push_token(&self, token: &str, req: &PushTokenRequest) -> ApiResult<Ack> {
        self.post("/auth/register-push-token", Some(token), req).await
    }
}

// ---------------------------------------------------------------------------
// KYC
// ---------------------------------------------------------------------------

#[async_trait]
impl KycApi for HttpBackend {
    async fn submit_kyc(&self, token: &str, submission: &KycSubmission) -> ApiResult<Ack> {
        self.post("/kyc/submit", Some(token), submission).await
    }

    async fn kyc_status(&self, token: &str) -> ApiResult<KycStatusReport> {
        self.get("/kyc/status", Some(token)).await
    }
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[async_trait]
impl OrderApi for HttpBackend {
    async fn create_order(&self, token: &str, req: &CreateOrderRequest) -> ApiResult<Order> {
        let receipt: OrderReceipt = self.post("/orders/create", Some(token), req).await?;
        Ok(receipt.order)
    }

    async fn my_orders(&self, token: &str) -> ApiResult<Vec<Order>> {
        self.get("/orders/my-orders", Some(token)).await
    }

    async fn order(&self, token: &str, order_id: &str) -> ApiResult<Order> {
        self.get(&format!("/orders/{}", segment(order_id)), Some(token))
            .await
    }

    async fn update_order(
        &self,
        token: &str,
        order_id: &str,
        req: &OrderUpdateRequest,
    ) -> ApiResult<Ack> {
        self.put(
            &format!("/orders/{}/update", segment(order_id)),
            Some(token),
            Some(req),
        )
        .await
    }
}

// ---------------------------------------------------------------------------
// Wallets
// ---------------------------------------------------------------------------

#[async_trait]
impl WalletApi for HttpBackend {
    async fn save_wallet(&self, token: &str, req: &SaveWalletRequest) -> ApiResult<SavedWallet> {
        let receipt: WalletReceipt = self.post("/wallets/save", Some(token), req).await?;
        Ok(receipt.wallet)
    }

    async fn my_wallets(&self, token: &str) -> ApiResult<Vec<SavedWallet>> {
        self.get("/wallets/my-wallets", Some(token)).await
    }

    async fn verified_wallets(&self, token: &str) -> ApiResult<Vec<SavedWallet>> {
        self.get("/wallets/verified", Some(token)).await
    }

    async fn set_primary_wallet(&self, token: &str, wallet_id: &str) -> ApiResult<Ack> {
        self.put::<_, ()>(
            &format!("/wallets/{}/set-primary", segment(wallet_id)),
            Some(token),
            None,
        )
        .await
    }

    async fn delete_wallet(&self, token: &str, wallet_id: &str) -> ApiResult<Ack> {
        self.delete(&format!("/wallets/{}", segment(wallet_id)), Some(token))
            .await
    }

    async fn balances(&self, token: &str) -> ApiResult<Vec<WalletBalance>> {
        self.get("/wallets/balance", Some(token)).await
    }

    async fn ledger(&self, token: &str) -> ApiResult<Vec<LedgerEntry>> {
        self.get("/wallets/ledger", Some(token)).await
    }
}

// ---------------------------------------------------------------------------
// Rates
// ---------------------------------------------------------------------------

#[async_trait]
impl RateApi for HttpBackend {
    async fn rates(&self, token: &str) -> ApiResult<Vec<AssetRate>> {
        self.get("/rates", Some(token)).await
    }

    async fn bank_details(&self, token: &str) -> ApiResult<BankDetails> {
        self.get("/rates/payment/bank-details", Some(token)).await
    }

    async fn upi_details(&self, token: &str) -> ApiResult<UpiDetails> {
        self.get("/rates/payment/upi-details", Some(token)).await
    }
}

// ---------------------------------------------------------------------------
// Prices
// ---------------------------------------------------------------------------

#[async_trait]
impl PriceApi for HttpBackend {
    async fn prices(&self, token: &str, symbols: &[String]) -> ApiResult<PriceSnapshot> {
        if symbols.is_empty() {
            return self.get("/crypto/prices", Some(token)).await;
        }
        let symbols = symbols.join(",");
        self.get_query("/crypto/prices", Some(token), &[("symbols", symbols.as_str())])
            .await
    }

    async fn price_history(
        &self,
        token: &str,
        symbol: &str,
        days: u32,
    ) -> ApiResult<PriceHistory> {
        let envelope: HistoryEnvelope = self
            .get_query(
                &format!("/crypto/prices/{}/history", segment(symbol)),
                Some(token),
                &[("days", days)],
            )
            .await?;
        if !envelope.success {
            return Err(ApiError::Api {
                status: 404,
                message: envelope
                    .error
                    .unwrap_or_else(|| format!("Symbol {symbol} not supported")),
            });
        }
        Ok(envelope.history)
    }
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

#[async_trait]
impl AdminApi for HttpBackend {
    async fn analytics(&self, token: &str) -> ApiResult<Analytics> {
        self.get("/admin/analytics", Some(token)).await
    }

    async fn pending_kyc(&self, token: &str) -> ApiResult<Vec<KycRecord>> {
        self.get("/admin/kyc-pending", Some(token)).await
    }

    async fn kyc_detail(&self, token: &str, kyc_id: &str) -> ApiResult<KycRecord> {
        self.get(&format!("/admin/kyc/{}", segment(kyc_id)), Some(token))
            .await
    }

    async fn kyc_action(&self, token: &str, req: &KycActionRequest) -> ApiResult<Ack> {
        self.post("/admin/kyc/action", Some(token), req).await
    }

    async fn all_orders(&self, token: &str) -> ApiResult<Vec<Order>> {
        self.get("/admin/orders", Some(token)).await
    }

    async fn update_order_status(&self, token: &str, req: &AdminOrderUpdate) -> ApiResult<Ack> {
        self.put("/admin/orders/update", Some(token), Some(req)).await
    }

    async fn admin_rates(&self, token: &str) -> ApiResult<Vec<AssetRate>> {
        self.get("/admin/rates", Some(token)).await
    }

    async fn update_rate(&self, token: &str, req: &RateUpdateRequest) -> ApiResult<Ack> {
        self.post("/admin/rates/update", Some(token), req).await
    }

    async fn users(&self, token: &str) -> ApiResult<Vec<User>> {
        self.get("/admin/users", Some(token)).await
    }

    async fn freeze_user(&self, token: &str, user_id: &str) -> ApiResult<Ack> {
        self.put::<_, ()>(
            &format!("/admin/users/{}/freeze", segment(user_id)),
            Some(token),
            None,
        )
        .await
    }

    async fn assign_rm(
        &self,
        token: &str,
        user_id: &str,
        req: &AssignRmRequest,
    ) -> ApiResult<Ack> {
        self.put(
            &format!("/admin/users/{}/assign-rm", segment(user_id)),
            Some(token),
            Some(req),
        )
        .await
    }

    async fn pending_wallets(&self, token: &str) -> ApiResult<Vec<SavedWallet>> {
        self.get("/admin/wallets/pending", Some(token)).await
    }

    async fn wallet_action(&self, token: &str, req: &WalletActionRequest) -> ApiResult<Ack> {
        self.post("/admin/wallets/action", Some(token), req).await
    }

    async fn manual_ledger_entry(&self, token: &str, req: &ManualLedgerEntry) -> ApiResult<Ack> {
        self.post("/admin/ledger/manual-entry", Some(token), req)
            .await
    }
}

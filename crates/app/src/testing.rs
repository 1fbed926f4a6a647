//! Canned backend for screen tests.

use crate::AppState;
use async_trait::async_trait;
use bharatbit_core::*;
use bharatbit_session::MemorySessionStore;
use rust_decimal_macros::dec;
use std::sync::{Arc, Mutex};

pub(crate) fn user(kyc_status: KycStatus) -> User {
    User {
        id: "u-1".to_string(),
        client_uid: Some("BB100001".to_string()),
        mobile: "+919876543210".to_string(),
        email: "trader@example.com".to_string(),
        role: Role::User,
        kyc_status,
        account_type: AccountType::Individual,
        company_name: None,
        is_frozen: false,
        relationship_manager: Some("Priya".to_string()),
        rm_phone: Some("+919800000001".to_string()),
        rm_whatsapp: Some("919800000001".to_string()),
        created_at: None,
    }
}

pub(crate) fn order(id: &str, status: OrderStatus) -> Order {
    Order {
        id: id.to_string(),
        asset: "USDT".to_string(),
        side: Side::Buy,
        quantity: dec!(100),
        rate: dec!(89.5),
        total_inr: dec!(8950),
        status,
        payment_proof: None,
        tx_hash: None,
        utr_number: None,
        wallet_address: None,
        notes: None,
        created_at: None,
        updated_at: None,
        user_email: None,
        user_mobile: None,
    }
}

pub(crate) fn rate(asset: &str, buy: rust_decimal::Decimal, sell: rust_decimal::Decimal) -> AssetRate {
    AssetRate {
        asset: asset.to_string(),
        buy_rate: buy,
        sell_rate: sell,
        updated_at: None,
        user_specific: None,
    }
}

pub(crate) fn wallet(id: &str, status: VerificationStatus) -> SavedWallet {
    SavedWallet {
        id: id.to_string(),
        asset: "USDT".to_string(),
        network: "TRC20".to_string(),
        wallet_address: "TQn9Y2khEsLJW1ChVWFMSMeRDow5KcbLSE".to_string(),
        label: "Binance main".to_string(),
        verification_status: status,
        is_primary: false,
        admin_notes: None,
        created_at: None,
        user_email: None,
        user_mobile: None,
    }
}

pub(crate) fn ack() -> ApiResult<Ack> {
    Ok(Ack {
        success: true,
        message: None,
    })
}

pub(crate) fn api_error(status: u16, message: &str) -> ApiError {
    ApiError::Api {
        status,
        message: message.to_string(),
    }
}

/// Every slot left `None` answers with a transport error.
#[derive(Default)]
pub(crate) struct StubBackend {
    pub calls: Mutex<Vec<&'static str>>,

    pub register: Option<ApiResult<RegisterReceipt>>,
    pub login: Option<ApiResult<LoginReply>>,
    pub verify_otp: Option<ApiResult<OtpReply>>,
    pub verify_two_factor: Option<ApiResult<OtpReply>>,
    pub me: Option<ApiResult<User>>,
    pub forgot_password: Option<ApiResult<PasswordResetReceipt>>,
    pub reset_password: Option<ApiResult<Ack>>,

    pub submit_kyc: Option<ApiResult<Ack>>,
    pub kyc_status: Option<ApiResult<KycStatusReport>>,

    pub create_order: Option<ApiResult<Order>>,
    pub my_orders: Option<ApiResult<Vec<Order>>>,
    pub order: Option<ApiResult<Order>>,
    pub update_order: Option<ApiResult<Ack>>,

    pub save_wallet: Option<ApiResult<SavedWallet>>,
    pub my_wallets: Option<ApiResult<Vec<SavedWallet>>>,
    pub set_primary: Option<ApiResult<Ack>>,
    pub delete_wallet: Option<ApiResult<Ack>>,
    pub balances: Option<ApiResult<Vec<WalletBalance>>>,
    pub ledger: Option<ApiResult<Vec<LedgerEntry>>>,

    pub rates: Option<ApiResult<Vec<AssetRate>>>,
    pub bank_details: Option<ApiResult<BankDetails>>,
    pub upi_details: Option<ApiResult<UpiDetails>>,

    pub prices: Option<ApiResult<PriceSnapshot>>,
    pub history: Option<ApiResult<PriceHistory>>,

    pub analytics: Option<ApiResult<Analytics>>,
    pub pending_kyc: Option<ApiResult<Vec<KycRecord>>>,
    pub kyc_detail: Option<ApiResult<KycRecord>>,
    pub kyc_action: Option<ApiResult<Ack>>,
    pub all_orders: Option<ApiResult<Vec<Order>>>,
    pub update_order_status: Option<ApiResult<Ack>>,
    pub admin_rates: Option<ApiResult<Vec<AssetRate>>>,
    pub update_rate: Option<ApiResult<Ack>>,
    pub users: Option<ApiResult<Vec<User>>>,
    pub freeze_user: Option<ApiResult<Ack>>,
    pub assign_rm: Option<ApiResult<Ack>>,
    pub pending_wallets: Option<ApiResult<Vec<SavedWallet>>>,
    pub wallet_action: Option<ApiResult<Ack>>,
    pub manual_ledger_entry: Option<ApiResult<Ack>>,
}

impl StubBackend {
    fn reply<T: Clone>(&self, name: &'static str, slot: &Option<ApiResult<T>>) -> ApiResult<T> {
        self.calls.lock().unwrap().push(name);
        slot.clone()
            .unwrap_or_else(|| Err(ApiError::Transport(format!("{name} not stubbed"))))
    }

    pub fn called(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == name).count()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

/// App state over `backend`, signed out.
pub(crate) fn app(backend: StubBackend) -> (AppState, Arc<StubBackend>) {
    let backend = Arc::new(backend);
    let state = AppState::new(backend.clone(), Arc::new(MemorySessionStore::new()));
    (state, backend)
}

/// App state over `backend` with a restored session for `user`.
pub(crate) async fn signed_in(backend: StubBackend, user: User) -> (AppState, Arc<StubBackend>) {
    let backend = Arc::new(backend);
    let store = MemorySessionStore::with_session(Session::new("tok-1", user));
    let state = AppState::new(backend.clone(), Arc::new(store));
    state.auth.restore().await;
    (state, backend)
}

#[async_trait]
impl AuthApi for StubBackend {
    async fn register(&self, _req: &RegisterRequest) -> ApiResult<RegisterReceipt> {
        self.reply("register", &self.register)
    }

    async fn verify_otp(&self, _req: &VerifyOtpRequest) -> ApiResult<OtpReply> {
        self.reply("verify_otp", &self.verify_otp)
    }

    async fn login(&self, _req: &LoginRequest) -> ApiResult<LoginReply> {
        self.reply("login", &self.login)
    }

    async fn verify_two_factor(&self, _req: &VerifyTwoFactorRequest) -> ApiResult<OtpReply> {
        self.reply("verify_two_factor", &self.verify_two_factor)
    }

    async fn me(&self, _token: &str) -> ApiResult<User> {
        self.reply("me", &self.me)
    }

    async fn forgot_password(
        &self,
        _req: &ForgotPasswordRequest,
    ) -> ApiResult<PasswordResetReceipt> {
        self.reply("forgot_password", &self.forgot_password)
    }

    async fn reset_password(&self, _req: &ResetPasswordRequest) -> ApiResult<Ack> {
        self.reply("reset_password", &self.reset_password)
    }

    async fn register_push_token(&self, _token: &str, _req: &PushTokenRequest) -> ApiResult<Ack> {
        self.reply("register_push_token", &None)
    }
}

#[async_trait]
impl KycApi for StubBackend {
    async fn submit_kyc(&self, _token: &str, _submission: &KycSubmission) -> ApiResult<Ack> {
        self.reply("submit_kyc", &self.submit_kyc)
    }

    async fn kyc_status(&self, _token: &str) -> ApiResult<KycStatusReport> {
        self.reply("kyc_status", &self.kyc_status)
    }
}

#[async_trait]
impl OrderApi for StubBackend {
    async fn create_order(&self, _token: &str, _req: &CreateOrderRequest) -> ApiResult<Order> {
        self.reply("create_order", &self.create_order)
    }

    async fn my_orders(&self, _token: &str) -> ApiResult<Vec<Order>> {
        self.reply("my_orders", &self.my_orders)
    }

    async fn order(&self, _token: &str, _order_id: &str) -> ApiResult<Order> {
        self.reply("order", &self.order)
    }

    async fn update_order(
        &self,
        _token: &str,
        _order_id: &str,
        _req: &OrderUpdateRequest,
    ) -> ApiResult<Ack> {
        self.reply("update_order", &self.update_order)
    }
}

#[async_trait]
impl WalletApi for StubBackend {
    async fn save_wallet(&self, _token: &str, _req: &SaveWalletRequest) -> ApiResult<SavedWallet> {
        self.reply("save_wallet", &self.save_wallet)
    }

    async fn my_wallets(&self, _token: &str) -> ApiResult<Vec<SavedWallet>> {
        self.reply("my_wallets", &self.my_wallets)
    }

    async fn verified_wallets(&self, _token: &str) -> ApiResult<Vec<SavedWallet>> {
        self.reply("verified_wallets", &None)
    }

    async fn set_primary_wallet(&self, _token: &str, _wallet_id: &str) -> ApiResult<Ack> {
        self.reply("set_primary_wallet", &self.set_primary)
    }

    async fn delete_wallet(&self, _token: &str, _wallet_id: &str) -> ApiResult<Ack> {
        self.reply("delete_wallet", &self.delete_wallet)
    }

    async fn balances(&self, _token: &str) -> ApiResult<Vec<WalletBalance>> {
        self.reply("balances", &self.balances)
    }

    async fn ledger(&self, _token: &str) -> ApiResult<Vec<LedgerEntry>> {
        self.reply("ledger", &self.ledger)
    }
}

#[async_trait]
impl RateApi for StubBackend {
    async fn rates(&self, _token: &str) -> ApiResult<Vec<AssetRate>> {
        self.reply("rates", &self.rates)
    }

    async fn bank_details(&self, _token: &str) -> ApiResult<BankDetails> {
        self.reply("bank_details", &self.bank_details)
    }

    async fn upi_details(&self, _token: &str) -> ApiResult<UpiDetails> {
        self.reply("upi_details", &self.upi_details)
    }
}

#[async_trait]
impl PriceApi for StubBackend {
    async fn prices(&self, _token: &str, _symbols: &[String]) -> ApiResult<PriceSnapshot> {
        self.reply("prices", &self.prices)
    }

    async fn price_history(
        &self,
        _token: &str,
        _symbol: &str,
        _days: u32,
    ) -> ApiResult<PriceHistory> {
        self.reply("price_history", &self.history)
    }
}

#[async_trait]
impl AdminApi for StubBackend {
    async fn analytics(&self, _token: &str) -> ApiResult<Analytics> {
        self.reply("analytics", &self.analytics)
    }

    async fn pending_kyc(&self, _token: &str) -> ApiResult<Vec<KycRecord>> {
        self.reply("pending_kyc", &self.pending_kyc)
    }

    async fn kyc_detail(&self, _token: &str, _kyc_id: &str) -> ApiResult<KycRecord> {
        self.reply("kyc_detail", &self.kyc_detail)
    }

    async fn kyc_action(&self, _token: &str, _req: &KycActionRequest) -> ApiResult<Ack> {
        self.reply("kyc_action", &self.kyc_action)
    }

    async fn all_orders(&self, _token: &str) -> ApiResult<Vec<Order>> {
        self.reply("all_orders", &self.all_orders)
    }

    async fn update_order_status(&self, _token: &str, _req: &AdminOrderUpdate) -> ApiResult<Ack> {
        self.reply("update_order_status", &self.update_order_status)
    }

    async fn admin_rates(&self, _token: &str) -> ApiResult<Vec<AssetRate>> {
        self.reply("admin_rates", &self.admin_rates)
    }

    async fn update_rate(&self, _token: &str, _req: &RateUpdateRequest) -> ApiResult<Ack> {
        self.reply("update_rate", &self.update_rate)
    }

    async fn users(&self, _token: &str) -> ApiResult<Vec<User>> {
        self.reply("users", &self.users)
    }

    async fn freeze_user(&self, _token: &str, _user_id: &str) -> ApiResult<Ack> {
        self.reply("freeze_user", &self.freeze_user)
    }

    async fn assign_rm(
        &self,
        _token: &str,
        _user_id: &str,
        _req: &AssignRmRequest,
    ) -> ApiResult<Ack> {
        self.reply("assign_rm", &self.assign_rm)
    }

    async fn pending_wallets(&self, _token: &str) -> ApiResult<Vec<SavedWallet>> {
        self.reply("pending_wallets", &self.pending_wallets)
    }

    async fn wallet_action(&self, _token: &str, _req: &WalletActionRequest) -> ApiResult<Ack> {
        self.reply("wallet_action", &self.wallet_action)
    }

    async fn manual_ledger_entry(&self, _token: &str, _req: &ManualLedgerEntry) -> ApiResult<Ack> {
        self.reply("manual_ledger_entry", &self.manual_ledger_entry)
    }
}

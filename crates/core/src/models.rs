use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Users & Session
// ---------------------------------------------------------------------------

/// Role assigned to an account by the desk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// Where an account stands in the KYC review workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KycStatus {
    #[default]
    Pending,
    UnderReview,
    Approved,
    Rejected,
    /// Reported by `/kyc/status` when no documents were ever submitted.
    NotSubmitted,
}

impl KycStatus {
    pub fn label(&self) -> &'static str {
        match self {
            KycStatus::Pending => "Pending",
            KycStatus::UnderReview => "Under Review",
            KycStatus::Approved => "Approved",
            KycStatus::Rejected => "Rejected",
            KycStatus::NotSubmitted => "Not Submitted",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    #[default]
    Individual,
    Corporate,
}

/// User profile as returned by the auth endpoints and `/auth/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub client_uid: Option<String>,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub kyc_status: KycStatus,
    #[serde(default)]
    pub account_type: AccountType,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub is_frozen: bool,
    #[serde(default)]
    pub relationship_manager: Option<String>,
    #[serde(default)]
    pub rm_phone: Option<String>,
    #[serde(default)]
    pub rm_whatsapp: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_kyc_approved(&self) -> bool {
        self.kyc_status == KycStatus::Approved
    }
}

/// An authenticated session: the bearer token plus the profile it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl Session {
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

/// Order side. The backend calls this field `order_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

/// The lifecycle state of an OTC order. Transitions are driven by the desk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    AwaitingPayment,
    PaymentConfirmed,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::AwaitingPayment,
        OrderStatus::PaymentConfirmed,
        OrderStatus::Processing,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn is_active(&self) -> bool {
        matches!(
            self,
            OrderStatus::AwaitingPayment | OrderStatus::PaymentConfirmed | OrderStatus::Processing
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::AwaitingPayment => "Awaiting Payment",
            OrderStatus::PaymentConfirmed => "Payment Confirmed",
            OrderStatus::Processing => "Processing",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

/// An order as stored by the desk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub asset: String,
    #[serde(rename = "order_type")]
    pub side: Side,
    pub quantity: Decimal,
    /// Rate locked by the backend when the order was created.
    pub rate: Decimal,
    pub total_inr: Decimal,
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_proof: Option<String>,
    #[serde(default)]
    pub tx_hash: Option<String>,
    #[serde(default)]
    pub utr_number: Option<String>,
    #[serde(default)]
    pub wallet_address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
    /// Only present in admin listings.
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub user_mobile: Option<String>,
}

impl Order {
    /// First eight characters of the id, the way the desk refers to orders.
    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }

    pub fn needs_payment(&self) -> bool {
        self.status == OrderStatus::AwaitingPayment && self.payment_proof.is_none()
    }
}

// ---------------------------------------------------------------------------
// Rates & Payment instructions
// ---------------------------------------------------------------------------

/// Indicative desk rate for one asset, in INR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRate {
    pub asset: String,
    pub buy_rate: Decimal,
    pub sell_rate: Decimal,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
    /// Set when the rate is a per-user override.
    #[serde(default)]
    pub user_specific: Option<String>,
}

impl AssetRate {
    pub fn rate_for(&self, side: Side) -> Decimal {
        match side {
            Side::Buy => self.buy_rate,
            Side::Sell => self.sell_rate,
        }
    }
}

/// Desk bank account that buyers transfer INR to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankDetails {
    pub account_name: String,
    pub account_number: String,
    pub ifsc_code: String,
    pub bank_name: String,
    pub branch: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpiDetails {
    pub upi_id: String,
    pub merchant_name: String,
}

impl UpiDetails {
    /// `upi://pay` link rendered as a QR code by payment apps.
    pub fn payment_uri(&self, amount: Decimal) -> String {
        format!(
            "upi://pay?pa={}&pn={}&am={}&cu=INR",
            self.upi_id,
            self.merchant_name.replace(' ', "%20"),
            amount.round_dp(2)
        )
    }
}

// ---------------------------------------------------------------------------
// Wallets & Ledger
// ---------------------------------------------------------------------------

/// Net balance of one asset, derived by the backend from the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletBalance {
    pub asset: String,
    pub balance: Decimal,
}

/// Look up the balance of `asset` in a balance list. Unknown assets hold zero.
pub fn balance_of(balances: &[WalletBalance], asset: &str) -> Decimal {
    balances
        .iter()
        .find(|b| b.asset.eq_ignore_ascii_case(asset))
        .map(|b| b.balance)
        .unwrap_or(Decimal::ZERO)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    Credit,
    Debit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: String,
    pub asset: String,
    #[serde(rename = "transaction_type")]
    pub entry_type: EntryType,
    pub amount: Decimal,
    pub description: String,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl LedgerEntry {
    /// Amount with the sign of its direction (debits negative).
    pub fn signed_amount(&self) -> Decimal {
        match self.entry_type {
            EntryType::Credit => self.amount,
            EntryType::Debit => -self.amount,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    #[default]
    Pending,
    Verified,
    Rejected,
}

/// A withdrawal address the user registered with the desk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedWallet {
    pub id: String,
    pub asset: String,
    pub network: String,
    pub wallet_address: String,
    pub label: String,
    #[serde(default)]
    pub verification_status: VerificationStatus,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub admin_notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub user_mobile: Option<String>,
}

// ---------------------------------------------------------------------------
// KYC
// ---------------------------------------------------------------------------

/// Result of `/kyc/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KycStatusReport {
    /// Status of the submitted document set.
    pub status: KycStatus,
    /// Status recorded on the user profile.
    #[serde(default)]
    pub kyc_status: KycStatus,
    #[serde(default)]
    pub submitted_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

/// A KYC submission as seen from the admin console.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KycRecord {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub status: KycStatus,
    #[serde(default)]
    pub pan_number: Option<String>,
    #[serde(default)]
    pub aadhaar_number: Option<String>,
    #[serde(default)]
    pub bank_account_number: Option<String>,
    #[serde(default)]
    pub bank_ifsc: Option<String>,
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub account_holder_name: Option<String>,
    #[serde(default)]
    pub nominee_name: Option<String>,
    /// Document images (data URIs); only returned by the detail endpoint.
    #[serde(default)]
    pub pan_image: Option<String>,
    #[serde(default)]
    pub aadhaar_front: Option<String>,
    #[serde(default)]
    pub aadhaar_back: Option<String>,
    #[serde(default)]
    pub selfie_image: Option<String>,
    #[serde(default)]
    pub address_proof: Option<String>,
    #[serde(default)]
    pub submitted_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub user_mobile: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

// ---------------------------------------------------------------------------
// Prices
// ---------------------------------------------------------------------------

/// Live market price for one asset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LivePrice {
    #[serde(default)]
    pub usd: Decimal,
    #[serde(default)]
    pub inr: Decimal,
    #[serde(default)]
    pub usd_24h_change: Decimal,
    #[serde(default)]
    pub inr_24h_change: Decimal,
    #[serde(default)]
    pub last_updated: Option<NaiveDateTime>,
}

/// Response of `/crypto/prices`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    #[serde(default)]
    pub prices: HashMap<String, LivePrice>,
    #[serde(default)]
    pub supported_symbols: Vec<String>,
}

/// One point of a price history series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub price: Decimal,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
}

/// Response of `/crypto/prices/{symbol}/history`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub days: u32,
    #[serde(default)]
    pub data: Vec<PricePoint>,
}

impl PriceHistory {
    /// Whether the series ended at or above where it started.
    pub fn is_up(&self) -> Option<bool> {
        match (self.data.first(), self.data.last()) {
            (Some(first), Some(last)) if self.data.len() >= 2 => Some(last.price >= first.price),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Admin analytics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsOverview {
    pub total_users: u64,
    pub verified_users: u64,
    pub pending_kyc: u64,
    pub total_orders: u64,
    pub completed_orders: u64,
    pub pending_orders: u64,
    pub pending_wallets: u64,
    pub new_users_this_week: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeSummary {
    pub total_buy_volume: Decimal,
    pub total_sell_volume: Decimal,
    pub total_volume: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetVolume {
    pub asset: String,
    pub count: u64,
    pub volume: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyOrders {
    pub date: String,
    pub day: String,
    pub count: u64,
    pub volume: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KycBreakdown {
    pub approved: u64,
    pub pending: u64,
    pub rejected: u64,
    pub under_review: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsCharts {
    pub asset_breakdown: Vec<AssetVolume>,
    pub daily_orders: Vec<DailyOrders>,
    pub kyc_status: KycBreakdown,
}

/// Response of `/admin/analytics`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Analytics {
    pub overview: AnalyticsOverview,
    pub volume: VolumeSummary,
    pub charts: AnalyticsCharts,
}

// ---------------------------------------------------------------------------
// Response envelopes
// ---------------------------------------------------------------------------

/// Generic `{ success, message }` acknowledgement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response of `/auth/register`. No session is issued until the OTP is verified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterReceipt {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub client_uid: Option<String>,
    pub email: String,
    #[serde(default)]
    pub email_sent: bool,
    #[serde(default)]
    pub sms_sent: bool,
}

/// Response of `/auth/login`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub requires_2fa: bool,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub email_sent: bool,
    #[serde(default)]
    pub sms_sent: bool,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

/// Response of `/auth/verify-otp` and `/auth/verify-2fa`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OtpReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

impl OtpReply {
    /// A session is only issued when both the token and the profile are present.
    pub fn into_session(self) -> Option<Session> {
        match (self.token, self.user) {
            (Some(token), Some(user)) => Some(Session::new(token, user)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PasswordResetReceipt {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    /// Reset token, echoed by development backends.
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderReceipt {
    #[serde(default)]
    pub success: bool,
    pub order: Order,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletReceipt {
    #[serde(default)]
    pub success: bool,
    pub wallet: SavedWallet,
}

use crate::models::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub mobile: String,
    pub email: String,
    pub password: String,
    pub account_type: AccountType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referral_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invite_code: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    #[default]
    Registration,
    #[serde(rename = "2fa")]
    TwoFactor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyOtpRequest {
    /// Email or mobile the code was delivered to. The backend names it `mobile`.
    #[serde(rename = "mobile")]
    pub identifier: String,
    pub otp: String,
    pub purpose: OtpPurpose,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyTwoFactorRequest {
    pub mobile: String,
    pub otp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushTokenRequest {
    pub push_token: String,
}

// ---------------------------------------------------------------------------
// KYC
// ---------------------------------------------------------------------------

/// Full KYC submission. Documents are `data:<mime>;base64,...` URIs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KycSubmission {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pan_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pan_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aadhaar_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aadhaar_front: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aadhaar_back: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selfie_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_proof: Option<String>,

    // Corporate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_registration_cert: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gst_certificate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board_resolution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorized_signatory_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorized_signatory_name: Option<String>,

    // Bank
    pub bank_account_number: String,
    pub bank_ifsc: String,
    pub bank_name: String,
    pub bank_branch: String,
    pub account_holder_name: String,

    // Nominee
    pub nominee_name: String,
    pub nominee_relationship: String,
    pub nominee_dob: String,

    pub fatca_declaration: bool,
    pub terms_accepted: bool,
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub asset: String,
    #[serde(rename = "order_type")]
    pub side: Side,
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
}

/// Payment proof attached by the user to an order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_proof: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utr_number: Option<String>,
}

// ---------------------------------------------------------------------------
// Wallets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletType {
    #[default]
    SelfCustody,
    Exchange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveWalletRequest {
    pub label: String,
    pub wallet_address: String,
    pub asset: String,
    pub network: String,
    pub wallet_type: WalletType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_name: Option<String>,
    pub proof_image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_description: Option<String>,
    pub is_primary: bool,
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewAction {
    Approve,
    Reject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KycActionRequest {
    pub kyc_id: String,
    pub action: ReviewAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletActionRequest {
    pub wallet_id: String,
    pub action: ReviewAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminOrderUpdate {
    pub order_id: String,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateUpdateRequest {
    pub asset: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub buy_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub sell_rate: Decimal,
    /// User id for a per-user override; `None` updates the desk-wide rate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_specific: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualLedgerEntry {
    pub user_id: String,
    pub asset: String,
    #[serde(rename = "transaction_type")]
    pub entry_type: EntryType,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignRmRequest {
    pub rm_name: String,
    pub rm_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rm_whatsapp: Option<String>,
}

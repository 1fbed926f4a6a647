//! Form drafts held in screen state and the checks run before submission.
//!
//! Validation here is advisory: it blocks obviously incomplete submissions
//! before any network call. The backend stays authoritative.

pub mod admin;
pub mod auth;
pub mod document;
pub mod kyc;
pub mod order;
pub mod wallet;

pub use admin::*;
pub use auth::*;
pub use document::{decode_data_uri, DocumentImage};
pub use kyc::*;
pub use order::*;
pub use wallet::*;

use rust_decimal::Decimal;
use std::str::FromStr;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const OTP_LEN: usize = 6;

/// A failed client-side check. The display text is shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Please fill all required fields")]
    MissingFields,
    #[error("Please fill all fields")]
    MissingCredentials,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),
    #[error("Please enter a company name")]
    MissingCompanyName,
    #[error("Please enter a valid 6-digit OTP")]
    InvalidOtp,
    #[error("Please enter your email address")]
    MissingEmail,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Please enter the OTP")]
    MissingResetCode,
    #[error("Please enter your new password")]
    MissingNewPassword,

    // KYC
    #[error("Please enter a valid PAN number (e.g. ABCDE1234F)")]
    InvalidPan,
    #[error("Please enter a valid 12-digit Aadhaar number")]
    InvalidAadhaar,
    #[error("Please enter a valid IFSC code (e.g. HDFC0001234)")]
    InvalidIfsc,
    #[error("Please fill all required fields and upload all documents")]
    MissingDocuments,
    #[error("Please accept FATCA declaration and Terms & Conditions")]
    DeclarationsNotAccepted,
    #[error("Unsupported document type: {0}")]
    UnsupportedDocument(String),

    // Orders
    #[error("Please enter a valid quantity")]
    InvalidQuantity,
    #[error("Please enter your wallet address for crypto transfer")]
    MissingPayoutAddress,
    #[error("Insufficient balance")]
    InsufficientBalance,
    #[error("Please upload payment proof")]
    MissingPaymentProof,
    #[error("Please enter UTR number")]
    MissingUtr,

    // Wallets
    #[error("Please enter a wallet label")]
    MissingWalletLabel,
    #[error("Please enter the wallet address")]
    MissingWalletAddress,
    #[error("Please select a network")]
    MissingNetwork,
    #[error("Please select an exchange")]
    MissingExchange,
    #[error("Please upload proof of ownership")]
    MissingOwnershipProof,

    // Admin
    #[error("Please enter both buy and sell rates")]
    MissingRates,
    #[error("Please enter a valid amount")]
    InvalidAmount,
    #[error("Please provide a rejection reason")]
    MissingRejectionReason,
}

/// Trimmed value, or `None` when blank.
pub(crate) fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Parse a user-typed amount. Thousands separators are ignored.
pub fn parse_amount(input: &str) -> Option<Decimal> {
    let cleaned: String = input.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

/// Parse an amount that must be strictly positive.
pub fn parse_positive(input: &str) -> Option<Decimal> {
    parse_amount(input).filter(|v| *v > Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" 1,250.75 "), Some(dec!(1250.75)));
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_positive("0"), None);
        assert_eq!(parse_positive("-3"), None);
        assert_eq!(parse_positive("0.0001"), Some(dec!(0.0001)));
    }

    #[test]
    fn test_messages_are_literal() {
        assert_eq!(FormError::PasswordMismatch.to_string(), "Passwords do not match");
        assert_eq!(
            FormError::PasswordTooShort(MIN_PASSWORD_LEN).to_string(),
            "Password must be at least 8 characters"
        );
        assert_eq!(FormError::InsufficientBalance.to_string(), "Insufficient balance");
    }
}

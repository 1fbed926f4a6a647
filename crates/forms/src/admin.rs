use crate::{non_blank, parse_positive, FormError};
use bharatbit_core::{
    AdminOrderUpdate, AssignRmRequest, EntryType, KycActionRequest, ManualLedgerEntry,
    OrderStatus, RateUpdateRequest, ReviewAction, WalletActionRequest,
};

/// Desk-wide or per-user rate update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateDraft {
    pub asset: String,
    pub buy_rate: String,
    pub sell_rate: String,
    /// User id for a per-user override. Blank updates the desk-wide rate.
    pub user_specific: String,
}

impl Default for RateDraft {
    fn default() -> Self {
        Self {
            asset: "USDT".to_string(),
            buy_rate: String::new(),
            sell_rate: String::new(),
            user_specific: String::new(),
        }
    }
}

impl RateDraft {
    pub fn validate(&self) -> Result<RateUpdateRequest, FormError> {
        if self.buy_rate.trim().is_empty() || self.sell_rate.trim().is_empty() {
            return Err(FormError::MissingRates);
        }
        let buy_rate = parse_positive(&self.buy_rate).ok_or(FormError::InvalidAmount)?;
        let sell_rate = parse_positive(&self.sell_rate).ok_or(FormError::InvalidAmount)?;
        Ok(RateUpdateRequest {
            asset: self.asset.trim().to_ascii_uppercase(),
            buy_rate,
            sell_rate,
            user_specific: non_blank(&self.user_specific),
        })
    }
}

/// Manual credit or debit on a user's ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerDraft {
    pub user_id: String,
    pub asset: String,
    pub entry_type: EntryType,
    pub amount: String,
    pub description: String,
}

impl Default for LedgerDraft {
    fn default() -> Self {
        Self {
            user_id: String::new(),
            asset: "USDT".to_string(),
            entry_type: EntryType::Credit,
            amount: String::new(),
            description: String::new(),
        }
    }
}

impl LedgerDraft {
    pub fn validate(&self) -> Result<ManualLedgerEntry, FormError> {
        let user_id = non_blank(&self.user_id).ok_or(FormError::MissingFields)?;
        let asset = non_blank(&self.asset).ok_or(FormError::MissingFields)?;
        let description = non_blank(&self.description).ok_or(FormError::MissingFields)?;
        if self.amount.trim().is_empty() {
            return Err(FormError::MissingFields);
        }
        let amount = parse_positive(&self.amount).ok_or(FormError::InvalidAmount)?;
        Ok(ManualLedgerEntry {
            user_id,
            asset: asset.to_ascii_uppercase(),
            entry_type: self.entry_type,
            amount,
            description,
        })
    }
}

/// Approve or reject a KYC submission. Rejections need a reason.
pub fn kyc_review(
    kyc_id: &str,
    action: ReviewAction,
    reason: &str,
) -> Result<KycActionRequest, FormError> {
    let rejection_reason = non_blank(reason);
    if action == ReviewAction::Reject && rejection_reason.is_none() {
        return Err(FormError::MissingRejectionReason);
    }
    Ok(KycActionRequest {
        kyc_id: kyc_id.to_string(),
        action,
        rejection_reason: match action {
            ReviewAction::Approve => None,
            ReviewAction::Reject => rejection_reason,
        },
    })
}

pub fn order_status_update(order_id: &str, status: OrderStatus, notes: &str) -> AdminOrderUpdate {
    AdminOrderUpdate {
        order_id: order_id.to_string(),
        status,
        notes: non_blank(notes),
    }
}

pub fn wallet_review(wallet_id: &str, action: ReviewAction, notes: &str) -> WalletActionRequest {
    WalletActionRequest {
        wallet_id: wallet_id.to_string(),
        action,
        notes: non_blank(notes),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignRmDraft {
    pub rm_name: String,
    pub rm_phone: String,
    pub rm_whatsapp: String,
}

impl AssignRmDraft {
    pub fn validate(&self) -> Result<AssignRmRequest, FormError> {
        let rm_name = non_blank(&self.rm_name).ok_or(FormError::MissingFields)?;
        let rm_phone = non_blank(&self.rm_phone).ok_or(FormError::MissingFields)?;
        Ok(AssignRmRequest {
            rm_name,
            rm_phone,
            rm_whatsapp: non_blank(&self.rm_whatsapp),
        })
    }
}

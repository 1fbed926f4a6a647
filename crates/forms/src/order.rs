use crate::document::DocumentImage;
use crate::{non_blank, parse_positive, FormError};
use bharatbit_core::{balance_of, AssetRate, CreateOrderRequest, OrderUpdateRequest, Side, WalletBalance};
use rust_decimal::Decimal;

/// Draft of the create-order form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    pub side: Side,
    pub asset: String,
    pub quantity: String,
    /// Where the user sends crypto from on a sell.
    pub wallet_address: String,
}

impl Default for OrderDraft {
    fn default() -> Self {
        Self {
            side: Side::Buy,
            asset: "USDT".to_string(),
            quantity: String::new(),
            wallet_address: String::new(),
        }
    }
}

impl OrderDraft {
    pub fn quantity(&self) -> Option<Decimal> {
        parse_positive(&self.quantity)
    }

    /// Indicative INR total for display. Zero until both quantity and rate are known.
    pub fn estimated_total(&self, rate: Option<&AssetRate>) -> Decimal {
        match (self.quantity(), rate) {
            (Some(qty), Some(rate)) => qty * rate.rate_for(self.side),
            _ => Decimal::ZERO,
        }
    }

    /// Check the draft against the locally known balances and build the request.
    pub fn validate(&self, balances: &[WalletBalance]) -> Result<CreateOrderRequest, FormError> {
        let quantity = self.quantity().ok_or(FormError::InvalidQuantity)?;
        let wallet_address = non_blank(&self.wallet_address);

        if self.side == Side::Sell {
            if wallet_address.is_none() {
                return Err(FormError::MissingPayoutAddress);
            }
            if quantity > balance_of(balances, &self.asset) {
                return Err(FormError::InsufficientBalance);
            }
        }

        Ok(CreateOrderRequest {
            asset: self.asset.clone(),
            side: self.side,
            quantity,
            wallet_address,
        })
    }
}

/// Payment proof attached to an awaiting-payment order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentProofDraft {
    pub proof: Option<DocumentImage>,
    pub utr_number: String,
    pub tx_hash: String,
}

impl PaymentProofDraft {
    pub fn validate(&self) -> Result<OrderUpdateRequest, FormError> {
        let proof = self.proof.as_ref().ok_or(FormError::MissingPaymentProof)?;
        let utr_number = non_blank(&self.utr_number).ok_or(FormError::MissingUtr)?;
        Ok(OrderUpdateRequest {
            payment_proof: Some(proof.to_data_uri()),
            tx_hash: non_blank(&self.tx_hash),
            utr_number: Some(utr_number),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn usdt_rate() -> AssetRate {
        AssetRate {
            asset: "USDT".to_string(),
            buy_rate: dec!(89.50),
            sell_rate: dec!(87.75),
            updated_at: None,
            user_specific: None,
        }
    }

    fn balances() -> Vec<WalletBalance> {
        vec![WalletBalance {
            asset: "USDT".to_string(),
            balance: dec!(500),
        }]
    }

    #[test]
    fn test_estimate_uses_side_rate() {
        let mut draft = OrderDraft {
            quantity: "100".to_string(),
            ..OrderDraft::default()
        };
        assert_eq!(draft.estimated_total(Some(&usdt_rate())), dec!(8950.00));
        draft.side = Side::Sell;
        assert_eq!(draft.estimated_total(Some(&usdt_rate())), dec!(8775.00));
        assert_eq!(draft.estimated_total(None), Decimal::ZERO);
    }

    #[test]
    fn test_invalid_quantity() {
        for quantity in ["", "0", "-5", "abc"] {
            let draft = OrderDraft {
                quantity: quantity.to_string(),
                ..OrderDraft::default()
            };
            assert_eq!(draft.validate(&balances()), Err(FormError::InvalidQuantity));
        }
    }

    #[test]
    fn test_sell_requires_wallet_address() {
        let draft = OrderDraft {
            side: Side::Sell,
            quantity: "10".to_string(),
            ..OrderDraft::default()
        };
        assert_eq!(draft.validate(&balances()), Err(FormError::MissingPayoutAddress));
    }

    #[test]
    fn test_sell_above_balance_is_insufficient() {
        let draft = OrderDraft {
            side: Side::Sell,
            quantity: "500.01".to_string(),
            wallet_address: "TXyz123".to_string(),
            ..OrderDraft::default()
        };
        assert_eq!(draft.validate(&balances()), Err(FormError::InsufficientBalance));

        let draft = OrderDraft {
            asset: "BTC".to_string(),
            quantity: "0.1".to_string(),
            ..draft
        };
        assert_eq!(draft.validate(&balances()), Err(FormError::InsufficientBalance));
    }

    #[test]
    fn test_buy_ignores_balance() {
        let draft = OrderDraft {
            quantity: "10000".to_string(),
            ..OrderDraft::default()
        };
        let req = draft.validate(&[]).unwrap();
        assert_eq!(req.quantity, dec!(10000));
        assert_eq!(req.wallet_address, None);
    }

    #[test]
    fn test_payment_proof_rules() {
        let mut draft = PaymentProofDraft::default();
        assert_eq!(draft.validate(), Err(FormError::MissingPaymentProof));
        draft.proof = Some(DocumentImage::new("image/png", vec![1, 2, 3]));
        assert_eq!(draft.validate(), Err(FormError::MissingUtr));
        draft.utr_number = " HDFCR52024030112345 ".to_string();
        let req = draft.validate().unwrap();
        assert_eq!(req.utr_number.as_deref(), Some("HDFCR52024030112345"));
        assert!(req.payment_proof.unwrap().starts_with("data:image/png;base64,"));
    }
}

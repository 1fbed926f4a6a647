use super::ScreenError;
use crate::{AppState, Banner, Route};
use bharatbit_core::{
    AssetRate, BankDetails, Order, OrderStatus, Side, UpiDetails, WalletBalance,
};
use bharatbit_forms::{OrderDraft, PaymentProofDraft};
use rust_decimal::Decimal;
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct CreateOrderScreen {
    pub draft: OrderDraft,
    pub rates: Vec<AssetRate>,
    pub bank: Option<BankDetails>,
    pub upi: Option<UpiDetails>,
    pub balances: Vec<WalletBalance>,
    /// Set when the user may not trade yet.
    pub blocked: bool,
    pub loading: bool,
    pub banner: Option<Banner>,
}

impl CreateOrderScreen {
    /// Load rates, payment instructions and balances. Users without approved
    /// KYC are blocked before anything is fetched.
    pub async fn load(&mut self, app: &AppState) {
        if !app.user().is_some_and(|u| u.is_kyc_approved()) {
            self.blocked = true;
            self.banner = Some(Banner::error(
                "Your KYC must be approved before you can place orders.",
            ));
            return;
        }
        self.blocked = false;

        match self.try_load(app).await {
            Ok((rates, bank, upi, balances)) => {
                if let Some(first) = rates.first() {
                    self.draft.asset = first.asset.clone();
                }
                self.rates = rates;
                self.bank = Some(bank);
                self.upi = Some(upi);
                self.balances = balances;
            }
            Err(e) => {
                warn!(error = %e, "Failed to load order form");
                self.banner = Some(e.banner("Failed to load rates and payment details"));
            }
        }
    }

    async fn try_load(
        &self,
        app: &AppState,
    ) -> Result<(Vec<AssetRate>, BankDetails, UpiDetails, Vec<WalletBalance>), ScreenError> {
        let token = app.token()?;
        Ok(tokio::try_join!(
            app.backend.rates(&token),
            app.backend.bank_details(&token),
            app.backend.upi_details(&token),
            app.backend.balances(&token),
        )?)
    }

    pub fn selected_rate(&self) -> Option<&AssetRate> {
        self.rates
            .iter()
            .find(|r| r.asset.eq_ignore_ascii_case(&self.draft.asset))
    }

    /// Non-binding INR estimate for the current draft.
    pub fn estimated_total(&self) -> Decimal {
        self.draft.estimated_total(self.selected_rate())
    }

    /// UPI deep link for the estimated total. Only buys are paid in INR.
    pub fn upi_link(&self) -> Option<String> {
        let total = self.estimated_total();
        if self.draft.side == Side::Sell || total.is_zero() {
            return None;
        }
        self.upi.as_ref().map(|upi| upi.payment_uri(total))
    }

    pub async fn submit(&mut self, app: &AppState) -> Option<Route> {
        if self.blocked {
            return None;
        }
        self.loading = true;
        let result = self.try_submit(app).await;
        self.loading = false;
        match result {
            Ok(order) => {
                self.banner = Some(Banner::success(format!(
                    "Your {} order for {} {} has been created successfully.",
                    order.side.as_str().to_ascii_uppercase(),
                    order.quantity.normalize(),
                    order.asset
                )));
                Some(Route::OrderDetail { order_id: order.id })
            }
            Err(e) => {
                self.banner = Some(e.banner("Failed to create order"));
                None
            }
        }
    }

    async fn try_submit(&self, app: &AppState) -> Result<Order, ScreenError> {
        let req = self.draft.validate(&self.balances)?;
        let token = app.token()?;
        let order = app.backend.create_order(&token, &req).await?;
        info!(
            order_id = %order.id,
            side = order.side.as_str(),
            asset = %order.asset,
            quantity = %order.quantity,
            "Order created"
        );
        Ok(order)
    }
}

// ---------------------------------------------------------------------------
// Detail
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct OrderDetailScreen {
    pub order_id: String,
    pub order: Option<Order>,
    pub payment: PaymentProofDraft,
    pub loading: bool,
    pub banner: Option<Banner>,
}

impl OrderDetailScreen {
    pub fn new(order_id: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
            order: None,
            payment: PaymentProofDraft::default(),
            loading: false,
            banner: None,
        }
    }

    pub async fn load(&mut self, app: &AppState) {
        match self.fetch(app).await {
            Ok(order) => self.order = Some(order),
            Err(e) => {
                warn!(order_id = %self.order_id, error = %e, "Failed to load order");
                self.banner = Some(e.banner("Failed to load order details"));
            }
        }
    }

    async fn fetch(&self, app: &AppState) -> Result<Order, ScreenError> {
        let token = app.token()?;
        Ok(app.backend.order(&token, &self.order_id).await?)
    }

    /// Whether the payment upload form is shown.
    pub fn awaiting_payment(&self) -> bool {
        self.order.as_ref().is_some_and(Order::needs_payment)
    }

    /// Upload payment proof and UTR, then re-fetch the order.
    pub async fn upload_payment(&mut self, app: &AppState) -> bool {
        self.loading = true;
        let result = self.try_upload(app).await;
        self.loading = false;
        match result {
            Ok(order) => {
                self.order = Some(order);
                self.payment = PaymentProofDraft::default();
                self.banner = Some(Banner::success("Payment details uploaded successfully"));
                true
            }
            Err(e) => {
                self.banner = Some(e.banner("Failed to upload payment details"));
                false
            }
        }
    }

    async fn try_upload(&self, app: &AppState) -> Result<Order, ScreenError> {
        let req = self.payment.validate()?;
        let token = app.token()?;
        app.backend.update_order(&token, &self.order_id, &req).await?;
        info!(order_id = %self.order_id, "Payment details uploaded");
        Ok(app.backend.order(&token, &self.order_id).await?)
    }
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct OrdersScreen {
    pub orders: Vec<Order>,
    /// `None` shows every order.
    pub filter: Option<OrderStatus>,
    pub banner: Option<Banner>,
}

impl OrdersScreen {
    pub async fn load(&mut self, app: &AppState) {
        match self.fetch(app).await {
            Ok(orders) => {
                self.orders = orders;
                self.banner = None;
            }
            Err(e) => {
                warn!(error = %e, "Failed to load orders");
                self.banner = Some(e.banner("Failed to load orders"));
            }
        }
    }

    async fn fetch(&self, app: &AppState) -> Result<Vec<Order>, ScreenError> {
        let token = app.token()?;
        Ok(app.backend.my_orders(&token).await?)
    }

    pub fn visible(&self) -> Vec<&Order> {
        self.orders
            .iter()
            .filter(|o| self.filter.map_or(true, |status| o.status == status))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ack, order, rate, signed_in, user, StubBackend};
    use bharatbit_core::KycStatus;
    use bharatbit_forms::DocumentImage;
    use rust_decimal_macros::dec;

    fn order_backend() -> StubBackend {
        StubBackend {
            rates: Some(Ok(vec![
                rate("USDT", dec!(89.50), dec!(87.75)),
                rate("BTC", dec!(5600000), dec!(5550000)),
            ])),
            bank_details: Some(Ok(BankDetails {
                account_name: "BharatBit OTC".to_string(),
                account_number: "001122334455".to_string(),
                ifsc_code: "HDFC0001234".to_string(),
                bank_name: "HDFC Bank".to_string(),
                branch: "Fort".to_string(),
            })),
            upi_details: Some(Ok(UpiDetails {
                upi_id: "bharatbit@hdfc".to_string(),
                merchant_name: "BharatBit OTC".to_string(),
            })),
            balances: Some(Ok(vec![WalletBalance {
                asset: "USDT".to_string(),
                balance: dec!(500),
            }])),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_unapproved_kyc_is_blocked() {
        let (app, backend) = signed_in(order_backend(), user(KycStatus::UnderReview)).await;
        let mut screen = CreateOrderScreen::default();
        screen.load(&app).await;

        assert!(screen.blocked);
        assert_eq!(backend.call_count(), 0);
        screen.draft.quantity = "10".to_string();
        assert_eq!(screen.submit(&app).await, None);
        assert_eq!(backend.called("create_order"), 0);
    }

    #[tokio::test]
    async fn test_load_selects_first_rate() {
        let (app, backend) = signed_in(order_backend(), user(KycStatus::Approved)).await;
        let mut screen = CreateOrderScreen::default();
        screen.draft.asset = "BTC".to_string();
        screen.load(&app).await;

        assert_eq!(screen.draft.asset, "USDT");
        assert_eq!(screen.rates.len(), 2);
        assert!(screen.bank.is_some());
        assert_eq!(backend.call_count(), 4);

        screen.draft.quantity = "100".to_string();
        assert_eq!(screen.estimated_total(), dec!(8950));
        assert_eq!(
            screen.upi_link().as_deref(),
            Some("upi://pay?pa=bharatbit@hdfc&pn=BharatBit%20OTC&am=8950.00&cu=INR")
        );
    }

    #[tokio::test]
    async fn test_sell_above_balance_makes_no_request() {
        let (app, backend) = signed_in(order_backend(), user(KycStatus::Approved)).await;
        let mut screen = CreateOrderScreen::default();
        screen.load(&app).await;
        let loaded = backend.call_count();

        screen.draft.side = Side::Sell;
        screen.draft.quantity = "750".to_string();
        screen.draft.wallet_address = "TXyz123".to_string();

        assert_eq!(screen.submit(&app).await, None);
        assert_eq!(screen.banner, Some(Banner::error("Insufficient balance")));
        assert_eq!(backend.call_count(), loaded);
    }

    #[tokio::test]
    async fn test_create_opens_order_detail() {
        let mut created = order("3f2a9c1e-0000-4000-8000-000000000001", OrderStatus::AwaitingPayment);
        created.quantity = dec!(100.0);
        let (app, _) = signed_in(
            StubBackend {
                create_order: Some(Ok(created)),
                ..order_backend()
            },
            user(KycStatus::Approved),
        )
        .await;
        let mut screen = CreateOrderScreen::default();
        screen.load(&app).await;
        screen.draft.quantity = "100".to_string();

        assert_eq!(
            screen.submit(&app).await,
            Some(Route::OrderDetail {
                order_id: "3f2a9c1e-0000-4000-8000-000000000001".to_string()
            })
        );
        assert_eq!(
            screen.banner.unwrap().message(),
            "Your BUY order for 100 USDT has been created successfully."
        );
    }

    #[tokio::test]
    async fn test_payment_upload_refetches_order() {
        let mut paid = order("o-1", OrderStatus::AwaitingPayment);
        paid.payment_proof = Some("data:image/png;base64,AQID".to_string());
        paid.utr_number = Some("UTR123".to_string());
        let (app, backend) = signed_in(
            StubBackend {
                update_order: Some(ack()),
                order: Some(Ok(paid)),
                ..Default::default()
            },
            user(KycStatus::Approved),
        )
        .await;

        let mut screen = OrderDetailScreen::new("o-1");
        screen.order = Some(order("o-1", OrderStatus::AwaitingPayment));
        assert!(screen.awaiting_payment());

        assert!(!screen.upload_payment(&app).await);
        assert_eq!(screen.banner, Some(Banner::error("Please upload payment proof")));

        screen.payment.proof = Some(DocumentImage::new("image/png", vec![1, 2, 3]));
        screen.payment.utr_number = "UTR123".to_string();
        assert!(screen.upload_payment(&app).await);
        assert!(!screen.awaiting_payment());
        assert_eq!(backend.called("update_order"), 1);
        assert_eq!(backend.called("order"), 1);
    }

    #[tokio::test]
    async fn test_orders_filter() {
        let (app, _) = signed_in(
            StubBackend {
                my_orders: Some(Ok(vec![
                    order("o-1", OrderStatus::Completed),
                    order("o-2", OrderStatus::AwaitingPayment),
                    order("o-3", OrderStatus::Completed),
                ])),
                ..Default::default()
            },
            user(KycStatus::Approved),
        )
        .await;
        let mut screen = OrdersScreen::default();
        screen.load(&app).await;
        assert_eq!(screen.visible().len(), 3);
        screen.filter = Some(OrderStatus::Completed);
        let ids: Vec<&str> = screen.visible().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["o-1", "o-3"]);
    }
}

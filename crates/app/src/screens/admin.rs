use super::ScreenError;
use crate::{AppState, Banner};
use bharatbit_core::{
    Ack, Analytics, AssetRate, KycRecord, Order, OrderStatus, ReviewAction, SavedWallet, User,
    WalletActionRequest,
};
use bharatbit_forms::{
    kyc_review, order_status_update, wallet_review, AssignRmDraft, LedgerDraft, RateDraft,
};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminTab {
    #[default]
    Dashboard,
    Kyc,
    Orders,
    Rates,
    Users,
    Wallets,
    Ledger,
}

impl AdminTab {
    pub const ALL: [AdminTab; 7] = [
        AdminTab::Dashboard,
        AdminTab::Kyc,
        AdminTab::Orders,
        AdminTab::Rates,
        AdminTab::Users,
        AdminTab::Wallets,
        AdminTab::Ledger,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AdminTab::Dashboard => "Dashboard",
            AdminTab::Kyc => "KYC",
            AdminTab::Orders => "Orders",
            AdminTab::Rates => "Rates",
            AdminTab::Users => "Users",
            AdminTab::Wallets => "Wallets",
            AdminTab::Ledger => "Ledger",
        }
    }
}

/// Present and past tense, for log fields and banners.
fn review_verb(action: ReviewAction) -> (&'static str, &'static str) {
    match action {
        ReviewAction::Approve => ("approve", "approved"),
        ReviewAction::Reject => ("reject", "rejected"),
    }
}

fn ack_message(ack: Ack, default: &str) -> String {
    ack.message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

// ---------------------------------------------------------------------------
// Console
// ---------------------------------------------------------------------------

/// Back-office console. Only reachable by admin accounts.
#[derive(Debug, Clone, Default)]
pub struct AdminConsole {
    pub tab: AdminTab,
    pub analytics: Option<Analytics>,
    pub pending_kyc: Vec<KycRecord>,
    /// KYC submission opened for review, with its document images.
    pub selected_kyc: Option<KycRecord>,
    pub orders: Vec<Order>,
    pub rates: Vec<AssetRate>,
    pub users: Vec<User>,
    pub pending_wallets: Vec<SavedWallet>,
    pub rate_draft: RateDraft,
    pub ledger_draft: LedgerDraft,
    pub loading: bool,
    pub banner: Option<Banner>,
}

impl AdminConsole {
    /// Console for the signed-in user; non-admins get the refusal banner.
    pub fn open(app: &AppState) -> Result<Self, Banner> {
        match app.user() {
            Some(user) if user.is_admin() => Ok(Self::default()),
            Some(user) => {
                warn!(user_id = %user.id, "Admin console refused");
                Err(Banner::error("You do not have admin access"))
            }
            None => Err(Banner::error("You do not have admin access")),
        }
    }

    /// Switch tab and load its data.
    pub async fn select(&mut self, app: &AppState, tab: AdminTab) {
        self.tab = tab;
        self.banner = None;
        self.load(app).await;
    }

    /// Reload the data behind the current tab.
    pub async fn load(&mut self, app: &AppState) {
        self.loading = true;
        let result = self.fetch(app).await;
        self.loading = false;
        if let Err(e) = result {
            warn!(tab = self.tab.label(), error = %e, "Admin load failed");
            self.banner = Some(e.banner("Failed to load data"));
        }
    }

    async fn fetch(&mut self, app: &AppState) -> Result<(), ScreenError> {
        let token = app.token()?;
        let backend = &app.backend;
        match self.tab {
            AdminTab::Dashboard => self.analytics = Some(backend.analytics(&token).await?),
            AdminTab::Kyc => self.pending_kyc = backend.pending_kyc(&token).await?,
            AdminTab::Orders => self.orders = backend.all_orders(&token).await?,
            AdminTab::Rates => self.rates = backend.admin_rates(&token).await?,
            AdminTab::Users => self.users = backend.users(&token).await?,
            AdminTab::Wallets => self.pending_wallets = backend.pending_wallets(&token).await?,
            AdminTab::Ledger => {}
        }
        Ok(())
    }

    // -- KYC -----------------------------------------------------------------

    pub async fn open_kyc(&mut self, app: &AppState, kyc_id: &str) {
        match self.fetch_kyc(app, kyc_id).await {
            Ok(record) => self.selected_kyc = Some(record),
            Err(e) => {
                warn!(kyc_id, error = %e, "Failed to load KYC details");
                self.banner = Some(Banner::error("Failed to load KYC details"));
            }
        }
    }

    async fn fetch_kyc(&self, app: &AppState, kyc_id: &str) -> Result<KycRecord, ScreenError> {
        let token = app.token()?;
        Ok(app.backend.kyc_detail(&token, kyc_id).await?)
    }

    /// Approve or reject a submission. Rejections need a reason.
    pub async fn review_kyc(
        &mut self,
        app: &AppState,
        kyc_id: &str,
        action: ReviewAction,
        reason: &str,
    ) -> bool {
        let (verb, past) = review_verb(action);
        match self.try_review_kyc(app, kyc_id, action, reason).await {
            Ok(()) => {
                info!(kyc_id, action = verb, "KYC reviewed");
                self.selected_kyc = None;
                self.tab = AdminTab::Kyc;
                self.load(app).await;
                self.banner = Some(Banner::success(format!("KYC {past} successfully")));
                true
            }
            Err(e) => {
                self.banner = Some(e.banner(&format!("Failed to {verb} KYC")));
                false
            }
        }
    }

    async fn try_review_kyc(
        &self,
        app: &AppState,
        kyc_id: &str,
        action: ReviewAction,
        reason: &str,
    ) -> Result<(), ScreenError> {
        let req = kyc_review(kyc_id, action, reason)?;
        let token = app.token()?;
        app.backend.kyc_action(&token, &req).await?;
        Ok(())
    }

    // -- Orders --------------------------------------------------------------

    pub async fn update_order(
        &mut self,
        app: &AppState,
        order_id: &str,
        status: OrderStatus,
        notes: &str,
    ) -> bool {
        match self.try_update_order(app, order_id, status, notes).await {
            Ok(()) => {
                info!(order_id, status = status.label(), "Order status updated");
                self.tab = AdminTab::Orders;
                self.load(app).await;
                self.banner = Some(Banner::success("Order updated successfully"));
                true
            }
            Err(e) => {
                self.banner = Some(e.banner("Failed to update order"));
                false
            }
        }
    }

    async fn try_update_order(
        &self,
        app: &AppState,
        order_id: &str,
        status: OrderStatus,
        notes: &str,
    ) -> Result<(), ScreenError> {
        let req = order_status_update(order_id, status, notes);
        let token = app.token()?;
        app.backend.update_order_status(&token, &req).await?;
        Ok(())
    }

    // -- Rates ---------------------------------------------------------------

    /// Submit `rate_draft`. Clears the draft's rates on success.
    pub async fn update_rates(&mut self, app: &AppState) -> bool {
        match self.try_update_rates(app).await {
            Ok(asset) => {
                info!(asset = %asset, "Rates updated");
                self.rate_draft.buy_rate.clear();
                self.rate_draft.sell_rate.clear();
                self.tab = AdminTab::Rates;
                self.load(app).await;
                self.banner = Some(Banner::success("Rates updated successfully"));
                true
            }
            Err(e) => {
                self.banner = Some(e.banner("Failed to update rates"));
                false
            }
        }
    }

    async fn try_update_rates(&self, app: &AppState) -> Result<String, ScreenError> {
        let req = self.rate_draft.validate()?;
        let token = app.token()?;
        app.backend.update_rate(&token, &req).await?;
        Ok(req.asset)
    }

    // -- Users ---------------------------------------------------------------

    pub async fn freeze_user(&mut self, app: &AppState, user_id: &str) -> bool {
        match self.try_freeze_user(app, user_id).await {
            Ok(ack) => {
                info!(user_id, "User frozen");
                self.tab = AdminTab::Users;
                self.load(app).await;
                self.banner = Some(Banner::success(ack_message(ack, "User frozen")));
                true
            }
            Err(e) => {
                self.banner = Some(e.banner("Failed to freeze user"));
                false
            }
        }
    }

    async fn try_freeze_user(&self, app: &AppState, user_id: &str) -> Result<Ack, ScreenError> {
        let token = app.token()?;
        Ok(app.backend.freeze_user(&token, user_id).await?)
    }

    pub async fn assign_rm(&mut self, app: &AppState, user_id: &str, draft: &AssignRmDraft) -> bool {
        match self.try_assign_rm(app, user_id, draft).await {
            Ok(ack) => {
                info!(user_id, rm = %draft.rm_name.trim(), "Relationship manager assigned");
                self.tab = AdminTab::Users;
                self.load(app).await;
                self.banner = Some(Banner::success(ack_message(ack, "RM assigned successfully")));
                true
            }
            Err(e) => {
                self.banner = Some(e.banner("Failed to assign RM"));
                false
            }
        }
    }

    async fn try_assign_rm(
        &self,
        app: &AppState,
        user_id: &str,
        draft: &AssignRmDraft,
    ) -> Result<Ack, ScreenError> {
        let req = draft.validate()?;
        let token = app.token()?;
        Ok(app.backend.assign_rm(&token, user_id, &req).await?)
    }

    // -- Wallets -------------------------------------------------------------

    pub async fn review_wallet(
        &mut self,
        app: &AppState,
        wallet_id: &str,
        action: ReviewAction,
        notes: &str,
    ) -> bool {
        let (verb, past) = review_verb(action);
        let req = wallet_review(wallet_id, action, notes);
        match self.try_review_wallet(app, &req).await {
            Ok(ack) => {
                info!(wallet_id, action = verb, "Wallet reviewed");
                self.tab = AdminTab::Wallets;
                self.load(app).await;
                let default = format!("Wallet {past} successfully");
                self.banner = Some(Banner::success(ack_message(ack, &default)));
                true
            }
            Err(e) => {
                self.banner = Some(e.banner(&format!("Failed to {verb} wallet")));
                false
            }
        }
    }

    async fn try_review_wallet(
        &self,
        app: &AppState,
        req: &WalletActionRequest,
    ) -> Result<Ack, ScreenError> {
        let token = app.token()?;
        Ok(app.backend.wallet_action(&token, req).await?)
    }

    // -- Ledger --------------------------------------------------------------

    /// Post `ledger_draft`. Resets the draft on success.
    pub async fn post_ledger_entry(&mut self, app: &AppState) -> bool {
        match self.try_post_ledger_entry(app).await {
            Ok(ack) => {
                info!(user_id = %self.ledger_draft.user_id.trim(), "Manual ledger entry posted");
                self.ledger_draft = LedgerDraft::default();
                self.banner = Some(Banner::success(ack_message(ack, "Ledger entry created")));
                true
            }
            Err(e) => {
                self.banner = Some(e.banner("Failed to create ledger entry"));
                false
            }
        }
    }

    async fn try_post_ledger_entry(&self, app: &AppState) -> Result<Ack, ScreenError> {
        let req = self.ledger_draft.validate()?;
        let token = app.token()?;
        Ok(app.backend.manual_ledger_entry(&token, &req).await?)
    }
}

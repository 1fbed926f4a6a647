use super::ScreenError;
use crate::{AppState, Banner, Route};
use bharatbit_core::{LedgerEntry, SavedWallet, VerificationStatus, WalletBalance};
use bharatbit_forms::WalletDraft;
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Balances & ledger tab
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct WalletScreen {
    pub balances: Vec<WalletBalance>,
    pub ledger: Vec<LedgerEntry>,
    pub banner: Option<Banner>,
}

impl WalletScreen {
    pub async fn load(&mut self, app: &AppState) {
        match self.fetch(app).await {
            Ok((balances, ledger)) => {
                self.balances = balances;
                self.ledger = ledger;
                self.banner = None;
            }
            Err(e) => {
                warn!(error = %e, "Failed to load wallet");
                self.banner = Some(e.banner("Failed to load wallet"));
            }
        }
    }

    async fn fetch(
        &self,
        app: &AppState,
    ) -> Result<(Vec<WalletBalance>, Vec<LedgerEntry>), ScreenError> {
        let token = app.token()?;
        Ok(tokio::try_join!(
            app.backend.balances(&token),
            app.backend.ledger(&token),
        )?)
    }
}

// ---------------------------------------------------------------------------
// Saved wallets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct WalletsScreen {
    pub wallets: Vec<SavedWallet>,
    pub loading: bool,
    pub banner: Option<Banner>,
}

impl WalletsScreen {
    pub async fn load(&mut self, app: &AppState) {
        self.loading = true;
        let result = self.fetch(app).await;
        self.loading = false;
        match result {
            Ok(wallets) => self.wallets = wallets,
            Err(e) => {
                warn!(error = %e, "Failed to load wallets");
                self.banner = Some(e.banner("Failed to load wallets"));
            }
        }
    }

    async fn fetch(&self, app: &AppState) -> Result<Vec<SavedWallet>, ScreenError> {
        let token = app.token()?;
        Ok(app.backend.my_wallets(&token).await?)
    }

    /// Only verified wallets that are not already primary can be promoted.
    pub fn can_set_primary(wallet: &SavedWallet) -> bool {
        wallet.verification_status == VerificationStatus::Verified && !wallet.is_primary
    }

    pub async fn set_primary(&mut self, app: &AppState, wallet_id: &str) {
        match self.try_set_primary(app, wallet_id).await {
            Ok(()) => {
                info!(wallet_id, "Primary wallet changed");
                self.load(app).await;
                self.banner = Some(Banner::success("Wallet set as primary"));
            }
            Err(e) => self.banner = Some(e.banner("Failed to set primary")),
        }
    }

    pub async fn delete(&mut self, app: &AppState, wallet_id: &str) {
        match self.try_delete(app, wallet_id).await {
            Ok(()) => {
                info!(wallet_id, "Wallet deleted");
                self.load(app).await;
                self.banner = Some(Banner::success("Wallet deleted"));
            }
            Err(e) => self.banner = Some(e.banner("Failed to delete")),
        }
    }

    async fn try_set_primary(&self, app: &AppState, wallet_id: &str) -> Result<(), ScreenError> {
        let token = app.token()?;
        app.backend.set_primary_wallet(&token, wallet_id).await?;
        Ok(())
    }

    async fn try_delete(&self, app: &AppState, wallet_id: &str) -> Result<(), ScreenError> {
        let token = app.token()?;
        app.backend.delete_wallet(&token, wallet_id).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Add wallet
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct AddWalletScreen {
    pub draft: WalletDraft,
    pub loading: bool,
    pub banner: Option<Banner>,
}

impl AddWalletScreen {
    pub async fn submit(&mut self, app: &AppState) -> Option<Route> {
        self.loading = true;
        let result = self.try_submit(app).await;
        self.loading = false;
        match result {
            Ok(wallet) => {
                info!(wallet_id = %wallet.id, asset = %wallet.asset, "Wallet saved");
                self.banner = Some(Banner::success(
                    "Wallet saved. It will be usable once the desk verifies it.",
                ));
                Some(Route::Wallets)
            }
            Err(e) => {
                self.banner = Some(e.banner("Failed to save wallet"));
                None
            }
        }
    }

    async fn try_submit(&self, app: &AppState) -> Result<SavedWallet, ScreenError> {
        let req = self.draft.validate()?;
        let token = app.token()?;
        Ok(app.backend.save_wallet(&token, &req).await?)
    }
}

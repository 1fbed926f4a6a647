use super::ScreenError;
use crate::{AppState, Banner, Route};
use bharatbit_core::{KycStatus, Order, User, WalletBalance};
use tracing::warn;

/// Number of recent orders shown on the dashboard.
pub const RECENT_ORDERS: usize = 5;

/// Home tab: KYC prompt, balances and recent orders.
#[derive(Debug, Clone, Default)]
pub struct DashboardScreen {
    pub recent_orders: Vec<Order>,
    pub balances: Vec<WalletBalance>,
    pub banner: Option<Banner>,
}

/// Call-to-action shown until KYC is approved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KycPrompt {
    pub title: &'static str,
    pub subtitle: &'static str,
    /// Only a user who has not submitted yet is sent to the wizard.
    pub target: Option<Route>,
}

impl DashboardScreen {
    pub async fn load(&mut self, app: &AppState) {
        match self.try_load(app).await {
            Ok((orders, balances)) => {
                self.recent_orders = orders.into_iter().take(RECENT_ORDERS).collect();
                self.balances = balances;
                self.banner = None;
            }
            Err(e) => {
                warn!(error = %e, "Failed to load dashboard");
                self.banner = Some(e.banner("Failed to load dashboard"));
            }
        }
    }

    async fn try_load(
        &self,
        app: &AppState,
    ) -> Result<(Vec<Order>, Vec<WalletBalance>), ScreenError> {
        let token = app.token()?;
        Ok(tokio::try_join!(
            app.backend.my_orders(&token),
            app.backend.balances(&token),
        )?)
    }

    pub fn kyc_prompt(user: &User) -> Option<KycPrompt> {
        match user.kyc_status {
            KycStatus::Approved => None,
            KycStatus::Rejected => Some(KycPrompt {
                title: "KYC Rejected",
                subtitle: "Please resubmit your documents",
                target: None,
            }),
            KycStatus::UnderReview => Some(KycPrompt {
                title: "KYC Under Review",
                subtitle: "We are reviewing your documents",
                target: None,
            }),
            KycStatus::Pending | KycStatus::NotSubmitted => Some(KycPrompt {
                title: "Complete Your KYC",
                subtitle: "Submit your documents to start trading",
                target: Some(Route::KycSubmit),
            }),
        }
    }

    /// Name shown in the greeting: the local part of the email.
    pub fn display_name(user: &User) -> &str {
        user.email
            .split('@')
            .next()
            .filter(|name| !name.is_empty())
            .unwrap_or("Investor")
    }
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// Contact links for the assigned relationship manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RmContact {
    pub name: String,
    pub phone_uri: Option<String>,
    pub whatsapp_uri: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileScreen {
    pub banner: Option<Banner>,
}

impl ProfileScreen {
    pub fn rm_contact(user: &User) -> Option<RmContact> {
        let name = user.relationship_manager.clone()?;
        Some(RmContact {
            name,
            phone_uri: user.rm_phone.as_ref().map(|p| format!("tel:{p}")),
            whatsapp_uri: user.rm_whatsapp.as_ref().map(|w| {
                let digits: String = w.chars().filter(char::is_ascii_digit).collect();
                format!("https://wa.me/{digits}")
            }),
        })
    }

    /// Account details as label/value rows.
    pub fn details(user: &User) -> Vec<(&'static str, String)> {
        let mut rows = vec![
            ("Email", user.email.clone()),
            ("Mobile", user.mobile.clone()),
            ("KYC Status", user.kyc_status.label().to_string()),
        ];
        if let Some(uid) = &user.client_uid {
            rows.insert(0, ("Client ID", uid.clone()));
        }
        if let Some(company) = &user.company_name {
            rows.push(("Company", company.clone()));
        }
        rows
    }

    pub async fn logout(&mut self, app: &AppState) -> Route {
        if let Err(e) = app.auth.logout().await {
            warn!(error = %e, "Session storage was not cleared");
        }
        Route::Welcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{order, signed_in, user, StubBackend};
    use bharatbit_core::OrderStatus;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_load_keeps_five_recent_orders() {
        let orders = (0..8)
            .map(|i| order(&format!("order-{i}"), OrderStatus::Completed))
            .collect();
        let (app, _) = signed_in(
            StubBackend {
                my_orders: Some(Ok(orders)),
                balances: Some(Ok(vec![WalletBalance {
                    asset: "USDT".to_string(),
                    balance: dec!(250.5),
                }])),
                ..Default::default()
            },
            user(KycStatus::Approved),
        )
        .await;

        let mut screen = DashboardScreen::default();
        screen.load(&app).await;
        assert_eq!(screen.recent_orders.len(), RECENT_ORDERS);
        assert_eq!(screen.recent_orders[0].id, "order-0");
        assert_eq!(screen.balances[0].balance, dec!(250.5));
        assert!(screen.banner.is_none());
    }

    #[tokio::test]
    async fn test_load_failure_sets_banner() {
        let (app, _) = signed_in(StubBackend::default(), user(KycStatus::Approved)).await;
        let mut screen = DashboardScreen::default();
        screen.load(&app).await;
        assert_eq!(screen.banner, Some(Banner::error("Failed to load dashboard")));
    }

    #[test]
    fn test_kyc_prompt() {
        assert!(DashboardScreen::kyc_prompt(&user(KycStatus::Approved)).is_none());
        let prompt = DashboardScreen::kyc_prompt(&user(KycStatus::Pending)).unwrap();
        assert_eq!(prompt.target, Some(Route::KycSubmit));
        let prompt = DashboardScreen::kyc_prompt(&user(KycStatus::UnderReview)).unwrap();
        assert_eq!(prompt.target, None);
    }

    #[test]
    fn test_rm_contact_links() {
        let contact = ProfileScreen::rm_contact(&user(KycStatus::Approved)).unwrap();
        assert_eq!(contact.phone_uri.as_deref(), Some("tel:+919800000001"));
        assert_eq!(
            contact.whatsapp_uri.as_deref(),
            Some("https://wa.me/919800000001")
        );

        let mut u = user(KycStatus::Approved);
        u.relationship_manager = None;
        assert!(ProfileScreen::rm_contact(&u).is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let (app, _) = signed_in(StubBackend::default(), user(KycStatus::Approved)).await;
        let mut screen = ProfileScreen::default();
        assert_eq!(screen.logout(&app).await, Route::Welcome);
        assert!(!app.auth.is_authenticated());
        assert!(app.auth.restore().await.is_none());
    }
}

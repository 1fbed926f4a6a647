use super::ScreenError;
use crate::{AppState, Banner, Route};
use bharatbit_core::{AccountType, KycStatus, KycStatusReport};
use bharatbit_forms::{KycStep, KycWizard};
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Submission wizard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct KycScreen {
    pub wizard: KycWizard,
    pub loading: bool,
    pub banner: Option<Banner>,
}

impl KycScreen {
    pub fn new(account_type: AccountType) -> Self {
        Self {
            wizard: KycWizard::new(account_type),
            loading: false,
            banner: None,
        }
    }

    /// Wizard for the signed-in user, or the screen to show instead when
    /// there is nothing left to submit.
    pub fn open(app: &AppState) -> Result<Self, Route> {
        let Some(user) = app.user() else {
            return Err(Route::Login);
        };
        match user.kyc_status {
            KycStatus::UnderReview => Err(Route::KycPending),
            KycStatus::Approved => Err(Route::Dashboard),
            _ => Ok(Self::new(user.account_type)),
        }
    }

    pub fn step(&self) -> KycStep {
        self.wizard.step()
    }

    /// Validate the current step and move on. Stays put on failure.
    pub fn next(&mut self) -> bool {
        match self.wizard.advance() {
            Ok(_) => {
                self.banner = None;
                true
            }
            Err(e) => {
                self.banner = Some(Banner::error(e.to_string()));
                false
            }
        }
    }

    pub fn back(&mut self) {
        self.banner = None;
        self.wizard.back();
    }

    pub async fn submit(&mut self, app: &AppState) -> Option<Route> {
        self.loading = true;
        let result = self.try_submit(app).await;
        self.loading = false;
        match result {
            Ok(()) => {
                self.banner = Some(Banner::success(
                    "KYC submitted successfully. Please wait for admin approval.",
                ));
                Some(Route::KycPending)
            }
            Err(e) => {
                self.banner = Some(e.banner("KYC submission failed"));
                None
            }
        }
    }

    async fn try_submit(&mut self, app: &AppState) -> Result<(), ScreenError> {
        let submission = self.wizard.submission()?;
        let token = app.token()?;
        app.backend.submit_kyc(&token, &submission).await?;
        info!(account_type = ?self.wizard.account_type(), "KYC submitted");
        if let Err(e) = app.auth.refresh_user().await {
            warn!(error = %e, "Profile refresh after KYC submission failed");
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// What the status screen shows for a given KYC state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KycStatusView {
    pub title: &'static str,
    pub subtitle: String,
    /// Button label and where it leads.
    pub action: Option<(&'static str, Route)>,
}

#[derive(Debug, Clone, Default)]
pub struct KycPendingScreen {
    pub report: Option<KycStatusReport>,
    pub banner: Option<Banner>,
}

impl KycPendingScreen {
    /// Fetch the latest status and refresh the cached profile with it.
    pub async fn load(&mut self, app: &AppState) {
        match self.try_load(app).await {
            Ok(report) => self.report = Some(report),
            Err(e) => {
                warn!(error = %e, "Failed to load KYC status");
                self.banner = Some(e.banner("Failed to load KYC status"));
            }
        }
    }

    async fn try_load(&self, app: &AppState) -> Result<KycStatusReport, ScreenError> {
        let token = app.token()?;
        let report = app.backend.kyc_status(&token).await?;
        if let Err(e) = app.auth.refresh_user().await {
            warn!(error = %e, "Profile refresh after KYC status failed");
        }
        Ok(report)
    }

    pub fn status(&self, app: &AppState) -> KycStatus {
        self.report
            .as_ref()
            .map(|r| r.status)
            .or_else(|| app.user().map(|u| u.kyc_status))
            .unwrap_or_default()
    }

    pub fn view(&self, status: KycStatus) -> KycStatusView {
        match status {
            KycStatus::Approved => KycStatusView {
                title: "KYC Approved!",
                subtitle: "Your account is verified. You can now start trading.".to_string(),
                action: Some(("Start Trading", Route::Dashboard)),
            },
            KycStatus::Rejected => KycStatusView {
                title: "KYC Rejected",
                subtitle: self
                    .report
                    .as_ref()
                    .and_then(|r| r.rejection_reason.clone())
                    .unwrap_or_else(|| "Your documents could not be verified.".to_string()),
                action: Some(("Resubmit KYC", Route::KycSubmit)),
            },
            KycStatus::UnderReview => KycStatusView {
                title: "Under Review",
                subtitle: "Our team is reviewing your documents. This usually takes 24-48 hours."
                    .to_string(),
                action: None,
            },
            KycStatus::Pending | KycStatus::NotSubmitted => KycStatusView {
                title: "KYC Pending",
                subtitle: "Please submit your documents to get started.".to_string(),
                action: Some(("Submit KYC", Route::KycSubmit)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ack, signed_in, user, StubBackend};
    use bharatbit_forms::DocumentImage;

    fn image() -> Option<DocumentImage> {
        Some(DocumentImage::new("image/jpeg", vec![0xff, 0xd8]))
    }

    fn fill_details(screen: &mut KycScreen) {
        let d = &mut screen.wizard.draft;
        d.pan_number = "abcde1234f".to_string();
        d.aadhaar_number = "1234 5678 9012".to_string();
        d.account_holder_name = "Asha Rao".to_string();
        d.bank_account_number = "50100012345678".to_string();
        d.bank_ifsc = "hdfc0001234".to_string();
        d.bank_name = "HDFC Bank".to_string();
        d.bank_branch = "Andheri".to_string();
        d.nominee_name = "Ravi Rao".to_string();
        d.nominee_relationship = "Spouse".to_string();
        d.nominee_dob = "1990-04-01".to_string();
    }

    fn fill_documents(screen: &mut KycScreen) {
        let d = &mut screen.wizard.draft;
        d.pan_image = image();
        d.aadhaar_front = image();
        d.aadhaar_back = image();
        d.address_proof = image();
    }

    #[tokio::test]
    async fn test_open_gates_on_status() {
        let (app, _) = signed_in(StubBackend::default(), user(KycStatus::UnderReview)).await;
        assert_eq!(KycScreen::open(&app).err(), Some(Route::KycPending));

        let (app, _) = signed_in(StubBackend::default(), user(KycStatus::Approved)).await;
        assert_eq!(KycScreen::open(&app).err(), Some(Route::Dashboard));

        let (app, _) = signed_in(StubBackend::default(), user(KycStatus::Rejected)).await;
        assert!(KycScreen::open(&app).is_ok());
    }

    #[test]
    fn test_missing_pan_does_not_advance() {
        let mut screen = KycScreen::new(AccountType::Individual);
        fill_details(&mut screen);
        screen.wizard.draft.pan_number.clear();

        assert!(!screen.next());
        assert_eq!(screen.step(), KycStep::Details);
        assert!(screen.banner.as_ref().is_some_and(Banner::is_error));
    }

    #[test]
    fn test_back_keeps_fields() {
        let mut screen = KycScreen::new(AccountType::Individual);
        fill_details(&mut screen);
        assert!(screen.next());
        assert_eq!(screen.step(), KycStep::Documents);
        screen.back();
        assert_eq!(screen.step(), KycStep::Details);
        assert_eq!(screen.wizard.draft.bank_name, "HDFC Bank");
    }

    #[tokio::test]
    async fn test_submit_refreshes_profile_and_shows_pending() {
        let reviewed = user(KycStatus::UnderReview);
        let (app, backend) = signed_in(
            StubBackend {
                submit_kyc: Some(ack()),
                me: Some(Ok(reviewed)),
                ..Default::default()
            },
            user(KycStatus::Pending),
        )
        .await;

        let mut screen = KycScreen::open(&app).unwrap();
        fill_details(&mut screen);
        assert!(screen.next());
        fill_documents(&mut screen);
        assert!(screen.next());
        screen.wizard.draft.selfie_image = image();
        screen.wizard.draft.fatca_declaration = true;
        screen.wizard.draft.terms_accepted = true;

        assert_eq!(screen.submit(&app).await, Some(Route::KycPending));
        assert_eq!(backend.called("submit_kyc"), 1);
        assert_eq!(backend.called("me"), 1);
        assert_eq!(app.user().unwrap().kyc_status, KycStatus::UnderReview);
    }

    #[tokio::test]
    async fn test_submit_rewinds_to_incomplete_step() {
        let (app, backend) =
            signed_in(StubBackend::default(), user(KycStatus::Pending)).await;
        let mut screen = KycScreen::open(&app).unwrap();
        fill_details(&mut screen);
        assert!(screen.next());

        assert_eq!(screen.submit(&app).await, None);
        assert_eq!(screen.step(), KycStep::Documents);
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_status_view_uses_rejection_reason() {
        let (app, _) = signed_in(
            StubBackend {
                kyc_status: Some(Ok(KycStatusReport {
                    status: KycStatus::Rejected,
                    kyc_status: KycStatus::Rejected,
                    submitted_at: None,
                    rejection_reason: Some("PAN image unreadable".to_string()),
                })),
                me: Some(Ok(user(KycStatus::Rejected))),
                ..Default::default()
            },
            user(KycStatus::UnderReview),
        )
        .await;

        let mut screen = KycPendingScreen::default();
        screen.load(&app).await;
        let status = screen.status(&app);
        assert_eq!(status, KycStatus::Rejected);
        let view = screen.view(status);
        assert_eq!(view.subtitle, "PAN image unreadable");
        assert_eq!(view.action, Some(("Resubmit KYC", Route::KycSubmit)));
    }

    #[tokio::test]
    async fn test_status_survives_profile_refresh_failure() {
        let (app, backend) = signed_in(
            StubBackend {
                kyc_status: Some(Ok(KycStatusReport {
                    status: KycStatus::Rejected,
                    kyc_status: KycStatus::Rejected,
                    submitted_at: None,
                    rejection_reason: Some("Blurry PAN".to_string()),
                })),
                ..Default::default()
            },
            user(KycStatus::UnderReview),
        )
        .await;

        let mut screen = KycPendingScreen::default();
        screen.load(&app).await;
        assert_eq!(backend.called("me"), 1);
        assert!(screen.banner.is_none());
        assert_eq!(screen.status(&app), KycStatus::Rejected);
        assert_eq!(screen.view(KycStatus::Rejected).subtitle, "Blurry PAN");
    }
}

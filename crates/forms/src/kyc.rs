use crate::document::DocumentImage;
use crate::{non_blank, FormError};
use bharatbit_core::{AccountType, KycSubmission};

/// Steps of the KYC wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KycStep {
    Details,
    Documents,
    Selfie,
}

impl KycStep {
    pub fn next(self) -> Option<KycStep> {
        match self {
            KycStep::Details => Some(KycStep::Documents),
            KycStep::Documents => Some(KycStep::Selfie),
            KycStep::Selfie => None,
        }
    }

    pub fn previous(self) -> Option<KycStep> {
        match self {
            KycStep::Details => None,
            KycStep::Documents => Some(KycStep::Details),
            KycStep::Selfie => Some(KycStep::Documents),
        }
    }

    /// One-based position, for "Step n of 3".
    pub fn number(self) -> usize {
        match self {
            KycStep::Details => 1,
            KycStep::Documents => 2,
            KycStep::Selfie => 3,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            KycStep::Details => "Personal & Bank Details",
            KycStep::Documents => "Document Upload",
            KycStep::Selfie => "Selfie & Declarations",
        }
    }
}

pub const KYC_STEP_COUNT: usize = 3;

/// Every field the KYC wizard collects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KycDraft {
    // Individual identity
    pub pan_number: String,
    pub aadhaar_number: String,

    // Corporate identity
    pub company_name: String,
    pub authorized_signatory_name: String,

    // Bank
    pub account_holder_name: String,
    pub bank_account_number: String,
    pub bank_ifsc: String,
    pub bank_name: String,
    pub bank_branch: String,

    // Nominee
    pub nominee_name: String,
    pub nominee_relationship: String,
    pub nominee_dob: String,

    // Documents
    pub pan_image: Option<DocumentImage>,
    pub aadhaar_front: Option<DocumentImage>,
    pub aadhaar_back: Option<DocumentImage>,
    pub address_proof: Option<DocumentImage>,
    pub company_registration_cert: Option<DocumentImage>,
    pub gst_certificate: Option<DocumentImage>,
    pub board_resolution: Option<DocumentImage>,
    pub authorized_signatory_id: Option<DocumentImage>,
    pub selfie_image: Option<DocumentImage>,

    pub fatca_declaration: bool,
    pub terms_accepted: bool,
}

/// Linear three-step wizard over a [`KycDraft`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KycWizard {
    account_type: AccountType,
    step: KycStep,
    pub draft: KycDraft,
}

impl KycWizard {
    pub fn new(account_type: AccountType) -> Self {
        Self {
            account_type,
            step: KycStep::Details,
            draft: KycDraft::default(),
        }
    }

    pub fn account_type(&self) -> AccountType {
        self.account_type
    }

    pub fn step(&self) -> KycStep {
        self.step
    }

    pub fn is_last_step(&self) -> bool {
        self.step.next().is_none()
    }

    /// Validate the current step and move to the next one. The wizard stays
    /// put when validation fails or when already on the last step.
    pub fn advance(&mut self) -> Result<KycStep, FormError> {
        self.validate_step(self.step)?;
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(self.step)
    }

    /// Go back one step. Entered fields are kept.
    pub fn back(&mut self) -> KycStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    pub fn validate_step(&self, step: KycStep) -> Result<(), FormError> {
        match step {
            KycStep::Details => self.validate_details(),
            KycStep::Documents => self.validate_documents(),
            KycStep::Selfie => self.validate_selfie(),
        }
    }

    fn validate_details(&self) -> Result<(), FormError> {
        let d = &self.draft;
        let identity = match self.account_type {
            AccountType::Individual => [d.pan_number.as_str(), d.aadhaar_number.as_str()],
            AccountType::Corporate => [
                d.company_name.as_str(),
                d.authorized_signatory_name.as_str(),
            ],
        };
        let shared = [
            &d.account_holder_name,
            &d.bank_account_number,
            &d.bank_ifsc,
            &d.bank_name,
            &d.bank_branch,
            &d.nominee_name,
            &d.nominee_relationship,
            &d.nominee_dob,
        ];
        if identity.iter().any(|v| v.trim().is_empty())
            || shared.iter().any(|v| v.trim().is_empty())
        {
            return Err(FormError::MissingFields);
        }

        if self.account_type == AccountType::Individual {
            if !is_pan(&d.pan_number) {
                return Err(FormError::InvalidPan);
            }
            if !is_aadhaar(&d.aadhaar_number) {
                return Err(FormError::InvalidAadhaar);
            }
        }
        if !is_ifsc(&d.bank_ifsc) {
            return Err(FormError::InvalidIfsc);
        }
        Ok(())
    }

    fn validate_documents(&self) -> Result<(), FormError> {
        let d = &self.draft;
        let required = match self.account_type {
            AccountType::Individual => [
                &d.pan_image,
                &d.aadhaar_front,
                &d.aadhaar_back,
                &d.address_proof,
            ],
            AccountType::Corporate => [
                &d.company_registration_cert,
                &d.gst_certificate,
                &d.board_resolution,
                &d.authorized_signatory_id,
            ],
        };
        if required.iter().any(|doc| doc.is_none()) {
            return Err(FormError::MissingDocuments);
        }
        Ok(())
    }

    fn validate_selfie(&self) -> Result<(), FormError> {
        if self.draft.selfie_image.is_none() {
            return Err(FormError::MissingDocuments);
        }
        if !self.draft.fatca_declaration || !self.draft.terms_accepted {
            return Err(FormError::DeclarationsNotAccepted);
        }
        Ok(())
    }

    /// Validate every step and build the submission. On failure the wizard
    /// moves to the first step that needs attention.
    pub fn submission(&mut self) -> Result<KycSubmission, FormError> {
        for step in [KycStep::Details, KycStep::Documents, KycStep::Selfie] {
            if let Err(e) = self.validate_step(step) {
                self.step = step;
                return Err(e);
            }
        }

        let d = &self.draft;
        let uri = |doc: &Option<DocumentImage>| doc.as_ref().map(DocumentImage::to_data_uri);
        let mut submission = KycSubmission {
            selfie_image: uri(&d.selfie_image),
            bank_account_number: d.bank_account_number.trim().to_string(),
            bank_ifsc: d.bank_ifsc.trim().to_ascii_uppercase(),
            bank_name: d.bank_name.trim().to_string(),
            bank_branch: d.bank_branch.trim().to_string(),
            account_holder_name: d.account_holder_name.trim().to_string(),
            nominee_name: d.nominee_name.trim().to_string(),
            nominee_relationship: d.nominee_relationship.trim().to_string(),
            nominee_dob: d.nominee_dob.trim().to_string(),
            fatca_declaration: d.fatca_declaration,
            terms_accepted: d.terms_accepted,
            ..KycSubmission::default()
        };

        match self.account_type {
            AccountType::Individual => {
                submission.pan_number = Some(d.pan_number.trim().to_ascii_uppercase());
                submission.aadhaar_number = Some(digits(&d.aadhaar_number));
                submission.pan_image = uri(&d.pan_image);
                submission.aadhaar_front = uri(&d.aadhaar_front);
                submission.aadhaar_back = uri(&d.aadhaar_back);
                submission.address_proof = uri(&d.address_proof);
            }
            AccountType::Corporate => {
                submission.company_name = non_blank(&d.company_name);
                submission.authorized_signatory_name = non_blank(&d.authorized_signatory_name);
                submission.company_registration_cert = uri(&d.company_registration_cert);
                submission.gst_certificate = uri(&d.gst_certificate);
                submission.board_resolution = uri(&d.board_resolution);
                submission.authorized_signatory_id = uri(&d.authorized_signatory_id);
            }
        }
        Ok(submission)
    }
}

fn digits(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

/// PAN: five letters, four digits, one letter.
pub fn is_pan(value: &str) -> bool {
    let v = value.trim().to_ascii_uppercase();
    let b = v.as_bytes();
    b.len() == 10
        && b[..5].iter().all(u8::is_ascii_uppercase)
        && b[5..9].iter().all(u8::is_ascii_digit)
        && b[9].is_ascii_uppercase()
}

/// Aadhaar: twelve digits, spaces allowed between groups.
pub fn is_aadhaar(value: &str) -> bool {
    let d = digits(value);
    d.len() == 12 && d.bytes().all(|b| b.is_ascii_digit())
}

/// IFSC: four letters, a zero, six alphanumerics.
pub fn is_ifsc(value: &str) -> bool {
    let v = value.trim().to_ascii_uppercase();
    let b = v.as_bytes();
    b.len() == 11
        && b[..4].iter().all(u8::is_ascii_uppercase)
        && b[4] == b'0'
        && b[5..].iter().all(u8::is_ascii_alphanumeric)
}

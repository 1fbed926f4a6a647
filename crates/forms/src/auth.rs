use crate::{non_blank, FormError, MIN_PASSWORD_LEN, OTP_LEN};
use bharatbit_core::{AccountType, RegisterRequest};

pub const DEFAULT_COUNTRY_CODE: &str = "+91";

/// Dialling codes offered at registration.
pub const COUNTRY_CODES: &[(&str, &str)] = &[
    ("+91", "India"),
    ("+1", "USA/Canada"),
    ("+44", "UK"),
    ("+971", "UAE"),
    ("+65", "Singapore"),
    ("+852", "Hong Kong"),
    ("+81", "Japan"),
    ("+61", "Australia"),
    ("+49", "Germany"),
    ("+966", "Saudi Arabia"),
    ("+974", "Qatar"),
    ("+60", "Malaysia"),
    ("+27", "South Africa"),
];

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginDraft {
    /// Email or mobile number.
    pub identifier: String,
    pub password: String,
}

impl LoginDraft {
    /// Returns the trimmed identifier and the password.
    pub fn validate(&self) -> Result<(String, String), FormError> {
        let identifier = non_blank(&self.identifier).ok_or(FormError::MissingCredentials)?;
        if self.password.is_empty() {
            return Err(FormError::MissingCredentials);
        }
        Ok((identifier, self.password.clone()))
    }
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterDraft {
    pub country_code: String,
    pub mobile: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub account_type: AccountType,
    pub company_name: String,
    pub referral_code: String,
    pub invite_code: String,
}

impl Default for RegisterDraft {
    fn default() -> Self {
        Self {
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
            mobile: String::new(),
            email: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            account_type: AccountType::Individual,
            company_name: String::new(),
            referral_code: String::new(),
            invite_code: String::new(),
        }
    }
}

impl RegisterDraft {
    /// Mobile number in international form. A number typed with its own `+`
    /// prefix is kept as is.
    pub fn full_mobile(&self) -> String {
        let mobile: String = self
            .mobile
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect();
        if mobile.starts_with('+') {
            return mobile;
        }
        let code = self.country_code.trim();
        let code = if code.is_empty() { DEFAULT_COUNTRY_CODE } else { code };
        if code.starts_with('+') {
            format!("{code}{mobile}")
        } else {
            format!("+{code}{mobile}")
        }
    }

    pub fn validate(&self) -> Result<RegisterRequest, FormError> {
        let email = non_blank(&self.email);
        let mobile = non_blank(&self.mobile);
        let (Some(email), Some(_)) = (email, mobile) else {
            return Err(FormError::MissingFields);
        };
        if self.password.is_empty() {
            return Err(FormError::MissingFields);
        }
        if self.password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(FormError::PasswordTooShort(MIN_PASSWORD_LEN));
        }
        if !is_email(&email) {
            return Err(FormError::InvalidEmail);
        }
        let company_name = match self.account_type {
            AccountType::Corporate => {
                Some(non_blank(&self.company_name).ok_or(FormError::MissingCompanyName)?)
            }
            AccountType::Individual => None,
        };

        Ok(RegisterRequest {
            mobile: self.full_mobile(),
            email,
            password: self.password.clone(),
            account_type: self.account_type,
            company_name,
            referral_code: non_blank(&self.referral_code),
            invite_code: non_blank(&self.invite_code),
        })
    }
}

// ---------------------------------------------------------------------------
// One-time codes
// ---------------------------------------------------------------------------

/// A one-time code input that only accepts digits, up to six of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OtpInput {
    code: String,
}

impl OtpInput {
    /// Apply typed or pasted text. Non-digits are dropped; input that would
    /// exceed six digits is ignored.
    pub fn set(&mut self, text: &str) {
        let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.len() <= OTP_LEN {
            self.code = digits;
        }
    }

    pub fn as_str(&self) -> &str {
        &self.code
    }

    pub fn is_complete(&self) -> bool {
        self.code.len() == OTP_LEN
    }

    pub fn validate(&self) -> Result<String, FormError> {
        if self.is_complete() {
            Ok(self.code.clone())
        } else {
            Err(FormError::InvalidOtp)
        }
    }
}

impl From<&str> for OtpInput {
    fn from(text: &str) -> Self {
        let mut input = Self::default();
        input.set(text);
        input
    }
}

// ---------------------------------------------------------------------------
// Password recovery
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForgotPasswordDraft {
    pub email: String,
}

impl ForgotPasswordDraft {
    pub fn validate(&self) -> Result<String, FormError> {
        let email = non_blank(&self.email).ok_or(FormError::MissingEmail)?;
        if !is_email(&email) {
            return Err(FormError::InvalidEmail);
        }
        Ok(email)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetPasswordDraft {
    /// Reset code from the recovery email.
    pub code: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl ResetPasswordDraft {
    /// Returns the reset code and the new password.
    pub fn validate(&self) -> Result<(String, String), FormError> {
        let code = non_blank(&self.code).ok_or(FormError::MissingResetCode)?;
        if self.new_password.is_empty() || self.confirm_password.is_empty() {
            return Err(FormError::MissingNewPassword);
        }
        if self.new_password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        if self.new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(FormError::PasswordTooShort(MIN_PASSWORD_LEN));
        }
        Ok((code, self.new_password.clone()))
    }
}

/// Loose `local@domain.tld` shape check.
pub fn is_email(value: &str) -> bool {
    let value = value.trim();
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .map(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
                    .unwrap_or(false)
        }
        None => false,
    }
}

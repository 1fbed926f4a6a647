use bharatbit_core::{KycStatus, OtpPurpose, User};
use std::fmt;

/// Every screen the client can show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Welcome,
    Login,
    Register,
    VerifyOtp {
        identifier: String,
        purpose: OtpPurpose,
    },
    VerifyTwoFactor {
        mobile: String,
    },
    ForgotPassword,
    ResetPassword {
        email: String,
    },
    Dashboard,
    KycSubmit,
    KycPending,
    Orders,
    CreateOrder,
    OrderDetail {
        order_id: String,
    },
    Wallet,
    Wallets,
    AddWallet,
    Profile,
    Admin,
}

/// Screen to open at start-up for the restored user.
pub fn initial_route(user: Option<&User>) -> Route {
    let Some(user) = user else {
        return Route::Welcome;
    };
    if user.is_admin() {
        return Route::Admin;
    }
    match user.kyc_status {
        KycStatus::Approved => Route::Dashboard,
        KycStatus::Pending
        | KycStatus::UnderReview
        | KycStatus::Rejected
        | KycStatus::NotSubmitted => Route::KycSubmit,
    }
}

/// Landing screen after an interactive sign-in.
pub fn home_route(user: &User) -> Route {
    if user.is_admin() {
        Route::Admin
    } else {
        Route::Dashboard
    }
}

/// Message strip shown at the top of a screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    Error(String),
    Success(String),
    Info(String),
}

impl Banner {
    pub fn error(message: impl Into<String>) -> Self {
        Banner::Error(message.into())
    }

    pub fn success(message: impl Into<String>) -> Self {
        Banner::Success(message.into())
    }

    pub fn info(message: impl Into<String>) -> Self {
        Banner::Info(message.into())
    }

    pub fn message(&self) -> &str {
        match self {
            Banner::Error(m) | Banner::Success(m) | Banner::Info(m) => m,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Banner::Error(_))
    }
}

impl fmt::Display for Banner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::user;
    use bharatbit_core::Role;

    #[test]
    fn test_initial_route() {
        assert_eq!(initial_route(None), Route::Welcome);

        let mut u = user(KycStatus::Approved);
        assert_eq!(initial_route(Some(&u)), Route::Dashboard);

        for status in [KycStatus::Pending, KycStatus::UnderReview, KycStatus::Rejected] {
            u.kyc_status = status;
            assert_eq!(initial_route(Some(&u)), Route::KycSubmit);
        }

        u.role = Role::Admin;
        assert_eq!(initial_route(Some(&u)), Route::Admin);
    }

    #[test]
    fn test_home_route_ignores_kyc() {
        assert_eq!(home_route(&user(KycStatus::Pending)), Route::Dashboard);
    }
}

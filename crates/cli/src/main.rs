mod commands;
mod config;

use anyhow::Result;
use bharatbit_app::AppState;
use bharatbit_client::HttpBackend;
use bharatbit_core::{EntryType, OrderStatus, OtpPurpose, Side, WalletType};
use bharatbit_session::FileSessionStore;
use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "bharatbit")]
#[command(about = "BharatBit OTC desk client: account, KYC, orders, wallets and the admin console")]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Config file (defaults to ./bharatbit.toml when present)
    #[arg(short, long, env = "BHARATBIT_CONFIG")]
    config: Option<PathBuf>,

    /// Backend origin, overrides the config file
    #[arg(long, env = "BHARATBIT_BACKEND_URL")]
    backend_url: Option<String>,

    /// Session file, overrides the config file
    #[arg(long, env = "BHARATBIT_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Accepts the backend's snake_case names, with dashes allowed.
fn parse_enum<T: DeserializeOwned>(value: &str) -> Result<T, String> {
    let wire = value.trim().to_ascii_lowercase().replace('-', "_");
    serde_json::from_value(serde_json::Value::String(wire))
        .map_err(|_| format!("unknown value: {value}"))
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with email or mobile number
    Login {
        identifier: String,

        #[arg(long, env = "BHARATBIT_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Complete a login with the code sent to your phone and email
    #[command(name = "verify-2fa")]
    VerifyTwoFactor {
        #[arg(long)]
        mobile: String,

        #[arg(long)]
        code: String,
    },

    /// Create an account
    Register(RegisterArgs),

    /// Verify the one-time code sent after registration
    VerifyOtp {
        /// Email or mobile the code was sent to
        identifier: String,

        #[arg(long)]
        code: String,

        /// registration or 2fa
        #[arg(long, default_value = "registration", value_parser = parse_enum::<OtpPurpose>)]
        purpose: OtpPurpose,
    },

    /// Request a password reset code
    ForgotPassword { email: String },

    /// Set a new password with the emailed reset code
    ResetPassword {
        #[arg(long)]
        email: String,

        #[arg(long)]
        code: String,

        #[arg(long, env = "BHARATBIT_NEW_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long)]
        confirm: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in account and where to go next
    Status,

    /// Balances, recent orders and KYC state
    Dashboard,

    /// KYC submission and status
    Kyc {
        #[command(subcommand)]
        command: KycCommands,
    },

    /// Desk rates and payment instructions
    Rates,

    /// Place, list and pay for orders
    Orders {
        #[command(subcommand)]
        command: OrderCommands,
    },

    /// Balances and ledger
    Wallet,

    /// Saved withdrawal wallets
    Wallets {
        #[command(subcommand)]
        command: WalletCommands,
    },

    /// Watch the live price of an asset
    Prices {
        #[arg(default_value = "USDT")]
        symbol: String,

        /// Stop after this many refreshes
        #[arg(long)]
        ticks: Option<usize>,
    },

    /// Register a device token for push notifications
    PushToken { token: String },

    /// Back-office console (admin accounts only)
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[derive(Args)]
struct RegisterArgs {
    #[arg(long)]
    email: String,

    /// Mobile number, with or without country code
    #[arg(long)]
    mobile: String,

    #[arg(long, default_value = bharatbit_forms::DEFAULT_COUNTRY_CODE)]
    country_code: String,

    #[arg(long, env = "BHARATBIT_PASSWORD", hide_env_values = true)]
    password: String,

    #[arg(long)]
    confirm: String,

    /// Register a corporate account (requires --company-name)
    #[arg(long)]
    corporate: bool,

    #[arg(long)]
    company_name: Option<String>,

    #[arg(long)]
    referral_code: Option<String>,

    #[arg(long)]
    invite_code: Option<String>,
}

#[derive(Subcommand)]
enum KycCommands {
    /// Submit identity, bank and nominee details with document images
    Submit(KycArgs),

    /// Show the review state
    Status,
}

#[derive(Args)]
struct KycArgs {
    #[arg(long)]
    pan: Option<String>,
    #[arg(long)]
    aadhaar: Option<String>,
    #[arg(long)]
    company_name: Option<String>,
    #[arg(long)]
    signatory_name: Option<String>,

    #[arg(long)]
    account_holder: String,
    #[arg(long)]
    account_number: String,
    #[arg(long)]
    ifsc: String,
    #[arg(long)]
    bank_name: String,
    #[arg(long)]
    bank_branch: Option<String>,

    #[arg(long)]
    nominee_name: String,
    #[arg(long)]
    nominee_relationship: String,
    /// YYYY-MM-DD
    #[arg(long)]
    nominee_dob: String,

    #[arg(long)]
    pan_image: Option<PathBuf>,
    #[arg(long)]
    aadhaar_front: Option<PathBuf>,
    #[arg(long)]
    aadhaar_back: Option<PathBuf>,
    #[arg(long)]
    address_proof: Option<PathBuf>,
    #[arg(long)]
    company_registration_cert: Option<PathBuf>,
    #[arg(long)]
    gst_certificate: Option<PathBuf>,
    #[arg(long)]
    board_resolution: Option<PathBuf>,
    #[arg(long)]
    signatory_id: Option<PathBuf>,
    #[arg(long)]
    selfie: Option<PathBuf>,

    /// Confirm the FATCA declaration
    #[arg(long)]
    fatca: bool,
    /// Accept the terms and conditions
    #[arg(long)]
    accept_terms: bool,
}

#[derive(Subcommand)]
enum OrderCommands {
    /// List your orders
    List {
        #[arg(long, value_parser = parse_enum::<OrderStatus>)]
        status: Option<OrderStatus>,
    },

    /// Place a buy or sell order
    Create {
        #[arg(value_parser = parse_enum::<Side>)]
        side: Side,

        #[arg(long, default_value = "USDT")]
        asset: String,

        #[arg(long)]
        quantity: String,

        /// Wallet the crypto is sent from (sell orders)
        #[arg(long)]
        wallet_address: Option<String>,
    },

    /// Show one order
    Show { id: String },

    /// Attach payment proof to an order awaiting payment
    Pay {
        id: String,

        #[arg(long)]
        proof: PathBuf,

        #[arg(long)]
        utr: String,

        #[arg(long)]
        tx_hash: Option<String>,
    },
}

#[derive(Subcommand)]
enum WalletCommands {
    /// List saved wallets
    List,

    /// Save a new wallet for verification
    Add(AddWalletArgs),

    /// Make a verified wallet the primary one
    Primary { id: String },

    /// Delete a saved wallet
    Delete { id: String },
}

#[derive(Args)]
struct AddWalletArgs {
    #[arg(long)]
    label: String,

    #[arg(long)]
    address: String,

    #[arg(long, default_value = "USDT")]
    asset: String,

    #[arg(long)]
    network: Option<String>,

    /// exchange or self-custody
    #[arg(long, default_value = "exchange", value_parser = parse_enum::<WalletType>)]
    wallet_type: WalletType,

    #[arg(long)]
    exchange: Option<String>,

    /// Screenshot proving ownership of the address
    #[arg(long)]
    proof: PathBuf,

    #[arg(long)]
    proof_description: Option<String>,

    #[arg(long)]
    primary: bool,
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Desk-wide numbers
    Analytics,

    /// Pending KYC submissions
    KycQueue,

    /// One KYC submission with its documents
    KycShow { id: String },

    KycApprove { id: String },

    KycReject {
        id: String,

        #[arg(long)]
        reason: String,
    },

    /// All orders
    Orders,

    /// Move an order to a new status
    SetOrderStatus {
        id: String,

        #[arg(value_parser = parse_enum::<OrderStatus>)]
        status: OrderStatus,

        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Current desk rates
    Rates,

    /// Set buy and sell rates, optionally for one user only
    SetRate {
        #[arg(long, default_value = "USDT")]
        asset: String,

        #[arg(long)]
        buy: String,

        #[arg(long)]
        sell: String,

        #[arg(long)]
        user: Option<String>,
    },

    Users,

    Freeze { user_id: String },

    /// Assign a relationship manager to a user
    AssignRm {
        user_id: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        phone: String,

        #[arg(long)]
        whatsapp: Option<String>,
    },

    /// Wallets waiting for verification
    WalletQueue,

    WalletApprove {
        id: String,

        #[arg(long, default_value = "")]
        notes: String,
    },

    WalletReject {
        id: String,

        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Post a manual credit or debit to a user's ledger
    LedgerEntry {
        user_id: String,

        #[arg(long, default_value = "USDT")]
        asset: String,

        /// credit or debit
        #[arg(long, value_parser = parse_enum::<EntryType>)]
        entry_type: EntryType,

        #[arg(long)]
        amount: String,

        #[arg(long)]
        description: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = config::Config::load(cli.config.as_deref())?;
    if let Some(url) = cli.backend_url {
        config.backend.base_url = url;
    }
    if let Some(path) = cli.session_file {
        config.session.path = path;
    }

    let backend = Arc::new(HttpBackend::new(&config.backend)?);
    let store = Arc::new(FileSessionStore::new(&config.session.path));
    let app = AppState::new(backend, store);
    app.auth.restore().await;

    tracing::debug!(
        api_root = %config.backend.base_url,
        session = %config.session.path.display(),
        signed_in = app.auth.is_authenticated(),
        "Client ready"
    );

    match cli.command {
        Commands::Login {
            identifier,
            password,
        } => commands::login(&app, identifier, password).await,
        Commands::VerifyTwoFactor { mobile, code } => {
            commands::verify_two_factor(&app, mobile, &code).await
        }
        Commands::Register(args) => commands::register(&app, args).await,
        Commands::VerifyOtp {
            identifier,
            code,
            purpose,
        } => commands::verify_otp(&app, identifier, purpose, &code).await,
        Commands::ForgotPassword { email } => commands::forgot_password(&app, email).await,
        Commands::ResetPassword {
            email,
            code,
            password,
            confirm,
        } => commands::reset_password(&app, email, code, password, confirm).await,
        Commands::Logout => commands::logout(&app).await,
        Commands::Status => commands::status(&app).await,
        Commands::Dashboard => commands::dashboard(&app).await,
        Commands::Kyc { command } => match command {
            KycCommands::Submit(args) => commands::submit_kyc(&app, args).await,
            KycCommands::Status => commands::kyc_status(&app).await,
        },
        Commands::Rates => commands::rates(&app).await,
        Commands::Orders { command } => match command {
            OrderCommands::List { status } => commands::list_orders(&app, status).await,
            OrderCommands::Create {
                side,
                asset,
                quantity,
                wallet_address,
            } => commands::create_order(&app, side, asset, quantity, wallet_address).await,
            OrderCommands::Show { id } => commands::show_order(&app, id).await,
            OrderCommands::Pay {
                id,
                proof,
                utr,
                tx_hash,
            } => commands::pay_order(&app, id, &proof, utr, tx_hash).await,
        },
        Commands::Wallet => commands::wallet(&app).await,
        Commands::Wallets { command } => match command {
            WalletCommands::List => commands::list_wallets(&app).await,
            WalletCommands::Add(args) => commands::add_wallet(&app, args).await,
            WalletCommands::Primary { id } => commands::set_primary_wallet(&app, &id).await,
            WalletCommands::Delete { id } => commands::delete_wallet(&app, &id).await,
        },
        Commands::Prices { symbol, ticks } => {
            commands::watch_prices(&app, &config.prices, &symbol, ticks).await
        }
        Commands::PushToken { token } => commands::push_token(&app, &token).await,
        Commands::Admin { command } => commands::admin(&app, command).await,
    }
}

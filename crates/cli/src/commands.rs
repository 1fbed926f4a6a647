//! One handler per subcommand. Each drives the matching screen and prints
//! what the screen would show.

use crate::config::PricesConfig;
use crate::{AddWalletArgs, AdminCommands, KycArgs, RegisterArgs};
use anyhow::{bail, Context, Result};
use bharatbit_app::display::{format_quantity, format_rupees, format_timestamp};
use bharatbit_app::screens::dashboard::{KycPrompt, RmContact};
use bharatbit_app::screens::*;
use bharatbit_app::{initial_route, AppState, Banner, Route};
use bharatbit_core::{
    AccountType, Order, OrderStatus, OtpPurpose, ReviewAction, Side, User, WalletType,
};
use bharatbit_feed::PollerConfig;
use bharatbit_forms::{decode_data_uri, short_address, AssignRmDraft, DocumentImage};
use std::path::Path;
use tracing::info;

// ---------------------------------------------------------------------------
// Output helpers
// ---------------------------------------------------------------------------

/// Print a success or info banner; turn an error banner into a failure.
fn finish(banner: &Option<Banner>) -> Result<()> {
    match banner {
        Some(Banner::Error(message)) => bail!("{message}"),
        Some(banner) => {
            println!("{banner}");
            Ok(())
        }
        None => Ok(()),
    }
}

fn next_step(route: &Route) {
    let hint = match route {
        Route::Login => "Sign in with `bharatbit login`.".to_string(),
        Route::VerifyOtp { identifier, .. } => {
            format!("Enter the code with `bharatbit verify-otp {identifier} --code <CODE>`.")
        }
        Route::VerifyTwoFactor { mobile } => {
            format!("Enter the code with `bharatbit verify-2fa --mobile {mobile} --code <CODE>`.")
        }
        Route::ResetPassword { email } => format!(
            "Set a new password with `bharatbit reset-password --email {email} --code <CODE>`."
        ),
        Route::KycSubmit => "Complete your KYC with `bharatbit kyc submit`.".to_string(),
        Route::KycPending => "Check progress with `bharatbit kyc status`.".to_string(),
        Route::Dashboard => "See your account with `bharatbit dashboard`.".to_string(),
        Route::Admin => "Open the console with `bharatbit admin`.".to_string(),
        Route::OrderDetail { order_id } => {
            format!("Track it with `bharatbit orders show {order_id}`.")
        }
        Route::Welcome => "Sign in with `bharatbit login` or create an account with `bharatbit register`.".to_string(),
        _ => return,
    };
    println!("{hint}");
}

async fn document(path: &Path) -> Result<DocumentImage> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(DocumentImage::from_file_bytes(path, bytes)?)
}

async fn optional_document(path: Option<&Path>) -> Result<Option<DocumentImage>> {
    match path {
        Some(path) => Ok(Some(document(path).await?)),
        None => Ok(None),
    }
}

/// Inline uploads show their type and size; anything else is a link.
fn describe_document(doc: Option<&str>) -> String {
    match doc {
        None => "missing".to_string(),
        Some(uri) => match decode_data_uri(uri) {
            Some((mime, bytes)) => format!("{mime}, {:.1} KB", bytes.len() as f64 / 1024.0),
            None => uri.to_string(),
        },
    }
}

fn print_order_row(order: &Order) {
    println!(
        "  {:<10} {:<4} {:>16} {:<5} {:>16}  {:<18} {}",
        order.short_id(),
        order.side.as_str().to_ascii_uppercase(),
        format_quantity(order.quantity),
        order.asset,
        format_rupees(order.total_inr),
        order.status.label(),
        format_timestamp(order.created_at),
    );
}

fn print_user_row(user: &User) {
    println!(
        "  {:<10} {:<28} {:<15} {:<13} {}{}",
        user.client_uid.as_deref().unwrap_or(&user.id),
        user.email,
        user.mobile,
        user.kyc_status.label(),
        user.relationship_manager.as_deref().unwrap_or("-"),
        if user.is_frozen { "  [frozen]" } else { "" },
    );
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

pub async fn login(app: &AppState, identifier: String, password: String) -> Result<()> {
    let mut screen = LoginScreen::default();
    screen.draft.identifier = identifier;
    screen.draft.password = password;
    let route = screen.submit(app).await;
    finish(&screen.banner)?;
    if let Some(route) = route {
        if let Some(user) = app.user() {
            println!("Signed in as {}", user.email);
        } else {
            println!("A verification code was sent to your phone and email.");
        }
        next_step(&route);
    }
    Ok(())
}

pub async fn verify_two_factor(app: &AppState, mobile: String, code: &str) -> Result<()> {
    let mut screen = TwoFactorScreen::new(mobile);
    screen.code.set(code);
    let route = screen.submit(app).await;
    finish(&screen.banner)?;
    if let (Some(route), Some(user)) = (route, app.user()) {
        println!("Signed in as {}", user.email);
        next_step(&route);
    }
    Ok(())
}

pub async fn register(app: &AppState, args: RegisterArgs) -> Result<()> {
    let mut screen = RegisterScreen::default();
    let draft = &mut screen.draft;
    draft.email = args.email;
    draft.mobile = args.mobile;
    draft.country_code = args.country_code;
    draft.password = args.password;
    draft.confirm_password = args.confirm;
    draft.account_type = if args.corporate {
        AccountType::Corporate
    } else {
        AccountType::Individual
    };
    draft.company_name = args.company_name.unwrap_or_default();
    draft.referral_code = args.referral_code.unwrap_or_default();
    draft.invite_code = args.invite_code.unwrap_or_default();

    let route = screen.submit(app).await;
    finish(&screen.banner)?;
    if let Some(route) = route {
        next_step(&route);
    }
    Ok(())
}

pub async fn verify_otp(
    app: &AppState,
    identifier: String,
    purpose: OtpPurpose,
    code: &str,
) -> Result<()> {
    let mut screen = VerifyOtpScreen::new(identifier, purpose);
    screen.code.set(code);
    let route = screen.submit(app).await;
    finish(&screen.banner)?;
    if let Some(route) = route {
        if let Some(user) = app.user() {
            println!("Verified. Signed in as {}", user.email);
        }
        next_step(&route);
    }
    Ok(())
}

pub async fn forgot_password(app: &AppState, email: String) -> Result<()> {
    let mut screen = ForgotPasswordScreen::default();
    screen.draft.email = email;
    let route = screen.submit(app).await;
    finish(&screen.banner)?;
    if let Some(route) = route {
        next_step(&route);
    }
    Ok(())
}

pub async fn reset_password(
    app: &AppState,
    email: String,
    code: String,
    password: String,
    confirm: String,
) -> Result<()> {
    let mut screen = ResetPasswordScreen::new(email);
    screen.draft.code = code;
    screen.draft.new_password = password;
    screen.draft.confirm_password = confirm;
    let route = screen.submit(app).await;
    finish(&screen.banner)?;
    if let Some(route) = route {
        next_step(&route);
    }
    Ok(())
}

pub async fn logout(app: &AppState) -> Result<()> {
    let route = ProfileScreen::default().logout(app).await;
    println!("Signed out");
    next_step(&route);
    Ok(())
}

pub async fn push_token(app: &AppState, token: &str) -> Result<()> {
    if !app.auth.is_authenticated() {
        bail!("Please sign in first");
    }
    if !app.auth.register_push_token(token).await {
        bail!("Failed to register push token");
    }
    println!("Push notifications enabled");
    Ok(())
}

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

fn require_user(app: &AppState) -> Result<User> {
    match app.user() {
        Some(user) => Ok(user),
        None => bail!("Not signed in. Run `bharatbit login` first."),
    }
}

pub async fn status(app: &AppState) -> Result<()> {
    require_user(app)?;
    if let Err(e) = app.auth.refresh_user().await {
        tracing::warn!(error = %e, "Profile refresh failed, showing stored profile");
    }
    let user = require_user(app)?;

    for (label, value) in ProfileScreen::details(&user) {
        println!("  {label:<12} {value}");
    }
    if let Some(RmContact {
        name,
        phone_uri,
        whatsapp_uri,
    }) = ProfileScreen::rm_contact(&user)
    {
        println!("  {:<12} {name}", "RM");
        for uri in [phone_uri, whatsapp_uri].into_iter().flatten() {
            println!("  {:<12} {uri}", "");
        }
    }
    next_step(&initial_route(Some(&user)));
    Ok(())
}

pub async fn dashboard(app: &AppState) -> Result<()> {
    let user = require_user(app)?;
    let mut screen = DashboardScreen::default();
    screen.load(app).await;
    finish(&screen.banner)?;

    println!("Welcome, {}", DashboardScreen::display_name(&user));
    if let Some(KycPrompt {
        title,
        subtitle,
        target,
    }) = DashboardScreen::kyc_prompt(&user)
    {
        println!("\n{title}: {subtitle}");
        if let Some(target) = target {
            next_step(&target);
        }
    }

    println!("\nBalances");
    if screen.balances.is_empty() {
        println!("  none yet");
    }
    for balance in &screen.balances {
        println!("  {:<6} {:>18}", balance.asset, format_quantity(balance.balance));
    }

    println!("\nRecent orders");
    if screen.recent_orders.is_empty() {
        println!("  none yet");
    }
    for order in &screen.recent_orders {
        print_order_row(order);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// KYC
// ---------------------------------------------------------------------------

pub async fn submit_kyc(app: &AppState, args: KycArgs) -> Result<()> {
    let mut screen = match KycScreen::open(app) {
        Ok(screen) => screen,
        Err(route) => {
            match route {
                Route::KycPending => println!("Your KYC is already under review."),
                Route::Dashboard => println!("Your KYC is already approved."),
                _ => {}
            }
            next_step(&route);
            return Ok(());
        }
    };

    let draft = &mut screen.wizard.draft;
    draft.pan_number = args.pan.unwrap_or_default();
    draft.aadhaar_number = args.aadhaar.unwrap_or_default();
    draft.company_name = args.company_name.unwrap_or_default();
    draft.authorized_signatory_name = args.signatory_name.unwrap_or_default();
    draft.account_holder_name = args.account_holder;
    draft.bank_account_number = args.account_number;
    draft.bank_ifsc = args.ifsc;
    draft.bank_name = args.bank_name;
    draft.bank_branch = args.bank_branch.unwrap_or_default();
    draft.nominee_name = args.nominee_name;
    draft.nominee_relationship = args.nominee_relationship;
    draft.nominee_dob = args.nominee_dob;

    draft.pan_image = optional_document(args.pan_image.as_deref()).await?;
    draft.aadhaar_front = optional_document(args.aadhaar_front.as_deref()).await?;
    draft.aadhaar_back = optional_document(args.aadhaar_back.as_deref()).await?;
    draft.address_proof = optional_document(args.address_proof.as_deref()).await?;
    draft.company_registration_cert =
        optional_document(args.company_registration_cert.as_deref()).await?;
    draft.gst_certificate = optional_document(args.gst_certificate.as_deref()).await?;
    draft.board_resolution = optional_document(args.board_resolution.as_deref()).await?;
    draft.authorized_signatory_id = optional_document(args.signatory_id.as_deref()).await?;
    draft.selfie_image = optional_document(args.selfie.as_deref()).await?;
    draft.fatca_declaration = args.fatca;
    draft.terms_accepted = args.accept_terms;

    while !screen.wizard.is_last_step() {
        let step = screen.step();
        if !screen.next() {
            println!("Step {} ({}) is incomplete", step.number(), step.title());
            return finish(&screen.banner);
        }
    }

    let route = screen.submit(app).await;
    finish(&screen.banner)?;
    if let Some(route) = route {
        next_step(&route);
    }
    Ok(())
}

pub async fn kyc_status(app: &AppState) -> Result<()> {
    require_user(app)?;
    let mut screen = KycPendingScreen::default();
    screen.load(app).await;
    finish(&screen.banner)?;

    let view = screen.view(screen.status(app));
    println!("{}", view.title);
    println!("{}", view.subtitle);
    if let Some(submitted) = screen.report.as_ref().and_then(|r| r.submitted_at) {
        println!("Submitted {}", format_timestamp(Some(submitted)));
    }
    if let Some((label, route)) = view.action {
        println!("\n{label}");
        next_step(&route);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Rates & orders
// ---------------------------------------------------------------------------

pub async fn rates(app: &AppState) -> Result<()> {
    let mut screen = CreateOrderScreen::default();
    screen.load(app).await;
    finish(&screen.banner)?;

    println!("  {:<6} {:>14} {:>14}", "Asset", "Buy", "Sell");
    for rate in &screen.rates {
        println!(
            "  {:<6} {:>14} {:>14}",
            rate.asset,
            format_rupees(rate.buy_rate),
            format_rupees(rate.sell_rate)
        );
    }
    if let Some(bank) = &screen.bank {
        println!("\nBank transfer");
        println!("  {:<14} {}", "Account name", bank.account_name);
        println!("  {:<14} {}", "Account no.", bank.account_number);
        println!("  {:<14} {}", "IFSC", bank.ifsc_code);
        println!("  {:<14} {}, {}", "Bank", bank.bank_name, bank.branch);
    }
    if let Some(upi) = &screen.upi {
        println!("\nUPI");
        println!("  {} ({})", upi.upi_id, upi.merchant_name);
    }
    Ok(())
}

pub async fn list_orders(app: &AppState, status: Option<OrderStatus>) -> Result<()> {
    let mut screen = OrdersScreen {
        filter: status,
        ..Default::default()
    };
    screen.load(app).await;
    finish(&screen.banner)?;

    let visible = screen.visible();
    if visible.is_empty() {
        println!("No orders");
    }
    for order in visible {
        print_order_row(order);
    }
    Ok(())
}

pub async fn create_order(
    app: &AppState,
    side: Side,
    asset: String,
    quantity: String,
    wallet_address: Option<String>,
) -> Result<()> {
    let mut screen = CreateOrderScreen::default();
    screen.load(app).await;
    finish(&screen.banner)?;

    screen.draft.side = side;
    screen.draft.asset = asset.trim().to_ascii_uppercase();
    screen.draft.quantity = quantity;
    screen.draft.wallet_address = wallet_address.unwrap_or_default();

    if let Some(rate) = screen.selected_rate() {
        println!(
            "Rate {} per {}, estimated total {}",
            format_rupees(rate.rate_for(side)),
            rate.asset,
            format_rupees(screen.estimated_total())
        );
    }
    let upi_link = screen.upi_link();

    let route = screen.submit(app).await;
    finish(&screen.banner)?;
    if let Some(route) = route {
        if let Some(link) = upi_link {
            println!("Pay via UPI: {link}");
        }
        next_step(&route);
    }
    Ok(())
}

pub async fn show_order(app: &AppState, id: String) -> Result<()> {
    let mut screen = OrderDetailScreen::new(id);
    screen.load(app).await;
    finish(&screen.banner)?;

    let Some(order) = &screen.order else {
        bail!("Order not found");
    };
    let rows = [
        ("Order", order.id.clone()),
        ("Type", order.side.as_str().to_ascii_uppercase()),
        ("Asset", order.asset.clone()),
        ("Quantity", format_quantity(order.quantity)),
        ("Rate", format_rupees(order.rate)),
        ("Total", format_rupees(order.total_inr)),
        ("Status", order.status.label().to_string()),
        ("Created", format_timestamp(order.created_at)),
    ];
    for (label, value) in rows {
        println!("  {label:<10} {value}");
    }
    for (label, value) in [
        ("UTR", &order.utr_number),
        ("Tx hash", &order.tx_hash),
        ("Wallet", &order.wallet_address),
        ("Notes", &order.notes),
    ] {
        if let Some(value) = value {
            println!("  {label:<10} {value}");
        }
    }
    if screen.awaiting_payment() {
        println!(
            "\nAwaiting payment. Upload proof with `bharatbit orders pay {} --proof <FILE> --utr <UTR>`.",
            order.id
        );
    }
    Ok(())
}

pub async fn pay_order(
    app: &AppState,
    id: String,
    proof: &Path,
    utr: String,
    tx_hash: Option<String>,
) -> Result<()> {
    let mut screen = OrderDetailScreen::new(id);
    screen.payment.proof = Some(document(proof).await?);
    screen.payment.utr_number = utr;
    screen.payment.tx_hash = tx_hash.unwrap_or_default();
    screen.upload_payment(app).await;
    finish(&screen.banner)?;
    if let Some(order) = &screen.order {
        println!("Status: {}", order.status.label());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Wallets
// ---------------------------------------------------------------------------

pub async fn wallet(app: &AppState) -> Result<()> {
    let mut screen = WalletScreen::default();
    screen.load(app).await;
    finish(&screen.banner)?;

    println!("Balances");
    for balance in &screen.balances {
        println!("  {:<6} {:>18}", balance.asset, format_quantity(balance.balance));
    }
    println!("\nLedger");
    if screen.ledger.is_empty() {
        println!("  no entries");
    }
    for entry in &screen.ledger {
        println!(
            "  {:<20} {:<6} {:>18}  {}",
            format_timestamp(entry.created_at),
            entry.asset,
            format_quantity(entry.signed_amount()),
            entry.description
        );
    }
    Ok(())
}

pub async fn list_wallets(app: &AppState) -> Result<()> {
    let mut screen = WalletsScreen::default();
    screen.load(app).await;
    finish(&screen.banner)?;

    if screen.wallets.is_empty() {
        println!("No saved wallets. Add one with `bharatbit wallets add`.");
    }
    for wallet in &screen.wallets {
        println!(
            "  {:<24} {:<18} {:<5} {:<8} {:<9}{}",
            wallet.id,
            wallet.label,
            wallet.asset,
            wallet.network,
            format!("{:?}", wallet.verification_status).to_ascii_lowercase(),
            if wallet.is_primary { "  primary" } else { "" },
        );
        println!("    {}", short_address(&wallet.wallet_address));
    }
    Ok(())
}

pub async fn add_wallet(app: &AppState, args: AddWalletArgs) -> Result<()> {
    let mut screen = AddWalletScreen::default();
    let draft = &mut screen.draft;
    draft.label = args.label;
    draft.wallet_address = args.address;
    draft.set_asset(&args.asset.to_ascii_uppercase());
    if let Some(network) = args.network {
        if !draft.set_network(&network.to_ascii_uppercase()) {
            bail!("{network} is not supported for {}", draft.asset());
        }
    }
    draft.wallet_type = args.wallet_type;
    if args.wallet_type == WalletType::Exchange {
        draft.exchange_name = args.exchange.unwrap_or_default();
    }
    draft.proof = Some(document(&args.proof).await?);
    draft.proof_description = args.proof_description.unwrap_or_default();
    draft.is_primary = args.primary;

    screen.submit(app).await;
    finish(&screen.banner)
}

pub async fn set_primary_wallet(app: &AppState, id: &str) -> Result<()> {
    let mut screen = WalletsScreen::default();
    screen.load(app).await;
    finish(&screen.banner)?;
    if let Some(wallet) = screen.wallets.iter().find(|w| w.id == id) {
        if !WalletsScreen::can_set_primary(wallet) {
            bail!("Only verified wallets that are not already primary can be made primary");
        }
    }
    screen.set_primary(app, id).await;
    finish(&screen.banner)
}

pub async fn delete_wallet(app: &AppState, id: &str) -> Result<()> {
    let mut screen = WalletsScreen::default();
    screen.delete(app, id).await;
    finish(&screen.banner)
}

// ---------------------------------------------------------------------------
// Prices
// ---------------------------------------------------------------------------

pub async fn watch_prices(
    app: &AppState,
    prices: &PricesConfig,
    symbol: &str,
    ticks: Option<usize>,
) -> Result<()> {
    let mut card = PriceCard::with_config(PollerConfig {
        refresh: prices.refresh(),
        history_days: prices.history_days,
        ..PollerConfig::new(symbol)
    });
    if !card.mount(app) {
        return finish(&card.banner);
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut events = 0usize;
    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            more = card.next_event() => {
                if !more {
                    break;
                }
                events += 1;
                // Each refresh delivers a snapshot and a history event.
                if events % 2 == 0 {
                    println!(
                        "{:<5} {:>14} {:>12} {:>8}  {}",
                        card.symbol,
                        card.price_inr(),
                        card.price_usd(),
                        card.change(),
                        card.sparkline()
                    );
                    if ticks.is_some_and(|t| events / 2 >= t) {
                        break;
                    }
                }
            }
        }
    }
    card.unmount().await;
    info!(symbol = %card.symbol, refreshes = events / 2, "Stopped watching prices");
    Ok(())
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

pub async fn admin(app: &AppState, command: AdminCommands) -> Result<()> {
    let mut console = match AdminConsole::open(app) {
        Ok(console) => console,
        Err(refused) => bail!("{refused}"),
    };

    match command {
        AdminCommands::Analytics => {
            console.select(app, AdminTab::Dashboard).await;
            finish(&console.banner)?;
            if let Some(analytics) = &console.analytics {
                let o = &analytics.overview;
                let v = &analytics.volume;
                let k = &analytics.charts.kyc_status;
                println!("Users            {} ({} verified, {} new this week)", o.total_users, o.verified_users, o.new_users_this_week);
                println!("Orders           {} ({} completed, {} pending)", o.total_orders, o.completed_orders, o.pending_orders);
                println!("Pending KYC      {}", o.pending_kyc);
                println!("Pending wallets  {}", o.pending_wallets);
                println!("Buy volume       {}", format_rupees(v.total_buy_volume));
                println!("Sell volume      {}", format_rupees(v.total_sell_volume));
                println!("Total volume     {}", format_rupees(v.total_volume));
                println!(
                    "KYC              {} approved, {} under review, {} pending, {} rejected",
                    k.approved, k.under_review, k.pending, k.rejected
                );
                for day in &analytics.charts.daily_orders {
                    println!("  {} {:<3} {:>4} orders  {}", day.date, day.day, day.count, format_rupees(day.volume));
                }
            }
            Ok(())
        }
        AdminCommands::KycQueue => {
            console.select(app, AdminTab::Kyc).await;
            finish(&console.banner)?;
            if console.pending_kyc.is_empty() {
                println!("No pending KYC submissions");
            }
            for record in &console.pending_kyc {
                println!(
                    "  {:<24} {:<28} {:<13} {}",
                    record.id,
                    record.user_email.as_deref().unwrap_or("-"),
                    record.status.label(),
                    format_timestamp(record.submitted_at)
                );
            }
            Ok(())
        }
        AdminCommands::KycShow { id } => {
            console.open_kyc(app, &id).await;
            finish(&console.banner)?;
            if let Some(record) = &console.selected_kyc {
                let fields = [
                    ("User", record.user_email.as_deref()),
                    ("Mobile", record.user_mobile.as_deref()),
                    ("PAN", record.pan_number.as_deref()),
                    ("Aadhaar", record.aadhaar_number.as_deref()),
                    ("Holder", record.account_holder_name.as_deref()),
                    ("Account", record.bank_account_number.as_deref()),
                    ("IFSC", record.bank_ifsc.as_deref()),
                    ("Bank", record.bank_name.as_deref()),
                    ("Nominee", record.nominee_name.as_deref()),
                ];
                println!("  {:<10} {}", "Status", record.status.label());
                for (label, value) in fields {
                    println!("  {label:<10} {}", value.unwrap_or("-"));
                }
                let documents = [
                    ("PAN image", &record.pan_image),
                    ("Aadhaar front", &record.aadhaar_front),
                    ("Aadhaar back", &record.aadhaar_back),
                    ("Selfie", &record.selfie_image),
                    ("Address proof", &record.address_proof),
                ];
                for (label, doc) in documents {
                    println!("  {label:<14} {}", describe_document(doc.as_deref()));
                }
            }
            Ok(())
        }
        AdminCommands::KycApprove { id } => {
            console.review_kyc(app, &id, ReviewAction::Approve, "").await;
            finish(&console.banner)
        }
        AdminCommands::KycReject { id, reason } => {
            console.review_kyc(app, &id, ReviewAction::Reject, &reason).await;
            finish(&console.banner)
        }
        AdminCommands::Orders => {
            console.select(app, AdminTab::Orders).await;
            finish(&console.banner)?;
            for order in &console.orders {
                print_order_row(order);
                if let Some(email) = &order.user_email {
                    println!("    {email}");
                }
            }
            Ok(())
        }
        AdminCommands::SetOrderStatus { id, status, notes } => {
            console.update_order(app, &id, status, &notes).await;
            finish(&console.banner)
        }
        AdminCommands::Rates => {
            console.select(app, AdminTab::Rates).await;
            finish(&console.banner)?;
            for rate in &console.rates {
                println!(
                    "  {:<6} buy {:>14}  sell {:>14}  {}",
                    rate.asset,
                    format_rupees(rate.buy_rate),
                    format_rupees(rate.sell_rate),
                    format_timestamp(rate.updated_at)
                );
            }
            Ok(())
        }
        AdminCommands::SetRate {
            asset,
            buy,
            sell,
            user,
        } => {
            console.rate_draft.asset = asset;
            console.rate_draft.buy_rate = buy;
            console.rate_draft.sell_rate = sell;
            console.rate_draft.user_specific = user.unwrap_or_default();
            console.update_rates(app).await;
            finish(&console.banner)
        }
        AdminCommands::Users => {
            console.select(app, AdminTab::Users).await;
            finish(&console.banner)?;
            for user in &console.users {
                print_user_row(user);
            }
            Ok(())
        }
        AdminCommands::Freeze { user_id } => {
            console.freeze_user(app, &user_id).await;
            finish(&console.banner)
        }
        AdminCommands::AssignRm {
            user_id,
            name,
            phone,
            whatsapp,
        } => {
            let draft = AssignRmDraft {
                rm_name: name,
                rm_phone: phone,
                rm_whatsapp: whatsapp.unwrap_or_default(),
            };
            console.assign_rm(app, &user_id, &draft).await;
            finish(&console.banner)
        }
        AdminCommands::WalletQueue => {
            console.select(app, AdminTab::Wallets).await;
            finish(&console.banner)?;
            if console.pending_wallets.is_empty() {
                println!("No wallets waiting for verification");
            }
            for wallet in &console.pending_wallets {
                println!(
                    "  {:<24} {:<28} {:<5} {:<8} {}",
                    wallet.id,
                    wallet.user_email.as_deref().unwrap_or("-"),
                    wallet.asset,
                    wallet.network,
                    wallet.wallet_address
                );
            }
            Ok(())
        }
        AdminCommands::WalletApprove { id, notes } => {
            console.review_wallet(app, &id, ReviewAction::Approve, &notes).await;
            finish(&console.banner)
        }
        AdminCommands::WalletReject { id, notes } => {
            console.review_wallet(app, &id, ReviewAction::Reject, &notes).await;
            finish(&console.banner)
        }
        AdminCommands::LedgerEntry {
            user_id,
            asset,
            entry_type,
            amount,
            description,
        } => {
            console.tab = AdminTab::Ledger;
            console.ledger_draft.user_id = user_id;
            console.ledger_draft.asset = asset;
            console.ledger_draft.entry_type = entry_type;
            console.ledger_draft.amount = amount;
            console.ledger_draft.description = description;
            console.post_ledger_entry(app).await;
            finish(&console.banner)
        }
    }
}

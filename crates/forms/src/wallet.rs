use crate::document::DocumentImage;
use crate::{non_blank, FormError};
use bharatbit_core::{SaveWalletRequest, WalletType};

pub const WALLET_ASSETS: &[&str] = &["USDT", "BTC", "ETH"];

pub const EXCHANGES: &[&str] = &[
    "Binance", "WazirX", "CoinDCX", "Bybit", "OKX", "KuCoin", "Coinbase", "Kraken", "Other",
];

/// Networks a wallet for `asset` can live on. The first entry is the default.
pub fn networks_for(asset: &str) -> &'static [&'static str] {
    match asset.to_ascii_uppercase().as_str() {
        "USDT" => &["TRC20", "ERC20", "BEP20"],
        "BTC" => &["Bitcoin"],
        "ETH" => &["ERC20"],
        _ => &[],
    }
}

/// Draft of the add-wallet form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletDraft {
    pub label: String,
    pub wallet_address: String,
    asset: String,
    network: String,
    pub wallet_type: WalletType,
    pub exchange_name: String,
    pub proof: Option<DocumentImage>,
    pub proof_description: String,
    pub is_primary: bool,
}

impl Default for WalletDraft {
    fn default() -> Self {
        Self {
            label: String::new(),
            wallet_address: String::new(),
            asset: "USDT".to_string(),
            network: "TRC20".to_string(),
            wallet_type: WalletType::Exchange,
            exchange_name: String::new(),
            proof: None,
            proof_description: String::new(),
            is_primary: false,
        }
    }
}

impl WalletDraft {
    pub fn asset(&self) -> &str {
        &self.asset
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    /// Switch asset and reset the network to that asset's default.
    pub fn set_asset(&mut self, asset: &str) {
        self.asset = asset.to_ascii_uppercase();
        self.network = networks_for(&self.asset)
            .first()
            .map(|n| n.to_string())
            .unwrap_or_default();
    }

    /// Pick a network. Networks the asset does not support are ignored.
    pub fn set_network(&mut self, network: &str) -> bool {
        match networks_for(&self.asset)
            .iter()
            .find(|n| n.eq_ignore_ascii_case(network))
        {
            Some(n) => {
                self.network = n.to_string();
                true
            }
            None => false,
        }
    }

    pub fn validate(&self) -> Result<SaveWalletRequest, FormError> {
        let label = non_blank(&self.label).ok_or(FormError::MissingWalletLabel)?;
        let wallet_address =
            non_blank(&self.wallet_address).ok_or(FormError::MissingWalletAddress)?;
        let network = non_blank(&self.network).ok_or(FormError::MissingNetwork)?;
        let exchange_name = match self.wallet_type {
            WalletType::Exchange => {
                Some(non_blank(&self.exchange_name).ok_or(FormError::MissingExchange)?)
            }
            WalletType::SelfCustody => None,
        };
        let proof = self.proof.as_ref().ok_or(FormError::MissingOwnershipProof)?;

        Ok(SaveWalletRequest {
            label,
            wallet_address,
            asset: self.asset.clone(),
            network,
            wallet_type: self.wallet_type,
            exchange_name,
            proof_image: proof.to_data_uri(),
            proof_description: non_blank(&self.proof_description),
            is_primary: self.is_primary,
        })
    }
}

/// Shortened address for list views: first 10 and last 8 characters.
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 20 {
        return address.to_string();
    }
    let head: String = chars[..10].iter().collect();
    let tail: String = chars[chars.len() - 8..].iter().collect();
    format!("{head}...{tail}")
}

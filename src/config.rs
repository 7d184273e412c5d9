/// Gateway configuration from environment variables
///
/// Controls the XRPL network flavor, the remote commerce API endpoint and
/// where persisted store settings live. Defaults to Mainnet for production
/// compatibility.
use std::env;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum XrplNetwork {
    Mainnet,
    Testnet,
}

impl XrplNetwork {
    pub fn as_str(&self) -> &'static str {
        match self {
            XrplNetwork::Mainnet => "mainnet",
            XrplNetwork::Testnet => "testnet",
        }
    }
}

#[derive(Clone, Debug)]
pub struct GatewayConfig {
    /// XRPL network flavor (testnet payouts carry no real value)
    pub network: XrplNetwork,
    /// Remote commerce API base URL
    pub api_base_url: String,
    /// Directory holding the persisted store settings
    pub data_dir: PathBuf,
    /// Public URL of the merchant settings page (claim redirects land here)
    pub public_url: String,
    /// Shared admin token; when unset, requests are not authenticated
    pub admin_token: Option<String>,
}

impl GatewayConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `XRPL_NETWORK`: "mainnet" (default) or "testnet"
    /// - `API_BASE_URL`: remote commerce API endpoint (optional, has network defaults)
    /// - `DATA_DIR`: settings directory (default "./data")
    /// - `PUBLIC_URL`: public URL of the merchant settings page
    /// - `ADMIN_TOKEN`: shared secret required in the X-Admin-Token header
    pub fn from_env() -> Self {
        let network_str = env::var("XRPL_NETWORK")
            .unwrap_or_else(|_| "mainnet".to_string())
            .to_lowercase();

        let network = match network_str.as_str() {
            "testnet" => {
                log::info!("🧪 Using XRPL TESTNET (no real funds move)");
                XrplNetwork::Testnet
            }
            "mainnet" | "" => {
                log::info!("🌐 Using XRPL MAINNET");
                XrplNetwork::Mainnet
            }
            other => {
                log::warn!("⚠️  Unknown network '{}', defaulting to Mainnet", other);
                XrplNetwork::Mainnet
            }
        };

        let api_base_url = env::var("API_BASE_URL").unwrap_or_else(|_| {
            let default_url = match network {
                XrplNetwork::Testnet => "https://testnet.yesallofus.com/api".to_string(),
                XrplNetwork::Mainnet => "https://yesallofus.com/api".to_string(),
            };
            log::info!("📡 Commerce API: {}", default_url);
            default_url
        });

        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));

        let public_url =
            env::var("PUBLIC_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

        let admin_token = env::var("ADMIN_TOKEN").ok().filter(|t| !t.is_empty());
        if admin_token.is_none() {
            log::warn!("ADMIN_TOKEN not set - admin endpoints are unauthenticated (development mode)");
        }

        Self {
            network,
            api_base_url,
            data_dir,
            public_url,
            admin_token,
        }
    }

    /// Canonical settings-page URL a successful claim redirects to.
    ///
    /// Never carries the claim token, so the one-time credential cannot be
    /// replayed from browser history.
    pub fn settings_url(&self) -> String {
        format!("{}/settings?connected=1", self.public_url.trim_end_matches('/'))
    }
}

impl Default for GatewayConfig {
    /// Default configuration (Mainnet)
    fn default() -> Self {
        Self {
            network: XrplNetwork::Mainnet,
            api_base_url: "https://yesallofus.com/api".to_string(),
            data_dir: PathBuf::from("./data"),
            public_url: "http://localhost:3000".to_string(),
            admin_token: None,
        }
    }
}

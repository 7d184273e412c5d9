//! Wire types for the remote commerce API

use crate::onboarding::payout_mode::{PayoutMode, WalletKind};
use serde::{Deserialize, Serialize};

/// Credentials issued when a claim token is redeemed or a store registers.
#[derive(Debug, Clone)]
pub struct ClaimedStore {
    pub store_id: String,
    pub api_secret: String,
    pub wallet_address: Option<String>,
    pub wallet_type: WalletKind,
}

#[derive(Debug, Deserialize)]
pub struct ClaimPayload {
    #[serde(default)]
    pub store_id: Option<String>,
    #[serde(default)]
    pub api_secret: Option<String>,
    #[serde(default)]
    pub wallet_address: Option<String>,
    #[serde(default)]
    pub wallet_type: Option<WalletKind>,
}

#[derive(Debug, Deserialize)]
pub struct WalletStatusPayload {
    pub funded: bool,
    pub rlusd_trustline: bool,
    pub xrp_balance: f64,
    pub rlusd_balance: f64,
}

/// Registration request for a store created from a wallet login.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterStoreBody {
    pub wallet_address: String,
    pub wallet_type: WalletKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaman_user_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referral_code: Option<String>,
}

/// What the promo registry knows about a well-formed code.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PromoInfo {
    pub store_name: String,
}

/// Store-scoped connection probe.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectionInfo {
    #[serde(default)]
    pub store_referral_code: Option<String>,
    /// Lifetime referral earnings, USD
    #[serde(rename = "chainb_earned", default)]
    pub referral_earned: f64,
    #[serde(default)]
    pub xaman_connected: bool,
    /// True when the wallet signs via push notification (Xaman)
    #[serde(default)]
    pub push_enabled: bool,
    #[serde(default)]
    pub wallet_address: Option<String>,
    #[serde(default)]
    pub payout_mode: Option<PayoutMode>,
}

/// QR handshake issued by the remote for Xaman connect/login flows.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct XamanHandshake {
    pub qr_png: String,
    pub deep_link: String,
    #[serde(alias = "connection_id", alias = "login_id")]
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum XamanPollStatus {
    Pending,
    Connected,
    Expired,
    Cancelled,
}

impl XamanPollStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, XamanPollStatus::Pending)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct XamanPollState {
    pub status: XamanPollStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xaman_user_token: Option<String>,
}

/// Platform signer details for the auto-sign setup screen.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SignerInfo {
    #[serde(default)]
    pub platform_signer_address: Option<String>,
}

/// Outcome of checking the wallet's on-chain signer list.
#[derive(Debug, Clone, Deserialize)]
pub struct SignerCheck {
    #[serde(default)]
    pub auto_signing_enabled: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RevokeResult {
    #[serde(default)]
    pub message: Option<String>,
}

/// Responses with no payload beyond the success flag.
#[derive(Debug, Clone, Deserialize)]
pub struct Acknowledged {}

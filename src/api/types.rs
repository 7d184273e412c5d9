use crate::onboarding::payout_mode::{ModeOption, PayoutMode, WalletKind};
use crate::onboarding::rates::LEVELS;
use crate::onboarding::wallet_status::{OnboardingStep, WalletStatus};
use crate::remote::{ConnectionInfo, XamanPollState};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Response envelope kept from the original admin boundary: success payloads
/// and error reasons both travel under `data`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

pub fn ok<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        data,
    })
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ClaimRequest {
    pub claim_token: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterStoreRequest {
    pub wallet_address: String,
    /// Absent for the Crossmark browser flow, which is the default
    #[serde(default = "default_register_wallet")]
    pub wallet_type: WalletKind,
    #[serde(default)]
    pub xaman_user_token: Option<String>,
    #[serde(default)]
    pub referral_code: Option<String>,
}

fn default_register_wallet() -> WalletKind {
    WalletKind::Crossmark
}

#[derive(Debug, Deserialize)]
pub struct DeleteStoreRequest {
    pub confirm: String,
}

#[derive(Debug, Deserialize)]
pub struct CrossmarkWalletRequest {
    pub wallet_address: String,
}

#[derive(Debug, Deserialize)]
pub struct XamanPollRequest {
    pub connection_id: String,
}

#[derive(Debug, Deserialize)]
pub struct XamanLoginPollRequest {
    pub login_id: String,
}

#[derive(Debug, Deserialize)]
pub struct XamanWaitLoginRequest {
    pub login_id: String,
    #[serde(default)]
    pub referral_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PromoCodeRequest {
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct RatesRequest {
    pub levels: [f64; LEVELS],
}

#[derive(Debug, Deserialize)]
pub struct PayoutModeRequest {
    pub mode: PayoutMode,
}

#[derive(Debug, Deserialize)]
pub struct BatchingRequest {
    pub payout_threshold: u32,
    pub payout_schedule: u32,
}

#[derive(Debug, Deserialize)]
pub struct TrackingRequest {
    pub cookie_days: u32,
}

#[derive(Debug, Deserialize)]
pub struct TermsRequest {
    pub accepted: bool,
}

#[derive(Debug, Deserialize)]
pub struct LimitsRequest {
    pub max_single_payout: f64,
    pub daily_limit: f64,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ClaimResponse {
    pub store_id: String,
    pub wallet_type: WalletKind,
    pub redirect: String,
}

/// Wallet probe result. `available: false` means the remote could not
/// answer - the wallet state is unknown, not "not ready".
#[derive(Debug, Serialize)]
pub struct WalletStatusResponse {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<WalletStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<OnboardingStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_label: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct ConnectionResponse {
    #[serde(flatten)]
    pub info: ConnectionInfo,
    pub mode_options: Vec<ModeOption>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct XamanWaitResponse {
    pub timed_out: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<XamanPollState>,
}

#[derive(Debug, Serialize)]
pub struct XamanWaitLoginResponse {
    pub timed_out: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<ClaimResponse>,
}

#[derive(Debug, Serialize)]
pub struct AutoSignActionResponse {
    pub state: crate::onboarding::autosign::AutoSignState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TrackingResponse {
    pub cookie_days: u32,
}

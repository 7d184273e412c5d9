/// Common test utilities for gateway integration tests
///
/// Provides a mock of the remote commerce API (in-process axum server on an
/// ephemeral port) plus a StoreManager wired to it and to a temp data dir.
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

use payout_gateway::config::GatewayConfig;
use payout_gateway::manager::StoreManager;
use payout_gateway::onboarding::payout_mode::WalletKind;

#[derive(Default)]
pub struct MockState {
    /// How many times the claim endpoint was hit
    pub claim_hits: AtomicUsize,
    /// Make the next claim fail with a remote rejection
    pub claim_fail: AtomicBool,
    pub wallet_funded: AtomicBool,
    pub wallet_trustline: AtomicBool,
    /// Whether the platform signer is "present" in the wallet's signer list
    pub signer_present: AtomicBool,
    /// Polls remaining before the Xaman handshake reports connected
    pub poll_countdown: AtomicUsize,
}

pub struct MockRemote {
    pub base_url: String,
    pub state: Arc<MockState>,
}

pub async fn spawn_mock_remote() -> anyhow::Result<MockRemote> {
    let state = Arc::new(MockState::default());

    let app = Router::new()
        .route("/store/claim-secret", post(claim_secret))
        .route("/store/register", post(register_store))
        .route("/store/check-connection", post(check_connection))
        .route("/store/delete", post(ack))
        .route("/store/payout-settings", post(ack))
        .route("/wallet/status/:address", get(wallet_status))
        .route("/wallet/crossmark", post(ack))
        .route("/wallet/xaman/connect", post(xaman_connect))
        .route("/wallet/xaman/login", post(xaman_login))
        .route("/wallet/xaman/poll", post(xaman_poll))
        .route("/wallet/xaman/disconnect", post(ack))
        .route("/promo/validate", post(validate_promo))
        .route("/autosign/settings", post(autosign_settings))
        .route("/autosign/verify", post(verify_signer))
        .route("/autosign/revoke", post(revoke_autosign))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let base_url = format!("http://{}", listener.local_addr()?);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Ok(MockRemote { base_url, state })
}

pub struct TestEnvironment {
    pub temp_dir: TempDir,
    pub manager: StoreManager,
    pub mock: MockRemote,
}

impl TestEnvironment {
    pub async fn new() -> anyhow::Result<Self> {
        let mock = spawn_mock_remote().await?;
        let temp_dir = TempDir::new()?;
        let config = GatewayConfig {
            api_base_url: mock.base_url.clone(),
            data_dir: temp_dir.path().to_path_buf(),
            ..Default::default()
        };
        let manager = StoreManager::new_with_config(config);
        Ok(Self {
            temp_dir,
            manager,
            mock,
        })
    }

    /// Seed persisted credentials as if a claim had completed earlier.
    pub fn connect_store(&self, wallet: Option<WalletKind>) {
        let mut settings = self.manager.storage.load_settings().unwrap();
        settings.store_id = Some("S1".to_string());
        settings.api_secret = Some("secret".to_string());
        if wallet.is_some() {
            settings.wallet_address = Some("rMERCHANTWALLETxxxxxxxxxxxxxxxx".to_string());
            settings.wallet_type = wallet;
        }
        self.manager.storage.save_settings(&mut settings).unwrap();
    }
}

// ---------------------------------------------------------------------------
// Mock remote handlers
// ---------------------------------------------------------------------------

async fn claim_secret(State(state): State<Arc<MockState>>, Json(_body): Json<Value>) -> Json<Value> {
    state.claim_hits.fetch_add(1, Ordering::SeqCst);
    if state.claim_fail.load(Ordering::SeqCst) {
        return Json(json!({
            "success": false,
            "error": "Invalid or expired claim token",
        }));
    }
    Json(json!({
        "success": true,
        "store_id": "S1",
        "api_secret": "secret",
        "wallet_address": "rAbcDEFghiJKLmnoPQRstuVWXyz12345",
        "wallet_type": "xaman",
    }))
}

async fn register_store(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "success": true,
        "store_id": "S2",
        "api_secret": "secret2",
        "wallet_address": body["wallet_address"],
    }))
}

async fn check_connection(Json(_body): Json<Value>) -> Json<Value> {
    Json(json!({
        "success": true,
        "store_referral_code": "A1B2C3D4",
        "chainb_earned": 12.5,
        "xaman_connected": true,
        "push_enabled": true,
        "wallet_address": "rMERCHANTWALLETxxxxxxxxxxxxxxxx",
        "payout_mode": "manual",
    }))
}

async fn wallet_status(
    State(state): State<Arc<MockState>>,
    Path(_address): Path<String>,
) -> Json<Value> {
    let funded = state.wallet_funded.load(Ordering::SeqCst);
    Json(json!({
        "success": true,
        "funded": funded,
        "rlusd_trustline": state.wallet_trustline.load(Ordering::SeqCst),
        "xrp_balance": if funded { 11.8 } else { 0.0 },
        "rlusd_balance": 0.0,
    }))
}

async fn xaman_connect(Json(_body): Json<Value>) -> Json<Value> {
    Json(json!({
        "success": true,
        "qr_png": "data:image/png;base64,AAAA",
        "deep_link": "https://xaman.app/sign/conn-1",
        "connection_id": "conn-1",
    }))
}

async fn xaman_login(Json(_body): Json<Value>) -> Json<Value> {
    Json(json!({
        "success": true,
        "qr_png": "data:image/png;base64,BBBB",
        "deep_link": "https://xaman.app/sign/login-1",
        "login_id": "login-1",
    }))
}

async fn xaman_poll(State(state): State<Arc<MockState>>, Json(_body): Json<Value>) -> Json<Value> {
    let remaining = state.poll_countdown.load(Ordering::SeqCst);
    if remaining > 0 {
        state.poll_countdown.store(remaining - 1, Ordering::SeqCst);
        return Json(json!({ "success": true, "status": "pending" }));
    }
    Json(json!({
        "success": true,
        "status": "connected",
        "wallet_address": "rXAMANsignedINwalletxxxxxxxxxxxx",
        "xaman_user_token": "push-token-1",
    }))
}

async fn validate_promo(Json(body): Json<Value>) -> Json<Value> {
    if body["code"] == "A1B2C3D4" {
        Json(json!({ "success": true, "store_name": "Referring Store" }))
    } else {
        Json(json!({ "success": false, "error": "Invalid promotional code" }))
    }
}

async fn autosign_settings(Json(_body): Json<Value>) -> Json<Value> {
    Json(json!({
        "success": true,
        "platform_signer_address": "rPLATFORMsignerxxxxxxxxxxxxxxxxx",
    }))
}

async fn verify_signer(State(state): State<Arc<MockState>>, Json(_body): Json<Value>) -> Json<Value> {
    if state.signer_present.load(Ordering::SeqCst) {
        Json(json!({
            "success": true,
            "auto_signing_enabled": true,
            "message": "Auto-signing enabled!",
        }))
    } else {
        Json(json!({
            "success": true,
            "auto_signing_enabled": false,
            "message": "Signer not found in the wallet's signer list",
        }))
    }
}

async fn revoke_autosign(Json(_body): Json<Value>) -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Auto-signing disabled. Remember to also remove the signer from your wallet.",
    }))
}

async fn ack(Json(_body): Json<Value>) -> Json<Value> {
    Json(json!({ "success": true }))
}

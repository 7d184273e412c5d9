use axum::{extract::State, Json};
use std::sync::Arc;

use crate::error::GatewayError;
use crate::manager::{AutoSignView, StoreManager};
use crate::onboarding::batching::PayoutBatchingPolicy;
use crate::onboarding::payout_mode::ModeOption;
use crate::onboarding::rates::RateUpdate;
use crate::onboarding::wallet_status::WalletProbe;
use crate::remote::{PromoInfo, XamanHandshake, XamanPollState};

use super::types::*;

type Handler<T> = Result<Json<Envelope<T>>, GatewayError>;

// ---------------------------------------------------------------------------
// Store connection
// ---------------------------------------------------------------------------

pub async fn claim_store_handler(
    State(manager): State<Arc<StoreManager>>,
    Json(req): Json<ClaimRequest>,
) -> Handler<ClaimResponse> {
    let outcome = manager.claim_secret(&req.claim_token).await?;
    Ok(ok(ClaimResponse {
        store_id: outcome.store_id,
        wallet_type: outcome.wallet_type,
        redirect: outcome.redirect,
    }))
}

pub async fn register_store_handler(
    State(manager): State<Arc<StoreManager>>,
    Json(req): Json<RegisterStoreRequest>,
) -> Handler<ClaimResponse> {
    let outcome = manager
        .register_store(
            req.wallet_address,
            req.wallet_type,
            req.xaman_user_token,
            req.referral_code,
        )
        .await?;
    Ok(ok(ClaimResponse {
        store_id: outcome.store_id,
        wallet_type: outcome.wallet_type,
        redirect: outcome.redirect,
    }))
}

pub async fn check_connection_handler(
    State(manager): State<Arc<StoreManager>>,
) -> Handler<ConnectionResponse> {
    let (info, mode_options) = manager.check_connection().await?;
    Ok(ok(ConnectionResponse { info, mode_options }))
}

pub async fn disconnect_store_handler(
    State(manager): State<Arc<StoreManager>>,
) -> Handler<MessageResponse> {
    manager.disconnect()?;
    Ok(ok(MessageResponse {
        message: "Store disconnected. Reconnect anytime from the dashboard.".to_string(),
    }))
}

pub async fn delete_store_handler(
    State(manager): State<Arc<StoreManager>>,
    Json(req): Json<DeleteStoreRequest>,
) -> Handler<MessageResponse> {
    manager.delete_store_permanently(&req.confirm).await?;
    Ok(ok(MessageResponse {
        message: "Store permanently deleted.".to_string(),
    }))
}

// ---------------------------------------------------------------------------
// Wallet status & connect flows
// ---------------------------------------------------------------------------

pub async fn wallet_status_handler(
    State(manager): State<Arc<StoreManager>>,
) -> Handler<WalletStatusResponse> {
    let (probe, step) = manager.wallet_status().await?;
    let response = match probe {
        WalletProbe::Known(status) => WalletStatusResponse {
            available: true,
            status: Some(status),
            step,
            step_label: step.map(|s| s.label()),
        },
        WalletProbe::Unavailable => WalletStatusResponse {
            available: false,
            status: None,
            step: None,
            step_label: None,
        },
    };
    Ok(ok(response))
}

pub async fn xaman_connect_handler(
    State(manager): State<Arc<StoreManager>>,
) -> Handler<XamanHandshake> {
    Ok(ok(manager.xaman_connect().await?))
}

pub async fn xaman_poll_handler(
    State(manager): State<Arc<StoreManager>>,
    Json(req): Json<XamanPollRequest>,
) -> Handler<XamanPollState> {
    Ok(ok(manager.xaman_poll(&req.connection_id).await?))
}

pub async fn xaman_wait_handler(
    State(manager): State<Arc<StoreManager>>,
    Json(req): Json<XamanPollRequest>,
) -> Handler<XamanWaitResponse> {
    let state = manager.xaman_wait_connected(&req.connection_id).await?;
    Ok(ok(XamanWaitResponse {
        timed_out: state.is_none(),
        state,
    }))
}

pub async fn xaman_login_handler(
    State(manager): State<Arc<StoreManager>>,
) -> Handler<XamanHandshake> {
    Ok(ok(manager.xaman_login().await?))
}

pub async fn xaman_poll_login_handler(
    State(manager): State<Arc<StoreManager>>,
    Json(req): Json<XamanLoginPollRequest>,
) -> Handler<XamanPollState> {
    Ok(ok(manager.xaman_poll_login(&req.login_id).await?))
}

pub async fn xaman_wait_login_handler(
    State(manager): State<Arc<StoreManager>>,
    Json(req): Json<XamanWaitLoginRequest>,
) -> Handler<XamanWaitLoginResponse> {
    let outcome = manager
        .xaman_wait_login(&req.login_id, req.referral_code)
        .await?;
    Ok(ok(XamanWaitLoginResponse {
        timed_out: outcome.is_none(),
        store: outcome.map(|o| ClaimResponse {
            store_id: o.store_id,
            wallet_type: o.wallet_type,
            redirect: o.redirect,
        }),
    }))
}

pub async fn save_crossmark_wallet_handler(
    State(manager): State<Arc<StoreManager>>,
    Json(req): Json<CrossmarkWalletRequest>,
) -> Handler<MessageResponse> {
    manager.save_crossmark_wallet(req.wallet_address).await?;
    Ok(ok(MessageResponse {
        message: "Wallet connected.".to_string(),
    }))
}

pub async fn disconnect_wallet_handler(
    State(manager): State<Arc<StoreManager>>,
) -> Handler<MessageResponse> {
    manager.disconnect_wallet().await?;
    Ok(ok(MessageResponse {
        message: "Wallet disconnected.".to_string(),
    }))
}

// ---------------------------------------------------------------------------
// Promo codes
// ---------------------------------------------------------------------------

pub async fn validate_promo_handler(
    State(manager): State<Arc<StoreManager>>,
    Json(req): Json<PromoCodeRequest>,
) -> Handler<PromoInfo> {
    Ok(ok(manager.validate_promo(&req.code).await?))
}

pub async fn apply_promo_handler(
    State(manager): State<Arc<StoreManager>>,
    Json(req): Json<PromoCodeRequest>,
) -> Handler<PromoInfo> {
    Ok(ok(manager.apply_referral(&req.code).await?))
}

// ---------------------------------------------------------------------------
// Payout configuration
// ---------------------------------------------------------------------------

pub async fn set_rates_handler(
    State(manager): State<Arc<StoreManager>>,
    Json(req): Json<RatesRequest>,
) -> Handler<RateUpdate> {
    Ok(ok(manager.set_rates(req.levels)?))
}

pub async fn set_payout_mode_handler(
    State(manager): State<Arc<StoreManager>>,
    Json(req): Json<PayoutModeRequest>,
) -> Handler<Vec<ModeOption>> {
    manager.set_payout_mode(req.mode).await?;
    Ok(ok(manager.mode_options()?))
}

pub async fn set_batching_handler(
    State(manager): State<Arc<StoreManager>>,
    Json(req): Json<BatchingRequest>,
) -> Handler<PayoutBatchingPolicy> {
    Ok(ok(manager
        .set_batching(req.payout_threshold, req.payout_schedule)
        .await?))
}

pub async fn set_tracking_handler(
    State(manager): State<Arc<StoreManager>>,
    Json(req): Json<TrackingRequest>,
) -> Handler<TrackingResponse> {
    let cookie_days = manager.set_cookie_days(req.cookie_days)?;
    Ok(ok(TrackingResponse { cookie_days }))
}

// ---------------------------------------------------------------------------
// Auto-sign policy
// ---------------------------------------------------------------------------

pub async fn autosign_settings_handler(
    State(manager): State<Arc<StoreManager>>,
) -> Handler<AutoSignView> {
    Ok(ok(manager.autosign_settings().await?))
}

pub async fn accept_terms_handler(
    State(manager): State<Arc<StoreManager>>,
    Json(req): Json<TermsRequest>,
) -> Handler<AutoSignActionResponse> {
    let state = manager.accept_autosign_terms(req.accepted)?;
    Ok(ok(AutoSignActionResponse {
        state,
        message: None,
    }))
}

pub async fn set_limits_handler(
    State(manager): State<Arc<StoreManager>>,
    Json(req): Json<LimitsRequest>,
) -> Handler<AutoSignActionResponse> {
    let state = manager.set_autosign_limits(req.max_single_payout, req.daily_limit)?;
    Ok(ok(AutoSignActionResponse {
        state,
        message: None,
    }))
}

pub async fn verify_autosign_handler(
    State(manager): State<Arc<StoreManager>>,
) -> Handler<AutoSignActionResponse> {
    let (state, message) = manager.verify_autosign().await?;
    Ok(ok(AutoSignActionResponse { state, message }))
}

pub async fn revoke_autosign_handler(
    State(manager): State<Arc<StoreManager>>,
) -> Handler<AutoSignActionResponse> {
    let (state, message) = manager.revoke_autosign().await?;
    Ok(ok(AutoSignActionResponse { state, message }))
}

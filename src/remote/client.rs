use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

use crate::error::GatewayError;
use crate::onboarding::payout_mode::{PayoutMode, WalletKind};
use crate::onboarding::wallet_status::WalletStatus;
use crate::storage::StoreCredentials;

use super::types::*;

/// Claim exchanges can take a moment server-side.
const CLAIM_TIMEOUT: Duration = Duration::from_secs(15);
/// Wallet status hits the ledger; keep the page snappy.
const STATUS_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Every remote response carries `success` plus either payload fields or an
/// `error` reason, all at the top level.
#[derive(Deserialize)]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(flatten)]
    payload: T,
}

/// Store-scoped requests carry the credential pair alongside the payload.
#[derive(Serialize)]
struct StoreScoped<'a, B: Serialize> {
    store_id: &'a str,
    api_secret: &'a str,
    #[serde(flatten)]
    body: B,
}

pub struct CommerceClient {
    http: Client,
    base_url: String,
}

impl CommerceClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        timeout: Duration,
    ) -> Result<T, GatewayError> {
        let resp = self
            .http
            .post(self.url(path))
            .timeout(timeout)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(GatewayError::RemoteRejected(format!(
                "remote API returned {}",
                status
            )));
        }

        let envelope: Envelope<T> = resp
            .json()
            .await
            .map_err(|e| GatewayError::RemoteUnavailable(format!("malformed response: {}", e)))?;

        if !envelope.success {
            return Err(GatewayError::RemoteRejected(
                envelope.error.unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }
        Ok(envelope.payload)
    }

    async fn post_scoped<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        creds: &StoreCredentials,
        body: B,
    ) -> Result<T, GatewayError> {
        self.post(
            path,
            &StoreScoped {
                store_id: &creds.store_id,
                api_secret: &creds.api_secret,
                body,
            },
            DEFAULT_TIMEOUT,
        )
        .await
    }

    /// Redeem a one-time claim token for permanent store credentials.
    /// The token is consumed server-side whether or not we manage to
    /// persist the result, so callers must not retry blindly.
    pub async fn claim_secret(&self, claim_token: &str) -> Result<ClaimedStore, GatewayError> {
        let payload: ClaimPayload = self
            .post(
                "/store/claim-secret",
                &json!({ "claim_token": claim_token }),
                CLAIM_TIMEOUT,
            )
            .await?;

        match (payload.store_id, payload.api_secret) {
            (Some(store_id), Some(api_secret)) => Ok(ClaimedStore {
                store_id,
                api_secret,
                wallet_address: payload.wallet_address,
                // Stores created on the dashboard default to a social-login wallet
                wallet_type: payload.wallet_type.unwrap_or(WalletKind::Web3auth),
            }),
            _ => Err(GatewayError::RemoteRejected(
                "claim response did not include store credentials".to_string(),
            )),
        }
    }

    /// Fetch live wallet facts. Any transport failure or malformed payload
    /// surfaces as `RemoteUnavailable`; callers translate that to "unknown".
    pub async fn wallet_status(&self, address: &str) -> Result<WalletStatus, GatewayError> {
        let resp = self
            .http
            .get(self.url(&format!("/wallet/status/{}", address)))
            .timeout(STATUS_TIMEOUT)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(GatewayError::RemoteUnavailable(format!(
                "wallet status returned {}",
                status
            )));
        }

        let envelope: Envelope<WalletStatusPayload> = resp
            .json()
            .await
            .map_err(|e| GatewayError::RemoteUnavailable(format!("malformed response: {}", e)))?;

        if !envelope.success {
            return Err(GatewayError::RemoteRejected(
                envelope.error.unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }

        let p = envelope.payload;
        Ok(WalletStatus {
            funded: p.funded,
            rlusd_trustline: p.rlusd_trustline,
            xrp_balance: p.xrp_balance,
            rlusd_balance: p.rlusd_balance,
        })
    }

    pub async fn register_store(
        &self,
        body: &RegisterStoreBody,
    ) -> Result<ClaimedStore, GatewayError> {
        let payload: ClaimPayload = self.post("/store/register", body, DEFAULT_TIMEOUT).await?;

        match (payload.store_id, payload.api_secret) {
            (Some(store_id), Some(api_secret)) => Ok(ClaimedStore {
                store_id,
                api_secret,
                wallet_address: payload
                    .wallet_address
                    .or_else(|| Some(body.wallet_address.clone())),
                wallet_type: payload.wallet_type.unwrap_or(body.wallet_type),
            }),
            _ => Err(GatewayError::RemoteRejected(
                "registration response did not include store credentials".to_string(),
            )),
        }
    }

    pub async fn validate_promo(
        &self,
        creds: Option<&StoreCredentials>,
        code: &str,
    ) -> Result<PromoInfo, GatewayError> {
        match creds {
            Some(creds) => {
                self.post_scoped("/promo/validate", creds, json!({ "code": code }))
                    .await
            }
            None => {
                self.post("/promo/validate", &json!({ "code": code }), DEFAULT_TIMEOUT)
                    .await
            }
        }
    }

    pub async fn check_connection(
        &self,
        creds: &StoreCredentials,
    ) -> Result<ConnectionInfo, GatewayError> {
        self.post_scoped("/store/check-connection", creds, json!({}))
            .await
    }

    pub async fn delete_store(&self, creds: &StoreCredentials) -> Result<(), GatewayError> {
        let _: Acknowledged = self.post_scoped("/store/delete", creds, json!({})).await?;
        Ok(())
    }

    pub async fn xaman_connect(
        &self,
        creds: &StoreCredentials,
    ) -> Result<XamanHandshake, GatewayError> {
        self.post_scoped("/wallet/xaman/connect", creds, json!({}))
            .await
    }

    pub async fn xaman_poll(
        &self,
        creds: &StoreCredentials,
        connection_id: &str,
    ) -> Result<XamanPollState, GatewayError> {
        self.post_scoped(
            "/wallet/xaman/poll",
            creds,
            json!({ "connection_id": connection_id }),
        )
        .await
    }

    /// Sign-in flow for stores that do not exist yet, so no credentials.
    pub async fn xaman_login(&self) -> Result<XamanHandshake, GatewayError> {
        self.post("/wallet/xaman/login", &json!({}), DEFAULT_TIMEOUT)
            .await
    }

    pub async fn xaman_poll_login(&self, login_id: &str) -> Result<XamanPollState, GatewayError> {
        self.post(
            "/wallet/xaman/poll",
            &json!({ "login_id": login_id }),
            DEFAULT_TIMEOUT,
        )
        .await
    }

    pub async fn xaman_disconnect(&self, creds: &StoreCredentials) -> Result<(), GatewayError> {
        let _: Acknowledged = self
            .post_scoped("/wallet/xaman/disconnect", creds, json!({}))
            .await?;
        Ok(())
    }

    pub async fn save_crossmark_wallet(
        &self,
        creds: &StoreCredentials,
        wallet_address: &str,
    ) -> Result<(), GatewayError> {
        let _: Acknowledged = self
            .post_scoped(
                "/wallet/crossmark",
                creds,
                json!({ "wallet_address": wallet_address }),
            )
            .await?;
        Ok(())
    }

    /// Push payout gating settings to the remote processor, which performs
    /// the actual batching decisions.
    pub async fn save_payout_settings(
        &self,
        creds: &StoreCredentials,
        mode: PayoutMode,
        threshold: u32,
        schedule_days: u32,
    ) -> Result<(), GatewayError> {
        let _: Acknowledged = self
            .post_scoped(
                "/store/payout-settings",
                creds,
                json!({
                    "payout_mode": mode,
                    "payout_threshold": threshold,
                    "payout_schedule": schedule_days,
                }),
            )
            .await?;
        Ok(())
    }

    pub async fn autosign_settings(
        &self,
        creds: &StoreCredentials,
    ) -> Result<SignerInfo, GatewayError> {
        self.post_scoped("/autosign/settings", creds, json!({}))
            .await
    }

    /// Ask the remote to confirm the platform signer appears in the
    /// wallet's on-chain signer list.
    pub async fn verify_signer(
        &self,
        creds: &StoreCredentials,
    ) -> Result<SignerCheck, GatewayError> {
        self.post_scoped("/autosign/verify", creds, json!({})).await
    }

    pub async fn revoke_autosign(
        &self,
        creds: &StoreCredentials,
    ) -> Result<RevokeResult, GatewayError> {
        self.post_scoped("/autosign/revoke", creds, json!({})).await
    }
}

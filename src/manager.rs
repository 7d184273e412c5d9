use crate::config::GatewayConfig;
/// Store Manager - Orchestration Layer
///
/// Coordinates onboarding and payout configuration by delegating to the
/// domain modules and the remote commerce API client.
use crate::error::GatewayError;
use crate::onboarding::autosign::{AutoSignState, DEFAULT_DAILY, DEFAULT_MAX_SINGLE};
use crate::onboarding::payout_mode::{self, ModeOption, PayoutMode, WalletKind};
use crate::onboarding::polling::{poll_until_terminal, PollOutcome, PollPolicy};
use crate::onboarding::rates::{CommissionRateTable, RateUpdate, LEVELS};
use crate::onboarding::wallet_status::{OnboardingStep, WalletProbe};
use crate::onboarding::{batching::PayoutBatchingPolicy, codes};
use crate::remote::{
    CommerceClient, ConnectionInfo, PromoInfo, RegisterStoreBody, XamanHandshake, XamanPollState,
    XamanPollStatus,
};
use crate::storage::{Storage, StoreCredentials, StoreSettings};

/// Literal an operator must type before the store is destroyed remotely.
pub const DELETE_CONFIRMATION: &str = "PERMANENTLY DELETE";

/// Result of a successful claim-token redemption.
#[derive(Debug, Clone)]
pub struct ClaimOutcome {
    pub store_id: String,
    pub wallet_type: WalletKind,
    /// Canonical settings URL with the one-time token stripped
    pub redirect: String,
}

/// Auto-sign configuration as shown to the operator.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AutoSignView {
    pub state: AutoSignState,
    pub terms_accepted: bool,
    pub max_single_payout: f64,
    pub daily_limit: f64,
    pub enabled: bool,
    pub platform_signer_address: Option<String>,
}

pub struct StoreManager {
    pub config: GatewayConfig,
    pub storage: Storage,
    remote: CommerceClient,
}

impl StoreManager {
    // ============================================================================
    // Constructor
    // ============================================================================

    pub fn new() -> Self {
        // Load configuration from environment
        let config = GatewayConfig::from_env();
        let storage = Storage::new_with_base_dir(config.data_dir.clone());
        let remote = CommerceClient::new(&config.api_base_url);

        Self {
            config,
            storage,
            remote,
        }
    }

    /// Create a StoreManager with explicit configuration (for testing)
    pub fn new_with_config(config: GatewayConfig) -> Self {
        let storage = Storage::new_with_base_dir(config.data_dir.clone());
        let remote = CommerceClient::new(&config.api_base_url);

        Self {
            config,
            storage,
            remote,
        }
    }

    fn credentials(&self, settings: &StoreSettings) -> Result<StoreCredentials, GatewayError> {
        settings.credentials().ok_or_else(|| {
            GatewayError::StateViolation("store is not connected".to_string())
        })
    }

    // ============================================================================
    // Store connection
    // ============================================================================

    /// Check a claim token's shape: exactly 32 lowercase hex characters.
    pub fn valid_claim_token(token: &str) -> bool {
        token.len() == 32
            && token
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    /// Redeem a one-time claim token and persist the issued credentials.
    ///
    /// The format check runs before any network traffic, and a store that
    /// already holds credentials never re-claims: tokens are single-use
    /// server-side, so an ambiguous retry could burn one for nothing.
    pub async fn claim_secret(&self, claim_token: &str) -> Result<ClaimOutcome, GatewayError> {
        if !Self::valid_claim_token(claim_token) {
            return Err(GatewayError::InvalidInput(
                "claim token must be 32 hex characters".to_string(),
            ));
        }

        let mut settings = self.storage.load_settings()?;
        if settings.has_credentials() {
            log::info!("Claim skipped - store already connected");
            return Ok(ClaimOutcome {
                store_id: settings.store_id.clone().unwrap_or_default(),
                wallet_type: settings.wallet_type.unwrap_or(WalletKind::Web3auth),
                redirect: self.config.settings_url(),
            });
        }

        let claimed = self.remote.claim_secret(claim_token).await?;
        log::info!("Store claimed successfully - {}", claimed.store_id);

        settings.store_id = Some(claimed.store_id.clone());
        settings.api_secret = Some(claimed.api_secret);
        settings.wallet_address = claimed.wallet_address;
        settings.wallet_type = Some(claimed.wallet_type);
        self.storage.save_settings(&mut settings)?;

        Ok(ClaimOutcome {
            store_id: claimed.store_id,
            wallet_type: claimed.wallet_type,
            redirect: self.config.settings_url(),
        })
    }

    /// Register a store directly from a completed wallet login.
    pub async fn register_store(
        &self,
        wallet_address: String,
        wallet_type: WalletKind,
        xaman_user_token: Option<String>,
        referral_code: Option<String>,
    ) -> Result<ClaimOutcome, GatewayError> {
        let referral_code = match referral_code.filter(|c| !c.trim().is_empty()) {
            Some(code) => Some(codes::normalize(&code)?),
            None => None,
        };

        let body = RegisterStoreBody {
            wallet_address,
            wallet_type,
            xaman_user_token,
            referral_code: referral_code.clone(),
        };
        let registered = self.remote.register_store(&body).await?;
        log::info!("Store registered - {}", registered.store_id);

        let mut settings = self.storage.load_settings()?;
        settings.store_id = Some(registered.store_id.clone());
        settings.api_secret = Some(registered.api_secret);
        settings.wallet_address = registered.wallet_address;
        settings.wallet_type = Some(registered.wallet_type);
        if settings.referral_code.is_none() {
            settings.referral_code = referral_code;
        }
        self.storage.save_settings(&mut settings)?;

        Ok(ClaimOutcome {
            store_id: registered.store_id,
            wallet_type: registered.wallet_type,
            redirect: self.config.settings_url(),
        })
    }

    /// Store-scoped probe against the remote, enriched with the payout-mode
    /// options the connected wallet allows. The API secret never leaves the
    /// settings file.
    pub async fn check_connection(
        &self,
    ) -> Result<(ConnectionInfo, Vec<ModeOption>), GatewayError> {
        let settings = self.storage.load_settings()?;
        let creds = self.credentials(&settings)?;
        let info = self.remote.check_connection(&creds).await?;
        Ok((info, payout_mode::mode_options(settings.wallet_type)))
    }

    /// Drop local credentials. Idempotent; the remote store is untouched
    /// and can be reconnected later.
    pub fn disconnect(&self) -> Result<(), GatewayError> {
        let mut settings = self.storage.load_settings()?;
        if !settings.has_credentials() {
            return Ok(());
        }
        settings.clear_credentials();
        self.storage.save_settings(&mut settings)?;
        log::info!("Store disconnected (local credentials cleared)");
        Ok(())
    }

    /// Irreversibly delete the store remotely and reset local settings.
    /// Requires the exact confirmation phrase.
    pub async fn delete_store_permanently(&self, confirmation: &str) -> Result<(), GatewayError> {
        if confirmation != DELETE_CONFIRMATION {
            return Err(GatewayError::InvalidInput(format!(
                "type \"{}\" to confirm deletion",
                DELETE_CONFIRMATION
            )));
        }

        let settings = self.storage.load_settings()?;
        let creds = self.credentials(&settings)?;
        self.remote.delete_store(&creds).await?;
        self.storage.reset()?;
        log::warn!("Store permanently deleted");
        Ok(())
    }

    // ============================================================================
    // Wallet status
    // ============================================================================

    /// Probe the connected wallet. Remote trouble yields `Unavailable`,
    /// which is "unknown" - never "not ready".
    pub async fn wallet_status(&self) -> Result<(WalletProbe, Option<OnboardingStep>), GatewayError> {
        let settings = self.storage.load_settings()?;
        let address = settings.wallet_address.ok_or_else(|| {
            GatewayError::StateViolation("no wallet connected".to_string())
        })?;

        match self.remote.wallet_status(&address).await {
            Ok(status) => {
                let step = status.onboarding_step();
                Ok((WalletProbe::Known(status), Some(step)))
            }
            Err(GatewayError::RemoteUnavailable(detail)) => {
                log::warn!("Wallet status unavailable: {}", detail);
                Ok((WalletProbe::Unavailable, None))
            }
            Err(other) => Err(other),
        }
    }

    // ============================================================================
    // Wallet connect flows
    // ============================================================================

    pub async fn xaman_connect(&self) -> Result<XamanHandshake, GatewayError> {
        let settings = self.storage.load_settings()?;
        let creds = self.credentials(&settings)?;
        self.remote.xaman_connect(&creds).await
    }

    /// Single-shot poll proxy; the caller owns the loop and its ceiling.
    pub async fn xaman_poll(&self, connection_id: &str) -> Result<XamanPollState, GatewayError> {
        let settings = self.storage.load_settings()?;
        let creds = self.credentials(&settings)?;
        let state = self.remote.xaman_poll(&creds, connection_id).await?;
        if state.status == XamanPollStatus::Connected {
            self.adopt_wallet(state.wallet_address.clone(), WalletKind::Xaman)?;
        }
        Ok(state)
    }

    /// Block until the connect handshake resolves, with the standard
    /// interval and attempt ceiling. `None` means the wait timed out.
    pub async fn xaman_wait_connected(
        &self,
        connection_id: &str,
    ) -> Result<Option<XamanPollState>, GatewayError> {
        let settings = self.storage.load_settings()?;
        let creds = self.credentials(&settings)?;

        let outcome = poll_until_terminal(&PollPolicy::connect(), || {
            let poll = self.remote.xaman_poll(&creds, connection_id);
            async move {
                let state = poll.await?;
                Ok(state.status.is_terminal().then_some(state))
            }
        })
        .await?;

        match outcome {
            PollOutcome::Terminal(state) => {
                if state.status == XamanPollStatus::Connected {
                    self.adopt_wallet(state.wallet_address.clone(), WalletKind::Xaman)?;
                }
                Ok(Some(state))
            }
            PollOutcome::TimedOut => Ok(None),
        }
    }

    pub async fn xaman_login(&self) -> Result<XamanHandshake, GatewayError> {
        self.remote.xaman_login().await
    }

    pub async fn xaman_poll_login(&self, login_id: &str) -> Result<XamanPollState, GatewayError> {
        self.remote.xaman_poll_login(login_id).await
    }

    /// Block until the sign-in handshake resolves and, on success, register
    /// the store with the signed-in wallet.
    pub async fn xaman_wait_login(
        &self,
        login_id: &str,
        referral_code: Option<String>,
    ) -> Result<Option<ClaimOutcome>, GatewayError> {
        let outcome = poll_until_terminal(&PollPolicy::login(), || {
            let poll = self.remote.xaman_poll_login(login_id);
            async move {
                let state = poll.await?;
                Ok(state.status.is_terminal().then_some(state))
            }
        })
        .await?;

        match outcome {
            PollOutcome::Terminal(state) if state.status == XamanPollStatus::Connected => {
                let wallet_address = state.wallet_address.ok_or_else(|| {
                    GatewayError::RemoteRejected(
                        "login completed without a wallet address".to_string(),
                    )
                })?;
                let claim = self
                    .register_store(
                        wallet_address,
                        WalletKind::Xaman,
                        state.xaman_user_token,
                        referral_code,
                    )
                    .await?;
                Ok(Some(claim))
            }
            PollOutcome::Terminal(state) => Err(GatewayError::RemoteRejected(format!(
                "sign-in request {}",
                match state.status {
                    XamanPollStatus::Expired => "expired",
                    XamanPollStatus::Cancelled => "was cancelled",
                    _ => "failed",
                }
            ))),
            PollOutcome::TimedOut => Ok(None),
        }
    }

    /// Record a Crossmark wallet against the connected store.
    pub async fn save_crossmark_wallet(&self, wallet_address: String) -> Result<(), GatewayError> {
        let settings = self.storage.load_settings()?;
        let creds = self.credentials(&settings)?;
        self.remote
            .save_crossmark_wallet(&creds, &wallet_address)
            .await?;
        self.adopt_wallet(Some(wallet_address), WalletKind::Crossmark)
    }

    /// Forget the wallet locally and tell the remote store.
    pub async fn disconnect_wallet(&self) -> Result<(), GatewayError> {
        let mut settings = self.storage.load_settings()?;
        let creds = self.credentials(&settings)?;
        self.remote.xaman_disconnect(&creds).await?;
        settings.clear_wallet();
        self.storage.save_settings(&mut settings)?;
        log::info!("Wallet disconnected");
        Ok(())
    }

    fn adopt_wallet(
        &self,
        wallet_address: Option<String>,
        kind: WalletKind,
    ) -> Result<(), GatewayError> {
        let mut settings = self.storage.load_settings()?;
        if let Some(address) = wallet_address {
            settings.wallet_address = Some(address);
        }
        settings.wallet_type = Some(kind);
        self.storage.save_settings(&mut settings)?;
        Ok(())
    }

    // ============================================================================
    // Promo / referral codes
    // ============================================================================

    /// Validate a code against the remote registry. Format errors never
    /// reach the network.
    pub async fn validate_promo(&self, code: &str) -> Result<PromoInfo, GatewayError> {
        let code = codes::normalize(code)?;
        let settings = self.storage.load_settings()?;
        self.remote
            .validate_promo(settings.credentials().as_ref(), &code)
            .await
    }

    /// Apply a referral code to this store. One-time: a second application
    /// is rejected rather than overwriting the first.
    pub async fn apply_referral(&self, code: &str) -> Result<PromoInfo, GatewayError> {
        let code = codes::normalize(code)?;
        let mut settings = self.storage.load_settings()?;
        if settings.referral_code.is_some() {
            return Err(GatewayError::StateViolation(
                "a promotional code was already applied to this store".to_string(),
            ));
        }

        let info = self
            .remote
            .validate_promo(settings.credentials().as_ref(), &code)
            .await?;

        settings.referral_code = Some(code);
        self.storage.save_settings(&mut settings)?;
        Ok(info)
    }

    // ============================================================================
    // Payout configuration
    // ============================================================================

    /// Switch payout mode, validated against the connected wallet's
    /// capabilities - never coerced.
    pub async fn set_payout_mode(&self, requested: PayoutMode) -> Result<PayoutMode, GatewayError> {
        let mut settings = self.storage.load_settings()?;
        let creds = self.credentials(&settings)?;
        let mode = payout_mode::select_mode(settings.wallet_type, requested)?;

        self.remote
            .save_payout_settings(
                &creds,
                mode,
                settings.payout_threshold,
                settings.payout_schedule,
            )
            .await?;

        settings.payout_mode = mode;
        self.storage.save_settings(&mut settings)?;
        log::info!("Payout mode set to {}", mode);
        Ok(mode)
    }

    pub fn mode_options(&self) -> Result<Vec<ModeOption>, GatewayError> {
        let settings = self.storage.load_settings()?;
        Ok(payout_mode::mode_options(settings.wallet_type))
    }

    pub async fn set_batching(
        &self,
        threshold: u32,
        schedule_days: u32,
    ) -> Result<PayoutBatchingPolicy, GatewayError> {
        let policy = PayoutBatchingPolicy::new(threshold, schedule_days)?;

        let mut settings = self.storage.load_settings()?;
        let creds = self.credentials(&settings)?;
        self.remote
            .save_payout_settings(&creds, settings.payout_mode, policy.threshold, policy.schedule_days)
            .await?;

        settings.payout_threshold = policy.threshold;
        settings.payout_schedule = policy.schedule_days;
        self.storage.save_settings(&mut settings)?;
        Ok(policy)
    }

    pub fn set_rates(&self, levels: [f64; LEVELS]) -> Result<RateUpdate, GatewayError> {
        let mut settings = self.storage.load_settings()?;
        let update = settings.commission_rates.apply(levels);
        self.storage.save_settings(&mut settings)?;
        if update.warning {
            log::warn!(
                "Commission rates total {:.1}% - above the advisory 50% mark",
                update.total
            );
        }
        Ok(update)
    }

    pub fn rates(&self) -> Result<CommissionRateTable, GatewayError> {
        Ok(self.storage.load_settings()?.commission_rates)
    }

    pub fn set_cookie_days(&self, days: u32) -> Result<u32, GatewayError> {
        if !(1..=365).contains(&days) {
            return Err(GatewayError::OutOfRange(
                "cookie duration must be between 1 and 365 days".to_string(),
            ));
        }
        let mut settings = self.storage.load_settings()?;
        settings.cookie_days = days;
        self.storage.save_settings(&mut settings)?;
        Ok(days)
    }

    // ============================================================================
    // Auto-sign policy
    // ============================================================================

    /// Current auto-sign configuration plus the platform signer address the
    /// operator must add to their wallet. The signer address lives remotely;
    /// if that lookup fails we still return the local state.
    pub async fn autosign_settings(&self) -> Result<AutoSignView, GatewayError> {
        let settings = self.storage.load_settings()?;
        let creds = self.credentials(&settings)?;

        let platform_signer_address = match self.remote.autosign_settings(&creds).await {
            Ok(info) => info.platform_signer_address,
            Err(GatewayError::RemoteUnavailable(detail)) => {
                log::warn!("Platform signer lookup unavailable: {}", detail);
                None
            }
            Err(other) => return Err(other),
        };

        let policy = settings.auto_sign;
        Ok(AutoSignView {
            state: policy.state(),
            terms_accepted: policy.terms_accepted,
            max_single_payout: policy.max_single_payout.unwrap_or(DEFAULT_MAX_SINGLE),
            daily_limit: policy.daily_limit.unwrap_or(DEFAULT_DAILY),
            enabled: policy.enabled,
            platform_signer_address,
        })
    }

    pub fn accept_autosign_terms(&self, consent: bool) -> Result<AutoSignState, GatewayError> {
        let mut settings = self.storage.load_settings()?;
        settings.auto_sign.accept_terms(consent)?;
        self.storage.save_settings(&mut settings)?;
        Ok(settings.auto_sign.state())
    }

    pub fn set_autosign_limits(
        &self,
        max_single: f64,
        daily: f64,
    ) -> Result<AutoSignState, GatewayError> {
        let mut settings = self.storage.load_settings()?;
        settings.auto_sign.set_limits(max_single, daily)?;
        self.storage.save_settings(&mut settings)?;
        Ok(settings.auto_sign.state())
    }

    /// Confirm the platform signer on-chain and enable auto-signing.
    ///
    /// A remote rejection (signer not in the list yet) leaves the policy at
    /// LimitsSet so the operator can add the signer and retry.
    pub async fn verify_autosign(&self) -> Result<(AutoSignState, Option<String>), GatewayError> {
        let mut settings = self.storage.load_settings()?;
        let creds = self.credentials(&settings)?;

        match settings.auto_sign.state() {
            AutoSignState::LimitsSet => {}
            AutoSignState::Enabled => {
                return Err(GatewayError::StateViolation(
                    "auto-signing is already enabled".to_string(),
                ))
            }
            _ => {
                return Err(GatewayError::StateViolation(
                    "save payout limits before verifying the signer".to_string(),
                ))
            }
        }

        let check = self.remote.verify_signer(&creds).await?;
        if !check.auto_signing_enabled {
            return Err(GatewayError::RemoteRejected(check.message.unwrap_or_else(
                || {
                    "Verification failed. Make sure the platform signer was added to your wallet."
                        .to_string()
                },
            )));
        }

        settings.auto_sign.mark_signer_verified()?;
        self.storage.save_settings(&mut settings)?;
        log::info!("Auto-signing enabled");
        Ok((settings.auto_sign.state(), check.message))
    }

    /// Disable auto-signing remotely and locally. Terms and limits stay.
    pub async fn revoke_autosign(&self) -> Result<(AutoSignState, Option<String>), GatewayError> {
        let mut settings = self.storage.load_settings()?;
        let creds = self.credentials(&settings)?;

        if settings.auto_sign.state() != AutoSignState::Enabled {
            return Err(GatewayError::StateViolation(
                "auto-signing is not enabled".to_string(),
            ));
        }

        let result = self.remote.revoke_autosign(&creds).await?;
        settings.auto_sign.revoke()?;
        self.storage.save_settings(&mut settings)?;
        log::info!("Auto-signing revoked");
        Ok((settings.auto_sign.state(), result.message))
    }
}

impl Default for StoreManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_token_format() {
        assert!(StoreManager::valid_claim_token(
            "a1b2c3d4e5f6a1b2c3d4e5f6a1b2c3d4"
        ));
        // Too short
        assert!(!StoreManager::valid_claim_token("a1b2c3"));
        // Uppercase hex is not accepted
        assert!(!StoreManager::valid_claim_token(
            "A1B2C3D4E5F6A1B2C3D4E5F6A1B2C3D4"
        ));
        // Non-hex characters
        assert!(!StoreManager::valid_claim_token(
            "g1b2c3d4e5f6a1b2c3d4e5f6a1b2c3d4"
        ));
        // 33 chars
        assert!(!StoreManager::valid_claim_token(
            "a1b2c3d4e5f6a1b2c3d4e5f6a1b2c3d4a"
        ));
    }
}

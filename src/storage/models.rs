//! Data models for persisted store settings

use crate::onboarding::autosign::AutoSignPolicy;
use crate::onboarding::payout_mode::{PayoutMode, WalletKind};
use crate::onboarding::rates::CommissionRateTable;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything the gateway persists for a connected store. Unknown fields
/// default so settings written by older builds keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub store_id: Option<String>,
    /// Write-only: persisted here, never included in any response payload
    #[serde(default)]
    pub api_secret: Option<String>,
    #[serde(default)]
    pub wallet_address: Option<String>,
    #[serde(default)]
    pub wallet_type: Option<WalletKind>,
    /// Set at most once; applying a second code is rejected
    #[serde(default)]
    pub referral_code: Option<String>,
    #[serde(default)]
    pub commission_rates: CommissionRateTable,
    #[serde(default = "default_payout_mode")]
    pub payout_mode: PayoutMode,
    #[serde(default)]
    pub payout_threshold: u32,
    #[serde(default)]
    pub payout_schedule: u32,
    #[serde(default = "default_cookie_days")]
    pub cookie_days: u32,
    #[serde(flatten)]
    pub auto_sign: AutoSignPolicy,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

fn default_payout_mode() -> PayoutMode {
    PayoutMode::Manual
}

fn default_cookie_days() -> u32 {
    30
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            store_id: None,
            api_secret: None,
            wallet_address: None,
            wallet_type: None,
            referral_code: None,
            commission_rates: CommissionRateTable::default(),
            payout_mode: PayoutMode::Manual,
            payout_threshold: 0,
            payout_schedule: 0,
            cookie_days: 30,
            auto_sign: AutoSignPolicy::default(),
            updated_at: Utc::now(),
        }
    }
}

impl StoreSettings {
    pub fn has_credentials(&self) -> bool {
        self.store_id.is_some() && self.api_secret.is_some()
    }

    /// Store-scoped remote calls need both halves of the credential pair.
    pub fn credentials(&self) -> Option<StoreCredentials> {
        match (&self.store_id, &self.api_secret) {
            (Some(store_id), Some(api_secret)) => Some(StoreCredentials {
                store_id: store_id.clone(),
                api_secret: api_secret.clone(),
            }),
            _ => None,
        }
    }

    /// Disconnect: drop local credentials only. The remote store keeps
    /// existing and can be reconnected later.
    pub fn clear_credentials(&mut self) {
        self.store_id = None;
        self.api_secret = None;
    }

    /// Forget the connected wallet (address + type).
    pub fn clear_wallet(&mut self) {
        self.wallet_address = None;
        self.wallet_type = None;
    }
}

/// The store identity pair sent with store-scoped remote calls.
#[derive(Debug, Clone, Serialize)]
pub struct StoreCredentials {
    pub store_id: String,
    pub api_secret: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = StoreSettings::default();
        assert!(!settings.has_credentials());
        assert_eq!(settings.payout_mode, PayoutMode::Manual);
        assert_eq!(settings.cookie_days, 30);
        assert_eq!(settings.payout_threshold, 0);
        assert_eq!(settings.commission_rates.total(), 36.0);
    }

    #[test]
    fn test_flattened_auto_sign_keys() {
        let settings = StoreSettings::default();
        let json = serde_json::to_value(&settings).unwrap();
        // Auto-sign fields persist flat, under their settings-key names
        assert!(json.get("auto_sign_terms_accepted").is_some());
        assert!(json.get("auto_signing_enabled").is_some());
        assert!(json.get("auto_sign").is_none());
    }

    #[test]
    fn test_loads_from_sparse_json() {
        // A settings file from before auto-signing existed
        let settings: StoreSettings =
            serde_json::from_str(r#"{"store_id":"S1","api_secret":"sek"}"#).unwrap();
        assert!(settings.has_credentials());
        assert!(!settings.auto_sign.terms_accepted);
        assert_eq!(settings.cookie_days, 30);
    }

    #[test]
    fn test_clear_credentials_keeps_wallet() {
        let mut settings = StoreSettings {
            store_id: Some("S1".to_string()),
            api_secret: Some("sek".to_string()),
            wallet_address: Some("rAbc".to_string()),
            wallet_type: Some(WalletKind::Xaman),
            ..Default::default()
        };
        settings.clear_credentials();
        assert!(!settings.has_credentials());
        assert_eq!(settings.wallet_address.as_deref(), Some("rAbc"));
    }
}

//! Auto-sign policy state machine
//!
//! Setup progresses strictly forward: terms first, then limits, then the
//! on-chain signer verification that actually enables auto-signing. The
//! limits themselves are only configuration; enforcement against real payout
//! amounts happens in the remote payout processor.

use crate::error::GatewayError;
use serde::{Deserialize, Serialize};

pub const MAX_SINGLE_MIN: f64 = 1.0;
pub const MAX_SINGLE_MAX: f64 = 10_000.0;
pub const DAILY_MIN: f64 = 10.0;
pub const DAILY_MAX: f64 = 50_000.0;

/// Slider positions shown before the operator saves anything.
pub const DEFAULT_MAX_SINGLE: f64 = 100.0;
pub const DEFAULT_DAILY: f64 = 1_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoSignState {
    NotConfigured,
    TermsAccepted,
    LimitsSet,
    Enabled,
}

/// Persisted auto-sign configuration. Field names match the stored
/// settings keys exactly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct AutoSignPolicy {
    #[serde(rename = "auto_sign_terms_accepted", default)]
    pub terms_accepted: bool,
    #[serde(rename = "auto_sign_max_single_payout", default)]
    pub max_single_payout: Option<f64>,
    #[serde(rename = "auto_sign_daily_limit", default)]
    pub daily_limit: Option<f64>,
    #[serde(rename = "auto_signing_enabled", default)]
    pub enabled: bool,
}

impl AutoSignPolicy {
    pub fn state(&self) -> AutoSignState {
        if self.enabled {
            AutoSignState::Enabled
        } else if self.max_single_payout.is_some() && self.daily_limit.is_some() {
            AutoSignState::LimitsSet
        } else if self.terms_accepted {
            AutoSignState::TermsAccepted
        } else {
            AutoSignState::NotConfigured
        }
    }

    /// Record the operator's consent. The consent flag must be explicit -
    /// a request without it is rejected, not defaulted.
    pub fn accept_terms(&mut self, consent: bool) -> Result<(), GatewayError> {
        if !consent {
            return Err(GatewayError::InvalidInput(
                "the auto-signing terms must be explicitly accepted".to_string(),
            ));
        }
        self.terms_accepted = true;
        Ok(())
    }

    /// Save payout limits. Requires accepted terms; legal again later to
    /// adjust limits, including while enabled (edited limits take effect
    /// immediately, without re-verifying the signer).
    pub fn set_limits(&mut self, max_single: f64, daily: f64) -> Result<(), GatewayError> {
        if self.state() == AutoSignState::NotConfigured {
            return Err(GatewayError::StateViolation(
                "accept the auto-signing terms before configuring limits".to_string(),
            ));
        }
        if !(MAX_SINGLE_MIN..=MAX_SINGLE_MAX).contains(&max_single) {
            return Err(GatewayError::OutOfRange(format!(
                "max single payout must be between ${} and ${}",
                MAX_SINGLE_MIN, MAX_SINGLE_MAX
            )));
        }
        if !(DAILY_MIN..=DAILY_MAX).contains(&daily) {
            return Err(GatewayError::OutOfRange(format!(
                "daily limit must be between ${} and ${}",
                DAILY_MIN, DAILY_MAX
            )));
        }
        self.max_single_payout = Some(max_single);
        self.daily_limit = Some(daily);
        Ok(())
    }

    /// Flip to enabled after the platform signer was confirmed on-chain.
    /// Only legal with limits saved; a verification failure leaves the
    /// policy untouched so the operator can retry.
    pub fn mark_signer_verified(&mut self) -> Result<(), GatewayError> {
        match self.state() {
            AutoSignState::LimitsSet => {
                self.enabled = true;
                Ok(())
            }
            AutoSignState::Enabled => Err(GatewayError::StateViolation(
                "auto-signing is already enabled".to_string(),
            )),
            _ => Err(GatewayError::StateViolation(
                "save payout limits before verifying the signer".to_string(),
            )),
        }
    }

    /// Disable auto-signing. Terms and limits are retained, so re-enabling
    /// only needs a fresh signer verification.
    pub fn revoke(&mut self) -> Result<(), GatewayError> {
        if self.state() != AutoSignState::Enabled {
            return Err(GatewayError::StateViolation(
                "auto-signing is not enabled".to_string(),
            ));
        }
        self.enabled = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> AutoSignPolicy {
        let mut policy = AutoSignPolicy::default();
        policy.accept_terms(true).unwrap();
        policy.set_limits(100.0, 1_000.0).unwrap();
        policy
    }

    #[test]
    fn test_starts_not_configured() {
        assert_eq!(AutoSignPolicy::default().state(), AutoSignState::NotConfigured);
    }

    #[test]
    fn test_terms_require_explicit_consent() {
        let mut policy = AutoSignPolicy::default();
        assert!(policy.accept_terms(false).is_err());
        assert_eq!(policy.state(), AutoSignState::NotConfigured);

        policy.accept_terms(true).unwrap();
        assert_eq!(policy.state(), AutoSignState::TermsAccepted);
    }

    #[test]
    fn test_limits_before_terms_is_a_state_violation() {
        let mut policy = AutoSignPolicy::default();
        let err = policy.set_limits(100.0, 1_000.0).unwrap_err();
        assert!(matches!(err, GatewayError::StateViolation(_)));
    }

    #[test]
    fn test_limits_out_of_range() {
        let mut policy = AutoSignPolicy::default();
        policy.accept_terms(true).unwrap();

        // max single above $10,000
        assert!(matches!(
            policy.set_limits(100_000.0, 1_000.0),
            Err(GatewayError::OutOfRange(_))
        ));
        // daily below $10
        assert!(matches!(
            policy.set_limits(100.0, 5.0),
            Err(GatewayError::OutOfRange(_))
        ));
        // nothing was stored
        assert_eq!(policy.state(), AutoSignState::TermsAccepted);

        // boundaries are inclusive
        policy.set_limits(1.0, 10.0).unwrap();
        policy.set_limits(10_000.0, 50_000.0).unwrap();
    }

    #[test]
    fn test_verify_requires_limits() {
        let mut policy = AutoSignPolicy::default();
        policy.accept_terms(true).unwrap();
        assert!(policy.mark_signer_verified().is_err());
    }

    #[test]
    fn test_full_progression() {
        let mut policy = configured();
        assert_eq!(policy.state(), AutoSignState::LimitsSet);

        policy.mark_signer_verified().unwrap();
        assert_eq!(policy.state(), AutoSignState::Enabled);
    }

    #[test]
    fn test_revoke_only_from_enabled() {
        let mut policy = configured();
        assert!(policy.revoke().is_err());

        policy.mark_signer_verified().unwrap();
        policy.revoke().unwrap();

        // Back to LimitsSet with terms and limits retained
        assert_eq!(policy.state(), AutoSignState::LimitsSet);
        assert!(policy.terms_accepted);
        assert_eq!(policy.max_single_payout, Some(100.0));

        // A second revoke is a violation, not a no-op
        assert!(policy.revoke().is_err());
    }

    #[test]
    fn test_edit_limits_while_enabled_keeps_enabled() {
        let mut policy = configured();
        policy.mark_signer_verified().unwrap();

        policy.set_limits(250.0, 2_500.0).unwrap();
        assert_eq!(policy.state(), AutoSignState::Enabled);
        assert_eq!(policy.max_single_payout, Some(250.0));
    }

    #[test]
    fn test_verify_twice_is_a_violation() {
        let mut policy = configured();
        policy.mark_signer_verified().unwrap();
        assert!(policy.mark_signer_verified().is_err());
    }

    #[test]
    fn test_settings_keys_round_trip() {
        let policy = configured();
        let json = serde_json::to_value(policy).unwrap();
        assert_eq!(json["auto_sign_terms_accepted"], true);
        assert_eq!(json["auto_sign_max_single_payout"], 100.0);
        assert_eq!(json["auto_sign_daily_limit"], 1000.0);
        assert_eq!(json["auto_signing_enabled"], false);

        let back: AutoSignPolicy = serde_json::from_value(json).unwrap();
        assert_eq!(back, policy);
    }
}

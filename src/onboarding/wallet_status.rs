use serde::{Deserialize, Serialize};

/// Live facts about an XRPL wallet, fetched from the remote API on demand.
/// Never cached: a stale "funded" answer is worse than a slow one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WalletStatus {
    pub funded: bool,
    pub rlusd_trustline: bool,
    pub xrp_balance: f64,
    pub rlusd_balance: f64,
}

impl WalletStatus {
    /// A wallet can receive commission payouts once it is funded and the
    /// RLUSD trustline is set.
    pub fn ready(&self) -> bool {
        self.funded && self.rlusd_trustline
    }

    /// Which onboarding step to surface next.
    ///
    /// Funding always comes first: a trustline cannot be set on an
    /// unactivated account, so the step order is fixed even when both
    /// are missing.
    pub fn onboarding_step(&self) -> OnboardingStep {
        if !self.funded {
            OnboardingStep::FundWallet
        } else if !self.rlusd_trustline {
            OnboardingStep::EnableRlusd
        } else {
            OnboardingStep::Ready
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    FundWallet,
    EnableRlusd,
    Ready,
}

impl OnboardingStep {
    pub fn label(&self) -> &'static str {
        match self {
            OnboardingStep::FundWallet => "Fund Wallet",
            OnboardingStep::EnableRlusd => "Enable RLUSD",
            OnboardingStep::Ready => "Ready",
        }
    }
}

/// Result of probing a wallet. `Unavailable` means the remote API could not
/// answer - callers must treat that as "unknown", never as "not ready".
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WalletProbe {
    Known(WalletStatus),
    Unavailable,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(funded: bool, trustline: bool) -> WalletStatus {
        WalletStatus {
            funded,
            rlusd_trustline: trustline,
            xrp_balance: if funded { 12.0 } else { 0.0 },
            rlusd_balance: 0.0,
        }
    }

    #[test]
    fn test_funding_takes_priority_over_trustline() {
        // Trustline present but unfunded still asks for funding first
        let s = status(false, true);
        assert_eq!(s.onboarding_step(), OnboardingStep::FundWallet);
        assert!(!s.ready());
    }

    #[test]
    fn test_step_order() {
        assert_eq!(status(false, false).onboarding_step(), OnboardingStep::FundWallet);
        assert_eq!(status(true, false).onboarding_step(), OnboardingStep::EnableRlusd);
        assert_eq!(status(true, true).onboarding_step(), OnboardingStep::Ready);
    }

    #[test]
    fn test_ready_requires_both() {
        assert!(status(true, true).ready());
        assert!(!status(true, false).ready());
        assert!(!status(false, true).ready());
    }

    #[test]
    fn test_step_labels() {
        assert_eq!(OnboardingStep::FundWallet.label(), "Fund Wallet");
        assert_eq!(OnboardingStep::EnableRlusd.label(), "Enable RLUSD");
    }
}

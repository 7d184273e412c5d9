use crate::error::GatewayError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How affiliate payouts get signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayoutMode {
    /// Operator approves every payout (push notification or extension popup)
    Manual,
    /// Platform signer executes payouts within configured limits
    Auto,
}

impl fmt::Display for PayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayoutMode::Manual => write!(f, "manual"),
            PayoutMode::Auto => write!(f, "auto"),
        }
    }
}

/// Connected wallet flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletKind {
    /// Mobile app, approves transactions via push notification
    Xaman,
    /// Social-login wallet, managed entirely on the remote dashboard
    Web3auth,
    /// Browser extension, supports delegated signing
    Crossmark,
}

impl fmt::Display for WalletKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletKind::Xaman => write!(f, "Xaman"),
            WalletKind::Web3auth => write!(f, "Web3Auth"),
            WalletKind::Crossmark => write!(f, "Crossmark"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SigningCapability {
    /// Out-of-band approval on the operator's phone
    PushSigning,
    /// In-browser approval through an extension popup
    BrowserSigning,
    /// A platform-controlled co-signer may execute payouts unattended
    DelegatedSigning,
}

impl WalletKind {
    /// Explicit capability set per wallet type. Web3Auth wallets sign on the
    /// remote dashboard only, so they carry no local capability.
    pub fn capabilities(self) -> &'static [SigningCapability] {
        match self {
            WalletKind::Xaman => &[SigningCapability::PushSigning],
            WalletKind::Crossmark => &[
                SigningCapability::BrowserSigning,
                SigningCapability::DelegatedSigning,
            ],
            WalletKind::Web3auth => &[],
        }
    }

    pub fn supports(self, mode: PayoutMode) -> bool {
        let caps = self.capabilities();
        match mode {
            PayoutMode::Auto => caps.contains(&SigningCapability::DelegatedSigning),
            PayoutMode::Manual => {
                caps.contains(&SigningCapability::PushSigning)
                    || caps.contains(&SigningCapability::BrowserSigning)
            }
        }
    }
}

/// One selectable payout mode as presented to the operator. Unsupported
/// modes stay visible but disabled, with the reason in the label.
#[derive(Debug, Clone, Serialize)]
pub struct ModeOption {
    pub mode: PayoutMode,
    pub available: bool,
    pub label: String,
}

pub fn mode_options(wallet: Option<WalletKind>) -> Vec<ModeOption> {
    [PayoutMode::Manual, PayoutMode::Auto]
        .into_iter()
        .map(|mode| {
            let (available, label) = match wallet {
                None => (false, format!("{} - Connect a wallet first", title(mode))),
                Some(WalletKind::Web3auth) => (
                    false,
                    format!("{} - Managed on the YesAllofUs dashboard", title(mode)),
                ),
                Some(kind) if kind.supports(mode) => (true, describe(mode).to_string()),
                Some(kind) => (
                    false,
                    format!("{} - Not available with a {} wallet", title(mode), kind),
                ),
            };
            ModeOption {
                mode,
                available,
                label,
            }
        })
        .collect()
}

/// Validate a requested payout mode against the connected wallet.
///
/// Never coerces: an unsupported request is an error, not a fallback to
/// the other mode.
pub fn select_mode(
    wallet: Option<WalletKind>,
    requested: PayoutMode,
) -> Result<PayoutMode, GatewayError> {
    match wallet {
        None => Err(GatewayError::StateViolation(
            "connect a wallet before choosing a payout mode".to_string(),
        )),
        Some(kind) if kind.supports(requested) => Ok(requested),
        Some(kind) => Err(GatewayError::StateViolation(format!(
            "{} payouts are not available with a {} wallet",
            requested, kind
        ))),
    }
}

fn title(mode: PayoutMode) -> &'static str {
    match mode {
        PayoutMode::Manual => "Manual",
        PayoutMode::Auto => "Auto",
    }
}

fn describe(mode: PayoutMode) -> &'static str {
    match mode {
        PayoutMode::Manual => "Manual - Sign each payout yourself",
        PayoutMode::Auto => "Auto - Payouts sign automatically within your limits",
    }
}

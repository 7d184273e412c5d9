//! Wallet onboarding and payout configuration domain
//!
//! - Wallet status evaluation and onboarding steps
//! - Payout mode selection against wallet capabilities
//! - Auto-sign policy state machine
//! - Commission rate and payout batching validation
//! - Promo/referral code normalization
//! - Bounded polling for wallet handshakes

pub mod autosign;
pub mod batching;
pub mod codes;
pub mod payout_mode;
pub mod polling;
pub mod rates;
pub mod wallet_status;

pub use autosign::{AutoSignPolicy, AutoSignState};
pub use batching::PayoutBatchingPolicy;
pub use payout_mode::{ModeOption, PayoutMode, SigningCapability, WalletKind};
pub use polling::{poll_until_terminal, PollOutcome, PollPolicy};
pub use rates::{CommissionRateTable, RateRejection, RateUpdate};
pub use wallet_status::{OnboardingStep, WalletProbe, WalletStatus};

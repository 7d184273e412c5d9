//! Remote commerce API client
//!
//! Everything substantive (payout execution, ledger signing, affiliate-tree
//! accounting) lives behind this boundary; the gateway only speaks its HTTP
//! contracts.

mod client;
mod types;

pub use client::CommerceClient;
pub use types::{
    ClaimedStore, ConnectionInfo, PromoInfo, RegisterStoreBody, RevokeResult, SignerCheck,
    SignerInfo, XamanHandshake, XamanPollState, XamanPollStatus,
};

//! Payout batching settings
//!
//! Batching reduces transaction fees and approval requests: commissions
//! accumulate until a minimum amount is reached and/or a schedule elapses.

use crate::error::GatewayError;
use serde::{Deserialize, Serialize};

/// Selectable minimum payout amounts (USD). 0 pays instantly.
pub const THRESHOLDS: [u32; 6] = [0, 5, 10, 25, 50, 100];

/// Selectable batching schedules (days). 0 pays after each order.
pub const SCHEDULES: [u32; 6] = [0, 1, 3, 7, 14, 30];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PayoutBatchingPolicy {
    pub threshold: u32,
    pub schedule_days: u32,
}

impl PayoutBatchingPolicy {
    /// Both axes are picked independently from fixed menus; there is no
    /// cross-validation (a $5 minimum with a 30-day schedule is legal).
    pub fn new(threshold: u32, schedule_days: u32) -> Result<Self, GatewayError> {
        if !THRESHOLDS.contains(&threshold) {
            return Err(GatewayError::OutOfRange(format!(
                "payout threshold must be one of {:?}",
                THRESHOLDS
            )));
        }
        if !SCHEDULES.contains(&schedule_days) {
            return Err(GatewayError::OutOfRange(format!(
                "payout schedule must be one of {:?} days",
                SCHEDULES
            )));
        }
        Ok(Self {
            threshold,
            schedule_days,
        })
    }

    /// Whether a payout is release-eligible: the accrued amount has reached
    /// the threshold AND the schedule has elapsed, where 0 disables an axis.
    ///
    /// The remote payout processor makes the actual gating decision; this
    /// mirrors the contract it is expected to honor and is tested as a
    /// documented assumption.
    pub fn release_due(&self, accrued: f64, days_since_last_payout: u32) -> bool {
        let amount_ok = self.threshold == 0 || accrued >= self.threshold as f64;
        let time_ok = self.schedule_days == 0 || days_since_last_payout >= self.schedule_days;
        amount_ok && time_ok
    }
}

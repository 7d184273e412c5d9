//! Commission rate table for the 5-level referral program

use serde::{Deserialize, Serialize};

pub const LEVELS: usize = 5;
pub const RATE_MIN: f64 = 0.0;
pub const RATE_MAX: f64 = 50.0;
pub const RATE_STEP: f64 = 0.5;

/// Totals above this raise a warning but are still saved.
pub const WARN_TOTAL: f64 = 50.0;

/// Percentage of the platform fee paid per referral level, level 1 first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommissionRateTable([f64; LEVELS]);

impl Default for CommissionRateTable {
    fn default() -> Self {
        CommissionRateTable([25.0, 5.0, 3.0, 2.0, 1.0])
    }
}

/// One entry that failed validation. The remaining entries still apply.
#[derive(Debug, Clone, Serialize)]
pub struct RateRejection {
    /// 1-based referral level
    pub level: usize,
    pub value: f64,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RateUpdate {
    pub rates: CommissionRateTable,
    pub rejected: Vec<RateRejection>,
    pub total: f64,
    /// Soft warning only - a total above 50% is legal
    pub warning: bool,
}

pub fn validate_rate(value: f64) -> Result<(), String> {
    if !(RATE_MIN..=RATE_MAX).contains(&value) {
        return Err(format!(
            "rate must be between {}% and {}%",
            RATE_MIN, RATE_MAX
        ));
    }
    // Percentages move in half-point steps
    let doubled = value * 2.0;
    if (doubled - doubled.round()).abs() > 1e-9 {
        return Err(format!("rate must be a multiple of {}", RATE_STEP));
    }
    Ok(())
}

impl CommissionRateTable {
    pub fn levels(&self) -> &[f64; LEVELS] {
        &self.0
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    pub fn over_warning(&self) -> bool {
        self.total() > WARN_TOTAL
    }

    /// Apply a new rate tuple entry by entry. Invalid entries are rejected
    /// individually and keep their previous value; valid entries always
    /// take effect.
    pub fn apply(&mut self, levels: [f64; LEVELS]) -> RateUpdate {
        let mut rejected = Vec::new();
        for (i, &value) in levels.iter().enumerate() {
            match validate_rate(value) {
                Ok(()) => self.0[i] = value,
                Err(reason) => rejected.push(RateRejection {
                    level: i + 1,
                    value,
                    reason,
                }),
            }
        }
        RateUpdate {
            rates: *self,
            rejected,
            total: self.total(),
            warning: self.over_warning(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rates() {
        let table = CommissionRateTable::default();
        assert_eq!(table.levels(), &[25.0, 5.0, 3.0, 2.0, 1.0]);
        assert_eq!(table.total(), 36.0);
        assert!(!table.over_warning());
    }

    #[test]
    fn test_valid_update_applies_cleanly() {
        let mut table = CommissionRateTable::default();
        let update = table.apply([25.0, 5.0, 3.0, 2.0, 1.0]);
        assert!(update.rejected.is_empty());
        assert_eq!(update.total, 36.0);
        assert!(!update.warning);
    }

    #[test]
    fn test_out_of_range_entry_rejected_individually() {
        let mut table = CommissionRateTable::default();
        let update = table.apply([10.0, 60.0, 3.0, -1.0, 1.5]);

        // Levels 2 and 4 rejected, the others applied
        let rejected: Vec<usize> = update.rejected.iter().map(|r| r.level).collect();
        assert_eq!(rejected, vec![2, 4]);
        assert_eq!(table.levels(), &[10.0, 5.0, 3.0, 2.0, 1.5]);
    }

    #[test]
    fn test_half_point_step_enforced() {
        let mut table = CommissionRateTable::default();
        let update = table.apply([10.25, 5.5, 3.0, 2.0, 1.0]);
        assert_eq!(update.rejected.len(), 1);
        assert_eq!(update.rejected[0].level, 1);
        // 5.5 is on the step grid and applies
        assert_eq!(table.levels()[1], 5.5);
        // level 1 kept its previous value
        assert_eq!(table.levels()[0], 25.0);
    }

    #[test]
    fn test_high_total_warns_but_saves() {
        let mut table = CommissionRateTable::default();
        let update = table.apply([50.0, 50.0, 50.0, 50.0, 50.0]);
        assert!(update.rejected.is_empty());
        assert_eq!(update.total, 250.0);
        assert!(update.warning);
        assert_eq!(table.total(), 250.0);
    }

    #[test]
    fn test_boundaries_are_valid() {
        assert!(validate_rate(0.0).is_ok());
        assert!(validate_rate(50.0).is_ok());
        assert!(validate_rate(50.5).is_err());
        assert!(validate_rate(-0.5).is_err());
    }
}

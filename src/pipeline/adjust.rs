//! Month-keyed seasonal correction of raw model output.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fixed multiplicative correction table, one factor per calendar month.
///
/// The factors compensate for systematic seasonal bias in the regression's
/// extrapolation and were tuned against the historical model's output (with
/// its cyclical-feature encoding, see `features::encode_month`). They are
/// not derived from the fitted coefficients. Months without an entry use a
/// factor of 1.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonalAdjustments {
    factors: BTreeMap<u32, f64>,
}

impl SeasonalAdjustments {
    pub fn new(factors: BTreeMap<u32, f64>) -> Self {
        Self { factors }
    }

    /// Multiplier for a calendar month, 1.0 when the table has no entry.
    pub fn factor(&self, month: u32) -> f64 {
        self.factors.get(&month).copied().unwrap_or(1.0)
    }

    pub fn apply(&self, month: u32, raw_mwh: f64) -> f64 {
        raw_mwh * self.factor(month)
    }
}

impl Default for SeasonalAdjustments {
    /// Reference table: ten months carry a non-unity factor; August and
    /// October are intentionally untouched.
    fn default() -> Self {
        Self::new(BTreeMap::from([
            (1, 1.10),
            (2, 1.05),
            (3, 0.95),
            (4, 0.90),
            (5, 0.85),
            (6, 0.80),
            (7, 0.90),
            (9, 1.05),
            (11, 1.05),
            (12, 1.18),
        ]))
    }
}

//! Shares left in a stock plan's pool for future grants.

use rust_decimal::Decimal;

use super::types::PoolAdjustment;

/// Computes pool-available-for-grant from a plan's reservation and its
/// pool adjustments.
#[derive(Debug, Clone, Default)]
pub struct OptionsRemainingCalculator {
    value: Decimal,
}

impl OptionsRemainingCalculator {
    /// Create a calculator with a zero value.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value to pool size minus `total_holdings`.
    ///
    /// The pool size is the `shares_reserved` of the latest-dated adjustment,
    /// or `initial_reserved` when there are none. Adjustments sharing the
    /// latest date resolve to the greatest id, so the order of `adjustments`
    /// never matters; an adjustment without a date is older than any dated one.
    pub fn apply(
        &mut self,
        initial_reserved: Decimal,
        total_holdings: Decimal,
        adjustments: &[PoolAdjustment],
    ) {
        let pool_size = Self::latest(adjustments)
            .map_or(initial_reserved, |adjustment| adjustment.shares_reserved);
        self.value = pool_size - total_holdings;
    }

    /// The remaining pool.
    #[must_use]
    pub fn value(&self) -> Decimal {
        self.value
    }

    fn latest(adjustments: &[PoolAdjustment]) -> Option<&PoolAdjustment> {
        adjustments.iter().max_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.id.cmp(&b.id))
                .then_with(|| a.shares_reserved.cmp(&b.shares_reserved))
        })
    }
}

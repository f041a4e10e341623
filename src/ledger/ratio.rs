//! Exact conversion ratios and share-count rounding.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How converted share counts are rounded for a stock class.
///
/// OCF attaches this to the conversion mechanism of a class; the ratio itself
/// is never rounded, only the share counts produced by applying it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RoundingType {
    /// Leave the converted quantity as computed.
    #[default]
    Normal,
    /// Round up to the next whole share.
    Ceiling,
    /// Round down to the previous whole share.
    Floor,
}

impl RoundingType {
    /// Applies this rounding mode to a converted share count.
    #[must_use]
    #[inline]
    pub fn apply(self, quantity: Decimal) -> Decimal {
        match self {
            RoundingType::Normal => quantity,
            RoundingType::Ceiling => quantity.ceil(),
            RoundingType::Floor => quantity.floor(),
        }
    }
}

impl std::fmt::Display for RoundingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundingType::Normal => write!(f, "NORMAL"),
            RoundingType::Ceiling => write!(f, "CEILING"),
            RoundingType::Floor => write!(f, "FLOOR"),
        }
    }
}

/// A numerator/denominator pair as it appears in an OCF conversion mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ratio {
    /// Shares of the target class received
    pub numerator: Decimal,
    /// Shares of the source class given up
    pub denominator: Decimal,
}

impl Ratio {
    /// One share for one share.
    pub const ONE: Ratio = Ratio {
        numerator: Decimal::ONE,
        denominator: Decimal::ONE,
    };

    /// Create a new ratio.
    #[must_use]
    pub fn new(numerator: Decimal, denominator: Decimal) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// The exact quotient, or `None` when the denominator is zero.
    #[must_use]
    #[inline]
    pub fn value(&self) -> Option<Decimal> {
        self.numerator.checked_div(self.denominator)
    }

    /// Composes two ratios by multiplying numerators and denominators, so a
    /// chain of conversions is still divided only once.
    ///
    /// `None` on overflow or when either denominator is zero.
    #[must_use]
    pub fn checked_compose(&self, next: &Ratio) -> Option<Ratio> {
        if self.denominator.is_zero() || next.denominator.is_zero() {
            return None;
        }
        Some(Ratio {
            numerator: self.numerator.checked_mul(next.numerator)?,
            denominator: self.denominator.checked_mul(next.denominator)?,
        })
    }

    /// Converts a quantity as `quantity * numerator / denominator` with a
    /// single final division.
    ///
    /// `None` on overflow or a zero denominator.
    #[must_use]
    pub fn convert(&self, quantity: Decimal) -> Option<Decimal> {
        quantity
            .checked_mul(self.numerator)?
            .checked_div(self.denominator)
    }

    /// The quotient with `rounding` applied.
    #[must_use]
    pub fn rounded(&self, rounding: RoundingType) -> Option<Decimal> {
        self.value().map(|quotient| rounding.apply(quotient))
    }
}

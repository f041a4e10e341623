//! Conversion ratios from preferred stock classes into common stock.
//!
//! Stock classes form a directed graph whose edges are conversion rights.
//! Resolution runs a breadth-first search from a preferred class and settles
//! on the reachable common class with the lowest strictly positive votes per
//! share. Ties keep the first class reached, so the result depends only on
//! the order conversion rights are declared in. The resolved ratio keeps the
//! product of numerators over the product of denominators along the path;
//! quantities are divided once, at conversion time.

use std::collections::{HashMap, HashSet, VecDeque};

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use super::error::LedgerError;
use super::ratio::Ratio;
use super::types::StockClass;

/// The result of resolving a preferred class to common stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionPath {
    /// Exact compounded ratio along `path`
    pub ratio: Ratio,
    /// Class ids from the start class to the common terminal; empty when no
    /// terminal was reachable
    pub path: Vec<String>,
}

impl ConversionPath {
    /// Ratio one with no path, used when no common class is reachable.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            ratio: Ratio::ONE,
            path: Vec::new(),
        }
    }

    /// The ratio as a single decimal, for display.
    #[must_use]
    pub fn ratio_decimal(&self) -> Decimal {
        self.ratio.value().unwrap_or(Decimal::ONE)
    }

    /// The ratio narrowed to `f64` for display-oriented consumers.
    #[must_use]
    pub fn ratio_f64(&self) -> f64 {
        self.ratio_decimal().to_f64().unwrap_or(f64::NAN)
    }

    /// Converts a quantity of the start class into shares of the terminal.
    #[must_use]
    pub fn convert(&self, quantity: Decimal) -> Option<Decimal> {
        self.ratio.convert(quantity)
    }

    /// Id of the common class at the end of the path.
    #[must_use]
    pub fn common_stock_class_id(&self) -> Option<&str> {
        self.path.last().map(String::as_str)
    }
}

/// Registry of stock classes that answers conversion-ratio queries.
#[derive(Debug, Clone, Default)]
pub struct ConversionRatioCalculator {
    classes: Vec<StockClass>,
    index: HashMap<String, usize>,
}

impl ConversionRatioCalculator {
    /// Create an empty calculator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a stock class. A later class with the same id shadows the
    /// earlier one.
    pub fn apply(&mut self, stock_class: StockClass) {
        if self.index.contains_key(&stock_class.id) {
            debug!(stock_class_id = %stock_class.id, "stock class registered again; newest wins");
        }
        self.index
            .insert(stock_class.id.clone(), self.classes.len());
        self.classes.push(stock_class);
    }

    /// Looks up a registered class.
    #[must_use]
    pub fn get(&self, stock_class_id: &str) -> Option<&StockClass> {
        self.index
            .get(stock_class_id)
            .map(|&position| &self.classes[position])
    }

    /// Number of registered classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True when no class has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Resolves the conversion ratio of a preferred class into common stock.
    ///
    /// When no common class with positive votes per share is reachable this
    /// logs an error and returns [`ConversionPath::identity`].
    ///
    /// # Errors
    ///
    /// [`LedgerError::UnknownStockClass`] when `start_id` was never
    /// registered, [`LedgerError::NotPreferred`] when it is a common class.
    pub fn find_ratio(&self, start_id: &str) -> Result<ConversionPath, LedgerError> {
        let start = self
            .get(start_id)
            .ok_or_else(|| LedgerError::UnknownStockClass(start_id.to_string()))?;
        if !start.is_preferred {
            return Err(LedgerError::NotPreferred {
                stock_class_id: start_id.to_string(),
            });
        }

        let mut visited: HashSet<&str> = HashSet::from([start.id.as_str()]);
        let mut parents: HashMap<&str, &str> = HashMap::new();
        let mut queue: VecDeque<&StockClass> = VecDeque::from([start]);
        let mut best: Option<(Decimal, &str)> = None;

        while let Some(current) = queue.pop_front() {
            if current.is_preferred {
                for right in &current.conversion_rights {
                    let target = right.converts_to_stock_class_id.as_str();
                    if visited.contains(target) {
                        continue;
                    }
                    let Some(next) = self.get(target) else {
                        warn!(
                            stock_class_id = %current.id,
                            converts_to = target,
                            "conversion right names an unknown stock class"
                        );
                        continue;
                    };
                    visited.insert(next.id.as_str());
                    parents.insert(next.id.as_str(), current.id.as_str());
                    queue.push_back(next);
                }
            } else if let Some(votes) = current.votes_per_share.filter(|votes| *votes > Decimal::ZERO)
            {
                if best.is_none_or(|(best_votes, _)| votes < best_votes) {
                    best = Some((votes, current.id.as_str()));
                }
            }
        }

        let Some((_, terminal)) = best else {
            error!(
                stock_class_id = start_id,
                "no common stock class reachable through conversion rights; using ratio 1"
            );
            return Ok(ConversionPath::identity());
        };

        let mut path = vec![terminal];
        while let Some(&parent) = parents.get(path[path.len() - 1]) {
            path.push(parent);
        }
        path.reverse();

        let mut ratio = Ratio::ONE;
        for hop in path.windows(2) {
            let hop_ratio = self
                .get(hop[0])
                .and_then(|from| from.conversion_right_to(hop[1]))
                .map(|right| right.ratio);
            match hop_ratio.and_then(|hop_ratio| ratio.checked_compose(&hop_ratio)) {
                Some(product) => ratio = product,
                None => {
                    error!(
                        stock_class_id = start_id,
                        from = hop[0],
                        to = hop[1],
                        "conversion ratio along path cannot be computed; using ratio 1"
                    );
                    return Ok(ConversionPath::identity());
                }
            }
        }

        Ok(ConversionPath {
            ratio,
            path: path.into_iter().map(str::to_string).collect(),
        })
    }
}

use serde::{Deserialize, Serialize};

use crate::values::Price;

/// Hard bounds a quote must stay inside after every evolution step.
///
/// Produced by a price-limit policy when an instrument is registered and
/// stored next to its definition. The simulator never inspects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLimit {
    /// Lowest admissible bid
    pub floor: Price,
    /// Highest admissible ask
    pub ceiling: Price,
    /// Widest admissible ask - bid
    pub max_spread: Price,
    /// Minimum price increment
    pub tick_size: Price,
}

impl PriceLimit {
    /// True when the price lies inside `[floor, ceiling]`
    pub fn contains(&self, price: Price) -> bool {
        price >= self.floor && price <= self.ceiling
    }
}

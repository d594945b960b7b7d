use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::values::{Price, round_price};

/// Which side(s) of the quote a random-walk step moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuoteSide {
    Bid,
    Ask,
    /// Bid branch first, then the ask branch on the updated quote
    Both,
}

impl QuoteSide {
    /// Map a raw selector to a side: `1` is bid, `2` is ask.
    ///
    /// Every other selector falls back to the bid branch, so a draw of `3`
    /// moves the bid only and never both sides.
    pub fn from_selector(selector: u32) -> Self {
        match selector {
            2 => QuoteSide::Ask,
            _ => QuoteSide::Bid,
        }
    }

    fn moves_bid(&self) -> bool {
        matches!(self, QuoteSide::Bid | QuoteSide::Both)
    }

    fn moves_ask(&self) -> bool {
        matches!(self, QuoteSide::Ask | QuoteSide::Both)
    }
}

/// Direction of a random-walk step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn from_flag(up: bool) -> Self {
        if up { Direction::Up } else { Direction::Down }
    }

    pub fn sign(&self) -> Decimal {
        match self {
            Direction::Up => Decimal::ONE,
            Direction::Down => Decimal::NEGATIVE_ONE,
        }
    }
}

/// One random draw for the bounded random walk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceStep {
    /// Random deviation, expected in `[0, 1)`
    pub deviation: Decimal,
    pub side: QuoteSide,
    pub direction: Direction,
}

impl PriceStep {
    pub fn new(deviation: Decimal, side: QuoteSide, direction: Direction) -> Self {
        Self {
            deviation,
            side,
            direction,
        }
    }

    /// Signed price move: `(deviation / 100 * sign) / 2`
    pub fn fraction(&self) -> Decimal {
        (self.deviation / dec!(100) * self.direction.sign()) / dec!(2)
    }
}

/// Live (bid, ask, last) triple of an instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub bid: Price,
    pub ask: Price,
    pub last: Price,
}

impl Quote {
    pub fn new(bid: Price, ask: Price, last: Price) -> Self {
        Self { bid, ask, last }
    }

    /// Quote whose `last` is the rounded bid/ask midpoint
    pub fn from_bid_ask(bid: Price, ask: Price) -> Self {
        let mut quote = Self::new(bid, ask, Decimal::ZERO);
        quote.refresh_last();
        quote
    }

    pub fn mid(&self) -> Price {
        (self.bid + self.ask) / dec!(2)
    }

    pub fn spread(&self) -> Price {
        self.ask - self.bid
    }

    /// Recompute `last` as the midpoint rounded to 4dp
    pub fn refresh_last(&mut self) {
        self.last = round_price(self.mid());
    }

    /// Apply one bounded random-walk step in place.
    ///
    /// The moved side is shifted by [`PriceStep::fraction`]. When the move
    /// makes `bid >= ask` the opposite side is bumped by the same fraction so
    /// a quote with `ask > bid` keeps that ordering. `last` is always
    /// recomputed from the new bid and ask.
    pub fn step(&mut self, step: &PriceStep) {
        let fraction = step.fraction();

        if step.side.moves_bid() {
            self.bid = round_price(self.bid + fraction);
            if self.bid >= self.ask {
                self.ask = round_price(self.ask + fraction);
            }
        }

        if step.side.moves_ask() {
            self.ask = round_price(self.ask + fraction);
            if self.bid >= self.ask {
                self.bid = round_price(self.bid + fraction);
            }
        }

        self.refresh_last();
    }

    /// Return the quote after one step, leaving `self` untouched
    pub fn stepped(mut self, step: &PriceStep) -> Self {
        self.step(step);
        self
    }
}

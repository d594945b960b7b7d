use log::{debug, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use spot_core::{Price, PriceLimit, PriceStep, Quote, round_price};
use spot_ports::{PriceLimitPolicy, PricingError, PricingResult};

/// Configuration for [`BandPricer`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Maximum relative excursion from the nominal quote (0.05 = 5%)
    #[serde(default = "default_max_move")]
    pub max_move: Decimal,
    /// Minimum price increment
    #[serde(default = "default_tick_size")]
    pub tick_size: Decimal,
}

fn default_max_move() -> Decimal {
    dec!(0.05)
}

fn default_tick_size() -> Decimal {
    dec!(0.0001)
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            max_move: default_max_move(),
            tick_size: default_tick_size(),
        }
    }
}

impl PricingConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_move <= Decimal::ZERO || self.max_move >= Decimal::ONE {
            return Err(format!("max_move must be in (0, 1), got {}", self.max_move));
        }
        if self.tick_size <= Decimal::ZERO {
            return Err(format!("tick_size must be positive, got {}", self.tick_size));
        }
        Ok(())
    }
}

/// Price-limit policy that keeps every quote inside a band around its
/// nominal bid/ask.
///
/// The band spans `[min(bid, ask) * (1 - max_move), max(bid, ask) * (1 + max_move)]`
/// and the quoted spread is capped at the larger of the nominal spread and the
/// nominal ask - bid. After clamping, `ask` is always at least one tick above
/// `bid`.
pub struct BandPricer {
    config: PricingConfig,
}

impl BandPricer {
    /// Create a pricer with default config
    pub fn new() -> Self {
        Self {
            config: PricingConfig::default(),
        }
    }

    /// Create with custom configuration
    pub fn with_config(config: PricingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Compute the limit, reporting why it could not be built
    pub fn try_limit(&self, bid: Price, ask: Price, spread: Price) -> PricingResult<PriceLimit> {
        if bid <= Decimal::ZERO || ask <= Decimal::ZERO || spread <= Decimal::ZERO {
            return Err(PricingError::NonPositiveInput(format!(
                "bid={} ask={} spread={}",
                bid, ask, spread
            )));
        }

        let tick = self.config.tick_size;
        let lower = bid.min(ask);
        let upper = bid.max(ask);

        let floor = lower
            .checked_mul(Decimal::ONE - self.config.max_move)
            .ok_or_else(|| PricingError::Overflow("floor".to_string()))?;
        let ceiling = upper
            .checked_mul(Decimal::ONE + self.config.max_move)
            .ok_or_else(|| PricingError::Overflow("ceiling".to_string()))?;

        let floor = round_price(floor).max(tick);
        let ceiling = round_price(ceiling);

        if ceiling - floor < tick * dec!(2) {
            return Err(PricingError::DegenerateBand(format!(
                "floor={} ceiling={} tick={}",
                floor, ceiling, tick
            )));
        }

        // a spread wider than the band could never be quoted
        let band = ceiling - floor;
        Ok(PriceLimit {
            floor,
            ceiling,
            max_spread: spread.max(upper - lower).min(band).max(tick),
            tick_size: tick,
        })
    }

    /// Pull a quote back inside `limit`, keeping `ask >= bid + tick`
    pub fn clamp(&self, quote: Quote, limit: &PriceLimit) -> Quote {
        let tick = limit.tick_size;
        let bid = quote.bid.max(limit.floor).min(limit.ceiling - tick);
        let widest = bid.checked_add(limit.max_spread).unwrap_or(limit.ceiling);
        let ask = quote.ask.min(limit.ceiling).min(widest).max(bid + tick);

        let clamped = Quote::from_bid_ask(bid, ask);
        if clamped.bid != quote.bid || clamped.ask != quote.ask {
            debug!(
                "Clamped quote {}/{} to {}/{} (floor={}, ceiling={})",
                quote.bid, quote.ask, clamped.bid, clamped.ask, limit.floor, limit.ceiling
            );
        }
        clamped
    }
}

impl Default for BandPricer {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceLimitPolicy for BandPricer {
    fn compute_limit(&self, bid: Price, ask: Price, spread: Price) -> Option<PriceLimit> {
        match self.try_limit(bid, ask, spread) {
            Ok(limit) => Some(limit),
            Err(e) => {
                warn!("No price limit for bid={} ask={} spread={}: {}", bid, ask, spread, e);
                None
            }
        }
    }

    fn advance(&self, quote: Quote, step: &PriceStep, limit: &PriceLimit) -> Quote {
        self.clamp(quote.stepped(step), limit)
    }

    fn name(&self) -> &str {
        "BandPricer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spot_core::{Direction, QuoteSide};

    fn eurusd_limit(pricer: &BandPricer) -> PriceLimit {
        pricer
            .compute_limit(dec!(1.2345), dec!(1.2346), dec!(0.0010))
            .unwrap()
    }

    #[test]
    fn test_limit_band_around_nominal_quote() {
        let pricer = BandPricer::new();
        let limit = pricer.compute_limit(dec!(1.0), dec!(1.0), dec!(1.0)).unwrap();

        assert_eq!(limit.floor, dec!(0.95));
        assert_eq!(limit.ceiling, dec!(1.05));
        // capped to the width of the band
        assert_eq!(limit.max_spread, dec!(0.10));
        assert_eq!(limit.tick_size, dec!(0.0001));
    }

    #[test]
    fn test_limit_rejects_non_positive_inputs() {
        let pricer = BandPricer::new();

        assert!(pricer.compute_limit(dec!(1), dec!(1), dec!(-1)).is_none());
        assert!(pricer.compute_limit(dec!(1), dec!(1), dec!(0)).is_none());
        assert!(pricer.compute_limit(dec!(0), dec!(1), dec!(1)).is_none());
        assert!(matches!(
            pricer.try_limit(dec!(1), dec!(0), dec!(1)),
            Err(PricingError::NonPositiveInput(_))
        ));
    }

    #[test]
    fn test_limit_for_wide_nominal_quote() {
        let pricer = BandPricer::new();
        let limit = pricer
            .compute_limit(dec!(110), dec!(110.861), dec!(20))
            .unwrap();

        assert_eq!(limit.floor, dec!(104.5));
        assert_eq!(limit.ceiling, dec!(116.4041));
        assert_eq!(limit.max_spread, dec!(11.9041));
    }

    #[test]
    fn test_huge_spread_is_capped_to_band() {
        let pricer = BandPricer::new();
        let limit = pricer
            .compute_limit(dec!(1.0), dec!(1.1), Decimal::MAX)
            .unwrap();

        assert_eq!(limit.max_spread, limit.ceiling - limit.floor);

        let mut quote = Quote::from_bid_ask(dec!(1.0), dec!(1.1));
        for i in 0..50u32 {
            let step = PriceStep::new(
                dec!(0.5),
                QuoteSide::from_selector(i % 3 + 1),
                Direction::from_flag(i % 2 == 0),
            );
            quote = pricer.advance(quote, &step, &limit);

            assert!(quote.ask > quote.bid);
            assert!(limit.contains(quote.bid) && limit.contains(quote.ask));
        }
    }

    #[test]
    fn test_clamp_tolerates_unbounded_spread_limit() {
        let pricer = BandPricer::new();
        let limit = PriceLimit {
            floor: dec!(0.95),
            ceiling: dec!(1.155),
            max_spread: Decimal::MAX,
            tick_size: dec!(0.0001),
        };

        let next = pricer.clamp(Quote::from_bid_ask(dec!(1.0), dec!(1.2)), &limit);

        assert_eq!(next.bid, dec!(1.0));
        assert_eq!(next.ask, dec!(1.155));
    }

    #[test]
    fn test_limit_rejects_degenerate_band() {
        let pricer = BandPricer::new();
        assert!(matches!(
            pricer.try_limit(dec!(0.0001), dec!(0.0001), dec!(0.0001)),
            Err(PricingError::DegenerateBand(_))
        ));
    }

    #[test]
    fn test_limit_reports_overflow() {
        let pricer = BandPricer::new();
        assert!(matches!(
            pricer.try_limit(Decimal::MAX, Decimal::MAX, dec!(1)),
            Err(PricingError::Overflow(_))
        ));
    }

    #[test]
    fn test_advance_inside_band_is_plain_step() {
        let pricer = BandPricer::new();
        let limit = eurusd_limit(&pricer);
        let quote = Quote::from_bid_ask(dec!(1.2345), dec!(1.2346));
        let step = PriceStep::new(dec!(0.04), QuoteSide::Bid, Direction::Up);

        let next = pricer.advance(quote, &step, &limit);

        assert_eq!(next.bid, dec!(1.2347));
        assert_eq!(next.ask, dec!(1.2348));
        assert_eq!(next.last, dec!(1.2348));
    }

    #[test]
    fn test_advance_clamps_to_floor() {
        let pricer = BandPricer::new();
        let limit = eurusd_limit(&pricer);
        let quote = Quote::from_bid_ask(limit.floor, limit.floor + dec!(0.0001));
        let step = PriceStep::new(dec!(0.9), QuoteSide::Both, Direction::Down);

        let next = pricer.advance(quote, &step, &limit);

        assert_eq!(next.bid, limit.floor);
        assert!(next.ask > next.bid);
        assert!(limit.contains(next.ask));
    }

    #[test]
    fn test_advance_clamps_to_ceiling() {
        let pricer = BandPricer::new();
        let limit = eurusd_limit(&pricer);
        let quote = Quote::from_bid_ask(limit.ceiling - dec!(0.0001), limit.ceiling);
        let step = PriceStep::new(dec!(0.9), QuoteSide::Bid, Direction::Up);

        let next = pricer.advance(quote, &step, &limit);

        assert_eq!(next.ask, limit.ceiling);
        assert_eq!(next.bid, limit.ceiling - limit.tick_size);
    }

    #[test]
    fn test_advance_caps_spread() {
        let pricer = BandPricer::new();
        let limit = eurusd_limit(&pricer);
        let quote = Quote::from_bid_ask(dec!(1.2300), dec!(1.2400));

        let next = pricer.clamp(quote, &limit);

        assert_eq!(next.bid, dec!(1.2300));
        assert_eq!(next.ask, dec!(1.2310));
    }

    #[test]
    fn test_advance_separates_crossed_nominal_quote() {
        let pricer = BandPricer::new();
        let limit = pricer.compute_limit(dec!(1.0), dec!(1.0), dec!(1.0)).unwrap();
        let quote = Quote::from_bid_ask(dec!(1.0), dec!(1.0));
        let step = PriceStep::new(dec!(0), QuoteSide::Bid, Direction::Up);

        let next = pricer.advance(quote, &step, &limit);

        assert_eq!(next.ask - next.bid, dec!(0.0001));
    }

    #[test]
    fn test_repeated_advance_stays_in_limit() {
        let pricer = BandPricer::new();
        let limit = eurusd_limit(&pricer);
        let mut quote = Quote::from_bid_ask(dec!(1.2345), dec!(1.2346));

        for i in 0..500u32 {
            let step = PriceStep::new(
                dec!(0.9999),
                QuoteSide::from_selector(i % 3 + 1),
                Direction::from_flag(i % 7 < 4),
            );
            quote = pricer.advance(quote, &step, &limit);

            assert!(quote.ask > quote.bid);
            assert!(limit.contains(quote.bid) && limit.contains(quote.ask));
            assert!(quote.ask - quote.bid <= limit.max_spread);
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(PricingConfig::default().validate().is_ok());

        let bad = PricingConfig {
            max_move: dec!(1.5),
            ..Default::default()
        };
        assert!(bad.validate().is_err());

        let bad_tick = PricingConfig {
            tick_size: dec!(0),
            ..Default::default()
        };
        assert!(bad_tick.validate().is_err());
    }

    #[test]
    fn test_config_defaults_from_partial_json() {
        let config: PricingConfig = serde_json::from_str(r#"{"max_move":"0.1"}"#).unwrap();
        assert_eq!(config.max_move, dec!(0.1));
        assert_eq!(config.tick_size, dec!(0.0001));
    }
}

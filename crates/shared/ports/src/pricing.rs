use spot_core::{Price, PriceLimit, PriceStep, Quote};

/// Port for the numeric policy behind the random walk
///
/// A policy turns a nominal bid/ask/spread into a hard [`PriceLimit`] when an
/// instrument is registered, and advances a live quote inside that limit on
/// every tick. Implementations are shared across concurrent publish cycles.
pub trait PriceLimitPolicy: Send + Sync {
    /// Compute the limit for a nominal quote.
    ///
    /// Must not panic; any internal failure is reported as `None` and the
    /// instrument is rejected.
    fn compute_limit(&self, bid: Price, ask: Price, spread: Price) -> Option<PriceLimit>;

    /// Advance a quote by one step. Pure: the result depends only on the
    /// arguments and is clamped to `limit`.
    fn advance(&self, quote: Quote, step: &PriceStep, limit: &PriceLimit) -> Quote;

    /// Get the policy's name for logging
    fn name(&self) -> &str {
        "PriceLimitPolicy"
    }
}

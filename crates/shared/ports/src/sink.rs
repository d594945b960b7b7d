use spot_core::TickUpdate;

/// Delivery point for tick notifications
///
/// `publish` is called from inside the publish cycle and must not block:
/// delivery is fire-and-forget and having no subscribers is not an error.
pub trait TickSink: Send + Sync {
    fn publish(&self, tick: TickUpdate);

    /// Number of currently attached subscribers
    fn subscriber_count(&self) -> usize;
}

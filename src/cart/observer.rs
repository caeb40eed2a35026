//! Cart Observer

use std::sync::mpsc::Sender;

use tracing::debug;

use crate::{cart::storage::CartLineRecord, lines::CartLine};

/// Receives a notification every time an add lands in the cart.
///
/// The UI uses this for transient "added to cart" feedback. It is an explicit hook on the
/// ledger call rather than shared state, so the ledger stays usable without any UI attached.
pub trait CartObserver {
    /// Called after an add, with the resulting line (new, or merged with an existing line).
    fn on_line_added(&mut self, line: &CartLine<'_>);
}

/// Observer that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl CartObserver for NoopObserver {
    fn on_line_added(&mut self, _line: &CartLine<'_>) {}
}

/// Forward notifications over a channel as owned records.
impl CartObserver for Sender<CartLineRecord> {
    fn on_line_added(&mut self, line: &CartLine<'_>) {
        if self.send(CartLineRecord::from(line)).is_err() {
            debug!(item_id = line.item_id(), "cart notification receiver dropped");
        }
    }
}

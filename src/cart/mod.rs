//! Cart
//!
//! The cart ledger: an insertion-ordered set of [`CartLine`]s keyed by catalog item id. It is an
//! explicit value owned by whoever handles the user's session; there is no ambient cart.

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    cart::{
        observer::{CartObserver, NoopObserver},
        storage::{CartLineRecord, CartStore, StoreError, lines_from_records},
    },
    lines::CartLine,
    products::CatalogItem,
};

pub mod observer;
pub mod storage;

/// Errors related to cart updates.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// An item's currency differs from the cart currency (item id, item currency, cart currency).
    #[error("Item {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(String, &'static str, &'static str),
}

/// Cart ledger
#[derive(Debug, Clone)]
pub struct CartLedger<'a> {
    lines: Vec<CartLine<'a>>,
    currency: &'a Currency,
}

impl<'a> CartLedger<'a> {
    /// Create an empty cart priced in `currency`.
    pub fn new(currency: &'a Currency) -> Self {
        CartLedger {
            lines: Vec::new(),
            currency,
        }
    }

    /// Restore a cart from a store.
    ///
    /// Nothing saved, an unreadable document, or records that do not describe a valid cart all
    /// produce an empty cart.
    pub fn restore(store: &impl CartStore, currency: &'a Currency) -> Self {
        let Some(records) = store.load() else {
            return Self::new(currency);
        };

        match lines_from_records(records, currency) {
            Ok(lines) => {
                debug!(lines = lines.len(), "restored cart");

                CartLedger { lines, currency }
            }
            Err(err) => {
                warn!(error = %err, "discarding malformed persisted cart");

                Self::new(currency)
            }
        }
    }

    /// Save the cart to a store.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the store cannot encode or write the cart.
    pub fn persist(&self, store: &mut impl CartStore) -> Result<(), StoreError> {
        store.save(&self.records())
    }

    /// Persisted form of every line, in cart order.
    pub fn records(&self) -> Vec<CartLineRecord> {
        self.lines.iter().map(CartLineRecord::from).collect()
    }

    /// Add one unit of a catalog item, locking in its price at `now`.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError::CurrencyMismatch`] if the item is not priced in the cart currency.
    pub fn add(
        &mut self,
        item: &CatalogItem<'a>,
        now: Timestamp,
    ) -> Result<CartLine<'a>, CartError> {
        self.add_with_observer(item, now, &mut NoopObserver)
    }

    /// Add one unit of a catalog item, notifying `observer` with the resulting line.
    ///
    /// A line for the same item id gains one unit and takes the freshly evaluated price;
    /// otherwise a new line with quantity 1 is appended.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError::CurrencyMismatch`] if the item is not priced in the cart currency.
    pub fn add_with_observer<O: CartObserver + ?Sized>(
        &mut self,
        item: &CatalogItem<'a>,
        now: Timestamp,
        observer: &mut O,
    ) -> Result<CartLine<'a>, CartError> {
        let item_currency = item.currency();

        if item_currency != self.currency {
            return Err(CartError::CurrencyMismatch(
                item.id.clone(),
                item_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        let incoming = CartLine::from_catalog(item, now);

        let line = if let Some(existing) = self
            .lines
            .iter_mut()
            .find(|line| line.item_id() == item.id)
        {
            *existing = existing.clone().merged_with(incoming);

            debug!(
                item_id = existing.item_id(),
                quantity = existing.quantity(),
                promo = existing.is_promo(),
                "merged cart line"
            );

            existing.clone()
        } else {
            debug!(
                item_id = incoming.item_id(),
                promo = incoming.is_promo(),
                "added cart line"
            );

            self.lines.push(incoming.clone());

            incoming
        };

        observer.on_line_added(&line);

        Ok(line)
    }

    /// Remove the line for `item_id`, returning it if it was present.
    pub fn remove(&mut self, item_id: &str) -> Option<CartLine<'a>> {
        let position = self
            .lines
            .iter()
            .position(|line| line.item_id() == item_id)?;

        debug!(item_id, "removed cart line");

        Some(self.lines.remove(position))
    }

    /// Set the quantity of the line for `item_id`.
    ///
    /// A quantity below 1 removes the line. Unknown ids are ignored. Prices are untouched.
    pub fn set_quantity(&mut self, item_id: &str, quantity: i64) {
        let quantity = u32::try_from(quantity.max(0)).unwrap_or(u32::MAX);

        if quantity < 1 {
            self.remove(item_id);
            return;
        }

        if let Some(line) = self.lines.iter_mut().find(|line| line.item_id() == item_id) {
            line.set_quantity(quantity);

            debug!(item_id, quantity, "updated cart line quantity");
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        debug!(lines = self.lines.len(), "cleared cart");

        self.lines.clear();
    }

    /// Total number of units across all lines.
    pub fn total_items(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity()))
            .sum()
    }

    /// Pre-discount grand total of every line.
    pub fn total_price(&self) -> Money<'a, Currency> {
        let total = self
            .lines
            .iter()
            .map(|line| line.line_total().to_minor_units())
            .fold(0_i64, i64::saturating_add);

        Money::from_minor(total, self.currency)
    }

    /// Line for `item_id`, if present.
    pub fn get(&self, item_id: &str) -> Option<&CartLine<'a>> {
        self.lines.iter().find(|line| line.item_id() == item_id)
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine<'a>] {
        &self.lines
    }

    /// Iterate over the lines in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine<'a>> {
        self.lines.iter()
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Currency of the cart.
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }
}

impl<'s, 'a> IntoIterator for &'s CartLedger<'a> {
    type Item = &'s CartLine<'a>;
    type IntoIter = std::slice::Iter<'s, CartLine<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

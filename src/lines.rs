//! Cart lines
//!
//! A cart line is a snapshot of a catalog item taken when it was added to the cart. Its unit
//! price is locked in at that moment: the promotional price if the promotion was active, the
//! reference price otherwise.

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};

use crate::{
    pricing::line_total,
    products::{CatalogItem, Category},
    promotions::effective_price,
};

/// One row in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine<'a> {
    item_id: String,
    name: String,
    category: Category,
    subcategory: Option<String>,
    unit_price: Money<'a, Currency>,
    original_price: Option<Money<'a, Currency>>,
    promo_label: Option<String>,
    quantity: u32,
}

impl<'a> CartLine<'a> {
    /// Create a full-price line with quantity 1.
    pub fn new(
        item_id: impl Into<String>,
        name: impl Into<String>,
        unit_price: Money<'a, Currency>,
        category: impl Into<Category>,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            name: name.into(),
            category: category.into(),
            subcategory: None,
            unit_price,
            original_price: None,
            promo_label: None,
            quantity: 1,
        }
    }

    /// Normalise a catalog item into a line with quantity 1, locking in the price at `now`.
    pub fn from_catalog(item: &CatalogItem<'a>, now: Timestamp) -> Self {
        let price = effective_price(item, now);

        Self {
            item_id: item.id.clone(),
            name: item.name.clone(),
            category: item.category.clone(),
            subcategory: item.subcategory.clone(),
            unit_price: price.unit_price,
            original_price: price.original_price,
            promo_label: price.original_price.and(item.promo_label.clone()),
            quantity: 1,
        }
    }

    /// Fold another add of the same item into this line.
    ///
    /// Quantity grows by exactly one. Price fields come from `incoming`, which was evaluated at
    /// the time of the latest add; units already in the line are not repriced individually.
    #[must_use]
    pub fn merged_with(self, incoming: CartLine<'a>) -> Self {
        debug_assert_eq!(
            self.item_id, incoming.item_id,
            "merging lines for different items"
        );

        Self {
            unit_price: incoming.unit_price,
            original_price: incoming.original_price,
            promo_label: incoming.promo_label,
            quantity: self.quantity.saturating_add(1),
            ..self
        }
    }

    /// Replace the quantity. Values below 1 are raised to 1.
    #[must_use]
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity.max(1);
        self
    }

    /// Set the subcategory.
    #[must_use]
    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    /// Mark the line as promotional, recording the reference price and badge label.
    #[must_use]
    pub fn with_original_price(
        mut self,
        original_price: Money<'a, Currency>,
        promo_label: Option<String>,
    ) -> Self {
        self.original_price = Some(original_price);
        self.promo_label = promo_label;
        self
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity.max(1);
    }

    /// Catalog item identifier
    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Category
    pub fn category(&self) -> &Category {
        &self.category
    }

    /// Subcategory
    pub fn subcategory(&self) -> Option<&str> {
        self.subcategory.as_deref()
    }

    /// Locked-in unit price
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }

    /// Reference price at add time, if a promotion was active
    pub fn original_price(&self) -> Option<&Money<'a, Currency>> {
        self.original_price.as_ref()
    }

    /// Promotion badge label, if a promotion was active
    pub fn promo_label(&self) -> Option<&str> {
        self.promo_label.as_deref()
    }

    /// Whether a promotion was active when the price was locked in
    pub fn is_promo(&self) -> bool {
        self.original_price.is_some()
    }

    /// Number of units, always at least 1
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// `unit_price * quantity`
    pub fn line_total(&self) -> Money<'a, Currency> {
        line_total(&self.unit_price, self.quantity)
    }
}

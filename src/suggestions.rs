//! Suggestions
//!
//! Catalog lookups that nudge the shopper: the item that would unlock the tiered discount, and
//! items related to the one being viewed.

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use tracing::debug;

use crate::{
    discounts::DiscountResult,
    products::CatalogItem,
    promotions::{EffectivePrice, effective_price},
};

/// Suggest one catalog item that would bring the cart up to the discount threshold.
///
/// Returns `None` when the cart is empty or already eligible. Otherwise, with `needed` the amount
/// still missing, picks the cheapest item outside the excluded category priced within
/// `needed ± tolerance`, falling back to the cheapest item priced at least `needed`. Reference
/// prices are compared; items priced in another currency are skipped. Ties go to the earlier
/// catalog item.
pub fn suggest_top_up<'c, 'a>(
    catalog: &'c [CatalogItem<'a>],
    discount: &DiscountResult<'a>,
    tolerance: Money<'a, Currency>,
    cart_is_empty: bool,
) -> Option<&'c CatalogItem<'a>> {
    if cart_is_empty || discount.is_eligible() {
        return None;
    }

    let needed = discount.amount_to_threshold();
    let needed_minor = needed.to_minor_units();
    let tolerance_minor = tolerance.to_minor_units();

    let low = needed_minor.saturating_sub(tolerance_minor);
    let high = needed_minor.saturating_add(tolerance_minor);

    let candidates = || {
        catalog.iter().filter(|item| {
            item.category != *discount.excluded_category()
                && item.currency() == needed.currency()
        })
    };

    let suggestion = candidates()
        .filter(|item| (low..=high).contains(&item.price.to_minor_units()))
        .min_by_key(|item| item.price.to_minor_units())
        .or_else(|| {
            candidates()
                .filter(|item| item.price.to_minor_units() >= needed_minor)
                .min_by_key(|item| item.price.to_minor_units())
        });

    debug!(
        needed = %needed,
        suggestion = suggestion.map(|item| item.id.as_str()),
        "top-up suggestion"
    );

    suggestion
}

/// A related catalog item with its price as shown at `now`.
#[derive(Debug, Clone)]
pub struct RelatedItem<'c, 'a> {
    /// The catalog item
    pub item: &'c CatalogItem<'a>,

    /// Price to display, promotional if active
    pub price: EffectivePrice<'a>,
}

/// Up to `limit` catalog items sharing `item`'s subcategory, excluding `item` itself.
///
/// Items without a subcategory have no related items.
pub fn related_items<'c, 'a>(
    catalog: &'c [CatalogItem<'a>],
    item: &CatalogItem<'a>,
    limit: usize,
    now: Timestamp,
) -> SmallVec<[RelatedItem<'c, 'a>; 4]> {
    let Some(subcategory) = item.subcategory.as_deref() else {
        return SmallVec::new();
    };

    catalog
        .iter()
        .filter(|other| other.id != item.id && other.subcategory.as_deref() == Some(subcategory))
        .take(limit)
        .map(|other| RelatedItem {
            item: other,
            price: effective_price(other, now),
        })
        .collect()
}

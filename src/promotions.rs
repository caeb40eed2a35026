//! Promotions
//!
//! Decides whether a catalog item's promotional price applies at a given instant, and what the
//! resulting unit price is. Every surface that shows or charges a price goes through here.
//!
//! The current instant is always passed in; nothing in this module reads a clock.

use jiff::Timestamp;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};

use crate::products::CatalogItem;

/// Inclusive activation window for a promotional price.
///
/// Either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PromotionWindow {
    start: Option<Timestamp>,
    end: Option<Timestamp>,
}

impl PromotionWindow {
    /// Create a window from optional bounds.
    pub const fn new(start: Option<Timestamp>, end: Option<Timestamp>) -> Self {
        Self { start, end }
    }

    /// A window that is always open.
    pub const fn unbounded() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// Window of a catalog item.
    pub fn of(item: &CatalogItem<'_>) -> Self {
        Self::new(item.promo_start, item.promo_end)
    }

    /// Whether `now` falls inside the window. Both bounds are inclusive.
    pub fn contains(&self, now: Timestamp) -> bool {
        if self.start.is_some_and(|start| now < start) {
            return false;
        }

        if self.end.is_some_and(|end| now > end) {
            return false;
        }

        true
    }
}

/// Unit price of an item at a given instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectivePrice<'a> {
    /// Price to charge per unit
    pub unit_price: Money<'a, Currency>,

    /// Reference price, present only while a promotion applies
    pub original_price: Option<Money<'a, Currency>>,

    /// Whole-number discount percentage, present only while a promotion applies
    pub discount_percent: Option<u32>,
}

impl EffectivePrice<'_> {
    /// Whether the promotional price was applied.
    pub fn is_promo(&self) -> bool {
        self.original_price.is_some()
    }
}

/// Whether the item's promotional price applies at `now`.
///
/// A promotion only applies when the promotional price is positive, strictly below the reference
/// price, in the same currency, and `now` is inside the (inclusive) window.
pub fn is_promotion_active(item: &CatalogItem<'_>, now: Timestamp) -> bool {
    let Some(promo_price) = item.promo_price else {
        return false;
    };

    if promo_price.currency() != item.price.currency() {
        return false;
    }

    let promo_minor = promo_price.to_minor_units();

    if promo_minor <= 0 || promo_minor >= item.price.to_minor_units() {
        return false;
    }

    PromotionWindow::of(item).contains(now)
}

/// Resolve the unit price of an item at `now`.
pub fn effective_price<'a>(item: &CatalogItem<'a>, now: Timestamp) -> EffectivePrice<'a> {
    match item.promo_price {
        Some(promo_price) if is_promotion_active(item, now) => EffectivePrice {
            unit_price: promo_price,
            original_price: Some(item.price),
            discount_percent: Some(discount_percent(
                item.price.to_minor_units(),
                promo_price.to_minor_units(),
            )),
        },
        _ => EffectivePrice {
            unit_price: item.price,
            original_price: None,
            discount_percent: None,
        },
    }
}

/// `round((price - promo) / price * 100)`, computed in decimal space.
///
/// Callers guarantee `0 < promo < price`, so the result is in `0..=100`.
fn discount_percent(price_minor: i64, promo_minor: i64) -> u32 {
    if price_minor <= 0 {
        return 0;
    }

    let saved = Decimal::from(price_minor.saturating_sub(promo_minor));
    let price = Decimal::from(price_minor);

    (saved * Decimal::ONE_HUNDRED / price)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use jiff::{SignedDuration, Timestamp};
    use rusty_money::iso::{CRC, USD};
    use testresult::TestResult;

    use super::*;

    fn now() -> TestResult<Timestamp> {
        Ok("2025-11-28T15:00:00Z".parse()?)
    }

    fn item<'a>(price: i64, promo: Option<i64>) -> CatalogItem<'a> {
        let item =
            CatalogItem::new("B", "Ryzen 5 7600", Money::from_minor(price, CRC), "componentes");

        match promo {
            Some(promo) => item.with_promotion(Money::from_minor(promo, CRC), None, None),
            None => item,
        }
    }

    #[test]
    fn no_promo_price_is_inactive() -> TestResult {
        assert!(!is_promotion_active(&item(6_000_000, None), now()?));

        Ok(())
    }

    #[test]
    fn promo_price_must_be_strictly_lower() -> TestResult {
        let now = now()?;

        assert!(!is_promotion_active(&item(6_000_000, Some(6_000_000)), now));
        assert!(!is_promotion_active(&item(6_000_000, Some(7_000_000)), now));
        assert!(is_promotion_active(&item(6_000_000, Some(5_999_900)), now));

        Ok(())
    }

    #[test]
    fn non_positive_promo_price_is_inactive() -> TestResult {
        let now = now()?;

        assert!(!is_promotion_active(&item(6_000_000, Some(0)), now));
        assert!(!is_promotion_active(&item(6_000_000, Some(-100)), now));

        Ok(())
    }

    #[test]
    fn promo_in_other_currency_is_inactive() -> TestResult {
        let item = item(6_000_000, None).with_promotion(Money::from_minor(100, USD), None, None);

        assert!(!is_promotion_active(&item, now()?));

        Ok(())
    }

    #[test]
    fn window_bounds_are_inclusive() -> TestResult {
        let now = now()?;
        let tick = SignedDuration::from_nanos(1);

        let window = PromotionWindow::new(Some(now), Some(now));

        assert!(window.contains(now));
        assert!(!window.contains(now.checked_sub(tick)?));
        assert!(!window.contains(now.checked_add(tick)?));

        Ok(())
    }

    #[test]
    fn open_bounds_always_contain() -> TestResult {
        let now = now()?;

        assert!(PromotionWindow::unbounded().contains(now));
        let far = SignedDuration::from_hours(10_000);

        assert!(PromotionWindow::new(Some(now), None).contains(now.checked_add(far)?));
        assert!(PromotionWindow::new(None, Some(now)).contains(now.checked_sub(far)?));

        Ok(())
    }

    #[test]
    fn effective_price_applies_active_promotion() -> TestResult {
        let day = SignedDuration::from_hours(24);
        let now = now()?;

        let item = item(6_000_000, None).with_promotion(
            Money::from_minor(5_400_000, CRC),
            Some(now.checked_sub(day)?),
            Some(now.checked_add(day)?),
        );

        let price = effective_price(&item, now);

        assert!(price.is_promo());
        assert_eq!(price.unit_price, Money::from_minor(5_400_000, CRC));
        assert_eq!(price.original_price, Some(Money::from_minor(6_000_000, CRC)));
        assert_eq!(price.discount_percent, Some(10));

        Ok(())
    }

    #[test]
    fn effective_price_falls_back_outside_window() -> TestResult {
        let now = now()?;

        let item = item(6_000_000, None).with_promotion(
            Money::from_minor(5_400_000, CRC),
            Some(now.checked_add(SignedDuration::from_hours(1))?),
            None,
        );

        let price = effective_price(&item, now);

        assert!(!price.is_promo());
        assert_eq!(price.unit_price, Money::from_minor(6_000_000, CRC));
        assert_eq!(price.original_price, None);
        assert_eq!(price.discount_percent, None);

        Ok(())
    }

    #[test]
    fn discount_percent_rounds_to_nearest_whole() {
        assert_eq!(discount_percent(300, 200), 33);
        assert_eq!(discount_percent(300, 100), 67);
        assert_eq!(discount_percent(200, 199), 1);
        assert_eq!(discount_percent(1_000, 995), 1);
        assert_eq!(discount_percent(0, 0), 0);
    }
}

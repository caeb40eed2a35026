//! Tiered Discount
//!
//! An order-level percentage discount unlocked by spend. Lines in the excluded category neither
//! count towards the threshold nor earn the discount, but the discount is taken off the grand
//! total of every line.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};

use crate::{
    discounts::{DiscountError, percent_of_whole_units},
    lines::CartLine,
    pricing::{from_major, total_price},
    products::Category,
};

/// Spend (in major units) the eligible subtotal must reach.
pub const DISCOUNT_THRESHOLD: i64 = 50_000;

/// Category that is excluded from the tiered discount.
pub const EXCLUDED_CATEGORY: Category = Category::PcCompleta;

/// Discount rate once the threshold is reached.
pub fn standard_rate() -> Percentage {
    Percentage::from(Decimal::new(5, 2))
}

/// Policy for the tiered discount.
#[derive(Debug, Clone)]
pub struct DiscountPolicy<'a> {
    excluded_category: Category,
    threshold: Money<'a, Currency>,
    rate: Percentage,
}

impl<'a> DiscountPolicy<'a> {
    /// Create a policy.
    pub fn new(
        excluded_category: Category,
        threshold: Money<'a, Currency>,
        rate: Percentage,
    ) -> Self {
        Self {
            excluded_category,
            threshold,
            rate,
        }
    }

    /// The storefront's policy: 5% off once non-PC lines reach 50,000 major units.
    pub fn standard(currency: &'a Currency) -> Self {
        Self::new(
            EXCLUDED_CATEGORY,
            from_major(DISCOUNT_THRESHOLD, currency),
            standard_rate(),
        )
    }

    /// Category excluded from the discount.
    pub fn excluded_category(&self) -> &Category {
        &self.excluded_category
    }

    /// Spend threshold, inclusive.
    pub fn threshold(&self) -> &Money<'a, Currency> {
        &self.threshold
    }

    /// Discount rate.
    pub fn rate(&self) -> Percentage {
        self.rate
    }

    /// Compute the discount for `lines` under this policy.
    ///
    /// # Errors
    ///
    /// See [`compute_discount`].
    pub fn apply(&self, lines: &[CartLine<'a>]) -> Result<DiscountResult<'a>, DiscountError> {
        compute_discount(lines, &self.excluded_category, self.threshold, self.rate)
    }
}

/// Outcome of the tiered discount for a set of lines.
#[derive(Debug, Clone)]
pub struct DiscountResult<'a> {
    excluded_category: Category,
    eligible_subtotal: Money<'a, Currency>,
    grand_total: Money<'a, Currency>,
    discount_amount: Money<'a, Currency>,
    final_total: Money<'a, Currency>,
    threshold: Money<'a, Currency>,
    rate: Percentage,
    is_eligible: bool,
}

impl<'a> DiscountResult<'a> {
    /// Category that was left out of the eligible subtotal.
    pub fn excluded_category(&self) -> &Category {
        &self.excluded_category
    }

    /// Sum of line totals outside the excluded category.
    pub fn eligible_subtotal(&self) -> Money<'a, Currency> {
        self.eligible_subtotal
    }

    /// Whether the eligible subtotal reached the threshold.
    pub fn is_eligible(&self) -> bool {
        self.is_eligible
    }

    /// Discount taken off the grand total; zero when not eligible.
    pub fn discount_amount(&self) -> Money<'a, Currency> {
        self.discount_amount
    }

    /// Sum of every line total, before the discount.
    pub fn grand_total(&self) -> Money<'a, Currency> {
        self.grand_total
    }

    /// Grand total minus the discount.
    pub fn final_total(&self) -> Money<'a, Currency> {
        self.final_total
    }

    /// Threshold the eligible subtotal was measured against.
    pub fn threshold(&self) -> Money<'a, Currency> {
        self.threshold
    }

    /// Rate actually applied: the policy rate when eligible, zero otherwise.
    pub fn applied_rate(&self) -> Percentage {
        if self.is_eligible {
            self.rate
        } else {
            Percentage::from(Decimal::ZERO)
        }
    }

    /// Spend still needed in eligible categories to unlock the discount; zero once eligible.
    pub fn amount_to_threshold(&self) -> Money<'a, Currency> {
        let missing = self
            .threshold
            .to_minor_units()
            .saturating_sub(self.eligible_subtotal.to_minor_units());

        Money::from_minor(missing.max(0), self.threshold.currency())
    }

    /// Eligible subtotal as a share of the threshold, capped at 100%.
    pub fn progress(&self) -> Percentage {
        let threshold = self.threshold.to_minor_units();

        if threshold <= 0 {
            return Percentage::from(Decimal::ONE);
        }

        let ratio =
            Decimal::from(self.eligible_subtotal.to_minor_units()) / Decimal::from(threshold);

        Percentage::from(ratio.clamp(Decimal::ZERO, Decimal::ONE))
    }
}

/// Compute the tiered discount for `lines`.
///
/// Lines in `excluded_category` are left out of the eligible subtotal. The discount applies when
/// the eligible subtotal is at least `threshold` (inclusive) and is `round(eligible * rate)` in
/// whole major units. All amounts are in the threshold's currency.
///
/// # Errors
///
/// Returns a [`DiscountError`] if:
/// - a line is priced in a currency other than the threshold's (`DiscountError::Money`).
/// - the percentage calculation overflows (`DiscountError::PercentConversion`).
pub fn compute_discount<'a>(
    lines: &[CartLine<'a>],
    excluded_category: &Category,
    threshold: Money<'a, Currency>,
    rate: Percentage,
) -> Result<DiscountResult<'a>, DiscountError> {
    let currency = threshold.currency();

    let eligible_subtotal = total_price(
        lines
            .iter()
            .filter(|line| line.category() != excluded_category),
        currency,
    )?;

    let grand_total = total_price(lines, currency)?;

    let is_eligible = eligible_subtotal.to_minor_units() >= threshold.to_minor_units();

    let discount_minor = if is_eligible {
        percent_of_whole_units(&rate, eligible_subtotal.to_minor_units(), currency)?
    } else {
        0
    };

    let discount_amount = Money::from_minor(discount_minor, currency);
    let final_total = grand_total.sub(discount_amount)?;

    Ok(DiscountResult {
        excluded_category: excluded_category.clone(),
        eligible_subtotal,
        grand_total,
        discount_amount,
        final_total,
        threshold,
        rate,
        is_eligible,
    })
}

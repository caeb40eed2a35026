//! Orders
//!
//! Builds the immutable snapshot handed to the order submission collaborator. Assembly never
//! touches the ledger; the caller clears the cart once submission is confirmed.

use decimal_percentage::Percentage;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::info;

use crate::{
    discounts::DiscountResult, lines::CartLine, pricing::line_total, products::Category,
};

pub mod message;
pub mod records;

pub use message::handoff_url;
pub use records::{OrderLineRecord, OrderRecord};

/// Reasons an order cannot be assembled.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidOrderState {
    /// There are no lines to order
    #[error("empty cart")]
    EmptyCart,

    /// A required customer field is blank
    #[error("missing customer {0}")]
    MissingCustomerField(&'static str),
}

/// Customer contact details collected at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    /// Full name (required)
    pub name: String,

    /// Phone number (required)
    pub phone: String,

    /// Delivery address
    pub address: Option<String>,

    /// Email address
    pub email: Option<String>,
}

impl Customer {
    /// Create a customer with the required fields.
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            address: None,
            email: None,
        }
    }

    /// Set the delivery address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Set the email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Trim every field, dropping blank optional ones.
    fn normalized(self) -> Result<Self, InvalidOrderState> {
        let name = required(&self.name, "name")?;
        let phone = required(&self.phone, "phone")?;

        Ok(Self {
            name,
            phone,
            address: optional(self.address.as_deref()),
            email: optional(self.email.as_deref()),
        })
    }
}

fn required(value: &str, field: &'static str) -> Result<String, InvalidOrderState> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(InvalidOrderState::MissingCustomerField(field));
    }

    Ok(trimmed.to_string())
}

fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}

/// One line of a submitted order, frozen at submission time.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine<'a> {
    /// Catalog item identifier
    pub item_id: String,

    /// Display name
    pub name: String,

    /// Locked-in unit price
    pub unit_price: Money<'a, Currency>,

    /// Number of units
    pub quantity: u32,

    /// Category
    pub category: Category,

    /// Optional subcategory
    pub subcategory: Option<String>,

    /// Reference price, when the line was bought under a promotion
    pub original_price: Option<Money<'a, Currency>>,

    /// Promotion badge label
    pub promo_label: Option<String>,
}

impl<'a> OrderLine<'a> {
    /// Unit price times quantity.
    pub fn line_total(&self) -> Money<'a, Currency> {
        line_total(&self.unit_price, self.quantity)
    }
}

impl<'a> From<&CartLine<'a>> for OrderLine<'a> {
    fn from(line: &CartLine<'a>) -> Self {
        Self {
            item_id: line.item_id().to_string(),
            name: line.name().to_string(),
            unit_price: *line.unit_price(),
            quantity: line.quantity(),
            category: line.category().clone(),
            subcategory: line.subcategory().map(ToString::to_string),
            original_price: line.original_price().copied(),
            promo_label: line.promo_label().map(ToString::to_string),
        }
    }
}

/// Everything the submission collaborator needs to record an order.
#[derive(Debug, Clone)]
pub struct OrderSnapshot<'a> {
    lines: SmallVec<[OrderLine<'a>; 8]>,
    customer: Customer,
    excluded_category: Category,
    is_eligible: bool,
    applied_rate: Percentage,
    discount_amount: Money<'a, Currency>,
    grand_total: Money<'a, Currency>,
    final_total: Money<'a, Currency>,
}

impl<'a> OrderSnapshot<'a> {
    /// Ordered lines.
    pub fn lines(&self) -> &[OrderLine<'a>] {
        &self.lines
    }

    /// Customer contact details, trimmed.
    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    /// Category that did not earn the discount.
    pub fn excluded_category(&self) -> &Category {
        &self.excluded_category
    }

    /// Whether the tiered discount applied.
    pub fn is_eligible(&self) -> bool {
        self.is_eligible
    }

    /// Discount rate applied (zero when not eligible).
    pub fn applied_rate(&self) -> Percentage {
        self.applied_rate
    }

    /// Discount taken off the order.
    pub fn discount_amount(&self) -> Money<'a, Currency> {
        self.discount_amount
    }

    /// Sum of all line totals before the discount.
    pub fn grand_total(&self) -> Money<'a, Currency> {
        self.grand_total
    }

    /// Amount the customer pays.
    pub fn final_total(&self) -> Money<'a, Currency> {
        self.final_total
    }

    /// `(item id, quantity)` pairs for the per-product order counter.
    pub fn counter_increments(&self) -> impl Iterator<Item = (&str, u32)> {
        self.lines
            .iter()
            .map(|line| (line.item_id.as_str(), line.quantity))
    }
}

/// Assemble an order snapshot from the cart lines and their discount.
///
/// # Errors
///
/// Returns [`InvalidOrderState`] if `lines` is empty or the customer's name or phone is blank.
pub fn assemble<'a>(
    lines: &[CartLine<'a>],
    discount: &DiscountResult<'a>,
    customer: Customer,
) -> Result<OrderSnapshot<'a>, InvalidOrderState> {
    if lines.is_empty() {
        return Err(InvalidOrderState::EmptyCart);
    }

    let customer = customer.normalized()?;

    let snapshot = OrderSnapshot {
        lines: lines.iter().map(OrderLine::from).collect(),
        customer,
        excluded_category: discount.excluded_category().clone(),
        is_eligible: discount.is_eligible(),
        applied_rate: discount.applied_rate(),
        discount_amount: discount.discount_amount(),
        grand_total: discount.grand_total(),
        final_total: discount.final_total(),
    };

    info!(
        lines = snapshot.lines.len(),
        eligible = snapshot.is_eligible,
        discount = %snapshot.discount_amount,
        total = %snapshot.final_total,
        "assembled order"
    );

    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::CRC;
    use testresult::TestResult;

    use crate::{discounts::DiscountPolicy, pricing::from_major};

    use super::*;

    fn cart<'a>() -> Vec<CartLine<'a>> {
        vec![
            CartLine::new("ram-16", "RAM 16GB", from_major(26_000, CRC), "componentes")
                .with_quantity(2),
            CartLine::new("pc-gamer", "PC Gamer", from_major(500_000, CRC), "pc-completa"),
        ]
    }

    #[test]
    fn assemble_copies_lines_and_discount() -> TestResult {
        let lines = cart();
        let discount = DiscountPolicy::standard(CRC).apply(&lines)?;

        let order = assemble(&lines, &discount, Customer::new("Ana", "8888-0000"))?;

        assert_eq!(order.lines().len(), 2, "expected two order lines");

        let ram = order.lines().first().ok_or("missing ram line")?;
        let pc = order.lines().get(1).ok_or("missing pc line")?;

        assert_eq!(ram.item_id, "ram-16");
        assert_eq!(ram.quantity, 2);
        assert_eq!(pc.category, Category::PcCompleta);
        assert!(order.is_eligible());
        assert_eq!(order.discount_amount(), from_major(2_600, CRC));
        assert_eq!(order.grand_total(), from_major(552_000, CRC));
        assert_eq!(order.final_total(), from_major(549_400, CRC));

        Ok(())
    }

    #[test]
    fn empty_cart_is_rejected() -> TestResult {
        let discount = DiscountPolicy::standard(CRC).apply(&[])?;

        let result = assemble(&[], &discount, Customer::new("Ana", "8888-0000"));

        assert_eq!(result.err(), Some(InvalidOrderState::EmptyCart));
        assert_eq!(InvalidOrderState::EmptyCart.to_string(), "empty cart");

        Ok(())
    }

    #[test]
    fn blank_name_and_phone_are_rejected_by_field() -> TestResult {
        let lines = cart();
        let discount = DiscountPolicy::standard(CRC).apply(&lines)?;

        let no_name = assemble(&lines, &discount, Customer::new("   ", "8888-0000"));
        let no_phone = assemble(&lines, &discount, Customer::new("Ana", "\t"));

        assert_eq!(
            no_name.err(),
            Some(InvalidOrderState::MissingCustomerField("name"))
        );
        assert_eq!(
            no_phone.err(),
            Some(InvalidOrderState::MissingCustomerField("phone"))
        );
        assert_eq!(
            InvalidOrderState::MissingCustomerField("name").to_string(),
            "missing customer name"
        );
        assert_eq!(
            InvalidOrderState::MissingCustomerField("phone").to_string(),
            "missing customer phone"
        );

        Ok(())
    }

    #[test]
    fn customer_fields_are_trimmed() -> TestResult {
        let lines = cart();
        let discount = DiscountPolicy::standard(CRC).apply(&lines)?;
        let customer = Customer::new(" Ana Mora ", " 8888-0000")
            .with_address("  ")
            .with_email("ana@example.com ");

        let order = assemble(&lines, &discount, customer)?;

        assert_eq!(order.customer().name, "Ana Mora");
        assert_eq!(order.customer().phone, "8888-0000");
        assert_eq!(order.customer().address, None);
        assert_eq!(order.customer().email.as_deref(), Some("ana@example.com"));

        Ok(())
    }

    #[test]
    fn counter_increments_follow_lines() -> TestResult {
        let lines = cart();
        let discount = DiscountPolicy::standard(CRC).apply(&lines)?;

        let order = assemble(&lines, &discount, Customer::new("Ana", "8888-0000"))?;
        let increments: Vec<_> = order.counter_increments().collect();

        assert_eq!(increments, vec![("ram-16", 2), ("pc-gamer", 1)]);

        Ok(())
    }

    #[test]
    fn assembling_leaves_lines_untouched() -> TestResult {
        let lines = cart();
        let before = lines.clone();
        let discount = DiscountPolicy::standard(CRC).apply(&lines)?;

        assemble(&lines, &discount, Customer::new("Ana", "8888-0000"))?;

        assert_eq!(lines, before);

        Ok(())
    }
}

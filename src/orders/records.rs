//! Order records
//!
//! The row written by the order submission collaborator. Amounts are plain numbers in major units
//! and the discount rate is a fraction (`0.05`), matching the storefront's `orders` table.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{orders::OrderSnapshot, pricing::to_major_decimal, products::Category};

/// Persisted order line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLineRecord {
    /// Catalog item identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Unit price paid
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Number of units
    pub quantity: u32,

    /// Category slug
    pub category: Category,

    /// Subcategory, `null` when absent
    pub subcategory: Option<String>,

    /// Reference price for promotional lines
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub original_price: Option<Decimal>,

    /// Promotion badge label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_label: Option<String>,
}

/// Persisted order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Customer name
    pub customer_name: String,

    /// Customer phone
    pub customer_phone: String,

    /// Delivery address
    pub customer_address: Option<String>,

    /// Email address
    pub customer_email: Option<String>,

    /// Ordered lines
    pub products: Vec<OrderLineRecord>,

    /// Amount payable after the discount
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,

    /// Applied discount rate as a fraction, `0` when no discount applied
    #[serde(with = "rust_decimal::serde::float")]
    pub discount: Decimal,

    /// Discount amount
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_amount: Decimal,
}

impl OrderSnapshot<'_> {
    /// Build the persistence-ready record for this order.
    pub fn to_record(&self) -> OrderRecord {
        let customer = self.customer();

        OrderRecord {
            customer_name: customer.name.clone(),
            customer_phone: customer.phone.clone(),
            customer_address: customer.address.clone(),
            customer_email: customer.email.clone(),
            products: self
                .lines()
                .iter()
                .map(|line| OrderLineRecord {
                    id: line.item_id.clone(),
                    name: line.name.clone(),
                    price: to_major_decimal(&line.unit_price),
                    quantity: line.quantity,
                    category: line.category.clone(),
                    subcategory: line.subcategory.clone(),
                    original_price: line.original_price.as_ref().map(to_major_decimal),
                    promo_label: line.promo_label.clone(),
                })
                .collect(),
            total: to_major_decimal(&self.final_total()),
            discount: self.applied_rate() * Decimal::ONE,
            discount_amount: to_major_decimal(&self.discount_amount()),
        }
    }
}

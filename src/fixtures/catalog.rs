//! Catalog Fixtures

use jiff::Timestamp;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;

use crate::{fixtures::FixtureError, pricing::currency_by_code, products::CatalogItem};

/// Wrapper for catalog items in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Map of item id -> item fixture
    pub items: FxHashMap<String, ItemFixture>,
}

/// Catalog Item Fixture
#[derive(Debug, Deserialize)]
pub struct ItemFixture {
    /// Item name
    pub name: String,

    /// Reference price (e.g., "60000 CRC")
    pub price: String,

    /// Category slug
    pub category: String,

    /// Optional subcategory
    #[serde(default)]
    pub subcategory: Option<String>,

    /// Optional promotional price, same format as `price`
    #[serde(default)]
    pub promo_price: Option<String>,

    /// Optional promotion start (RFC 3339)
    #[serde(default)]
    pub promo_start: Option<Timestamp>,

    /// Optional promotion end (RFC 3339)
    #[serde(default)]
    pub promo_end: Option<Timestamp>,

    /// Optional promotion badge label
    #[serde(default)]
    pub promo_label: Option<String>,
}

impl ItemFixture {
    /// Build the catalog item with identifier `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if a price cannot be parsed, or if the promotional price is in a different
    /// currency from the reference price.
    pub fn into_item(self, id: String) -> Result<CatalogItem<'static>, FixtureError> {
        let (minor_units, currency) = parse_price(&self.price)?;

        let mut item = CatalogItem::new(
            id,
            self.name,
            Money::from_minor(minor_units, currency),
            self.category,
        );

        if let Some(subcategory) = self.subcategory {
            item = item.with_subcategory(subcategory);
        }

        if let Some(promo_price) = self.promo_price {
            let (promo_minor, promo_currency) = parse_price(&promo_price)?;

            if promo_currency != currency {
                return Err(FixtureError::CurrencyMismatch(
                    currency.iso_alpha_code.to_string(),
                    promo_currency.iso_alpha_code.to_string(),
                ));
            }

            item = item.with_promotion(
                Money::from_minor(promo_minor, currency),
                self.promo_start,
                self.promo_end,
            );
        }

        if let Some(label) = self.promo_label {
            item = item.with_promo_label(label);
        }

        Ok(item)
    }
}

/// Parse price string (e.g., "60000 CRC") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    if parts.len() != 2 {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    }

    let amount = parts
        .first()
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let currency_code = parts
        .get(1)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = currency_by_code(currency_code)
        .ok_or_else(|| FixtureError::UnknownCurrency((*currency_code).to_string()))?;

    let scale = 10_i64
        .checked_pow(currency.exponent)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::from(scale))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, currency))
}

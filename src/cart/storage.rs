//! Cart persistence
//!
//! The cart survives reloads through a small key-value store holding one JSON document: an array
//! of [`CartLineRecord`]s. Anything that fails to decode is treated as "no saved cart".

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::{lines::CartLine, pricing::to_major_decimal, products::Category};

/// Default storage key for the cart.
pub const DEFAULT_CART_KEY: &str = "cart";

/// Errors writing the cart to a store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error writing the backing file
    #[error("Failed to write cart: {0}")]
    Io(#[from] io::Error),

    /// The cart could not be encoded
    #[error("Failed to encode cart: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Persisted state that decoded but does not describe a valid cart.
#[derive(Debug, Error, PartialEq)]
pub enum MalformedPersistedCart {
    /// A line has no item identifier
    #[error("line {0} has an empty item id")]
    EmptyId(usize),

    /// A line has a quantity below 1
    #[error("line {0} has a non-positive quantity")]
    NonPositiveQuantity(String),

    /// A price is negative or cannot be represented in minor units
    #[error("line {0} has an invalid price")]
    InvalidPrice(String),

    /// Two lines share an item identifier
    #[error("item {0} appears more than once")]
    DuplicateItem(String),
}

/// Persisted form of a cart line.
///
/// Prices are stored as plain numbers in major units, the way the storefront has always written
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineRecord {
    /// Catalog item identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Locked-in unit price
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Number of units
    pub quantity: u32,

    /// Category slug
    pub category: Category,

    /// Optional subcategory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,

    /// Reference price when the line was added under a promotion
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub original_price: Option<Decimal>,

    /// Promotion badge label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_label: Option<String>,

    /// Whether the line was added under a promotion
    #[serde(default)]
    pub is_promo: bool,
}

impl From<&CartLine<'_>> for CartLineRecord {
    fn from(line: &CartLine<'_>) -> Self {
        Self {
            id: line.item_id().to_string(),
            name: line.name().to_string(),
            price: to_major_decimal(line.unit_price()),
            quantity: line.quantity(),
            category: line.category().clone(),
            subcategory: line.subcategory().map(ToString::to_string),
            original_price: line.original_price().map(to_major_decimal),
            promo_label: line.promo_label().map(ToString::to_string),
            is_promo: line.is_promo(),
        }
    }
}

impl CartLineRecord {
    /// Rebuild a cart line priced in `currency`.
    ///
    /// # Errors
    ///
    /// Returns a [`MalformedPersistedCart`] if the record does not describe a valid line.
    pub fn into_line(
        self,
        position: usize,
        currency: &Currency,
    ) -> Result<CartLine<'_>, MalformedPersistedCart> {
        if self.id.trim().is_empty() {
            return Err(MalformedPersistedCart::EmptyId(position));
        }

        if self.quantity < 1 {
            return Err(MalformedPersistedCart::NonPositiveQuantity(self.id));
        }

        let Some(unit_price) = from_decimal(self.price, currency) else {
            return Err(MalformedPersistedCart::InvalidPrice(self.id));
        };

        let original_price = match self.original_price {
            Some(amount) => match from_decimal(amount, currency) {
                Some(price) => Some(price),
                None => return Err(MalformedPersistedCart::InvalidPrice(self.id)),
            },
            None => None,
        };

        let mut line = CartLine::new(self.id, self.name, unit_price, self.category)
            .with_quantity(self.quantity);

        if let Some(subcategory) = self.subcategory {
            line = line.with_subcategory(subcategory);
        }

        if let Some(original_price) = original_price {
            line = line.with_original_price(original_price, self.promo_label);
        }

        Ok(line)
    }
}

/// Rebuild cart lines from records, rejecting the whole set if any record is invalid.
///
/// # Errors
///
/// Returns the first [`MalformedPersistedCart`] found.
pub fn lines_from_records(
    records: Vec<CartLineRecord>,
    currency: &Currency,
) -> Result<Vec<CartLine<'_>>, MalformedPersistedCart> {
    let mut lines: Vec<CartLine<'_>> = Vec::with_capacity(records.len());

    for (position, record) in records.into_iter().enumerate() {
        let line = record.into_line(position, currency)?;

        if lines.iter().any(|seen| seen.item_id() == line.item_id()) {
            return Err(MalformedPersistedCart::DuplicateItem(
                line.item_id().to_string(),
            ));
        }

        lines.push(line);
    }

    Ok(lines)
}

fn from_decimal(amount: Decimal, currency: &Currency) -> Option<Money<'_, Currency>> {
    if amount.is_sign_negative() {
        return None;
    }

    let scale = Decimal::from(10_i64.checked_pow(currency.exponent)?);

    let minor = amount.checked_mul(scale)?.round_dp(0).to_i64()?;

    Some(Money::from_minor(minor, currency))
}

/// Decode a stored document, logging and discarding anything that is not a record list.
fn decode(raw: &str, source: &str) -> Option<Vec<CartLineRecord>> {
    match serde_json::from_str(raw) {
        Ok(records) => Some(records),
        Err(err) => {
            warn!(source, error = %err, "discarding unreadable persisted cart");
            None
        }
    }
}

/// Key-value persistence for the cart.
pub trait CartStore {
    /// Load the saved cart. Missing or unreadable state yields `None`.
    fn load(&self) -> Option<Vec<CartLineRecord>>;

    /// Replace the saved cart.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the cart cannot be encoded or written.
    fn save(&mut self, lines: &[CartLineRecord]) -> Result<(), StoreError>;
}

/// In-memory store, keyed like browser local storage.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    key: String,
    entries: FxHashMap<String, String>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::with_key(DEFAULT_CART_KEY)
    }
}

impl MemoryStore {
    /// Create an empty store using the default cart key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that saves the cart under `key`.
    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            entries: FxHashMap::default(),
        }
    }

    /// Overwrite the raw document stored under the cart key.
    pub fn put_raw(&mut self, raw: impl Into<String>) {
        self.entries.insert(self.key.clone(), raw.into());
    }

    /// Raw document stored under the cart key.
    pub fn raw(&self) -> Option<&str> {
        self.entries.get(&self.key).map(String::as_str)
    }
}

impl CartStore for MemoryStore {
    fn load(&self) -> Option<Vec<CartLineRecord>> {
        decode(self.raw()?, &self.key)
    }

    fn save(&mut self, lines: &[CartLineRecord]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(lines)?;
        self.put_raw(raw);

        Ok(())
    }
}

/// File-backed store: one JSON file per key in a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store the cart at `<dir>/<key>.json`.
    pub fn in_dir(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{key}.json")),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartStore for FileStore {
    fn load(&self) -> Option<Vec<CartLineRecord>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => decode(&raw, &self.path.display().to_string()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "could not read persisted cart");
                None
            }
        }
    }

    fn save(&mut self, lines: &[CartLineRecord]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.path, serde_json::to_vec(lines)?)?;

        Ok(())
    }
}

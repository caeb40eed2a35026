//! Fixtures

use std::{fs, path::PathBuf};

use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{cart::CartLedger, fixtures::catalog::CatalogFixture, products::CatalogItem};

pub mod catalog;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Catalog item not found
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// Currency mismatch between items
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No items loaded yet
    #[error("No items loaded yet; currency unknown")]
    NoCurrency,
}

/// Fixture
#[derive(Debug)]
pub struct Fixture<'a> {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Catalog items, in id order
    items: Vec<CatalogItem<'a>>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl<'a> Fixture<'a> {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            items: Vec::new(),
            currency: None,
        }
    }

    /// Load catalog items from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if there are currency mismatches.
    pub fn load_catalog(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("catalogs").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CatalogFixture = serde_norway::from_str(&contents)?;

        let mut entries: Vec<_> = fixture.items.into_iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));

        for (id, item_fixture) in entries {
            let item = item_fixture.into_item(id)?;
            let currency = item.currency();

            // Validate currency consistency
            if let Some(existing_currency) = self.currency {
                if existing_currency != currency {
                    return Err(FixtureError::CurrencyMismatch(
                        existing_currency.iso_alpha_code.to_string(),
                        currency.iso_alpha_code.to_string(),
                    ));
                }
            } else {
                self.currency = Some(currency);
            }

            self.items.retain(|existing| existing.id != item.id);
            self.items.push(item);
        }

        self.items.sort_by(|a, b| a.id.cmp(&b.id));

        Ok(self)
    }

    /// Load a catalog fixture by name
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub fn from_catalog(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_catalog(name)?;

        Ok(fixture)
    }

    /// Get a catalog item by its id
    ///
    /// # Errors
    ///
    /// Returns an error if the item is not found.
    pub fn item(&self, id: &str) -> Result<&CatalogItem<'a>, FixtureError> {
        self.items
            .iter()
            .find(|item| item.id == id)
            .ok_or_else(|| FixtureError::ItemNotFound(id.to_string()))
    }

    /// Get all catalog items
    pub fn items(&self) -> &[CatalogItem<'a>] {
        &self.items
    }

    /// Create an empty cart in the catalog currency
    ///
    /// # Errors
    ///
    /// Returns an error if no items have been loaded yet.
    pub fn ledger(&self) -> Result<CartLedger<'a>, FixtureError> {
        Ok(CartLedger::new(self.currency()?))
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no items have been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }
}

impl Default for Fixture<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use rusty_money::{Money, iso::CRC};
    use testresult::TestResult;

    use super::*;

    fn write_catalog(base: &Path, name: &str, contents: &str) -> TestResult {
        let dir = base.join("catalogs");

        fs::create_dir_all(&dir)?;
        fs::write(dir.join(format!("{name}.yml")), contents)?;

        Ok(())
    }

    #[test]
    fn fixture_loads_store_catalog() -> TestResult {
        let fixture = Fixture::from_catalog("tienda")?;

        assert!(!fixture.items().is_empty());
        assert_eq!(fixture.currency()?, CRC);

        let ids: Vec<&str> = fixture.items().iter().map(|item| item.id.as_str()).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();

        assert_eq!(ids, sorted);

        Ok(())
    }

    #[test]
    fn fixture_item_lookup() -> TestResult {
        let dir = tempfile::tempdir()?;
        write_catalog(
            dir.path(),
            "mini",
            "items:\n  mouse:\n    name: Mouse\n    price: 12000 CRC\n    category: accesorios\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_catalog("mini")?;

        assert_eq!(fixture.item("mouse")?.price, Money::from_minor(1_200_000, CRC));
        assert!(matches!(
            fixture.item("teclado"),
            Err(FixtureError::ItemNotFound(id)) if id == "teclado"
        ));

        Ok(())
    }

    #[test]
    fn fixture_rejects_mixed_currencies() -> TestResult {
        let dir = tempfile::tempdir()?;
        write_catalog(
            dir.path(),
            "mixed",
            "items:\n  a:\n    name: A\n    price: 1000 CRC\n    category: accesorios\n  \
             b:\n    name: B\n    price: 10 USD\n    category: accesorios\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        let result = fixture.load_catalog("mixed");

        assert!(matches!(result, Err(FixtureError::CurrencyMismatch(_, _))));

        Ok(())
    }

    #[test]
    fn fixture_no_currency_returns_error() {
        let fixture = Fixture::new();

        assert!(matches!(fixture.currency(), Err(FixtureError::NoCurrency)));
        assert!(matches!(fixture.ledger(), Err(FixtureError::NoCurrency)));
    }

    #[test]
    fn fixture_missing_file_is_io_error() {
        let mut fixture = Fixture::with_base_path("./does-not-exist");

        assert!(matches!(fixture.load_catalog("tienda"), Err(FixtureError::Io(_))));
    }

    #[test]
    fn fixture_default_matches_new() {
        let fixture = Fixture::default();

        assert_eq!(fixture.base_path, PathBuf::from("./fixtures"));
    }
}

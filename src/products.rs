//! Products
//!
//! Catalog items as they arrive from the catalog source. The cart never fetches these itself; it
//! receives items already resolved.

use std::fmt;

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

/// Product category.
///
/// The storefront works with a closed set of categories, but values are carried verbatim: any
/// other string is kept as [`Category::Other`] rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    /// Fully assembled PCs (`pc-completa`).
    PcCompleta,

    /// Individual components (`componentes`).
    Componentes,

    /// Peripherals and accessories (`accesorios`).
    Accesorios,

    /// A category outside the known set, kept as given.
    Other(String),
}

impl Category {
    /// Return the category slug.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Category::PcCompleta => "pc-completa",
            Category::Componentes => "componentes",
            Category::Accesorios => "accesorios",
            Category::Other(slug) => slug,
        }
    }
}

impl From<&str> for Category {
    fn from(slug: &str) -> Self {
        match slug {
            "pc-completa" => Category::PcCompleta,
            "componentes" => Category::Componentes,
            "accesorios" => Category::Accesorios,
            other => Category::Other(other.to_string()),
        }
    }
}

impl From<String> for Category {
    fn from(slug: String) -> Self {
        Category::from(slug.as_str())
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Other(slug) => slug,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog item
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem<'a> {
    /// Stable product identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Reference (non-promotional) unit price
    pub price: Money<'a, Currency>,

    /// Product category
    pub category: Category,

    /// Optional subcategory, meaningful only within the category
    pub subcategory: Option<String>,

    /// Optional promotional unit price
    pub promo_price: Option<Money<'a, Currency>>,

    /// Start of the promotion window (inclusive)
    pub promo_start: Option<Timestamp>,

    /// End of the promotion window (inclusive)
    pub promo_end: Option<Timestamp>,

    /// Short label for the promotion badge
    pub promo_label: Option<String>,
}

impl<'a> CatalogItem<'a> {
    /// Create a catalog item without any promotion.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Money<'a, Currency>,
        category: impl Into<Category>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            category: category.into(),
            subcategory: None,
            promo_price: None,
            promo_start: None,
            promo_end: None,
            promo_label: None,
        }
    }

    /// Set the subcategory.
    #[must_use]
    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    /// Attach a promotional price with an optional activation window.
    #[must_use]
    pub fn with_promotion(
        mut self,
        promo_price: Money<'a, Currency>,
        start: Option<Timestamp>,
        end: Option<Timestamp>,
    ) -> Self {
        self.promo_price = Some(promo_price);
        self.promo_start = start;
        self.promo_end = end;
        self
    }

    /// Set the promotion badge label.
    #[must_use]
    pub fn with_promo_label(mut self, label: impl Into<String>) -> Self {
        self.promo_label = Some(label.into());
        self
    }

    /// Currency the item is priced in.
    pub fn currency(&self) -> &'a Currency {
        self.price.currency()
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::CRC;

    use super::*;

    #[test]
    fn known_categories_round_trip_through_slugs() {
        for slug in ["pc-completa", "componentes", "accesorios"] {
            let category = Category::from(slug);

            assert!(!matches!(category, Category::Other(_)), "{slug} should be known");
            assert_eq!(category.as_str(), slug);
            assert_eq!(String::from(category), slug);
        }
    }

    #[test]
    fn unknown_category_is_kept_verbatim() {
        let category = Category::from("monitores");

        assert_eq!(category, Category::Other("monitores".to_string()));
        assert_eq!(category.to_string(), "monitores");
    }

    #[test]
    fn category_serializes_as_plain_string() -> testresult::TestResult {
        let json = serde_json::to_string(&Category::PcCompleta)?;
        let parsed: Category = serde_json::from_str("\"accesorios\"")?;

        assert_eq!(json, "\"pc-completa\"");
        assert_eq!(parsed, Category::Accesorios);

        Ok(())
    }

    #[test]
    fn builder_sets_optional_fields() {
        let item =
            CatalogItem::new("B", "RTX 4060", Money::from_minor(6_000_000, CRC), "componentes")
                .with_subcategory("tarjetas-graficas")
                .with_promotion(Money::from_minor(5_400_000, CRC), None, None)
                .with_promo_label("Black Friday");

        assert_eq!(item.category, Category::Componentes);
        assert_eq!(item.subcategory.as_deref(), Some("tarjetas-graficas"));
        assert_eq!(item.promo_price, Some(Money::from_minor(5_400_000, CRC)));
        assert_eq!(item.promo_label.as_deref(), Some("Black Friday"));
        assert_eq!(item.currency(), CRC);
    }
}

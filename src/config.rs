//! Configuration
//!
//! Pricing policy read from YAML. Every key is optional; a missing key takes the storefront's
//! standard value.

use std::{fs, path::Path};

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    cart::storage::DEFAULT_CART_KEY,
    discounts::{
        DiscountPolicy,
        tiered::{DISCOUNT_THRESHOLD, EXCLUDED_CATEGORY},
    },
    pricing::{currency_by_code, from_major},
    products::Category,
};

/// Spend tolerance (major units) around the missing amount when suggesting a top-up item.
pub const DEFAULT_SUGGESTION_TOLERANCE: i64 = 5_000;

/// Number of related items shown for a product.
pub const DEFAULT_RELATED_LIMIT: usize = 4;

/// Store phone number that receives order handoff messages.
pub const DEFAULT_HANDOFF_PHONE: &str = "50671604429";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading the configuration file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Invalid percentage format or value
    #[error("Invalid percentage: {0}")]
    InvalidPercentage(String),

    /// An amount that must not be negative is
    #[error("{0} must not be negative")]
    NegativeAmount(&'static str),
}

/// Pricing configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PricingConfig {
    /// ISO code of the store currency
    pub currency: String,

    /// Tiered discount settings
    pub discount: DiscountConfig,

    /// Suggestion settings
    pub suggestions: SuggestionsConfig,

    /// Order handoff settings
    pub handoff: HandoffConfig,

    /// Cart persistence settings
    pub storage: StorageConfig,
}

/// Tiered discount settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscountConfig {
    /// Category that neither counts towards nor earns the discount
    pub excluded_category: Category,

    /// Spend threshold in major units, inclusive
    pub threshold: i64,

    /// Discount rate, as `"5%"` or `"0.05"`
    pub rate: String,
}

/// Suggestion settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuggestionsConfig {
    /// Tolerance in major units around the amount still needed
    pub tolerance: i64,

    /// Maximum number of related items
    pub related_limit: usize,
}

/// Order handoff settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HandoffConfig {
    /// Phone number, international format without `+`
    pub phone: String,
}

/// Cart persistence settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Key the cart is stored under
    pub key: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            currency: "CRC".to_string(),
            discount: DiscountConfig::default(),
            suggestions: SuggestionsConfig::default(),
            handoff: HandoffConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Default for DiscountConfig {
    fn default() -> Self {
        Self {
            excluded_category: EXCLUDED_CATEGORY,
            threshold: DISCOUNT_THRESHOLD,
            rate: "5%".to_string(),
        }
    }
}

impl Default for SuggestionsConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_SUGGESTION_TOLERANCE,
            related_limit: DEFAULT_RELATED_LIMIT,
        }
    }
}

impl Default for HandoffConfig {
    fn default() -> Self {
        Self {
            phone: DEFAULT_HANDOFF_PHONE.to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key: DEFAULT_CART_KEY.to_string(),
        }
    }
}

impl PricingConfig {
    /// Parse and validate a YAML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or a value is invalid.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_norway::from_str(contents)?;

        config.validate()?;

        Ok(config)
    }

    /// Read, parse and validate a YAML configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or [`PricingConfig::from_yaml_str`] fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml_str(&contents)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.currency()?;
        self.rate()?;

        if self.discount.threshold < 0 {
            return Err(ConfigError::NegativeAmount("discount.threshold"));
        }

        if self.suggestions.tolerance < 0 {
            return Err(ConfigError::NegativeAmount("suggestions.tolerance"));
        }

        Ok(())
    }

    /// Store currency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCurrency`] if the code is not supported.
    pub fn currency(&self) -> Result<&'static Currency, ConfigError> {
        currency_by_code(&self.currency)
            .ok_or_else(|| ConfigError::UnknownCurrency(self.currency.clone()))
    }

    /// Discount rate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPercentage`] if the rate cannot be parsed.
    pub fn rate(&self) -> Result<Percentage, ConfigError> {
        parse_percentage(&self.discount.rate)
    }

    /// Build the tiered discount policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the currency or rate is invalid.
    pub fn discount_policy(&self) -> Result<DiscountPolicy<'static>, ConfigError> {
        let currency = self.currency()?;

        Ok(DiscountPolicy::new(
            self.discount.excluded_category.clone(),
            from_major(self.discount.threshold, currency),
            self.rate()?,
        ))
    }

    /// Tolerance for top-up suggestions.
    ///
    /// # Errors
    ///
    /// Returns an error if the currency is invalid.
    pub fn suggestion_tolerance(&self) -> Result<Money<'static, Currency>, ConfigError> {
        Ok(from_major(self.suggestions.tolerance, self.currency()?))
    }
}

/// Parse a percentage string (e.g., "5%" or "0.05") into a `Percentage`.
///
/// Values must lie between 0% and 100%.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidPercentage`] if the string cannot be parsed or is out of range.
pub fn parse_percentage(s: &str) -> Result<Percentage, ConfigError> {
    let trimmed = s.trim();
    let invalid = || ConfigError::InvalidPercentage(s.to_string());

    let fraction = if let Some(points) = trimmed.strip_suffix('%') {
        points
            .trim()
            .parse::<Decimal>()
            .map_err(|_err| invalid())?
            .checked_div(Decimal::ONE_HUNDRED)
            .ok_or_else(invalid)?
    } else {
        trimmed.parse::<Decimal>().map_err(|_err| invalid())?
    };

    if fraction.is_sign_negative() || fraction > Decimal::ONE {
        return Err(invalid());
    }

    Ok(Percentage::from(fraction))
}

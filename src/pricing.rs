//! Prices

use std::fmt::Write;

use rust_decimal::Decimal;
use rusty_money::{
    Money, MoneyError,
    iso::{CRC, Currency, EUR, USD},
};

use crate::lines::CartLine;

/// Price of `quantity` units at `unit_price`.
pub fn line_total<'a>(unit_price: &Money<'a, Currency>, quantity: u32) -> Money<'a, Currency> {
    Money::from_minor(
        unit_price
            .to_minor_units()
            .saturating_mul(i64::from(quantity)),
        unit_price.currency(),
    )
}

/// Look up a supported currency by ISO code.
pub fn currency_by_code(code: &str) -> Option<&'static Currency> {
    match code {
        "CRC" => Some(CRC),
        "USD" => Some(USD),
        "EUR" => Some(EUR),
        _ => None,
    }
}

/// Money for a whole number of major units (e.g. colones).
pub fn from_major(amount: i64, currency: &Currency) -> Money<'_, Currency> {
    let scale = 10_i64.checked_pow(currency.exponent).unwrap_or(1);

    Money::from_minor(amount.saturating_mul(scale), currency)
}

/// Amount in major units as a decimal (e.g. `2600.00` for 260,000 minor units of `CRC`).
pub fn to_major_decimal(money: &Money<'_, Currency>) -> Decimal {
    Decimal::new(money.to_minor_units(), money.currency().exponent)
}

/// Calculates the total price of a list of cart lines, in `currency`.
///
/// An empty list totals zero.
///
/// # Errors
///
/// Returns a [`MoneyError`] if a line is priced in a different currency.
pub fn total_price<'a, 'l>(
    lines: impl IntoIterator<Item = &'l CartLine<'a>>,
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, MoneyError>
where
    'a: 'l,
{
    lines
        .into_iter()
        .try_fold(Money::from_minor(0, currency), |acc, line| {
            acc.add(line.line_total())
        })
}

/// Render an amount as its currency symbol and whole units with thousands separators
/// (e.g. `₡552,000`). Fractional digits are only shown when non-zero.
pub fn format_amount(money: &Money<'_, Currency>) -> String {
    let currency = money.currency();
    let minor = money.to_minor_units();
    let scale = 10_u64.checked_pow(currency.exponent).unwrap_or(1);

    let magnitude = minor.unsigned_abs();
    let whole = magnitude / scale;
    let fraction = magnitude % scale;

    let sign = if minor < 0 { "-" } else { "" };
    let mut rendered = format!("{sign}{}{}", currency.symbol, group_thousands(whole));

    if fraction != 0 {
        let width = usize::try_from(currency.exponent).unwrap_or(0);
        _ = write!(rendered, ".{fraction:0width$}");
    }

    rendered
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);

    for (idx, digit) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            grouped.push(',');
        }

        grouped.push(digit);
    }

    grouped
}

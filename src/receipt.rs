//! Receipt
//!
//! Tabular rendering of the cart with its tiered discount, for terminals and logs.

use std::io;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::CartLedger, discounts::DiscountResult, lines::CartLine, pricing::format_amount,
};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Receipt for a priced cart.
#[derive(Debug, Clone)]
pub struct CartReceipt<'a> {
    /// Total of every line before the discount
    subtotal: Money<'a, Currency>,

    /// Discount taken off the subtotal
    discount: Money<'a, Currency>,

    /// Amount payable
    total: Money<'a, Currency>,

    /// Rate applied, zero when not eligible
    rate: Percentage,

    /// Spend still needed to unlock the discount
    to_threshold: Money<'a, Currency>,

    /// Whether the eligible subtotal reached the threshold
    is_eligible: bool,
}

impl<'a> CartReceipt<'a> {
    /// Build a receipt from the discount computed over the cart.
    pub fn from_discount(discount: &DiscountResult<'a>) -> Self {
        Self {
            subtotal: discount.grand_total(),
            discount: discount.discount_amount(),
            total: discount.final_total(),
            rate: discount.applied_rate(),
            to_threshold: discount.amount_to_threshold(),
            is_eligible: discount.is_eligible(),
        }
    }

    /// Total before the discount
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Amount payable
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Amount saved through the discount.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.subtotal.sub(self.total)
    }

    /// Writes the receipt for the lines in `ledger`.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be written.
    pub fn write_to(
        &self,
        mut out: impl io::Write,
        ledger: &CartLedger<'_>,
    ) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record([
            "",
            "Item",
            "Category",
            "Unit Price",
            "Was",
            "Qty",
            "Line Total",
        ]);

        for (idx, line) in ledger.iter().enumerate() {
            builder.push_record(line_row(idx, line));
        }

        write_table(&mut out, builder)?;
        self.write_summary(&mut out)
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let mut rows: Vec<(&str, String)> = vec![("Subtotal:", format_amount(&self.subtotal))];

        if self.is_eligible {
            rows.push((
                "Discount:",
                format!(
                    "({}%) -{}",
                    percent_points(self.rate),
                    format_amount(&self.discount)
                ),
            ));
        } else {
            rows.push((
                "Discount:",
                format!("{} to unlock", format_amount(&self.to_threshold)),
            ));
        }

        rows.push(("Total:", format_amount(&self.total)));

        let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        let value_width = rows
            .iter()
            .map(|(_, value)| value.chars().count())
            .max()
            .unwrap_or(0);

        for (label, value) in rows {
            writeln!(out, " {label:>label_width$}  {value:>value_width$}")?;
        }

        writeln!(out)?;

        Ok(())
    }
}

fn line_row(idx: usize, line: &CartLine<'_>) -> [String; 7] {
    let was = line
        .original_price()
        .map(format_amount)
        .unwrap_or_default();

    let name = match line.promo_label() {
        Some(label) => format!("{} [{label}]", line.name()),
        None => line.name().to_string(),
    };

    [
        format!("#{}", idx + 1),
        name,
        line.category().to_string(),
        format_amount(line.unit_price()),
        was,
        line.quantity().to_string(),
        format_amount(&line.line_total()),
    ]
}

fn write_table(out: &mut impl io::Write, builder: Builder) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(3..7), Alignment::right());

    writeln!(out, "\n{table}")?;

    Ok(())
}

/// Converts a fractional percentage to whole percent points for display.
fn percent_points(percentage: Percentage) -> Decimal {
    (percentage * Decimal::ONE_HUNDRED).normalize()
}

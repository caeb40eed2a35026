//! Handoff message
//!
//! Plain-text order summary sent to the store over `WhatsApp` once the order has been recorded.

use std::fmt::Write;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rust_decimal::Decimal;

use crate::{orders::OrderSnapshot, pricing::format_amount};

/// Characters left unescaped in the message text: alphanumerics and `-_.!~*'()`.
const MESSAGE_TEXT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Note appended to lines that do not earn the discount.
const EXCLUDED_NOTE: &str = " (PC, sin descuento)";

/// Length of the order id prefix shown in the header.
const ORDER_ID_PREFIX: usize = 8;

impl OrderSnapshot<'_> {
    /// Render the order summary for the store, headed by the first characters of `order_id`.
    pub fn summary_message(&self, order_id: &str) -> String {
        let short_id: String = order_id.chars().take(ORDER_ID_PREFIX).collect();
        let mut message = format!("📦 NUEVO PEDIDO #{short_id}\n\n");

        let items: Vec<String> = self
            .lines()
            .iter()
            .map(|line| {
                let note = if &line.category == self.excluded_category() {
                    EXCLUDED_NOTE
                } else {
                    ""
                };

                format!(
                    "- {}{note} x{} = {}",
                    line.name,
                    line.quantity,
                    format_amount(&line.line_total())
                )
            })
            .collect();

        message.push_str(&items.join("\n"));

        _ = write!(message, "\n\nSubtotal: {}", format_amount(&self.grand_total()));

        if self.is_eligible() {
            let points = (self.applied_rate() * Decimal::ONE_HUNDRED).normalize();

            _ = write!(
                message,
                "\n✅ Descuento ({points}%): -{}",
                format_amount(&self.discount_amount())
            );
        }

        let customer = self.customer();

        _ = write!(
            message,
            "\nTotal: {}\n\nNombre: {}\nTeléfono: {}",
            format_amount(&self.final_total()),
            customer.name,
            customer.phone
        );

        if let Some(address) = &customer.address {
            _ = write!(message, "\nDirección: {address}");
        }

        if let Some(email) = &customer.email {
            _ = write!(message, "\nEmail: {email}");
        }

        message
    }
}

/// Link that opens a `WhatsApp` chat with `phone`, prefilled with `message`.
pub fn handoff_url(phone: &str, message: &str) -> String {
    format!(
        "https://wa.me/{phone}?text={}",
        utf8_percent_encode(message, MESSAGE_TEXT)
    )
}

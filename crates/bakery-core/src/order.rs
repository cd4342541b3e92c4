//! Ordering happens over WhatsApp; the storefront only builds the link.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::products::{format_price, Product};

/// Builds a `wa.me` deep link that opens a chat pre-filled with an order
/// message for `product` at its effective price.
///
/// `number` must already be digits only (see the config loader).
#[must_use]
pub fn whatsapp_order_link(number: &str, product: &Product) -> String {
    let mut message = format!(
        "Hello! I would like to order \"{}\" (NRs. {})",
        product.name,
        format_price(product.effective_price())
    );
    if product.has_discount() {
        message.push_str(&format!(" with {}% off", product.discount.percent()));
    }
    message.push('.');
    format!(
        "https://wa.me/{number}?text={}",
        utf8_percent_encode(&message, NON_ALPHANUMERIC)
    )
}

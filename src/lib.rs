//! Mostrador
//!
//! Mostrador is the cart pricing engine of a PC storefront: promotion windows, cart lines, the
//! cart ledger, a spend-tiered order discount and order assembly for checkout handoff.

pub mod cart;
pub mod config;
pub mod discounts;
pub mod fixtures;
pub mod lines;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod promotions;
pub mod receipt;
pub mod suggestions;
pub mod utils;

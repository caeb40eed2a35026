//! Mostrador prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{
        CartError, CartLedger,
        observer::{CartObserver, NoopObserver},
        storage::{CartLineRecord, CartStore, FileStore, MemoryStore, StoreError},
    },
    config::{ConfigError, PricingConfig},
    discounts::{DiscountError, DiscountPolicy, DiscountResult, compute_discount},
    fixtures::{Fixture, FixtureError},
    lines::CartLine,
    orders::{
        Customer, InvalidOrderState, OrderLine, OrderRecord, OrderSnapshot, assemble, handoff_url,
    },
    pricing::{format_amount, from_major},
    products::{CatalogItem, Category},
    promotions::{EffectivePrice, PromotionWindow, effective_price, is_promotion_active},
    receipt::{CartReceipt, ReceiptError},
    suggestions::{RelatedItem, related_items, suggest_top_up},
};

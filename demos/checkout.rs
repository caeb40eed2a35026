//! Checkout Example
//!
//! Prices a cart from a catalog fixture, prints its receipt and discount suggestions, then
//! assembles the order and prints the record and handoff link.
//!
//! Use `-a` to choose the catalog ids to add (comma separated, one unit each)
//! Use `-k` to load a different catalog fixture
//! Use `--now` to price the cart at a fixed instant

use std::io;

use anyhow::Result;
use clap::Parser;
use jiff::Timestamp;
use mostrador::{
    cart::{CartLedger, storage::FileStore},
    config::PricingConfig,
    discounts::DiscountResult,
    fixtures::Fixture,
    orders::{assemble, handoff_url},
    pricing::format_amount,
    receipt::CartReceipt,
    suggestions::{related_items, suggest_top_up},
    utils::CheckoutDemoArgs,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Checkout Example
pub fn main() -> Result<()> {
    let args = CheckoutDemoArgs::parse();

    init_logging(&args.log_level);

    let config = PricingConfig::load(&args.config)?;
    let policy = config.discount_policy()?;
    let fixture = Fixture::from_catalog(&args.catalog)?;
    let now = args.now();

    let mut store = FileStore::in_dir(&args.state_dir, &config.storage.key);
    let mut ledger = CartLedger::restore(&store, config.currency()?);

    for id in &args.items {
        ledger.add(fixture.item(id)?, now)?;
    }

    ledger.persist(&mut store)?;

    let discount = policy.apply(ledger.lines())?;

    CartReceipt::from_discount(&discount).write_to(io::stdout().lock(), &ledger)?;

    print_suggestions(&config, &fixture, &ledger, &discount, now)?;

    let order = assemble(ledger.lines(), &discount, args.customer())?;
    let order_id = format!("{:016x}", now.as_nanosecond().unsigned_abs());

    print_order(
        &serde_json::to_string_pretty(&order.to_record())?,
        &order.summary_message(&order_id),
        &config.handoff.phone,
    );

    for (item_id, quantity) in order.counter_increments() {
        info!(item_id, quantity, "order counter increment");
    }

    ledger.clear();
    ledger.persist(&mut store)?;

    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_err| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .compact()
        .with_target(true)
        .with_env_filter(filter)
        .init();
}

#[expect(clippy::print_stdout, reason = "Example code")]
fn print_suggestions(
    config: &PricingConfig,
    fixture: &Fixture<'_>,
    ledger: &CartLedger<'_>,
    discount: &DiscountResult<'_>,
    now: Timestamp,
) -> Result<()> {
    let tolerance = config.suggestion_tolerance()?;

    if let Some(item) = suggest_top_up(fixture.items(), discount, tolerance, ledger.is_empty()) {
        println!(
            "Add {} ({}) to unlock the discount",
            item.name,
            format_amount(&item.price)
        );
    }

    let Some(item) = ledger
        .iter()
        .next()
        .and_then(|line| fixture.item(line.item_id()).ok())
    else {
        println!();
        return Ok(());
    };

    let related = related_items(fixture.items(), item, config.suggestions.related_limit, now);

    if !related.is_empty() {
        println!("Related to {}:", item.name);

        for related in related {
            let badge = related
                .price
                .discount_percent
                .map(|percent| format!(" (-{percent}%)"))
                .unwrap_or_default();

            println!(
                "  - {} {}{badge}",
                related.item.name,
                format_amount(&related.price.unit_price)
            );
        }
    }

    println!();

    Ok(())
}

#[expect(clippy::print_stdout, reason = "Example code")]
fn print_order(record: &str, message: &str, phone: &str) {
    println!("Order record:\n{record}\n");
    println!("{message}\n");
    println!("{}", handoff_url(phone, message));
}

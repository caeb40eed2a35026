//! Integration tests for saving and restoring the cart through a file store.

use std::fs;

use jiff::Timestamp;
use rusty_money::iso::{CRC, USD};
use testresult::TestResult;

use mostrador::prelude::*;

fn now() -> Result<Timestamp, jiff::Error> {
    "2026-03-10T12:00:00Z".parse()
}

#[test]
fn cart_survives_a_restart() -> TestResult {
    let dir = tempfile::tempdir()?;
    let fixture = Fixture::from_catalog("tienda")?;
    let now = now()?;

    let mut store = FileStore::in_dir(dir.path(), "cart");
    let mut ledger = fixture.ledger()?;

    ledger.add(fixture.item("ssd-nvme-1tb")?, now)?;
    ledger.add(fixture.item("ssd-nvme-1tb")?, now)?;
    ledger.add(fixture.item("teclado-mecanico")?, now)?;
    ledger.persist(&mut store)?;

    let restored = CartLedger::restore(&FileStore::in_dir(dir.path(), "cart"), CRC);

    assert_eq!(restored.lines(), ledger.lines());
    assert_eq!(restored.total_items(), 3);
    assert_eq!(restored.total_price(), from_major(135_000, CRC));

    let ssd = restored.get("ssd-nvme-1tb").ok_or("ssd line missing")?;

    assert!(ssd.is_promo());
    assert_eq!(ssd.original_price(), Some(&from_major(60_000, CRC)));

    Ok(())
}

#[test]
fn missing_file_restores_empty_cart() -> TestResult {
    let dir = tempfile::tempdir()?;
    let store = FileStore::in_dir(dir.path().join("never-written"), "cart");

    assert!(CartLedger::restore(&store, CRC).is_empty());

    Ok(())
}

#[test]
fn corrupt_file_restores_empty_cart() -> TestResult {
    let dir = tempfile::tempdir()?;
    let store = FileStore::in_dir(dir.path(), "cart");

    fs::write(store.path(), "{not json")?;

    assert!(CartLedger::restore(&store, CRC).is_empty());

    Ok(())
}

#[test]
fn invalid_records_restore_empty_cart() -> TestResult {
    let dir = tempfile::tempdir()?;
    let store = FileStore::in_dir(dir.path(), "cart");

    fs::write(
        store.path(),
        r#"[{"id":"a","name":"A","price":1000,"quantity":0,"category":"accesorios"}]"#,
    )?;

    assert!(CartLedger::restore(&store, CRC).is_empty());

    Ok(())
}

#[test]
fn clearing_and_persisting_empties_the_store() -> TestResult {
    let dir = tempfile::tempdir()?;
    let fixture = Fixture::from_catalog("tienda")?;
    let mut store = FileStore::in_dir(dir.path(), "cart");
    let mut ledger = fixture.ledger()?;

    ledger.add(fixture.item("mouse-gamer")?, now()?)?;
    ledger.persist(&mut store)?;
    ledger.clear();
    ledger.persist(&mut store)?;

    assert_eq!(fs::read_to_string(store.path())?, "[]");
    assert!(CartLedger::restore(&store, CRC).is_empty());

    Ok(())
}

#[test]
fn restored_cart_rejects_items_in_another_currency() -> TestResult {
    let mut store = MemoryStore::new();
    let mut ledger = CartLedger::restore(&store, CRC);
    let item = CatalogItem::new("cable", "Cable", from_major(5, USD), "accesorios");

    assert!(matches!(
        ledger.add(&item, now()?),
        Err(CartError::CurrencyMismatch(..))
    ));

    ledger.persist(&mut store)?;

    assert_eq!(store.raw(), Some("[]"));

    Ok(())
}

//! Integration tests for promotional pricing windows.

use jiff::{SignedDuration, Timestamp};
use rusty_money::iso::{CRC, USD};
use testresult::TestResult;

use mostrador::prelude::*;

fn ssd<'a>() -> CatalogItem<'a> {
    CatalogItem::new("ssd", "SSD NVMe 1TB", from_major(60_000, CRC), "componentes")
}

fn window() -> Result<(Timestamp, Timestamp), jiff::Error> {
    Ok((
        "2026-03-01T00:00:00Z".parse()?,
        "2026-03-31T23:59:59Z".parse()?,
    ))
}

#[test]
fn window_bounds_are_inclusive() -> TestResult {
    let (start, end) = window()?;
    let item = ssd().with_promotion(from_major(52_000, CRC), Some(start), Some(end));
    let tick = SignedDuration::from_nanos(1);

    assert!(is_promotion_active(&item, start));
    assert!(is_promotion_active(&item, end));
    assert!(!is_promotion_active(&item, start.checked_sub(tick)?));
    assert!(!is_promotion_active(&item, end.checked_add(tick)?));

    Ok(())
}

#[test]
fn open_bounds_never_expire() -> TestResult {
    let (start, end) = window()?;
    let item = ssd().with_promotion(from_major(52_000, CRC), None, None);

    assert!(is_promotion_active(&item, start));
    assert!(is_promotion_active(&item, end));
    assert!(is_promotion_active(&item, Timestamp::UNIX_EPOCH));

    Ok(())
}

#[test]
fn promo_price_must_be_strictly_lower() -> TestResult {
    let (start, _) = window()?;

    let equal = ssd().with_promotion(from_major(60_000, CRC), None, None);
    let higher = ssd().with_promotion(from_major(65_000, CRC), None, None);
    let zero = ssd().with_promotion(from_major(0, CRC), None, None);
    let foreign = ssd().with_promotion(from_major(50, USD), None, None);

    for item in [&equal, &higher, &zero, &foreign] {
        assert!(!is_promotion_active(item, start));

        let price = effective_price(item, start);

        assert_eq!(price.unit_price, from_major(60_000, CRC));
        assert!(!price.is_promo());
        assert_eq!(price.discount_percent, None);
    }

    Ok(())
}

#[test]
fn active_promotion_reports_reference_price_and_percent() -> TestResult {
    let (start, end) = window()?;
    let item = ssd().with_promotion(from_major(54_000, CRC), Some(start), Some(end));

    let price = effective_price(&item, start);

    assert_eq!(price.unit_price, from_major(54_000, CRC));
    assert_eq!(price.original_price, Some(from_major(60_000, CRC)));
    assert_eq!(price.discount_percent, Some(10));

    Ok(())
}

#[test]
fn cart_line_price_is_locked_when_added() -> TestResult {
    let (start, end) = window()?;
    let item = ssd()
        .with_promotion(from_major(52_000, CRC), Some(start), Some(end))
        .with_promo_label("Oferta de marzo");

    let mut ledger = CartLedger::new(CRC);
    ledger.add(&item, end)?;

    let line = ledger.get("ssd").ok_or("ssd line missing")?;

    assert_eq!(line.unit_price(), &from_major(52_000, CRC));
    assert_eq!(line.promo_label(), Some("Oferta de marzo"));
    assert_eq!(ledger.total_price(), from_major(52_000, CRC));

    Ok(())
}

#[test]
fn adding_after_expiry_refreshes_the_line_price() -> TestResult {
    let (start, end) = window()?;
    let item = ssd()
        .with_promotion(from_major(52_000, CRC), Some(start), Some(end))
        .with_promo_label("Oferta de marzo");
    let later = end.checked_add(SignedDuration::from_hours(1))?;

    let mut ledger = CartLedger::new(CRC);
    ledger.add(&item, start)?;
    ledger.add(&item, later)?;

    let line = ledger.get("ssd").ok_or("ssd line missing")?;

    assert_eq!(line.quantity(), 2);
    assert_eq!(line.unit_price(), &from_major(60_000, CRC));
    assert!(!line.is_promo());
    assert_eq!(line.promo_label(), None);
    assert_eq!(ledger.total_price(), from_major(120_000, CRC));

    Ok(())
}

#[test]
fn adding_after_promotion_starts_applies_the_promo_price() -> TestResult {
    let (start, end) = window()?;
    let item = ssd()
        .with_promotion(from_major(52_000, CRC), Some(start), Some(end))
        .with_promo_label("Oferta de marzo");
    let earlier = start.checked_sub(SignedDuration::from_hours(1))?;

    let mut ledger = CartLedger::new(CRC);
    ledger.add(&item, earlier)?;

    let before = ledger.get("ssd").ok_or("ssd line missing")?;

    assert_eq!(before.unit_price(), &from_major(60_000, CRC));
    assert!(!before.is_promo());

    ledger.add(&item, start)?;

    let line = ledger.get("ssd").ok_or("ssd line missing")?;

    assert_eq!(line.quantity(), 2);
    assert_eq!(line.unit_price(), &from_major(52_000, CRC));
    assert_eq!(line.original_price(), Some(&from_major(60_000, CRC)));
    assert!(line.is_promo());
    assert_eq!(line.promo_label(), Some("Oferta de marzo"));
    assert_eq!(ledger.total_price(), from_major(104_000, CRC));

    Ok(())
}

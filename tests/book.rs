use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use quote_book::{ManualClock, Quote, QuoteBook};

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 3, 1, 10, 0, 0).unwrap()
}

fn new_book() -> (QuoteBook, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(start()));
    (QuoteBook::with_clock(clock.clone()), clock)
}

fn quote(id: &str, symbol: &str, price: f64, volume: u32) -> Quote {
    Quote::new(id, symbol, price, volume, start() + Duration::hours(2))
}

fn ids(book: &QuoteBook, symbol: &str) -> Vec<String> {
    book.quotes_by_symbol()
        .get(symbol)
        .map(|quotes| quotes.iter().map(|q| q.id.clone()).collect())
        .unwrap_or_default()
}

#[test]
fn upsert_files_quote_under_both_indexes() {
    let (mut book, _) = new_book();
    book.add_or_update_quote(quote("111", "SOL", 170.0, 1000));
    book.add_or_update_quote(quote("101", "ETH", 4500.0, 750));
    book.add_or_update_quote(quote("112", "SOL", 171.0, 10));

    assert_eq!(book.len(), 3);
    assert_eq!(book.quotes_by_id().keys().cloned().collect::<Vec<_>>(), vec!["101", "111", "112"]);
    assert_eq!(ids(&book, "SOL"), vec!["111", "112"]);
    assert_eq!(ids(&book, "ETH"), vec!["101"]);
}

#[test]
fn upsert_replaces_all_fields() {
    let (mut book, _) = new_book();
    book.add_or_update_quote(quote("1", "BTC", 50000.0, 500));
    book.add_or_update_quote(quote("1", "BTC", 49000.0, 20));

    let stored = book.get("1").unwrap();
    assert_eq!(stored.price, 49000.0);
    assert_eq!(stored.available_volume, 20);
    assert_eq!(book.len(), 1);
    assert_eq!(ids(&book, "BTC"), vec!["1"]);
}

#[test]
fn upsert_with_new_symbol_moves_quote() {
    let (mut book, _) = new_book();
    book.add_or_update_quote(quote("1", "BTC", 1.0, 5));
    book.add_or_update_quote(quote("2", "ETH", 3.0, 5));
    book.add_or_update_quote(quote("1", "ETH", 2.0, 5));

    assert!(book.best_quote_with_available_volume("BTC").is_none());
    assert!(!book.quotes_by_symbol().contains_key("BTC"));
    assert_eq!(ids(&book, "ETH"), vec!["2", "1"]);
    assert_eq!(book.best_quote_with_available_volume("ETH").unwrap().id, "1");
    assert_eq!(book.len(), 2);
}

#[test]
fn remove_quote_removes_only_that_quote() {
    let (mut book, _) = new_book();
    book.add_or_update_quote(quote("a", "SOL", 1.0, 1));
    book.add_or_update_quote(quote("b", "SOL", 2.0, 1));
    book.add_or_update_quote(quote("c", "ETH", 3.0, 1));

    book.remove_quote("a");
    assert!(book.get("a").is_none());
    assert_eq!(ids(&book, "SOL"), vec!["b"]);
    assert_eq!(ids(&book, "ETH"), vec!["c"]);

    book.remove_quote("a");
    assert_eq!(book.len(), 2);
}

#[test]
fn remove_unknown_is_noop() {
    let (mut book, _) = new_book();
    book.add_or_update_quote(quote("a", "SOL", 1.0, 1));
    book.remove_quote("missing");
    book.remove_all_quotes("MISSING");
    assert_eq!(book.len(), 1);
}

#[test]
fn remove_all_quotes_clears_one_symbol() {
    let (mut book, _) = new_book();
    for i in 0..5 {
        book.add_or_update_quote(quote(&format!("s{i}"), "SOL", 1.0 + i as f64, 10));
    }
    book.add_or_update_quote(quote("b", "BTC", 50000.0, 500));

    book.remove_all_quotes("SOL");
    assert!(book.best_quote_with_available_volume("SOL").is_none());
    assert!(!book.quotes_by_symbol().contains_key("SOL"));
    assert!(book.quotes_by_id().keys().all(|id| !id.starts_with('s')));
    assert_eq!(book.symbols(), vec!["BTC".to_string()]);
}

#[test]
fn best_quote_is_lowest_price() {
    let (mut book, _) = new_book();
    book.add_or_update_quote(quote("a", "X", 2.0, 1));
    book.add_or_update_quote(quote("b", "X", 1.0, 1));
    book.add_or_update_quote(quote("c", "X", 3.0, 1));
    assert_eq!(book.best_quote_with_available_volume("X").unwrap().id, "b");
}

#[test]
fn best_quote_tie_goes_to_first_filed() {
    let (mut book, _) = new_book();
    book.add_or_update_quote(quote("late", "X", 5.0, 1));
    book.add_or_update_quote(quote("first", "X", 1.0, 1));
    book.add_or_update_quote(quote("second", "X", 1.0, 1));
    assert_eq!(book.best_quote_with_available_volume("X").unwrap().id, "first");
}

#[test]
fn best_quote_skips_expired_and_empty() {
    let (mut book, clock) = new_book();
    book.add_or_update_quote(Quote::new("expiring", "X", 0.5, 10, start() + Duration::minutes(1)));
    book.add_or_update_quote(quote("empty", "X", 0.75, 0));
    book.add_or_update_quote(quote("live", "X", 1.0, 10));

    assert_eq!(book.best_quote_with_available_volume("X").unwrap().id, "expiring");
    clock.advance(Duration::minutes(1));
    assert_eq!(book.best_quote_with_available_volume("X").unwrap().id, "expiring");
    clock.advance(Duration::seconds(1));
    assert_eq!(book.best_quote_with_available_volume("X").unwrap().id, "live");

    clock.advance(Duration::hours(3));
    assert!(book.best_quote_with_available_volume("X").is_none());
    assert_eq!(book.len(), 3);
}

#[test]
fn best_quote_returns_a_copy() {
    let (mut book, _) = new_book();
    book.add_or_update_quote(quote("a", "X", 1.0, 750));
    let before = book.best_quote_with_available_volume("X").unwrap();
    book.execute_trade("X", 500).unwrap();
    assert_eq!(before.available_volume, 750);
    assert_eq!(book.get("a").unwrap().available_volume, 250);
}

#[test]
fn unknown_symbol_has_no_best_quote() {
    let (book, _) = new_book();
    assert!(book.best_quote_with_available_volume("NOPE").is_none());
    assert!(book.is_empty());
}

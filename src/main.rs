use chrono::{Duration, Utc};
use tracing_subscriber::EnvFilter;

use quote_book::{Quote, QuoteBook};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut book = QuoteBook::new();
    let expiration = Utc::now() + Duration::hours(1);
    book.add_or_update_quote(Quote::new("q1", "X", 1.0, 750, expiration));
    book.add_or_update_quote(Quote::new("q2", "X", 2.0, 1000, expiration));

    let t1 = book.execute_trade("X", 500)?;
    let t2 = book.execute_trade("X", 500)?;

    println!("t1: {t1:?}");
    println!("t2: {t2:?}");
    println!("best: {:?}", book.best_quote_with_available_volume("X"));
    Ok(())
}

use std::sync::Arc;

use clap::Parser;
use serde_json::json;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use quote_book::config::{Command, Settings, load_script};
use quote_book::metrics::install_recorder;
use quote_book::time::parse_timestamp;
use quote_book::{Clock, ManualClock, QuoteBook, SystemClock};

#[derive(Parser, Debug)]
#[command(name = "replay")]
struct Args {
    #[arg(long, default_value = "config/example.yaml")]
    config: String,
    #[arg(long)]
    script: Option<String>,
    /// Print Prometheus metrics after the run.
    #[arg(long)]
    metrics: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let prom = args.metrics.then(install_recorder).transpose()?;
    let settings = Settings::load(&args.config)?;
    let format = settings.book.time_format.as_str();

    let pinned = settings
        .book
        .now
        .as_deref()
        .map(|now| parse_timestamp(now, format))
        .transpose()?
        .map(|now| Arc::new(ManualClock::new(now)));
    let clock: Arc<dyn Clock> = match &pinned {
        Some(clock) => Arc::clone(clock) as Arc<dyn Clock>,
        None => Arc::new(SystemClock),
    };

    let mut book = QuoteBook::with_clock(clock);
    for quote in &settings.quotes {
        book.add_or_update_quote(quote.to_quote(format)?);
    }

    let commands = args.script.as_deref().map(load_script).transpose()?.unwrap_or_default();
    for command in commands {
        let outcome = match &command {
            Command::Upsert { quote } => {
                book.add_or_update_quote(quote.to_quote(format)?);
                json!({ "op": "upsert", "id": quote.id })
            }
            Command::Remove { id } => {
                book.remove_quote(id);
                json!({ "op": "remove", "id": id })
            }
            Command::RemoveAll { symbol } => {
                book.remove_all_quotes(symbol);
                json!({ "op": "remove_all", "symbol": symbol })
            }
            Command::Best { symbol } => {
                let best = book.best_quote_with_available_volume(symbol);
                json!({ "op": "best", "symbol": symbol, "quote": best })
            }
            Command::Trade { symbol, volume } => match book.execute_trade(symbol, *volume) {
                Ok(result) => json!({ "op": "trade", "symbol": symbol, "result": result }),
                Err(err) => json!({ "op": "trade", "symbol": symbol, "error": err.to_string() }),
            },
            Command::Advance { seconds } => {
                match &pinned {
                    Some(clock) => clock.advance(chrono::Duration::seconds(*seconds)),
                    None => warn!("advance ignored: clock is not pinned"),
                }
                json!({ "op": "advance", "seconds": seconds })
            }
        };
        println!("{outcome}");
    }

    let state_bytes = bincode::serialize(&book.quotes_by_symbol())?;
    let hash = blake3::hash(&state_bytes);
    println!("state_hash={}", hash.to_hex());

    if let Some(prom) = prom {
        print!("{}", prom.render());
    }
    Ok(())
}

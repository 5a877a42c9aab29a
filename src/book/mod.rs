//! The quote book: quotes indexed by id and by symbol.
//!
//! Quotes are stored once in a slab. `by_id` maps each id to its slab key
//! and `by_symbol` lists the keys filed under each symbol in filing order.
//! A key is present in `by_id` exactly when it is present in the list of
//! its quote's current symbol.

pub mod shared;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use metrics::{counter, gauge};
use slab::Slab;
use tracing::{debug, info, instrument};

use crate::error::{QuoteBookError, Result};
use crate::matching::{self, Offer};
use crate::metrics::{LIVE_QUOTES, REMOVALS_TOTAL, TRADES_TOTAL, UPSERTS_TOTAL, VOLUME_EXECUTED_TOTAL};
use crate::models::{Quote, QuoteId, Symbol, TradeResult, Volume};
use crate::time::{Clock, SystemClock};

pub use shared::SharedQuoteBook;

pub struct QuoteBook {
    quotes: Slab<Quote>,
    by_id: HashMap<QuoteId, usize>,
    by_symbol: HashMap<Symbol, Vec<usize>>,
    clock: Arc<dyn Clock>,
}

impl Default for QuoteBook {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for QuoteBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuoteBook")
            .field("quotes", &self.quotes.len())
            .field("symbols", &self.by_symbol.len())
            .finish()
    }
}

impl QuoteBook {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            quotes: Slab::new(),
            by_id: HashMap::new(),
            by_symbol: HashMap::new(),
            clock,
        }
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<Quote> {
        let &key = self.by_id.get(id)?;
        self.quotes.get(key).cloned()
    }

    /// Inserts `quote`, or replaces every field of the quote with the same id.
    ///
    /// A replacement keeps its place in its symbol's list unless the symbol
    /// changed, in which case it moves to the end of the new symbol's list.
    pub fn add_or_update_quote(&mut self, quote: Quote) {
        counter!(UPSERTS_TOTAL).increment(1);
        match self.by_id.get(&quote.id).copied() {
            Some(key) => {
                let previous = std::mem::replace(&mut self.quotes[key], quote);
                let symbol = &self.quotes[key].symbol;
                if previous.symbol != *symbol {
                    let symbol = symbol.clone();
                    self.detach(&previous.symbol, key);
                    self.by_symbol.entry(symbol.clone()).or_default().push(key);
                    debug!(id = %previous.id, from = %previous.symbol, to = %symbol, "quote moved");
                } else {
                    debug!(id = %previous.id, symbol = %symbol, "quote updated");
                }
            }
            None => {
                let id = quote.id.clone();
                let symbol = quote.symbol.clone();
                let key = self.quotes.insert(quote);
                self.by_id.insert(id.clone(), key);
                self.by_symbol.entry(symbol.clone()).or_default().push(key);
                debug!(%id, %symbol, "quote added");
            }
        }
        gauge!(LIVE_QUOTES).set(self.len() as f64);
    }

    /// Removes the quote with `id`. Unknown ids are ignored.
    pub fn remove_quote(&mut self, id: &str) {
        let Some(key) = self.by_id.remove(id) else {
            return;
        };
        let quote = self.quotes.remove(key);
        self.detach(&quote.symbol, key);
        counter!(REMOVALS_TOTAL).increment(1);
        gauge!(LIVE_QUOTES).set(self.len() as f64);
        debug!(%id, symbol = %quote.symbol, "quote removed");
    }

    /// Removes every quote filed under `symbol`. Unknown symbols are ignored.
    pub fn remove_all_quotes(&mut self, symbol: &str) {
        let Some(keys) = self.by_symbol.remove(symbol) else {
            return;
        };
        for &key in &keys {
            let quote = self.quotes.remove(key);
            self.by_id.remove(&quote.id);
        }
        counter!(REMOVALS_TOTAL).increment(keys.len() as u64);
        gauge!(LIVE_QUOTES).set(self.len() as f64);
        debug!(%symbol, removed = keys.len(), "symbol cleared");
    }

    /// Cheapest unexpired quote for `symbol` with volume left.
    ///
    /// On equal prices the quote filed first wins.
    pub fn best_quote_with_available_volume(&self, symbol: &str) -> Option<Quote> {
        let now = self.clock.now();
        self.by_symbol
            .get(symbol)?
            .iter()
            .map(|&key| &self.quotes[key])
            .filter(|quote| quote.is_tradable(now))
            .min_by(|a, b| a.price.total_cmp(&b.price))
            .cloned()
    }

    /// Executes a buy of `volume_requested` against `symbol`, cheapest first.
    ///
    /// Either the whole request is filled or the book is left untouched and
    /// `Ok(None)` is returned. Expired quotes are skipped.
    #[instrument(skip(self))]
    pub fn execute_trade(&mut self, symbol: &str, volume_requested: Volume) -> Result<Option<TradeResult>> {
        if volume_requested == 0 {
            return Err(QuoteBookError::ZeroVolume);
        }
        let now = self.clock.now();
        let offers: Vec<Offer> = self
            .by_symbol
            .get(symbol)
            .map(|keys| {
                keys.iter()
                    .filter_map(|&key| {
                        let quote = &self.quotes[key];
                        (!quote.is_expired(now)).then_some(Offer {
                            key,
                            price: quote.price,
                            available: quote.available_volume,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        let Some(plan) = matching::plan_buy(offers, volume_requested) else {
            counter!(TRADES_TOTAL, "outcome" => "unfilled").increment(1);
            debug!("insufficient volume, nothing traded");
            return Ok(None);
        };
        let Some(last) = plan.last().map(|fill| fill.key) else {
            return Ok(None);
        };

        for fill in &plan.fills {
            let quote = &mut self.quotes[fill.key];
            quote.available_volume -= fill.volume;
        }

        let vwap = plan.volume_weighted_average_price();
        let last = &self.quotes[last];
        counter!(TRADES_TOTAL, "outcome" => "filled").increment(1);
        counter!(VOLUME_EXECUTED_TOTAL).increment(u64::from(volume_requested));
        info!(fills = plan.fills.len(), vwap, "trade filled");

        Ok(Some(TradeResult {
            id: last.id.clone(),
            symbol: last.symbol.clone(),
            volume_weighted_average_price: vwap,
            volume_requested,
            volume_executed: volume_requested,
        }))
    }

    /// Snapshot of every live quote keyed by id.
    pub fn quotes_by_id(&self) -> BTreeMap<QuoteId, Quote> {
        self.by_id
            .iter()
            .map(|(id, &key)| (id.clone(), self.quotes[key].clone()))
            .collect()
    }

    /// Snapshot of every symbol's quotes in filing order.
    pub fn quotes_by_symbol(&self) -> BTreeMap<Symbol, Vec<Quote>> {
        self.by_symbol
            .iter()
            .map(|(symbol, keys)| {
                let quotes = keys.iter().map(|&key| self.quotes[key].clone()).collect();
                (symbol.clone(), quotes)
            })
            .collect()
    }

    pub fn symbols(&self) -> Vec<Symbol> {
        let mut symbols: Vec<_> = self.by_symbol.keys().cloned().collect();
        symbols.sort();
        symbols
    }

    fn detach(&mut self, symbol: &str, key: usize) {
        if let Some(keys) = self.by_symbol.get_mut(symbol) {
            keys.retain(|&k| k != key);
            if keys.is_empty() {
                self.by_symbol.remove(symbol);
            }
        }
    }
}

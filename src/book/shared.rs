use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::book::QuoteBook;
use crate::error::Result;
use crate::models::{Quote, QuoteId, Symbol, TradeResult, Volume};

/// Cloneable handle to a [`QuoteBook`] behind one exclusive lock.
///
/// Each call holds the lock for the whole operation, so a trade's scan and
/// fill run without interleaving with any other call.
#[derive(Debug, Clone, Default)]
pub struct SharedQuoteBook {
    inner: Arc<Mutex<QuoteBook>>,
}

impl SharedQuoteBook {
    pub fn new(book: QuoteBook) -> Self {
        Self {
            inner: Arc::new(Mutex::new(book)),
        }
    }

    pub fn add_or_update_quote(&self, quote: Quote) {
        self.inner.lock().add_or_update_quote(quote);
    }

    pub fn remove_quote(&self, id: &str) {
        self.inner.lock().remove_quote(id);
    }

    pub fn remove_all_quotes(&self, symbol: &str) {
        self.inner.lock().remove_all_quotes(symbol);
    }

    pub fn best_quote_with_available_volume(&self, symbol: &str) -> Option<Quote> {
        self.inner.lock().best_quote_with_available_volume(symbol)
    }

    pub fn execute_trade(&self, symbol: &str, volume_requested: Volume) -> Result<Option<TradeResult>> {
        self.inner.lock().execute_trade(symbol, volume_requested)
    }

    pub fn quotes_by_id(&self) -> BTreeMap<QuoteId, Quote> {
        self.inner.lock().quotes_by_id()
    }

    pub fn quotes_by_symbol(&self) -> BTreeMap<Symbol, Vec<Quote>> {
        self.inner.lock().quotes_by_symbol()
    }
}

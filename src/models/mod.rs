use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type QuoteId = String;
pub type Symbol = String;
pub type Price = f64;
pub type Volume = u32;

/// A priced, volume-limited, time-bounded offer to sell a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    pub symbol: Symbol,
    pub price: Price,
    pub available_volume: Volume,
    pub expiration: DateTime<Utc>,
}

impl Quote {
    pub fn new(
        id: impl Into<QuoteId>,
        symbol: impl Into<Symbol>,
        price: Price,
        available_volume: Volume,
        expiration: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            price,
            available_volume,
            expiration,
        }
    }

    /// Expired once the expiration lies strictly before `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiration < now
    }

    pub fn is_tradable(&self, now: DateTime<Utc>) -> bool {
        !self.is_expired(now) && self.available_volume > 0
    }
}

/// Outcome of a fully filled buy.
///
/// `id` and `symbol` name the last quote volume was taken from; the
/// average price covers every quote consumed by the trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeResult {
    pub id: QuoteId,
    pub symbol: Symbol,
    pub volume_weighted_average_price: Price,
    pub volume_requested: Volume,
    pub volume_executed: Volume,
}
